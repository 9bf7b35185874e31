//! Hash map used for keyed caches such as the event registry.
//!
//! Insertion-ordered maps come from `indexmap` at the use site.

pub use ahash::AHashMap as HashMap;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_name_keys() {
        let mut map: HashMap<String, u32> = HashMap::new();
        map.insert("click".to_string(), 1);
        map.entry("click".to_string()).and_modify(|count| *count += 1);
        assert_eq!(map.get("click"), Some(&2));
        assert_eq!(map.get("close"), None);
    }
}
