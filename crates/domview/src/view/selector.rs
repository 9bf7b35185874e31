use indexmap::IndexMap;

use crate::style::StyleTarget;

/// How a UI entry designates its element(s).
#[derive(Debug, Clone, PartialEq)]
pub enum UiSelector<E> {
    Selector(String),
    /// A pre-resolved element, passed through unchanged.
    Element(E),
}

impl<E> UiSelector<E> {
    pub fn element(element: E) -> Self {
        UiSelector::Element(element)
    }

    pub fn as_selector(&self) -> Option<&str> {
        match self {
            UiSelector::Selector(selector) => Some(selector),
            UiSelector::Element(_) => None,
        }
    }
}

impl<E> From<&str> for UiSelector<E> {
    fn from(selector: &str) -> Self {
        UiSelector::Selector(selector.to_string())
    }
}

impl<E> From<String> for UiSelector<E> {
    fn from(selector: String) -> Self {
        UiSelector::Selector(selector)
    }
}

/// Result of resolving a [`UiSelector`].
#[derive(Debug, Clone, PartialEq)]
pub enum UiTarget<E> {
    Missing,
    One(E),
    Many(Vec<E>),
}

impl<E> UiTarget<E> {
    pub fn is_missing(&self) -> bool {
        matches!(self, UiTarget::Missing)
    }

    pub fn as_slice(&self) -> &[E] {
        match self {
            UiTarget::Missing => &[],
            UiTarget::One(element) => std::slice::from_ref(element),
            UiTarget::Many(elements) => elements,
        }
    }

    pub fn first(&self) -> Option<&E> {
        self.as_slice().first()
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl<E: Clone> UiTarget<E> {
    pub fn to_vec(&self) -> Vec<E> {
        self.as_slice().to_vec()
    }
}

impl<'a, E> From<&'a UiTarget<E>> for StyleTarget<'a, E> {
    fn from(target: &'a UiTarget<E>) -> Self {
        match target {
            UiTarget::Missing => StyleTarget::None,
            UiTarget::One(element) => StyleTarget::Element(element),
            UiTarget::Many(elements) => StyleTarget::Elements(elements),
        }
    }
}

/// Logical name to selector.
pub type SelectorMap<E> = IndexMap<String, UiSelector<E>>;

/// Logical name to resolved element(s).
pub type Ui<E> = IndexMap<String, UiTarget<E>>;

/// Whether a selector resolves to one element or to all matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorMode<'a> {
    First(&'a str),
    All(&'a str),
}

impl<'a> SelectorMode<'a> {
    /// A trailing `[0]` or a leading `#` asks for the first match only;
    /// the `[0]` suffix is removed before querying.
    pub fn classify(selector: &'a str) -> Self {
        if let Some(stripped) = selector.strip_suffix("[0]") {
            SelectorMode::First(stripped)
        } else if selector.starts_with('#') {
            SelectorMode::First(selector)
        } else {
            SelectorMode::All(selector)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(SelectorMode::classify("#title"), SelectorMode::First("#title"));
        assert_eq!(SelectorMode::classify(".item[0]"), SelectorMode::First(".item"));
        assert_eq!(SelectorMode::classify("#a[0]"), SelectorMode::First("#a"));
        assert_eq!(SelectorMode::classify(".item"), SelectorMode::All(".item"));
        assert_eq!(SelectorMode::classify("li a"), SelectorMode::All("li a"));
    }

    #[test]
    fn test_target_slices() {
        let missing: UiTarget<u8> = UiTarget::Missing;
        assert!(missing.is_empty());
        assert_eq!(missing.first(), None);

        let one = UiTarget::One(3u8);
        assert_eq!(one.as_slice(), &[3]);

        let many = UiTarget::Many(vec![1u8, 2]);
        assert_eq!(many.len(), 2);
        assert_eq!(many.to_vec(), vec![1, 2]);
    }
}
