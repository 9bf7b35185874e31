//! Nested data to `application/x-www-form-urlencoded` strings.
//!
//! Nested keys use bracket notation: `{"user": {"name": "Ann"}}` becomes
//! `user[name]=Ann`. Only strings produce values; numbers and booleans inside
//! a structure are skipped, and `null` (or an empty string) below the top level
//! becomes `key=null`.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;

/// Characters escaped by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode `value` as a URI component.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Serialize `data` with no key prefix.
pub fn serialize(data: &Value) -> String {
    serialize_with_prefix(data, "")
}

/// Serialize `data`, nesting every key under `prefix`.
pub fn serialize_with_prefix(data: &Value, prefix: &str) -> String {
    match data {
        Value::Null => absent(prefix),
        Value::String(text) if text.is_empty() => absent(prefix),
        Value::String(text) => format!("{}={}", prefix, encode_component(text)),
        Value::Object(map) => join(prefix, map.iter().map(|(key, value)| (key.clone(), value))),
        Value::Array(items) => join(
            prefix,
            items
                .iter()
                .enumerate()
                .map(|(index, value)| (index.to_string(), value)),
        ),
        Value::Number(_) | Value::Bool(_) => String::new(),
    }
}

fn absent(prefix: &str) -> String {
    if prefix.is_empty() {
        String::new()
    } else {
        format!("{}=null", prefix)
    }
}

fn join<'a>(prefix: &str, entries: impl Iterator<Item = (String, &'a Value)>) -> String {
    let mut pairs = Vec::new();

    for (key, value) in entries {
        if matches!(value, Value::Number(_) | Value::Bool(_)) {
            continue;
        }

        let nested = if prefix.is_empty() {
            key
        } else {
            format!("{}[{}]", prefix, key)
        };
        let fragment = serialize_with_prefix(value, &nested);
        if !fragment.is_empty() {
            pairs.push(fragment);
        }
    }

    pairs.join("&")
}
