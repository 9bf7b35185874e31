//! Inline style application with transform shorthands.
//!
//! A [`StyleMap`] is an ordered list of property/value pairs. Besides regular
//! CSS properties (camelCase or kebab-case), a few keys are interpreted:
//!
//! - `x`, `y`, `z` compose a single `translate3d(x, y, z)`, missing axes are `0`
//! - `rotate`, `scale`, `scaleX`, `scaleY` append `fn(value)` to the transform
//! - `clearProps` removes a comma separated list of properties
//!
//! The transform is written once, after every other property.

use std::fmt::Write as _;

use indexmap::IndexMap;

use crate::dom::Dom;

const TRANSFORM_FUNCTIONS: [&str; 4] = ["rotate", "scale", "scaleX", "scaleY"];

/// Ordered style declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMap {
    entries: IndexMap<String, String>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`StyleMap::insert`].
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or overwrite a declaration. Overwriting keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = StyleMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// What [`apply_style`] writes to.
#[derive(Debug)]
pub enum StyleTarget<'a, E> {
    /// Nothing; the call is a no-op.
    None,
    Element(&'a E),
    Elements(&'a [E]),
    /// Every element in the document matching the selector.
    Selector(&'a str),
}

impl<E> Clone for StyleTarget<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for StyleTarget<'_, E> {}

impl<'a, E> From<&'a str> for StyleTarget<'a, E> {
    fn from(selector: &'a str) -> Self {
        StyleTarget::Selector(selector)
    }
}

impl<'a, E> From<&'a [E]> for StyleTarget<'a, E> {
    fn from(elements: &'a [E]) -> Self {
        StyleTarget::Elements(elements)
    }
}

impl<'a, E> From<&'a Vec<E>> for StyleTarget<'a, E> {
    fn from(elements: &'a Vec<E>) -> Self {
        StyleTarget::Elements(elements)
    }
}

impl<'a, E> From<Option<&'a E>> for StyleTarget<'a, E> {
    fn from(element: Option<&'a E>) -> Self {
        match element {
            Some(element) => StyleTarget::Element(element),
            None => StyleTarget::None,
        }
    }
}

/// One write produced by [`compile_style`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleOp {
    Set { property: String, value: String },
    Clear(Vec<String>),
}

/// A [`StyleMap`] lowered to concrete property writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledStyle {
    /// Writes in declaration order.
    pub ops: Vec<StyleOp>,
    /// Composed transform; empty when the map had no transform keys.
    pub transform: String,
}

/// Lower `styles` into property writes and a transform string.
pub fn compile_style(styles: &StyleMap) -> CompiledStyle {
    let mut translate: Option<[&str; 3]> = None;
    let mut functions = String::new();
    let mut ops = Vec::new();

    for (key, value) in styles.iter() {
        match key {
            "x" | "y" | "z" => {
                let axes = translate.get_or_insert(["0", "0", "0"]);
                let index = match key {
                    "x" => 0,
                    "y" => 1,
                    _ => 2,
                };
                axes[index] = value;
            }
            key if TRANSFORM_FUNCTIONS.contains(&key) => {
                let _ = write!(functions, "{}({}) ", key, value);
            }
            "clearProps" => {
                let properties = value
                    .split(',')
                    .map(str::trim)
                    .filter(|property| !property.is_empty())
                    .map(css_property_name)
                    .collect();
                ops.push(StyleOp::Clear(properties));
            }
            _ => ops.push(StyleOp::Set {
                property: css_property_name(key),
                value: value.to_string(),
            }),
        }
    }

    let mut transform = String::new();
    if let Some([x, y, z]) = translate {
        let _ = write!(transform, "translate3d({}, {}, {}) ", x, y, z);
    }
    transform.push_str(&functions);

    CompiledStyle { ops, transform }
}

/// Convert a script-style property name (`backgroundColor`) to its CSS form
/// (`background-color`). Kebab-case names and custom properties pass through.
pub fn css_property_name(name: &str) -> String {
    if name.starts_with("--") {
        return name.to_string();
    }
    if name == "cssFloat" {
        return "float".to_string();
    }

    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Apply `styles` to every element designated by `target`.
pub fn apply_style<D: Dom>(dom: &D, target: StyleTarget<'_, D::Element>, styles: &StyleMap) {
    let compiled = compile_style(styles);

    match target {
        StyleTarget::None => {}
        StyleTarget::Element(element) => apply_compiled(dom, element, &compiled),
        StyleTarget::Elements(elements) => {
            for element in elements {
                apply_compiled(dom, element, &compiled);
            }
        }
        StyleTarget::Selector(selector) => match dom.select_all(selector) {
            Ok(elements) => {
                for element in &elements {
                    apply_compiled(dom, element, &compiled);
                }
            }
            Err(err) => tracing::warn!("css: {}", err),
        },
    }
}

/// Apply an already compiled style to one element.
pub fn apply_compiled<D: Dom>(dom: &D, element: &D::Element, compiled: &CompiledStyle) {
    for op in &compiled.ops {
        match op {
            StyleOp::Set { property, value } => dom.set_style_property(element, property, value),
            StyleOp::Clear(properties) => {
                for property in properties {
                    dom.remove_style_property(element, property);
                }
                let emptied = dom
                    .attribute(element, "style")
                    .is_some_and(|style| style.trim().is_empty());
                if emptied {
                    dom.remove_attribute(element, "style");
                }
            }
        }
    }

    if !compiled.transform.is_empty() {
        dom.set_style_property(element, "transform", &compiled.transform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_then_functions() {
        let styles = StyleMap::new().set("x", "10px").set("rotate", "45deg");
        let compiled = compile_style(&styles);
        assert_eq!(compiled.transform, "translate3d(10px, 0, 0) rotate(45deg) ");
        assert!(compiled.ops.is_empty());
    }

    #[test]
    fn test_translate_keeps_latest_axes() {
        let styles = StyleMap::new()
            .set("y", "5px")
            .set("scale", "2")
            .set("x", "1px")
            .set("z", "3px");
        let compiled = compile_style(&styles);
        assert_eq!(compiled.transform, "translate3d(1px, 5px, 3px) scale(2) ");
    }

    #[test]
    fn test_functions_in_declaration_order() {
        let styles = StyleMap::new()
            .set("scaleY", "0.5")
            .set("rotate", "10deg")
            .set("scaleX", "2");
        let compiled = compile_style(&styles);
        assert_eq!(compiled.transform, "scaleY(0.5) rotate(10deg) scaleX(2) ");
    }

    #[test]
    fn test_no_transform_keys() {
        let compiled = compile_style(&StyleMap::new().set("opacity", "0.5"));
        assert_eq!(compiled.transform, "");
        assert_eq!(
            compiled.ops,
            vec![StyleOp::Set {
                property: "opacity".into(),
                value: "0.5".into()
            }]
        );
    }

    #[test]
    fn test_clear_props_are_trimmed_and_converted() {
        let compiled = compile_style(&StyleMap::new().set("clearProps", "opacity, backgroundColor,,"));
        assert_eq!(
            compiled.ops,
            vec![StyleOp::Clear(vec![
                "opacity".into(),
                "background-color".into()
            ])]
        );
    }

    #[test]
    fn test_css_property_name() {
        assert_eq!(css_property_name("backgroundColor"), "background-color");
        assert_eq!(css_property_name("margin-top"), "margin-top");
        assert_eq!(css_property_name("--accent-Color"), "--accent-Color");
        assert_eq!(css_property_name("WebkitTransform"), "-webkit-transform");
        assert_eq!(css_property_name("cssFloat"), "float");
    }

    #[test]
    fn test_style_map_overwrite_keeps_position() {
        let styles: StyleMap = [("a", "1"), ("b", "2"), ("a", "3")].into_iter().collect();
        let pairs: Vec<_> = styles.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }
}
