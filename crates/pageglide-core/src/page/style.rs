use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Inline style declarations for a single element.
///
/// Property order is stable (sorted) so serialized pages and rendered CSS
/// text stay deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InlineStyle(BTreeMap<String, String>);

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.0.insert(property.into(), value.into());
    }

    /// Chained form of [`set`](Self::set) for building literals.
    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.0.get(property).map(String::as_str)
    }

    pub fn remove(&mut self, property: &str) -> Option<String> {
        self.0.remove(property)
    }

    /// Overlay `other` onto self, later values win per property.
    pub fn merge(&mut self, other: &InlineStyle) {
        for (property, value) in &other.0 {
            self.0.insert(property.clone(), value.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for InlineStyle {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<String, String>> for InlineStyle {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl From<InlineStyle> for BTreeMap<String, String> {
    fn from(style: InlineStyle) -> Self {
        style.0
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (property, value) in &self.0 {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{property}: {value};")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overwrites_existing_properties() {
        let mut base = InlineStyle::new()
            .with("display", "block")
            .with("color", "red");
        let patch = InlineStyle::new()
            .with("color", "blue")
            .with("margin", "0");

        base.merge(&patch);

        assert_eq!(base.get("display"), Some("block"));
        assert_eq!(base.get("color"), Some("blue"));
        assert_eq!(base.get("margin"), Some("0"));
    }

    #[test]
    fn test_display_renders_css_text() {
        let style = InlineStyle::new()
            .with("overflow", "hidden")
            .with("height", "100vh");
        assert_eq!(style.to_string(), "height: 100vh; overflow: hidden;");
    }

    #[test]
    fn test_remove_returns_previous_value() {
        let mut style = InlineStyle::new().with("display", "none");
        assert_eq!(style.remove("display"), Some("none".to_string()));
        assert_eq!(style.remove("display"), None);
        assert!(style.is_empty());
    }
}
