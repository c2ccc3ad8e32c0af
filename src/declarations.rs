//! `style="..."` attribute parsing.

use serde::{Deserialize, Serialize};

/// Ordered `property → value` pairs from one style attribute.
///
/// Property names are lower-cased and unique. Re-declaring a property
/// replaces the earlier value in place, so iteration order is the order in
/// which each property first appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleDeclarations {
    entries: Vec<(String, String)>,
}

impl StyleDeclarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw style attribute. `None` is treated as an empty attribute.
    pub fn parse(raw: Option<&str>) -> Self {
        let mut declarations = Self::new();
        let Some(raw) = raw else {
            return declarations;
        };
        for segment in raw.split(';') {
            let Some((property, value)) = segment.split_once(':') else {
                continue;
            };
            let property = property.trim();
            let value = value.trim();
            if property.is_empty() || value.is_empty() {
                continue;
            }
            declarations.insert(property, value);
        }
        declarations
    }

    /// Set `property` to `value`, overwriting any earlier declaration.
    pub fn insert(&mut self, property: &str, value: &str) {
        let property = property.to_ascii_lowercase();
        match self.entries.iter_mut().find(|(p, _)| *p == property) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((property, value.to_string())),
        }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        let property = property.to_ascii_lowercase();
        self.entries
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_trims() {
        let d = StyleDeclarations::parse(Some(" color : red ; font-size:12px;"));
        assert_eq!(d.len(), 2);
        assert_eq!(d.get("color"), Some("red"));
        assert_eq!(d.get("font-size"), Some("12px"));
    }

    #[test]
    fn property_names_are_lower_cased() {
        let d = StyleDeclarations::parse(Some("COLOR:Red"));
        assert_eq!(d.get("color"), Some("Red"));
        assert_eq!(d.get("Color"), Some("Red"));
    }

    #[test]
    fn last_duplicate_wins() {
        let d = StyleDeclarations::parse(Some("color:red;color:blue"));
        assert_eq!(d.len(), 1);
        assert_eq!(d.get("color"), Some("blue"));
    }

    #[test]
    fn malformed_segments_are_dropped() {
        let d = StyleDeclarations::parse(Some("color:;:red;margin-top:5px"));
        let pairs: Vec<_> = d.iter().collect();
        assert_eq!(pairs, vec![("margin-top", "5px")]);
    }

    #[test]
    fn value_keeps_later_colons() {
        let d = StyleDeclarations::parse(Some("background: url(http://x/y.png)"));
        assert_eq!(d.get("background"), Some("url(http://x/y.png)"));
    }

    #[test]
    fn junk_never_panics() {
        for raw in ["", ";;;", ":::", "color", "a:b:c;;d", "  ;  :  ; x : "] {
            let _ = StyleDeclarations::parse(Some(raw));
        }
        assert!(StyleDeclarations::parse(None).is_empty());
        assert!(StyleDeclarations::parse(Some("color")).is_empty());
    }
}
