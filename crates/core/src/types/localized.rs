//! Localized string type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Text keyed by locale tag (e.g. `en`, `de-DE`).
///
/// Serializes as a plain JSON object, which is the shape commercetools uses
/// for every localized field. Keys are kept sorted so two strings with the
/// same translations always compare and print identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedString(BTreeMap<String, String>);

impl LocalizedString {
    /// Create an empty localized string.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add a translation, replacing any existing one for the locale.
    #[must_use]
    pub fn with(mut self, locale: impl Into<String>, text: impl Into<String>) -> Self {
        self.0.insert(locale.into(), text.into());
        self
    }

    /// Returns the translation for a locale, if present.
    #[must_use]
    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    /// Returns `true` if there are no translations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of translations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocalizedString {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_object() {
        let name = LocalizedString::new()
            .with("en", "Summer sale")
            .with("de", "Sommerschlussverkauf");
        let json = serde_json::to_value(&name).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"de": "Sommerschlussverkauf", "en": "Summer sale"})
        );
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let a = LocalizedString::new().with("en", "A").with("de", "B");
        let b: LocalizedString = [("de", "B"), ("en", "A")].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_get() {
        let name = LocalizedString::new().with("en", "Sale");
        assert_eq!(name.get("en"), Some("Sale"));
        assert_eq!(name.get("fr"), None);
        assert_eq!(name.len(), 1);
        assert!(!name.is_empty());
    }
}
