//! Label decoding: collapses the polymorphic IIIF `label` field into one
//! display string.
//!
//! Shapes seen in the wild:
//! ```text
//!  {"none": ["Only"]}            v3 language map (also "en", "fr", ...)
//!  "Root"                        v2 bare string
//!  {"@value": "Root"}            v2 single-value object
//!  {"de": "Wurzel"}              flat tag → string map
//! ```
//!
//! Decoding is total: anything we cannot make sense of becomes
//! [`UNTITLED`].

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Title used when a resource carries no usable label.
pub const UNTITLED: &str = "Untitled";

/// Decoded label, one variant per accepted shape.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Label {
    /// `{"none": [..]}` or `{"en": [..]}`: the winning tag and its values.
    Tagged { lang: String, values: Vec<String> },
    /// `{"@value": ".."}`
    Value(String),
    /// Flat `{"tag": ".."}` map.
    Flat(BTreeMap<String, String>),
    /// Bare JSON string.
    Plain(String),
    /// Absent or unrecognised.
    #[default]
    Missing,
}

impl Label {
    /// Decode an optional JSON value, trying each shape in order.
    pub fn from_value(value: Option<&Value>) -> Self {
        let Some(value) = value else {
            return Self::Missing;
        };

        match value {
            Value::Object(obj) => {
                for lang in ["none", "en"] {
                    if let Some(values) = obj.get(lang).and_then(string_array) {
                        return Self::Tagged {
                            lang: lang.to_string(),
                            values,
                        };
                    }
                }

                if let Some(Value::String(s)) = obj.get("@value") {
                    if !s.is_empty() {
                        return Self::Value(s.clone());
                    }
                }

                let flat: Option<BTreeMap<String, String>> = obj
                    .iter()
                    .map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect();
                match flat {
                    Some(map) if map.values().any(|s| !s.is_empty()) => Self::Flat(map),
                    _ => Self::Missing,
                }
            }
            Value::String(s) if !s.is_empty() => Self::Plain(s.clone()),
            _ => Self::Missing,
        }
    }

    /// Language tag of a language-map label, if that is the shape it came in.
    pub fn language(&self) -> Option<&str> {
        match self {
            Self::Tagged { lang, .. } => Some(lang),
            _ => None,
        }
    }

    /// Best display text for this label. Never empty.
    pub fn text(&self) -> String {
        match self {
            Self::Tagged { values, .. } => values
                .first()
                .cloned()
                .unwrap_or_else(|| UNTITLED.to_string()),
            Self::Value(s) | Self::Plain(s) => s.clone(),
            Self::Flat(map) => ["en", "none", "@value"]
                .iter()
                .filter_map(|k| map.get(*k))
                .find(|s| !s.is_empty())
                .or_else(|| map.values().find(|s| !s.is_empty()))
                .cloned()
                .unwrap_or_else(|| UNTITLED.to_string()),
            Self::Missing => UNTITLED.to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for Label {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(Some(&value)))
    }
}

/// A non-empty array made only of strings whose first element is non-empty.
fn string_array(value: &Value) -> Option<Vec<String>> {
    let arr = value.as_array()?;
    let values: Vec<String> = arr
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect::<Option<_>>()?;
    match values.first() {
        Some(first) if !first.is_empty() => Some(values),
        _ => None,
    }
}

/// Shorthand for `Label::from_value(value).text()`.
pub fn label_text(value: Option<&Value>) -> String {
    Label::from_value(value).text()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn none_wins_over_en() {
        let v = json!({"en": ["English"], "none": ["Neutral"]});
        assert_eq!(label_text(Some(&v)), "Neutral");
    }

    #[test]
    fn en_used_when_none_is_empty() {
        let v = json!({"none": [], "en": ["English"]});
        assert_eq!(label_text(Some(&v)), "English");
        assert_eq!(Label::from_value(Some(&v)).language(), Some("en"));
    }

    #[test]
    fn language_only_for_language_maps() {
        let v = json!({"none": ["Neutral"]});
        assert_eq!(Label::from_value(Some(&v)).language(), Some("none"));
        assert_eq!(Label::from_value(Some(&json!("Root"))).language(), None);
        assert_eq!(Label::from_value(None).language(), None);
    }

    #[test]
    fn v2_value_object() {
        let v = json!({"@value": "Book of Hours", "@language": "en"});
        assert_eq!(label_text(Some(&v)), "Book of Hours");
    }

    #[test]
    fn flat_map_prefers_en_then_none() {
        let v = json!({"de": "Buch", "en": "Book"});
        assert_eq!(label_text(Some(&v)), "Book");
        let v = json!({"de": "Buch", "none": "Neutral"});
        assert_eq!(label_text(Some(&v)), "Neutral");
    }

    #[test]
    fn flat_map_falls_back_to_first_sorted_key() {
        let v = json!({"fr": "Livre", "de": "Buch"});
        assert_eq!(label_text(Some(&v)), "Buch");
    }

    #[test]
    fn bare_string() {
        assert_eq!(label_text(Some(&json!("Root"))), "Root");
    }

    #[test]
    fn malformed_shapes_are_untitled() {
        for v in [
            json!(null),
            json!(42),
            json!(true),
            json!([]),
            json!(["loose"]),
            json!({}),
            json!({"none": [1, 2]}),
            json!({"fr": ["Livre"]}),
            json!(""),
            json!({"none": [""]}),
        ] {
            assert_eq!(label_text(Some(&v)), UNTITLED, "input: {v}");
        }
        assert_eq!(label_text(None), UNTITLED);
    }

    #[test]
    fn malformed_none_falls_through_to_en() {
        let v = json!({"none": "not-an-array", "en": ["English"]});
        assert_eq!(label_text(Some(&v)), "English");
    }

    #[test]
    fn deserialize_never_fails() {
        let label: Label = serde_json::from_str("[1, {\"x\": null}]").unwrap();
        assert_eq!(label, Label::Missing);
        let label: Label = serde_json::from_str("{\"en\": [\"Root\"]}").unwrap();
        assert_eq!(label.text(), "Root");
    }
}
