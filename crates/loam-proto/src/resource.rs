//! Resource decoding: identity and kind of a single IIIF object, v2 or v3.

use serde_json::Value;

use crate::label::Label;

/// Coarse classification of a IIIF object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Collection,
    Manifest,
    Other,
}

impl ResourceKind {
    /// Classify a raw `type` / `@type` string, ignoring case.
    pub fn classify(raw_type: &str) -> Self {
        let t = raw_type.to_lowercase();
        if t == "collection" || t == "sc:collection" || t.starts_with("collection") {
            Self::Collection
        } else if t == "manifest" || t == "sc:manifest" || t.starts_with("manifest") {
            Self::Manifest
        } else {
            Self::Other
        }
    }
}

/// Identity of a IIIF object as read from either dialect.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resource {
    /// `id` (v3) or `@id` (v2); empty when neither is a non-empty string.
    pub id: String,
    /// `type` (v3) or `@type` (v2); empty when neither is a non-empty string.
    pub raw_type: String,
    pub label: Label,
}

impl Resource {
    /// Decode from any JSON value. Non-objects decode to an empty resource.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        // An empty v3 value counts as absent.
        let field = |key: &str| obj.get(key).and_then(Value::as_str).filter(|s| !s.is_empty());
        let pick = |v3: &str, v2: &str| -> String {
            field(v3)
                .or_else(|| field(v2))
                .unwrap_or_default()
                .to_string()
        };

        Self {
            id: pick("id", "@id"),
            raw_type: pick("type", "@type"),
            label: Label::from_value(obj.get("label")),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        ResourceKind::classify(&self.raw_type)
    }

    pub fn title(&self) -> String {
        self.label.text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn v3_fields_win_over_v2() {
        let r = Resource::from_value(&json!({
            "id": "https://example.org/v3",
            "@id": "https://example.org/v2",
            "type": "Manifest",
            "@type": "sc:Collection",
        }));
        assert_eq!(r.id, "https://example.org/v3");
        assert_eq!(r.raw_type, "Manifest");
        assert_eq!(r.kind(), ResourceKind::Manifest);
    }

    #[test]
    fn v2_fields_used_when_v3_absent() {
        let r = Resource::from_value(&json!({
            "@id": "https://example.org/c",
            "@type": "sc:Collection",
            "label": "Root",
        }));
        assert_eq!(r.id, "https://example.org/c");
        assert_eq!(r.kind(), ResourceKind::Collection);
        assert_eq!(r.title(), "Root");
    }

    #[test]
    fn non_string_id_falls_back_to_v2() {
        let r = Resource::from_value(&json!({"id": 7, "@id": "m1"}));
        assert_eq!(r.id, "m1");
    }

    #[test]
    fn empty_v3_fields_fall_back_to_v2() {
        let r = Resource::from_value(&json!({
            "id": "",
            "@id": "m1",
            "type": "",
            "@type": "sc:Manifest",
        }));
        assert_eq!(r.id, "m1");
        assert_eq!(r.raw_type, "sc:Manifest");
        assert_eq!(r.kind(), ResourceKind::Manifest);

        let r = Resource::from_value(&json!({"id": "", "type": ""}));
        assert_eq!(r.id, "");
        assert_eq!(r.kind(), ResourceKind::Other);
    }

    #[test]
    fn missing_fields_are_empty() {
        let r = Resource::from_value(&json!({}));
        assert_eq!(r.id, "");
        assert_eq!(r.raw_type, "");
        assert_eq!(r.kind(), ResourceKind::Other);
        assert_eq!(r.title(), "Untitled");

        assert_eq!(Resource::from_value(&json!("m1")), Resource::default());
    }

    #[test]
    fn classification_ignores_case() {
        for t in ["collection", "Collection", "COLLECTION", "sc:Collection", "SC:COLLECTION"] {
            assert_eq!(ResourceKind::classify(t), ResourceKind::Collection, "{t}");
        }
        for t in ["manifest", "Manifest", "sc:manifest", "ManifestRef"] {
            assert_eq!(ResourceKind::classify(t), ResourceKind::Manifest, "{t}");
        }
    }

    #[test]
    fn classification_uses_prefix_not_substring() {
        assert_eq!(ResourceKind::classify("CollectionPage"), ResourceKind::Collection);
        assert_eq!(ResourceKind::classify("sc:Canvas"), ResourceKind::Other);
        assert_eq!(ResourceKind::classify("iiif:Manifest"), ResourceKind::Other);
        assert_eq!(ResourceKind::classify(""), ResourceKind::Other);
    }
}
