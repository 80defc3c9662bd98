//! Product specification pairs.

use serde::{Deserialize, Serialize};

/// One `key: value` line of a product's technical specifications.
///
/// Keys may repeat; order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specification {
    /// Label, e.g. `"Pressure rating"`.
    pub key: String,
    /// Value, e.g. `"PN40"`.
    pub value: String,
}

impl Specification {
    /// Create a specification pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Whether both key and value hold non-whitespace text.
    pub fn is_complete(&self) -> bool {
        !self.key.trim().is_empty() && !self.value.trim().is_empty()
    }
}

/// Drop incomplete pairs, preserving the order of the rest.
///
/// Keys and values are compared after trimming, so whitespace-only text
/// counts as empty.
pub fn retain_complete(specs: Vec<Specification>) -> Vec<Specification> {
    specs.into_iter().filter(Specification::is_complete).collect()
}

/// Decode the `specifications` JSON column.
///
/// Accepts an array of `{key, value}` objects or a JSON-encoded string of
/// one. Anything else decodes to an empty list.
pub fn decode(value: Option<serde_json::Value>) -> Vec<Specification> {
    match value {
        Some(serde_json::Value::String(raw)) => serde_json::from_str(&raw).unwrap_or_default(),
        Some(value @ serde_json::Value::Array(_)) => serde_json::from_value(value).unwrap_or_default(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_retain_complete_preserves_order() {
        let specs = vec![
            Specification::new("Size", "DN50"),
            Specification::new("", "orphan value"),
            Specification::new("Material", " "),
            Specification::new("Size", "DN80"),
            Specification::new("Pressure", "PN16"),
        ];
        assert_eq!(
            retain_complete(specs),
            vec![
                Specification::new("Size", "DN50"),
                Specification::new("Size", "DN80"),
                Specification::new("Pressure", "PN16"),
            ]
        );
    }

    #[test]
    fn test_decode_shapes() {
        let array = json!([{ "key": "Size", "value": "DN50" }]);
        assert_eq!(decode(Some(array)), vec![Specification::new("Size", "DN50")]);

        let encoded = json!("[{\"key\":\"Body\",\"value\":\"Brass\"}]");
        assert_eq!(decode(Some(encoded)), vec![Specification::new("Body", "Brass")]);

        assert!(decode(Some(json!("not json"))).is_empty());
        assert!(decode(Some(serde_json::Value::Null)).is_empty());
        assert!(decode(None).is_empty());
    }
}
