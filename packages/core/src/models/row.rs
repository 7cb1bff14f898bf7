//! Import Row Structures
//!
//! One feed row is a key→value record. Tabular feeds (CSV) produce flat
//! string fields keyed by header; structured feeds (JSON) may carry nested
//! payloads such as the glossary translations object, so values are kept as
//! JSON. Blank cells and empty strings count as absent: callers never need
//! to distinguish a missing column from an empty one.

use serde_json::{Map, Value};

/// One unit of feed input describing one entity to import
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImportRow {
    fields: Map<String, Value>,
}

impl ImportRow {
    /// Feed column holding the category business key
    pub const CATEGORY_KEY: &'static str = "UCATID";

    /// Feed column holding the parent category business key
    pub const PARENT_KEY: &'static str = "parentKey";

    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Build a row from string pairs (fixtures and tests)
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let fields = pairs
            .into_iter()
            .map(|(key, value)| (key.into(), Value::String(value.into())))
            .collect();
        Self { fields }
    }

    /// Raw JSON value of a field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// String value of a field; blank and non-string values count as absent
    pub fn get_str(&self, field: &str) -> Option<&str> {
        match self.fields.get(field) {
            Some(Value::String(value)) => {
                let value = value.trim();
                if value.is_empty() {
                    None
                } else {
                    Some(value)
                }
            }
            _ => None,
        }
    }

    /// Boolean value of a field; accepts JSON booleans, 0/1 numbers and
    /// "true"/"false"/"1"/"0" strings
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        match self.fields.get(field) {
            Some(Value::Bool(flag)) => Some(*flag),
            Some(Value::Number(number)) => number.as_i64().map(|value| value != 0),
            Some(Value::String(value)) => match value.trim() {
                "1" => Some(true),
                "0" => Some(false),
                other => match other.to_ascii_lowercase().as_str() {
                    "true" => Some(true),
                    "false" => Some(false),
                    _ => None,
                },
            },
            _ => None,
        }
    }

    /// The row's category business key, when present
    pub fn category_key(&self) -> Option<&str> {
        self.get_str(Self::CATEGORY_KEY)
    }

    /// The row's parent category business key, when present
    pub fn parent_key(&self) -> Option<&str> {
        self.get_str(Self::PARENT_KEY)
    }

    /// Iterate all fields of the row
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for ImportRow {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_accessors() {
        let row = ImportRow::from_pairs([
            (ImportRow::CATEGORY_KEY, "shoes"),
            (ImportRow::PARENT_KEY, "demoshop"),
        ]);

        assert_eq!(row.category_key(), Some("shoes"));
        assert_eq!(row.parent_key(), Some("demoshop"));
    }

    #[test]
    fn test_blank_fields_count_as_absent() {
        let row = ImportRow::from_pairs([
            (ImportRow::CATEGORY_KEY, "shoes"),
            (ImportRow::PARENT_KEY, "   "),
        ]);

        assert_eq!(row.parent_key(), None);
        assert_eq!(row.get_str("missing"), None);
    }

    #[test]
    fn test_values_are_trimmed() {
        let row = ImportRow::from_pairs([(ImportRow::CATEGORY_KEY, "  shoes ")]);

        assert_eq!(row.category_key(), Some("shoes"));
    }

    #[test]
    fn test_bool_parsing() {
        let mut fields = Map::new();
        fields.insert("a".to_string(), json!(true));
        fields.insert("b".to_string(), json!("0"));
        fields.insert("c".to_string(), json!("True"));
        fields.insert("d".to_string(), json!(1));
        fields.insert("e".to_string(), json!("maybe"));
        let row = ImportRow::new(fields);

        assert_eq!(row.get_bool("a"), Some(true));
        assert_eq!(row.get_bool("b"), Some(false));
        assert_eq!(row.get_bool("c"), Some(true));
        assert_eq!(row.get_bool("d"), Some(true));
        assert_eq!(row.get_bool("e"), None);
        assert_eq!(row.get_bool("missing"), None);
    }

    #[test]
    fn test_nested_values_stay_reachable() {
        let mut fields = Map::new();
        fields.insert(
            "storeseed.label.price".to_string(),
            json!({ "translations": { "en_US": "Price" } }),
        );
        let row = ImportRow::new(fields);

        let payload = row.get("storeseed.label.price").unwrap();
        assert_eq!(payload["translations"]["en_US"], "Price");
        assert_eq!(row.len(), 1);
        assert!(!row.is_empty());
    }
}
