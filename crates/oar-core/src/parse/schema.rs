//! Read helpers over raw JSON Schema values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// A JSON Schema type keyword value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

impl SchemaType {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "string" => Some(SchemaType::String),
            "number" => Some(SchemaType::Number),
            "integer" => Some(SchemaType::Integer),
            "boolean" => Some(SchemaType::Boolean),
            "array" => Some(SchemaType::Array),
            "object" => Some(SchemaType::Object),
            "null" => Some(SchemaType::Null),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, SchemaType::Number | SchemaType::Integer)
    }
}

/// The effective type of a schema.
///
/// `type` may be a single string or a list (3.1); for lists the first
/// non-null entry wins. Without `type`, `properties` implies an object and
/// `items` an array.
pub fn schema_type(schema: &Value) -> Option<SchemaType> {
    match schema.get("type") {
        Some(Value::String(t)) => SchemaType::parse(t),
        Some(Value::Array(types)) => {
            let parsed: Vec<SchemaType> = types
                .iter()
                .filter_map(Value::as_str)
                .filter_map(SchemaType::parse)
                .collect();
            parsed
                .iter()
                .copied()
                .find(|t| *t != SchemaType::Null)
                .or_else(|| parsed.first().copied())
        }
        _ => {
            if schema.get("properties").is_some() {
                Some(SchemaType::Object)
            } else if schema.get("items").is_some() {
                Some(SchemaType::Array)
            } else {
                None
            }
        }
    }
}

/// The `{ "type": "object", "properties": {} }` shape substituted for
/// anything that cannot be resolved.
pub fn generic_object() -> Value {
    json!({ "type": "object", "properties": {} })
}

pub fn properties(schema: &Value) -> Option<&Map<String, Value>> {
    schema.get("properties").and_then(Value::as_object)
}

pub fn format(schema: &Value) -> Option<&str> {
    schema.get("format").and_then(Value::as_str)
}

pub fn enum_values(schema: &Value) -> &[Value] {
    schema
        .get("enum")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Names listed in `required`, ignoring anything that is not a string.
pub fn required_fields(schema: &Value) -> Vec<String> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|r| {
            r.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_list_skips_null() {
        assert_eq!(
            schema_type(&json!({ "type": ["null", "integer"] })),
            Some(SchemaType::Integer)
        );
        assert_eq!(schema_type(&json!({ "type": ["null"] })), Some(SchemaType::Null));
    }

    #[test]
    fn test_implicit_types() {
        assert_eq!(
            schema_type(&json!({ "properties": {} })),
            Some(SchemaType::Object)
        );
        assert_eq!(schema_type(&json!({ "items": {} })), Some(SchemaType::Array));
        assert_eq!(schema_type(&json!({ "type": "file" })), None);
        assert_eq!(schema_type(&json!({})), None);
    }

    #[test]
    fn test_required_fields_ignores_garbage() {
        let s = json!({ "required": ["a", 3, "b"] });
        assert_eq!(required_fields(&s), vec!["a", "b"]);
    }
}
