use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::media_type::{MediaType, preferred_media_type};

/// A response definition. `content` is the 3.x shape, `schema` the 2.0 one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, Value>,
}

impl Response {
    /// The body schema, whichever dialect declared it.
    pub fn body_schema(&self) -> Option<&Value> {
        preferred_media_type(&self.content)
            .and_then(|(_, mt)| mt.schema.as_ref())
            .or(self.schema.as_ref())
    }
}

/// A reference or inline response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Response(Response),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_body_schema_openapi3() {
        let r: Response = serde_json::from_value(json!({
            "description": "ok",
            "content": { "application/json": { "schema": { "type": "array" } } }
        }))
        .unwrap();
        assert_eq!(r.body_schema(), Some(&json!({ "type": "array" })));
    }

    #[test]
    fn test_body_schema_swagger2() {
        let r: Response = serde_json::from_value(json!({
            "description": "ok",
            "schema": { "$ref": "#/definitions/Pet" }
        }))
        .unwrap();
        assert_eq!(r.body_schema(), Some(&json!({ "$ref": "#/definitions/Pet" })));
    }

    #[test]
    fn test_missing_description_is_fine() {
        let r: ResponseOrRef = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(r, ResponseOrRef::Response(r) if r.body_schema().is_none()));
    }
}
