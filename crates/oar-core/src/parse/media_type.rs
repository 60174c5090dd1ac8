use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A media type object. The schema stays raw so it can still contain `$ref`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub examples: IndexMap<String, Value>,
}

/// Pick the JSON-ish media type out of a `content` map: `application/json`,
/// then any media type mentioning `json`, then whatever comes first.
pub fn preferred_media_type(content: &IndexMap<String, MediaType>) -> Option<(&String, &MediaType)> {
    content
        .get_key_value("application/json")
        .or_else(|| content.iter().find(|(ct, _)| ct.contains("json")))
        .or_else(|| content.first())
}
