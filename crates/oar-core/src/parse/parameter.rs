use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Parameter location. `body` and `formData` only occur in Swagger 2.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
    Body,
    FormData,
    #[serde(other)]
    Unknown,
}

/// An API parameter, covering both the 3.x shape (`schema`) and the 2.0
/// shape (`type`/`format`/`enum`/`items` inline on the parameter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Value>,

    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl Parameter {
    /// The parameter's value schema. For 2.0 non-body parameters the inline
    /// type keywords are lifted into a schema object.
    pub fn value_schema(&self) -> Option<Value> {
        if let Some(schema) = &self.schema {
            return Some(schema.clone());
        }
        let param_type = self.param_type.as_ref()?;
        let mut schema = Map::new();
        schema.insert("type".to_string(), param_type.clone());
        if let Some(format) = &self.format {
            schema.insert("format".to_string(), Value::String(format.clone()));
        }
        if !self.enum_values.is_empty() {
            schema.insert("enum".to_string(), Value::Array(self.enum_values.clone()));
        }
        if let Some(items) = &self.items {
            schema.insert("items".to_string(), items.clone());
        }
        if let Some(default) = &self.default_value {
            schema.insert("default".to_string(), default.clone());
        }
        Some(Value::Object(schema))
    }
}

/// A reference or inline parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Parameter(Parameter),
}

/// Deserialize a `parameters` list one entry at a time. Entries that do not
/// fit [`ParameterOrRef`] are dropped with a warning; the rest are kept.
pub fn skip_malformed<'de, D>(deserializer: D) -> Result<Vec<ParameterOrRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => {
            log::warn!("ignoring `parameters` that is not a list: {other}");
            Vec::new()
        }
    };
    Ok(raw
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<ParameterOrRef>(entry) {
            Ok(param) => Some(param),
            Err(e) => {
                log::warn!("ignoring malformed parameter: {e}");
                None
            }
        })
        .collect())
}
