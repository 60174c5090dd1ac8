use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::operation::PathItem;
use super::server::Server;
use crate::error::ParseError;

/// The specification family a document was written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    #[serde(rename = "swagger-2.0")]
    Swagger2,
    #[serde(rename = "openapi-3.0")]
    OpenApi30,
    #[serde(rename = "openapi-3.1")]
    OpenApi31,
}

impl Dialect {
    /// Map the value of the `swagger` / `openapi` field to a dialect.
    /// `3.2` and later minor versions are read with 3.1 rules.
    fn detect(swagger: Option<&str>, openapi: Option<&str>) -> Result<Self, ParseError> {
        match (openapi, swagger) {
            (Some(v), _) if v.starts_with("3.0") => Ok(Dialect::OpenApi30),
            (Some(v), _) if v.starts_with("3.") => Ok(Dialect::OpenApi31),
            (Some(v), _) => Err(ParseError::UnsupportedVersion(v.to_string())),
            (None, Some(v)) if v.starts_with("2.") => Ok(Dialect::Swagger2),
            (None, Some(v)) => Err(ParseError::UnsupportedVersion(v.to_string())),
            (None, None) => Err(ParseError::MissingField("openapi or swagger".to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Swagger2 => "swagger-2.0",
            Dialect::OpenApi30 => "openapi-3.0",
            Dialect::OpenApi31 => "openapi-3.1",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Info object describing the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Info {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub version: String,
}

/// Tag definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A structurally validated OpenAPI 2.0 / 3.x document.
///
/// Typed views cover what the analysis reads directly; schemas stay as raw
/// JSON inside [`Document::raw`] so `$ref` pointers can be walked against the
/// original tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub dialect: Dialect,
    /// The literal `openapi` / `swagger` value.
    pub spec_version: String,
    pub info: Info,
    /// OpenAPI 3.x `servers`.
    pub servers: Vec<Server>,
    /// Swagger 2.0 `host`.
    pub host: Option<String>,
    /// Swagger 2.0 `basePath`.
    pub base_path: Option<String>,
    /// Swagger 2.0 `schemes`.
    pub schemes: Vec<String>,
    pub paths: IndexMap<String, PathItem>,
    pub tags: Vec<Tag>,
    raw: Value,
}

impl Document {
    /// Validate the top-level structure of `value` and build the typed view.
    ///
    /// Structural problems (missing `info.title`, `paths` not an object, ...)
    /// are fatal. Individual path items that fail to deserialize are skipped
    /// with a warning.
    pub fn from_value(value: Value) -> Result<Self, ParseError> {
        let root = value.as_object().ok_or(ParseError::NotAnObject)?;

        let openapi = optional_str(root, "openapi")?;
        let swagger = optional_str(root, "swagger")?;
        let dialect = Dialect::detect(swagger, openapi)?;
        let spec_version = openapi.or(swagger).unwrap_or_default().to_string();

        let info = parse_info(root)?;

        let raw_paths = match root.get("paths") {
            Some(Value::Object(paths)) => paths,
            Some(_) => {
                return Err(ParseError::InvalidField {
                    field: "paths".to_string(),
                    reason: "expected an object".to_string(),
                });
            }
            None => return Err(ParseError::MissingField("paths".to_string())),
        };
        let paths = parse_paths(raw_paths);

        let servers = lenient_list::<Server>(root.get("servers"), "servers");
        let tags = lenient_list::<Tag>(root.get("tags"), "tags");
        let schemes = root
            .get("schemes")
            .and_then(Value::as_array)
            .map(|s| {
                s.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            dialect,
            spec_version,
            info,
            servers,
            host: root.get("host").and_then(Value::as_str).map(str::to_string),
            base_path: root
                .get("basePath")
                .and_then(Value::as_str)
                .map(str::to_string),
            schemes,
            paths,
            tags,
            raw: value,
        })
    }

    /// The untouched JSON tree the document was built from.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

fn optional_str<'a>(root: &'a Map<String, Value>, field: &str) -> Result<Option<&'a str>, ParseError> {
    match root.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(ParseError::InvalidField {
            field: field.to_string(),
            reason: "expected a string".to_string(),
        }),
    }
}

fn parse_info(root: &Map<String, Value>) -> Result<Info, ParseError> {
    let info = match root.get("info") {
        Some(Value::Object(info)) => info,
        Some(_) => {
            return Err(ParseError::InvalidField {
                field: "info".to_string(),
                reason: "expected an object".to_string(),
            });
        }
        None => return Err(ParseError::MissingField("info".to_string())),
    };

    let title = info
        .get("title")
        .and_then(Value::as_str)
        .ok_or_else(|| ParseError::MissingField("info.title".to_string()))?;

    // YAML readily turns `version: 1.0` into a number.
    let version = match info.get("version") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(ParseError::MissingField("info.version".to_string())),
    };

    Ok(Info {
        title: title.to_string(),
        description: info
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        version,
    })
}

fn parse_paths(raw: &Map<String, Value>) -> IndexMap<String, PathItem> {
    let mut paths = IndexMap::new();
    for (path, item) in raw {
        if path.starts_with("x-") {
            continue;
        }
        match serde_json::from_value::<PathItem>(item.clone()) {
            Ok(parsed) => {
                paths.insert(path.clone(), parsed);
            }
            Err(e) => log::warn!("skipping path {path}: {e}"),
        }
    }
    paths
}

fn lenient_list<T: serde::de::DeserializeOwned>(value: Option<&Value>, field: &str) -> Vec<T> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<T>(item.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("ignoring malformed entry in {field}: {e}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal(version_field: &str, version: &str) -> Value {
        json!({
            version_field: version,
            "info": { "title": "T", "version": "1" },
            "paths": {}
        })
    }

    #[test]
    fn test_detects_dialects() {
        let doc = Document::from_value(minimal("swagger", "2.0")).unwrap();
        assert_eq!(doc.dialect, Dialect::Swagger2);
        let doc = Document::from_value(minimal("openapi", "3.0.3")).unwrap();
        assert_eq!(doc.dialect, Dialect::OpenApi30);
        let doc = Document::from_value(minimal("openapi", "3.1.0")).unwrap();
        assert_eq!(doc.dialect, Dialect::OpenApi31);
        assert_eq!(doc.spec_version, "3.1.0");
    }

    #[test]
    fn test_dialect_serializes_like_display() {
        for dialect in [Dialect::Swagger2, Dialect::OpenApi30, Dialect::OpenApi31] {
            assert_eq!(serde_json::to_value(dialect).unwrap(), json!(dialect.to_string()));
        }
        let yaml = serde_yaml_ng::to_string(&Dialect::OpenApi30).unwrap();
        assert_eq!(yaml.trim(), "openapi-3.0");
    }

    #[test]
    fn test_rejects_unknown_version() {
        let err = Document::from_value(minimal("swagger", "1.2")).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedVersion(v) if v == "1.2"));
    }

    #[test]
    fn test_numeric_info_version() {
        let doc = Document::from_value(json!({
            "openapi": "3.0.0",
            "info": { "title": "T", "version": 2 },
            "paths": {}
        }))
        .unwrap();
        assert_eq!(doc.info.version, "2");
    }

    #[test]
    fn test_skips_malformed_path_item() {
        let doc = Document::from_value(json!({
            "openapi": "3.0.0",
            "info": { "title": "T", "version": "1" },
            "paths": {
                "/ok": { "get": { "responses": {} } },
                "/broken": { "get": { "tags": "not-a-list" } },
                "x-internal": { "anything": true }
            }
        }))
        .unwrap();
        assert_eq!(doc.paths.len(), 1);
        assert!(doc.paths.contains_key("/ok"));
    }
}
