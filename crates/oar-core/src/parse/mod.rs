pub mod document;
pub mod media_type;
pub mod operation;
pub mod parameter;
pub mod pointer;
pub mod request_body;
pub mod response;
pub mod schema;
pub mod server;

use serde_json::Value;

use crate::error::ParseError;
use document::Document;

/// Parse an OpenAPI or Swagger document from YAML.
pub fn from_yaml(input: &str) -> Result<Document, ParseError> {
    let value: Value = serde_yaml_ng::from_str(input)?;
    Document::from_value(value)
}

/// Parse an OpenAPI or Swagger document from JSON.
pub fn from_json(input: &str) -> Result<Document, ParseError> {
    let value: Value = serde_json::from_str(input)?;
    Document::from_value(value)
}

/// Parse a document body whose format is not known up front. Bodies that
/// start with `{` are parsed as JSON, everything else as YAML.
pub fn from_str(input: &str) -> Result<Document, ParseError> {
    let trimmed = input.trim_start();
    if trimmed.starts_with('{') {
        from_json(input)
    } else {
        from_yaml(input)
    }
}
