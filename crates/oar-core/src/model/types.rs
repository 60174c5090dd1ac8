use std::collections::BTreeMap;

use serde::Serialize;

use crate::parse::document::Dialect;

/// API metadata exposed to collaborators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentInfo {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub dialect: Dialect,
    /// Absolute where an origin was known, otherwise as declared.
    pub servers: Vec<String>,
}

/// Aggregate counts over the document and its resource forest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    /// Every path in the document, resource or not.
    pub total_paths: usize,
    /// Operations owned by resources, at any depth.
    pub total_operations: usize,
    /// Resources at any depth.
    pub total_resources: usize,
    pub top_level_resources: usize,
    /// Deepest nesting level in the forest; `0` for an empty forest.
    pub max_depth: usize,
    pub method_counts: BTreeMap<String, usize>,
    pub tag_counts: BTreeMap<String, usize>,
}
