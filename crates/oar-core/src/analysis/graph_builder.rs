use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::{Map, Value, json};

use crate::model::*;
use crate::parse::document::Document;
use crate::parse::operation::{Operation, PathItem};
use crate::parse::parameter::{Parameter, ParameterLocation, ParameterOrRef};
use crate::parse::request_body::{RequestBody, RequestBodyOrRef};
use crate::resolve::RefResolver;

use super::identifier::infer_identifier;
use super::path_classifier::{PathClassifier, ends_with_placeholder, placeholders, segment_count};

/// Paths sharing one resource chain.
struct ResourceGroup<'d> {
    chain: Vec<String>,
    paths: Vec<(&'d str, &'d PathItem)>,
}

impl ResourceGroup<'_> {
    fn key(&self) -> String {
        self.chain.join("/")
    }

    /// A list endpoint: a GET on a path that does not end in a placeholder.
    fn has_list_endpoint(&self) -> bool {
        self.paths
            .iter()
            .any(|(path, item)| item.get.is_some() && !ends_with_placeholder(path))
    }
}

/// Build the resource forest of a document.
///
/// Groups without a list endpoint are dropped. Deeper groups are nested
/// under the group whose chain is theirs minus the last token, or promoted
/// to the top level when that group does not exist.
pub fn build_resources(document: &Document, classifier: &PathClassifier) -> Vec<ResourceInfo> {
    let resolver = RefResolver::new(document);

    // Phase 1: group paths by resource chain
    let mut groups: IndexMap<String, ResourceGroup<'_>> = IndexMap::new();
    for (path, item) in &document.paths {
        let chain = classifier.classify(path);
        if chain.is_empty() {
            log::debug!("path {path} names no resource");
            continue;
        }
        groups
            .entry(chain.join("/"))
            .or_insert_with(|| ResourceGroup {
                chain,
                paths: Vec::new(),
            })
            .paths
            .push((path.as_str(), item));
    }

    // Phase 2: keep groups with a list endpoint
    let mut qualified: Vec<ResourceGroup<'_>> = Vec::new();
    for (key, group) in groups {
        if group.has_list_endpoint() {
            qualified.push(group);
        } else {
            log::warn!("dropping resource group `{key}`: no list endpoint (GET on a collection path)");
        }
    }
    log::debug!("{} resource groups qualified", qualified.len());

    // Phase 3: build each resource without children
    qualified.sort_by_key(|g| g.chain.len());
    let chains: Vec<Vec<String>> = qualified.iter().map(|g| g.chain.clone()).collect();
    let mut infos: HashMap<String, ResourceInfo> = qualified
        .iter()
        .map(|g| (g.key(), build_resource(&resolver, g)))
        .collect();

    // Phase 4: assemble the hierarchy
    let mut children: HashMap<String, Vec<String>> = HashMap::new();
    let mut roots: Vec<String> = Vec::new();
    for chain in &chains {
        let key = chain.join("/");
        let parent_key = chain[..chain.len() - 1].join("/");
        if chain.len() > 1 && infos.contains_key(&parent_key) {
            children.entry(parent_key).or_default().push(key);
        } else {
            if chain.len() > 1 {
                log::debug!("no parent for `{key}`; promoting to top level");
            }
            roots.push(key);
        }
    }

    roots
        .iter()
        .filter_map(|key| assemble(key, &mut infos, &children))
        .collect()
}

fn assemble(
    key: &str,
    infos: &mut HashMap<String, ResourceInfo>,
    children: &HashMap<String, Vec<String>>,
) -> Option<ResourceInfo> {
    let mut info = infos.remove(key)?;
    for child_key in children.get(key).into_iter().flatten() {
        let Some(child) = assemble(child_key, infos, children) else {
            continue;
        };
        if info.sub_resources.iter().any(|r| r.name == child.name) {
            log::debug!("duplicate sub-resource `{}` under `{}`", child.name, info.name);
            continue;
        }
        info.sub_resources.push(child);
    }
    Some(info)
}

fn build_resource(resolver: &RefResolver<'_>, group: &ResourceGroup<'_>) -> ResourceInfo {
    let name = group.chain.last().cloned().unwrap_or_default();

    let mut operations = Vec::new();
    for (path, item) in &group.paths {
        for (method, op) in item.operations() {
            operations.push(build_operation(resolver, path, item, method, op));
        }
    }

    let mut tags: Vec<String> = Vec::new();
    for tag in operations.iter().flat_map(|op| op.tags.iter()) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }

    let path_pattern = group
        .paths
        .iter()
        .map(|(path, _)| *path)
        .min_by_key(|path| (segment_count(path), placeholders(path).len(), *path))
        .unwrap_or_default()
        .to_string();

    let base_path = group
        .paths
        .iter()
        .map(|(path, _)| *path)
        .find(|path| !ends_with_placeholder(path))
        .or_else(|| group.paths.first().map(|(path, _)| *path))
        .unwrap_or_default()
        .to_string();

    let candidates = identifier_candidates(group, &operations);
    let identifier_field = infer_identifier(&name, &candidates);

    ResourceInfo {
        name,
        path_pattern,
        base_path,
        operations,
        identifier_field,
        is_restful: true,
        tags,
        sub_resources: Vec::new(),
    }
}

/// Every path parameter name in the group: template placeholders and
/// declared `in: path` parameters, deduplicated in discovery order.
fn identifier_candidates(group: &ResourceGroup<'_>, operations: &[ResourceOperation]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut push = |name: &str| {
        if !out.iter().any(|c| c == name) {
            out.push(name.to_string());
        }
    };
    for (path, _) in &group.paths {
        for name in placeholders(path) {
            push(&name);
        }
    }
    for param in operations.iter().flat_map(|op| op.path_parameters()) {
        push(&param.name);
    }
    out
}

/// Normalize one operation of a path item.
pub fn build_operation(
    resolver: &RefResolver<'_>,
    path: &str,
    item: &PathItem,
    method: HttpMethod,
    op: &Operation,
) -> ResourceOperation {
    let declared = merge_parameters(resolver, &item.parameters, &op.parameters);

    let mut parameters = Vec::new();
    let mut body_schema = None;
    let mut form_fields: Vec<&Parameter> = Vec::new();
    for param in &declared {
        match param.location {
            ParameterLocation::Path => parameters.push(normalize_parameter(param, ParameterIn::Path)),
            ParameterLocation::Query => parameters.push(normalize_parameter(param, ParameterIn::Query)),
            ParameterLocation::Body => body_schema = param.schema.clone(),
            ParameterLocation::FormData => form_fields.push(param),
            _ => {}
        }
    }

    // Placeholders nobody declared still need a value at request time.
    for name in placeholders(path) {
        let declared = parameters
            .iter()
            .any(|p| p.location == ParameterIn::Path && p.name == name);
        if !declared {
            parameters.push(OperationParameter {
                name,
                location: ParameterIn::Path,
                required: true,
                description: None,
                schema: Some(json!({ "type": "string" })),
            });
        }
    }

    let request_body = op
        .request_body
        .as_ref()
        .and_then(|body| request_body_schema(resolver, body))
        .or(body_schema)
        .or_else(|| form_data_schema(&form_fields));

    ResourceOperation {
        method,
        path: path.to_string(),
        operation_id: op.operation_id.clone(),
        summary: op.summary.clone(),
        description: op.description.clone(),
        parameters,
        request_body,
        responses: op.responses.clone(),
        tags: op.tags.clone(),
        deprecated: op.deprecated.unwrap_or(false),
    }
}

/// Path-level parameters overlaid by operation-level ones with the same
/// name and location. References are looked up; dangling ones are skipped.
fn merge_parameters(
    resolver: &RefResolver<'_>,
    path_level: &[ParameterOrRef],
    op_level: &[ParameterOrRef],
) -> Vec<Parameter> {
    let mut merged: Vec<Parameter> = Vec::new();
    for p in path_level.iter().chain(op_level) {
        let param = match p {
            ParameterOrRef::Parameter(param) => param.clone(),
            ParameterOrRef::Ref { ref_path } => match resolver.follow_as::<Parameter>(ref_path) {
                Some(param) => param,
                None => {
                    log::warn!("skipping unresolvable parameter {ref_path}");
                    continue;
                }
            },
        };
        match merged
            .iter_mut()
            .find(|m| m.name == param.name && m.location == param.location)
        {
            Some(existing) => *existing = param,
            None => merged.push(param),
        }
    }
    merged
}

fn normalize_parameter(param: &Parameter, location: ParameterIn) -> OperationParameter {
    OperationParameter {
        name: param.name.clone(),
        location,
        // Path parameters are always required, whatever the document says.
        required: param.required || location == ParameterIn::Path,
        description: param.description.clone(),
        schema: param.value_schema(),
    }
}

fn request_body_schema(resolver: &RefResolver<'_>, body: &RequestBodyOrRef) -> Option<Value> {
    let body = match body {
        RequestBodyOrRef::RequestBody(rb) => rb.clone(),
        RequestBodyOrRef::Ref { ref_path } => resolver.follow_as::<RequestBody>(ref_path)?,
    };
    body.body_schema().cloned()
}

/// Swagger 2.0 `formData` parameters folded into one object schema.
fn form_data_schema(fields: &[&Parameter]) -> Option<Value> {
    if fields.is_empty() {
        return None;
    }
    let mut properties = Map::new();
    let mut required = Vec::new();
    for field in fields {
        properties.insert(
            field.name.clone(),
            field.value_schema().unwrap_or_else(|| json!({ "type": "string" })),
        );
        if field.required {
            required.push(Value::String(field.name.clone()));
        }
    }
    Some(json!({
        "type": "object",
        "properties": properties,
        "required": required,
    }))
}

/// Normalize a single operation of any path in the document, resource or not.
pub fn describe_operation(document: &Document, method: HttpMethod, path: &str) -> Option<ResourceOperation> {
    let item = document.paths.get(path)?;
    let op = item.operation(method)?;
    let resolver = RefResolver::new(document);
    Some(build_operation(&resolver, path, item, method, op))
}
