use std::collections::VecDeque;

use serde::Serialize;

use super::operation::{HttpMethod, ResourceOperation};

/// A resource discovered in the document: one group of paths sharing a
/// resource chain that has a list endpoint.
///
/// Sub-resources are owned values, so the model is a forest of trees. The
/// same name may occur at several depths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceInfo {
    pub name: String,
    /// The representative path of the group (fewest segments, then fewest
    /// parameters, then lexicographic).
    pub path_pattern: String,
    /// The collection path.
    pub base_path: String,
    pub operations: Vec<ResourceOperation>,
    pub identifier_field: String,
    pub is_restful: bool,
    pub tags: Vec<String>,
    pub sub_resources: Vec<ResourceInfo>,
}

impl ResourceInfo {
    pub fn operation(&self, method: HttpMethod, path: &str) -> Option<&ResourceOperation> {
        self.operations
            .iter()
            .find(|op| op.method == method && op.path == path)
    }

    /// The GET on the collection path, if the resource has one.
    pub fn list_operation(&self) -> Option<&ResourceOperation> {
        self.operations
            .iter()
            .find(|op| op.method == HttpMethod::Get && op.path == self.base_path)
            .or_else(|| {
                self.operations
                    .iter()
                    .find(|op| op.method == HttpMethod::Get && !op.targets_instance())
            })
    }

    pub fn supports(&self, method: HttpMethod) -> bool {
        self.operations.iter().any(|op| op.method == method)
    }

    /// This resource and every descendant, depth-first, parents first.
    pub fn descendants(&self) -> Vec<&ResourceInfo> {
        let mut out = vec![self];
        for child in &self.sub_resources {
            out.extend(child.descendants());
        }
        out
    }
}

/// Breadth-first search of a forest for the resource named `name`.
///
/// Shallower resources win, so a root `posts` is found before a nested
/// `users/posts`.
pub fn find_resource<'a>(forest: &'a [ResourceInfo], name: &str) -> Option<&'a ResourceInfo> {
    let mut queue: VecDeque<&ResourceInfo> = forest.iter().collect();
    while let Some(resource) = queue.pop_front() {
        if resource.name == name {
            return Some(resource);
        }
        queue.extend(resource.sub_resources.iter());
    }
    None
}

/// Forest roots whose name never occurs as a sub-resource anywhere in the
/// forest. A root such as `posts` is hidden when `users/posts` exists.
pub fn top_level_resources(forest: &[ResourceInfo]) -> Vec<&ResourceInfo> {
    let nested: Vec<&str> = forest
        .iter()
        .flat_map(|root| root.descendants().into_iter().skip(1))
        .map(|r| r.name.as_str())
        .collect();
    forest
        .iter()
        .filter(|root| !nested.contains(&root.name.as_str()))
        .collect()
}

/// A plain-text tree of the forest, one resource per line:
/// `name  METHODS  id=<identifier>  <base path>`, children indented.
pub fn render_outline(forest: &[ResourceInfo]) -> String {
    let mut lines = Vec::new();
    for root in forest {
        outline_into(root, 0, &mut lines);
    }
    lines.join("\n")
}

fn outline_into(resource: &ResourceInfo, depth: usize, lines: &mut Vec<String>) {
    let mut methods: Vec<&str> = Vec::new();
    for method in HttpMethod::ALL {
        if resource.supports(method) {
            methods.push(method.as_str());
        }
    }
    lines.push(format!(
        "{}{}  {}  id={}  {}",
        "  ".repeat(depth),
        resource.name,
        methods.join(","),
        resource.identifier_field,
        resource.base_path
    ));
    for child in &resource.sub_resources {
        outline_into(child, depth + 1, lines);
    }
}
