use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::parse::document::Document;
use crate::parse::pointer::resolve_pointer;
use crate::parse::schema::generic_object;

/// Recursion limit for [`RefResolver::fully_resolve`]. Deeper trees are cut
/// off with the generic object shape.
pub const MAX_DEPTH: usize = 64;

/// Keywords whose value is a map of name → schema.
const SCHEMA_MAP_KEYWORDS: &[&str] = &["properties", "patternProperties", "$defs", "definitions"];

/// Keywords whose value is a list of schemas.
const SCHEMA_LIST_KEYWORDS: &[&str] = &["allOf", "anyOf", "oneOf", "prefixItems"];

/// Keywords whose value is literal data and must not be treated as a schema.
const DATA_KEYWORDS: &[&str] = &["enum", "const", "default", "example", "examples", "required"];

/// Resolves `$ref` pointers against a document's raw JSON tree.
///
/// Resolution never fails: unresolvable references and cycles degrade to
/// `{ "type": "object", "properties": {} }`. Every result is a fresh copy,
/// so callers may mutate it.
pub struct RefResolver<'a> {
    root: &'a Value,
}

impl<'a> RefResolver<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self::from_root(document.raw())
    }

    pub fn from_root(root: &'a Value) -> Self {
        Self { root }
    }

    /// Look up a single pointer without following further references.
    pub fn lookup(&self, reference: &str) -> Option<&'a Value> {
        resolve_pointer(self.root, reference)
    }

    /// Follow a chain of `$ref`s starting at `reference` until a value
    /// without `$ref` is reached. `None` for dangling or circular chains.
    pub fn follow(&self, reference: &str) -> Option<&'a Value> {
        let mut visited = HashSet::new();
        let mut current = reference;
        loop {
            if !visited.insert(current.to_string()) {
                log::warn!("circular reference chain at {current}");
                return None;
            }
            let target = self.lookup(current)?;
            match target.get("$ref").and_then(Value::as_str) {
                Some(next) => current = next,
                None => return Some(target),
            }
        }
    }

    /// Follow `reference` and deserialize the target, e.g. a referenced
    /// response or parameter object.
    pub fn follow_as<T: DeserializeOwned>(&self, reference: &str) -> Option<T> {
        let target = self.follow(reference)?;
        match serde_json::from_value(target.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("reference {reference} has an unexpected shape: {e}");
                None
            }
        }
    }

    /// Shallow resolution to a concrete schema.
    ///
    /// `$ref` is followed, `allOf` takes the first member that resolves and
    /// `anyOf`/`oneOf` take their first member. Nested properties are left
    /// untouched. `None` when nothing resolves.
    pub fn resolve(&self, schema: &Value) -> Option<Value> {
        self.resolve_shallow(schema, &mut HashSet::new(), &mut Vec::new())
    }

    /// [`Self::resolve`] followed by [`Self::fully_resolve`]. References
    /// followed at the top level count as being expanded, so a schema that
    /// refers back to itself degrades on its first nested occurrence.
    pub fn resolve_expanded(&self, schema: &Value) -> Option<Value> {
        let mut trail = Vec::new();
        let shallow = self.resolve_shallow(schema, &mut HashSet::new(), &mut trail)?;
        let mut visited: HashSet<String> = trail.into_iter().collect();
        Some(self.resolve_branch(&shallow, &mut visited, 0))
    }

    fn resolve_shallow(
        &self,
        schema: &Value,
        visited: &mut HashSet<String>,
        trail: &mut Vec<String>,
    ) -> Option<Value> {
        if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
            if !visited.insert(reference.to_string()) {
                return None;
            }
            let resolved = match self.lookup(reference) {
                Some(target) => self.resolve_shallow(target, visited, trail),
                None => {
                    log::warn!("unresolvable reference {reference}");
                    None
                }
            };
            visited.remove(reference);
            if resolved.is_some() {
                trail.push(reference.to_string());
            }
            return resolved;
        }

        if let Some(members) = non_empty_list(schema, "allOf") {
            // No merge: the first branch that resolves stands for the whole.
            return members
                .iter()
                .find_map(|member| self.resolve_shallow(member, visited, trail));
        }

        for keyword in ["anyOf", "oneOf"] {
            if let Some(members) = non_empty_list(schema, keyword) {
                return self.resolve_shallow(&members[0], visited, trail);
            }
        }

        if schema.is_object() {
            Some(schema.clone())
        } else {
            None
        }
    }

    /// Replace every nested `$ref` with the schema it points to.
    ///
    /// Descends into `properties`, `items`, `additionalProperties` and each
    /// `allOf`/`anyOf`/`oneOf` member. A reference already being expanded on
    /// the current branch is replaced by the generic object shape.
    pub fn fully_resolve(&self, schema: &Value) -> Value {
        let mut visited = HashSet::new();
        self.resolve_branch(schema, &mut visited, 0)
    }

    fn resolve_branch(&self, schema: &Value, visited: &mut HashSet<String>, depth: usize) -> Value {
        if depth > MAX_DEPTH {
            log::warn!("schema nesting exceeds {MAX_DEPTH} levels; truncating");
            return generic_object();
        }

        let map = match schema {
            Value::Object(map) => map,
            Value::Array(items) => {
                return Value::Array(
                    items
                        .iter()
                        .map(|item| self.resolve_branch(item, visited, depth + 1))
                        .collect(),
                );
            }
            other => return other.clone(),
        };

        if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
            if visited.contains(reference) {
                log::debug!("cycle through {reference}; substituting generic object");
                return generic_object();
            }
            let Some(target) = self.lookup(reference) else {
                log::warn!("unresolvable reference {reference}; substituting generic object");
                return generic_object();
            };
            visited.insert(reference.to_string());
            let resolved = self.resolve_branch(target, visited, depth + 1);
            visited.remove(reference);
            return resolved;
        }

        let mut out = Map::new();
        for (key, value) in map {
            let resolved = if DATA_KEYWORDS.contains(&key.as_str()) {
                value.clone()
            } else if SCHEMA_MAP_KEYWORDS.contains(&key.as_str()) {
                match value {
                    Value::Object(entries) => Value::Object(
                        entries
                            .iter()
                            .map(|(name, s)| (name.clone(), self.resolve_branch(s, visited, depth + 1)))
                            .collect(),
                    ),
                    other => other.clone(),
                }
            } else if SCHEMA_LIST_KEYWORDS.contains(&key.as_str()) {
                match value {
                    Value::Array(_) => self.resolve_branch(value, visited, depth + 1),
                    other => other.clone(),
                }
            } else if value.is_object() || value.is_array() {
                // items, additionalProperties, not, ... and anything unknown
                // that could still hide a reference.
                self.resolve_branch(value, visited, depth + 1)
            } else {
                value.clone()
            };
            out.insert(key.clone(), resolved);
        }
        Value::Object(out)
    }
}

fn non_empty_list<'v>(schema: &'v Value, keyword: &str) -> Option<&'v Vec<Value>> {
    schema
        .get(keyword)
        .and_then(Value::as_array)
        .filter(|members| !members.is_empty())
}

/// Whether a `$ref` key occurs anywhere in `value`.
pub fn contains_ref(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.contains_key("$ref") || map.values().any(contains_ref),
        Value::Array(items) => items.iter().any(contains_ref),
        _ => false,
    }
}
