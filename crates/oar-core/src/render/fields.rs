//! Field filtering and ordering shared by the form and table renderers.

use serde_json::{Map, Value};

use crate::parse::schema::{properties, required_fields};

/// Vendor keyword carrying a per-field sort key.
pub const ORDER_HINT: &str = "x-order";

/// One property of an object schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub schema: Value,
}

/// Which properties to keep and in what order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldSelection<'a> {
    /// When non-empty, only these fields are kept.
    pub include: &'a [String],
    pub exclude: &'a [String],
    /// When non-empty, overrides `x-order`.
    pub order: &'a [String],
}

impl FieldSelection<'_> {
    pub fn select(&self, schema: &Value) -> Vec<Field> {
        let fields = properties(schema)
            .into_iter()
            .flatten()
            .filter(|(name, _)| self.include.is_empty() || self.include.contains(name))
            .filter(|(name, _)| !self.exclude.contains(name))
            .map(|(name, schema)| Field {
                name: name.clone(),
                schema: schema.clone(),
            })
            .collect();
        order_fields(fields, self.order)
    }
}

/// Order fields by `explicit` when given, else by their `x-order` hint.
///
/// Fields named in `explicit` come first in that order; the rest keep their
/// declaration order. Hints default to `0` and ties keep declaration order.
pub fn order_fields(mut fields: Vec<Field>, explicit: &[String]) -> Vec<Field> {
    if explicit.is_empty() {
        fields.sort_by_key(|f| order_hint(&f.schema));
        return fields;
    }
    let mut ordered = Vec::with_capacity(fields.len());
    for name in explicit {
        if let Some(pos) = fields.iter().position(|f| f.name == *name) {
            ordered.push(fields.remove(pos));
        }
    }
    ordered.extend(fields);
    ordered
}

fn order_hint(schema: &Value) -> i64 {
    match schema.get(ORDER_HINT) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Rebuild an object schema around `fields`, keeping the other keywords and
/// only the `required` entries that survived.
pub fn rebuild_object(schema: &Value, fields: &[Field]) -> Value {
    let required: Vec<Value> = required_fields(schema)
        .into_iter()
        .filter(|name| fields.iter().any(|f| f.name == *name))
        .map(Value::String)
        .collect();

    let mut out = Map::new();
    if let Value::Object(map) = schema {
        for (key, value) in map {
            if key != "properties" && key != "required" {
                out.insert(key.clone(), value.clone());
            }
        }
    }
    out.insert("type".to_string(), Value::String("object".to_string()));
    out.insert(
        "properties".to_string(),
        Value::Object(
            fields
                .iter()
                .map(|f| (f.name.clone(), f.schema.clone()))
                .collect(),
        ),
    );
    if !required.is_empty() {
        out.insert("required".to_string(), Value::Array(required));
    }
    Value::Object(out)
}
