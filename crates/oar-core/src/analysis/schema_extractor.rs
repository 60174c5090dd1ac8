use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::model::{HttpMethod, ResourceInfo, ResourceOperation};
use crate::parse::response::{Response, ResponseOrRef};
use crate::parse::schema::{SchemaType, generic_object, properties, schema_type};
use crate::resolve::RefResolver;

/// Property names that commonly hold the payload of a response envelope,
/// probed in this order.
pub const WRAPPER_FIELDS: &[&str] = &["data", "items", "list", "results", "content", "records"];

/// One named strategy for finding the payload inside an envelope object.
pub struct UnwrapRule {
    pub name: &'static str,
    apply: fn(&RefResolver<'_>, &Map<String, Value>) -> Option<Value>,
}

impl UnwrapRule {
    /// Run the rule against an envelope's `properties`.
    pub fn apply(&self, resolver: &RefResolver<'_>, props: &Map<String, Value>) -> Option<Value> {
        (self.apply)(resolver, props)
    }
}

/// Envelope rules, evaluated top to bottom; the first match wins.
pub const UNWRAP_RULES: &[UnwrapRule] = &[
    UnwrapRule {
        name: "wrapper-field",
        apply: wrapper_field,
    },
    UnwrapRule {
        name: "single-array-property",
        apply: single_array_property,
    },
];

fn wrapper_field(_: &RefResolver<'_>, props: &Map<String, Value>) -> Option<Value> {
    WRAPPER_FIELDS
        .iter()
        .find_map(|field| props.get(*field))
        .cloned()
}

fn single_array_property(resolver: &RefResolver<'_>, props: &Map<String, Value>) -> Option<Value> {
    let mut arrays = props.values().filter(|schema| {
        resolver
            .resolve(schema)
            .is_some_and(|s| schema_type(&s) == Some(SchemaType::Array))
    });
    match (arrays.next(), arrays.next()) {
        (Some(only), None) => Some(only.clone()),
        _ => None,
    }
}

/// The success response of an operation: `200`, then `201`, then `default`.
pub fn find_success_response(responses: &IndexMap<String, ResponseOrRef>) -> Option<&ResponseOrRef> {
    responses
        .get("200")
        .or_else(|| responses.get("201"))
        .or_else(|| responses.get("default"))
}

/// The raw body schema of an operation's success response.
pub fn response_body_schema(resolver: &RefResolver<'_>, op: &ResourceOperation) -> Option<Value> {
    let response = match find_success_response(&op.responses)? {
        ResponseOrRef::Response(r) => r.clone(),
        ResponseOrRef::Ref { ref_path } => resolver.follow_as::<Response>(ref_path)?,
    };
    response.body_schema().cloned()
}

/// The schema of a single instance of `resource`, with every `$ref`
/// replaced.
///
/// The list GET is preferred. Arrays yield their `items`; envelope objects
/// are unwrapped by [`UNWRAP_RULES`]; an object no rule matches is taken
/// as the instance itself.
pub fn extract_instance_schema(resolver: &RefResolver<'_>, resource: &ResourceInfo) -> Option<Value> {
    let Some(get) = resource.list_operation().or_else(|| {
        resource
            .operations
            .iter()
            .find(|op| op.method == HttpMethod::Get)
    }) else {
        log::warn!("resource `{}` has no GET operation", resource.name);
        return None;
    };

    let Some(body) = response_body_schema(resolver, get) else {
        log::warn!(
            "no success response schema for {} {} (resource `{}`)",
            get.method,
            get.path,
            resource.name
        );
        return None;
    };

    let candidate = instance_candidate(resolver, &body);
    Some(resolver.resolve_expanded(&candidate).unwrap_or_else(|| {
        log::warn!("instance schema of `{}` does not resolve", resource.name);
        generic_object()
    }))
}

fn instance_candidate(resolver: &RefResolver<'_>, body: &Value) -> Value {
    let Some(resolved) = resolver.resolve(body) else {
        return body.clone();
    };
    match schema_type(&resolved) {
        Some(SchemaType::Array) => items_of(&resolved),
        Some(SchemaType::Object) => {
            let Some(props) = properties(&resolved) else {
                return body.clone();
            };
            for rule in UNWRAP_RULES {
                if let Some(inner) = rule.apply(resolver, props) {
                    log::debug!("unwrapped response envelope with rule `{}`", rule.name);
                    return match resolver.resolve(&inner) {
                        Some(r) if schema_type(&r) == Some(SchemaType::Array) => items_of(&r),
                        _ => inner,
                    };
                }
            }
            body.clone()
        }
        _ => body.clone(),
    }
}

fn items_of(array: &Value) -> Value {
    array.get("items").cloned().unwrap_or_else(generic_object)
}
