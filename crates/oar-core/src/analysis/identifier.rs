use super::naming::{singularize, strip_affix_ignore_case};

/// Suffixes that, after the singular resource name, mark an identifier:
/// `authorName`, `countryCode`, ...
const NAMED_SUFFIXES: &[&str] = &["name", "code", "key", "identifier"];

/// Tokens that suggest an identifying parameter regardless of resource.
const GENERIC_TOKENS: &[&str] = &["uuid", "guid", "key", "identifier", "code", "name"];

/// Canonical field names for identifier remainders.
const CANONICAL_FIELDS: &[(&str, &str)] = &[
    ("id", "id"),
    ("identifier", "id"),
    ("key", "id"),
    ("uuid", "id"),
    ("guid", "id"),
    ("name", "name"),
    ("title", "name"),
    ("code", "code"),
    ("number", "number"),
    ("num", "number"),
];

const DEFAULT_IDENTIFIER: &str = "id";

/// Infer the identifier field of `resource_name` from the path parameter
/// names seen in its paths (deduplicated, in discovery order).
///
/// Examples:
/// - `books`, `[bookId]` → `id`
/// - `authors`, `[authorName]` → `name`
/// - `users`, `[]` → `id`
pub fn infer_identifier(resource_name: &str, candidates: &[String]) -> String {
    match select_candidate(resource_name, candidates) {
        Some(chosen) => normalize_identifier(resource_name, chosen),
        None => DEFAULT_IDENTIFIER.to_string(),
    }
}

/// Pick the parameter that identifies an instance. First matching rule wins:
///
/// 1. exactly `id`
/// 2. `{singular}Id`
/// 3. `{singular}` + `Name`/`Code`/`Key`/`Identifier`
/// 4. contains `{singular}`
/// 5. contains a generic token (`uuid`, `guid`, `key`, `identifier`, `code`, `name`)
/// 6. the first candidate
///
/// Rules 2–5 ignore case.
pub fn select_candidate<'c>(resource_name: &str, candidates: &'c [String]) -> Option<&'c str> {
    let singular = singularize(resource_name).to_ascii_lowercase();
    let lowered: Vec<(String, &'c str)> = candidates
        .iter()
        .map(|c| (c.to_ascii_lowercase(), c.as_str()))
        .collect();
    if let Some(exact) = candidates.iter().find(|c| c.as_str() == "id") {
        return Some(exact.as_str());
    }
    let singular_id = format!("{singular}id");
    if let Some(c) = first_match(&lowered, |lower| lower == singular_id) {
        return Some(c);
    }
    if let Some(c) = first_match(&lowered, |lower| {
        NAMED_SUFFIXES
            .iter()
            .any(|suffix| lower == format!("{singular}{suffix}"))
    }) {
        return Some(c);
    }
    if !singular.is_empty() {
        if let Some(c) = first_match(&lowered, |lower| lower.contains(singular.as_str())) {
            return Some(c);
        }
    }
    if let Some(c) = first_match(&lowered, |lower| GENERIC_TOKENS.iter().any(|t| lower.contains(t))) {
        return Some(c);
    }
    candidates.first().map(String::as_str)
}

fn first_match<'c>(lowered: &[(String, &'c str)], pred: impl Fn(&str) -> bool) -> Option<&'c str> {
    lowered
        .iter()
        .find(|(lower, _)| pred(lower.as_str()))
        .map(|(_, original)| *original)
}

/// Map a chosen parameter name to the field it stands for.
///
/// The singular resource name is stripped from either end (`bookId` → `Id`)
/// and the remainder mapped through [`CANONICAL_FIELDS`]; unknown
/// remainders are kept as they are. An empty remainder keeps the original.
pub fn normalize_identifier(resource_name: &str, candidate: &str) -> String {
    if candidate == DEFAULT_IDENTIFIER {
        return candidate.to_string();
    }
    let singular = singularize(resource_name);
    let remainder = strip_affix_ignore_case(candidate, &singular)
        .unwrap_or(candidate)
        .trim_matches(|c| c == '_' || c == '-');
    if remainder.is_empty() {
        return candidate.to_string();
    }
    let lower = remainder.to_ascii_lowercase();
    CANONICAL_FIELDS
        .iter()
        .find(|(from, _)| *from == lower)
        .map(|(_, to)| (*to).to_string())
        .unwrap_or_else(|| remainder.to_string())
}
