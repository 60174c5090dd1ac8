use heck::ToTitleCase;

/// Heuristic singular form of a resource name.
///
/// Examples:
/// - `categories` → `category`
/// - `boxes` → `box`
/// - `books` → `book`
/// - `address` → `address`
pub fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        format!("{stem}y")
    } else if let Some(stem) = word.strip_suffix("es") {
        stem.to_string()
    } else if word.ends_with('s') && !word.ends_with("ss") {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

/// Human-readable label for a field name: `createdAt` → `Created At`.
pub fn humanize(field: &str) -> String {
    field.to_title_case()
}

/// Strip `affix` from the start or, failing that, the end of `word`,
/// ignoring ASCII case. `None` when `affix` is at neither end.
pub fn strip_affix_ignore_case<'w>(word: &'w str, affix: &str) -> Option<&'w str> {
    if affix.is_empty() || word.len() < affix.len() {
        return None;
    }
    let lower = word.to_ascii_lowercase();
    let affix = affix.to_ascii_lowercase();
    if lower.starts_with(&affix) {
        Some(&word[affix.len()..])
    } else if lower.ends_with(&affix) {
        Some(&word[..word.len() - affix.len()])
    } else {
        None
    }
}
