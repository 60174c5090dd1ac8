//! Local JSON Pointer lookup for `$ref` values such as
//! `#/components/schemas/User` or `#/definitions/Pet`.
//!
//! Only references into the current document are followed; anything with a
//! document part (`other.yaml#/...`, `https://...`) resolves to `None`.

use percent_encoding::percent_decode_str;
use serde_json::Value;

/// Walk `root` along the pointer in `reference`. Returns `None` for external
/// references and for pointers that do not land on a value.
pub fn resolve_pointer<'a>(root: &'a Value, reference: &str) -> Option<&'a Value> {
    let pointer = reference.strip_prefix('#')?;
    if pointer.is_empty() {
        return Some(root);
    }
    let pointer = pointer.strip_prefix('/')?;

    let mut current = root;
    for raw in pointer.split('/') {
        let segment = decode_pointer_segment(raw);
        current = match current {
            Value::Object(map) => map.get(&segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Decodes a JSON Pointer segment (`~1` → `/`, `~0` → `~`, then percent escapes).
pub fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded).decode_utf8_lossy().into_owned()
}
