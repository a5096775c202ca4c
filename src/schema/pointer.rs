//! JSON Pointer parsing for `$ref` targets (spec §6.2): either a bare
//! fragment (`"#/definitions/node"`) or an external resource plus fragment
//! (`"other.json#/definitions/node"`).

use super::ast::ReferencePath;

/// Parses a `$ref` string into external-resource and pointer-component parts.
///
/// A bare `"#"` is accepted with an empty component list even though JSON
/// Pointer normally requires a pointer to start with `/` for every non-empty
/// path; `"#"` alone means "the document root", which has no components to
/// walk.
pub fn parse_ref(raw: &str) -> ReferencePath {
    let (external, fragment) = match raw.split_once('#') {
        Some((ext, frag)) => (if ext.is_empty() { None } else { Some(ext.to_string()) }, frag),
        None => (Some(raw.to_string()), ""),
    };

    let components = if fragment.is_empty() {
        Vec::new()
    } else {
        fragment
            .trim_start_matches('/')
            .split('/')
            .map(unescape_token)
            .collect()
    };

    ReferencePath { external, components }
}

/// Reverses JSON Pointer's `~1` (`/`) and `~0` (`~`) escaping.
fn unescape_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}
