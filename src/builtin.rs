//! Grammars bundled with the crate.

/// Id of the bundled C-like grammar.
pub const C_LIKE: &str = "c";

const C_LIKE_JSON: &str = include_str!("../grammars/c_like.json");

/// Bundled grammar sources as `(id, json)` pairs.
pub fn sources() -> &'static [(&'static str, &'static str)] {
    &[(C_LIKE, C_LIKE_JSON)]
}
