//! Name utilities
//!
//! Splitting of `prefix:local` tokens, the snake-case conversion used for
//! operation keys, and the synthetic names the resolver manufactures for
//! element references, anonymous types and RPC pseudo types.

use once_cell::sync::Lazy;
use regex::Regex;

/// Namespace holding every anonymous type the resolver names
pub const GENERATED_NAMESPACE: &str = "urn:__generated__";

/// Prefix of generated type names (`__generated__1`, `__generated__2`, ...)
pub const GENERATED_PREFIX: &str = "__generated__";

/// Prefix of placeholder keys standing in for unresolved `ref=` elements
pub const REF_PREFIX: &str = "REF!";

static ACRONYM_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").unwrap());

static WORD_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z\d])([A-Z])").unwrap());

/// Split a QName into prefix and local name.
///
/// Only the first and last colon-separated segments are kept, so a
/// malformed `a:b:c` yields `(Some("a"), "c")`.
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.split_once(':') {
        Some((prefix, rest)) => {
            let local = rest.rsplit(':').next().unwrap_or(rest);
            (Some(prefix), local)
        }
        None => (None, qname),
    }
}

/// Local part of a QName token
pub fn local_part(qname: &str) -> &str {
    split_qname(qname).1
}

/// Convert an operation name to the snake-cased key operations are stored under.
///
/// `GetUserLoginById` becomes `get_user_login_by_id`. Dots and dashes are
/// replaced by underscores.
pub fn snake_case(name: &str) -> String {
    let name = name.replace("::", "/");
    let name = ACRONYM_BOUNDARY.replace_all(&name, "${1}_${2}");
    let name = WORD_BOUNDARY.replace_all(&name, "${1}_${2}");
    name.replace(&['.', '-'][..], "_").to_lowercase()
}

/// Placeholder key for an element reference (`REF!tns:Article`)
pub fn ref_key(reference: &str) -> String {
    format!("{}{}", REF_PREFIX, reference)
}

/// Name of the `n`th generated type (1-based)
pub fn generated_name(n: usize) -> String {
    format!("{}{}", GENERATED_PREFIX, n)
}

/// Name of an RPC pseudo type (`&sendsmsType`)
pub fn pseudo_type_name(base: &str) -> String {
    format!("&{}Type", base)
}
