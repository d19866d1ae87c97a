//! Identifier sanitizing for rendered names.

use regex::Regex;
use std::sync::LazyLock;

static NON_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-zA-Z0-9]+").expect("Invalid regex"));

/// Turn a free-form name into an identifier-safe token.
///
/// Drops a single leading `$`, then collapses every run of characters
/// outside `[A-Za-z0-9]` into one `_`.
pub fn sanitize(name: &str) -> String {
    let name = name.strip_prefix('$').unwrap_or(name);
    NON_IDENTIFIER.replace_all(name, "_").into_owned()
}
