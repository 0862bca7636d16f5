//! Source dialect constants for stored fragments.
//!
//! Fragments are curly-brace code with `function`/`class` declarations,
//! optional `namespace <ns>;` declarations, an optional leading script tag,
//! and `/* ... */` block comments. Stored files wrap their header block in
//! that comment syntax so the file stays loadable by the host runtime.

/// Marker of the leading script tag; scanning skips past its end.
pub const SCRIPT_TAG: &str = "?php";

/// Block comment delimiters used for header comments.
pub const COMMENT_OPEN: &str = "/*";
pub const COMMENT_CLOSE: &str = "*/";

/// Separator between a namespace and an invocable name.
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Whitespace skipped between the script tag / header comment and the body.
pub(crate) const SKIPPED_WHITESPACE: &[char] = &[' ', '\n', '\r'];

/// Build the full invocable name for a fragment.
///
/// The name is always namespace-qualified; an absent namespace yields the
/// root-namespace form (`\name`).
pub fn qualified_name(namespace: Option<&str>, name: &str) -> String {
    format!(
        "{}{}{}",
        namespace.unwrap_or(""),
        NAMESPACE_SEPARATOR,
        name
    )
}

/// Wrap an encoded header block into the prelude of a stored file:
/// script tag, comment-delimited header, blank-line boundary.
pub fn storage_prelude(encoded_header: &str) -> String {
    format!("<{SCRIPT_TAG}\n{COMMENT_OPEN}\n{encoded_header}{COMMENT_CLOSE}\n\n")
}
