use std::sync::LazyLock;

use regex::Regex;

use hn_types::{FragmentKind, Hash40};

use crate::dialect::{COMMENT_CLOSE, COMMENT_OPEN, SCRIPT_TAG, SKIPPED_WHITESPACE};

/// Identifier: `[A-Za-z_]` or any non-ASCII char, then the same plus digits.
macro_rules! ident {
    () => {
        r"(?:[A-Za-z_]|[^\x00-\x7F])(?:[A-Za-z0-9_]|[^\x00-\x7F])*"
    };
}

static FUNCTION_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(r"function +(", ident!(), r")\s*\(")).expect("static regex")
});

static CLASS_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(concat!(r"class +(", ident!(), r")")).expect("static regex"));

static NAMESPACE_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(r"namespace +((?:[A-Za-z_]|[^\x00-\x7F]).*);")).expect("static regex")
});

/// A successfully parsed code fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedFragment<'a> {
    /// The fragment kind the source was parsed as.
    pub kind: FragmentKind,
    /// Declared identifier.
    pub name: String,
    /// Declared namespace, trimmed, if present.
    pub namespace: Option<String>,
    /// Byte offset in the source where the hashable body starts.
    pub body_offset: usize,
    /// The canonical hashable body: everything from `body_offset` to the end.
    pub hashable: &'a str,
    /// Content address of the hashable body.
    pub hash: Hash40,
    /// Full 64-char SHA-256 hex digest of the hashable body.
    pub full_digest: String,
}

/// Parse `source` as a fragment of `kind`.
///
/// The hashable body starts after an optional leading script tag and an
/// optional header comment; the declaration (with its name, and namespace if
/// any) must appear between that start and the first `{` in the source.
/// Returns `None` for anything not parseable as the given kind — malformed
/// input is never a hard error here.
pub fn parse(source: &str, kind: FragmentKind) -> Option<ParsedFragment<'_>> {
    // the first brace marks the beginning of the declaration body
    let brace = source.find('{')?;

    let mut start = source
        .find(SCRIPT_TAG)
        .map(|i| i + SCRIPT_TAG.len())
        .unwrap_or(0);
    start += leading_whitespace(&source[start..]);

    // a header comment right after the tag is wrapper noise, not body
    if source[start..].starts_with(COMMENT_OPEN) {
        if let Some(end) = source[start + COMMENT_OPEN.len()..].find(COMMENT_CLOSE) {
            start += COMMENT_OPEN.len() + end + COMMENT_CLOSE.len();
            start += leading_whitespace(&source[start..]);
        }
    }

    let region = source.get(start..brace).unwrap_or("");

    let namespace = NAMESPACE_DECL
        .captures(region)
        .map(|c| c[1].trim().to_string());

    let name_regex = match kind {
        FragmentKind::Function => &FUNCTION_NAME,
        FragmentKind::ClassLike => &CLASS_NAME,
    };
    let name = name_regex.captures(region)?[1].to_string();

    let hashable = &source[start..];
    Some(ParsedFragment {
        kind,
        name,
        namespace,
        body_offset: start,
        hashable,
        hash: Hash40::of_body(hashable.as_bytes()),
        full_digest: Hash40::full_digest_hex(hashable.as_bytes()),
    })
}

fn leading_whitespace(s: &str) -> usize {
    s.len() - s.trim_start_matches(SKIPPED_WHITESPACE).len()
}
