//! Fragment parsing for hashnamed.
//!
//! Turns raw source text into the pieces the store needs: the declared name,
//! the namespace (if any), and the canonical hashable body whose SHA-256
//! digest becomes the fragment's content address. Leading script tags and
//! header comments are excluded from the hashable body, so the hash is stable
//! regardless of how the fragment is wrapped.

pub mod dialect;
pub mod fragment;

pub use fragment::{parse, ParsedFragment};
