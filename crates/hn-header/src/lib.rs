//! Header block codec for stored hashnamed objects.
//!
//! Every stored object begins with a lightweight key-value header block,
//! terminated by a doubled end-of-line sequence (a blank line). This crate
//! parses that block into an [`ObjectHeader`] and serializes headers back to
//! text.
//!
//! On-disk format:
//!
//! ```text
//! type: php-function
//! name: test
//! hash: cf9a51c914fd6ef41e06ac4078f05373d000ee0b...
//! renamed: fn_cf9a51c914fd6ef41e06ac4078f05373d000ee0b
//! <blank line>
//! <body bytes>
//! ```
//!
//! The byte offset where the body begins and the detected end-of-line
//! convention are recorded in a derived [`HeaderLayout`], which is never
//! written back out.

pub mod codec;
pub mod header;

pub use codec::{decode, encode};
pub use header::{Eol, FieldValue, HeaderLayout, ObjectHeader};

/// Well-known header field names.
pub mod fields {
    /// Full hex digest of the canonical body (the Hash40 is its prefix).
    pub const HASH: &str = "hash";
    /// Original declared identifier of the fragment.
    pub const NAME: &str = "name";
    /// Fragment kind tag.
    pub const TYPE: &str = "type";
    /// Present iff the stored body uses the content-address name; holds it.
    pub const RENAMED: &str = "renamed";
    /// Namespace the fragment was declared in.
    pub const NAMESPACE: &str = "namespace";
}
