use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid hash length: expected {expected} hex chars, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("unknown fragment type tag: {0}")]
    UnknownTypeTag(String),

    #[error("not a content-address name (expected fn_/C_/obj_ prefix convention): {0}")]
    InvalidAddress(String),
}
