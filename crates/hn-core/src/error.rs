use std::path::PathBuf;

use hn_types::{FragmentKind, Hash40, TypeError};

/// Error raised by a [`crate::CodeLoader`] implementation.
pub type LoadError = Box<dyn std::error::Error + Send + Sync>;

/// Hard errors from store operations.
///
/// "Not found" and "unparseable candidate" are not errors — they surface as
/// `Ok(None)` / repository fallback. Everything here terminates the current
/// operation.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Malformed hash or content-address identifier (caller bug).
    #[error(transparent)]
    Type(#[from] TypeError),

    /// No writable LOCAL repository configured; resolution and installation
    /// both need a write target.
    #[error("no local repository configured; add a LOCAL cache dir first")]
    NoLocalRepository,

    /// The local repository (or the loaded-object cache) holds this hash
    /// with a different kind than the caller expects. Local disagreement is
    /// cache corruption and must not be silently masked.
    #[error("object {hash} was found, but it has an unexpected type: {actual} (expected {expected})")]
    UnexpectedKind {
        hash: Hash40,
        expected: FragmentKind,
        actual: FragmentKind,
    },

    /// The source text could not be parsed as the requested fragment kind.
    #[error("this code is not valid for type {0}")]
    InvalidFragment(FragmentKind),

    /// Directory creation or file write into the local repository failed.
    #[error("storage failure at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The host loader failed to load a stored unit.
    #[error("failed to load unit {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    /// The unit was written and loaded, but the expected symbol is absent:
    /// storage succeeded, semantic install failed.
    #[error("{kind} {call_name} was not defined, but local file was created: {path}")]
    NotDefined {
        kind: FragmentKind,
        call_name: String,
        path: PathBuf,
    },
}

/// Result alias for store operations.
pub type CoreResult<T> = Result<T, CoreError>;
