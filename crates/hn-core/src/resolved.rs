use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use hn_header::ObjectHeader;
use hn_types::{FragmentKind, Hash40};

/// A verified, locally stored object descriptor.
///
/// Produced by resolution and installation; everything a caller needs to
/// load and invoke the unit without touching the header again.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedObject {
    /// Content address of the canonical body.
    pub hash: Hash40,
    /// Fragment kind.
    pub kind: FragmentKind,
    /// Original declared identifier.
    pub name: String,
    /// Declared namespace, if any.
    pub namespace: Option<String>,
    /// Content-address identifier (`fn_<hash>` / `C_<hash>`).
    pub hashnamed_name: String,
    /// Fully qualified name to invoke, matching the stored body's form.
    pub call_name: String,
    /// Absolute path of the stored unit in the local repository.
    pub local_path: PathBuf,
    /// Full decoded header, including any extra fields the publisher wrote.
    pub header: ObjectHeader,
}
