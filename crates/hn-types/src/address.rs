use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::hash::Hash40;
use crate::kind::FragmentKind;

/// A parsed public content-address identifier.
///
/// The fixed-length prefix convention encodes both the kind and the hash:
///
/// - 43 chars, `fn_<hash40>` — function lookup
/// - 42 chars, `C_<hash40>` — class-like lookup
/// - 44 chars, `obj_<hash40>` — raw descriptor lookup regardless of kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentAddress {
    /// Expected fragment kind, or `None` for `obj_` (any kind accepted).
    pub kind: Option<FragmentKind>,
    /// The requested content hash.
    pub hash: Hash40,
}

impl ContentAddress {
    /// Parse an identifier using the fixed-length prefix convention.
    ///
    /// Anything that does not match one of the three forms exactly is a
    /// caller contract violation and fails hard.
    pub fn parse(name: &str) -> Result<Self, TypeError> {
        let (kind, rest) = match name.len() {
            43 => (
                Some(FragmentKind::Function),
                name.strip_prefix(FragmentKind::Function.name_prefix()),
            ),
            42 => (
                Some(FragmentKind::ClassLike),
                name.strip_prefix(FragmentKind::ClassLike.name_prefix()),
            ),
            44 => (None, name.strip_prefix("obj_")),
            _ => (None, None),
        };
        let hex = rest.ok_or_else(|| TypeError::InvalidAddress(name.to_string()))?;
        Ok(Self {
            kind,
            hash: Hash40::from_hex(hex)?,
        })
    }
}
