use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::hash::Hash40;

/// The kind of code fragment stored.
///
/// The kind determines the name prefix used to build content-address names,
/// the on-disk `type` header tag, and the declaration keyword the parser
/// looks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FragmentKind {
    /// A free function declaration.
    Function,
    /// A class-like declaration (class, with its whole body).
    ClassLike,
}

impl FragmentKind {
    /// Name prefix for content-address names (`fn_` / `C_`).
    pub fn name_prefix(&self) -> &'static str {
        match self {
            Self::Function => "fn_",
            Self::ClassLike => "C_",
        }
    }

    /// Canonical `type` header tag written to stored objects.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Function => "php-function",
            Self::ClassLike => "php-class",
        }
    }

    /// Parse a `type` header tag. Unknown tags yield `None` (the resolver
    /// skips such candidates rather than failing hard).
    pub fn from_type_tag(tag: &str) -> Option<Self> {
        match tag {
            "php-function" => Some(Self::Function),
            "php-class" => Some(Self::ClassLike),
            _ => None,
        }
    }

    /// Declaration keyword introducing a fragment of this kind.
    pub fn decl_keyword(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::ClassLike => "class",
        }
    }

    /// Content-address name for a fragment of this kind: prefix + hash40.
    ///
    /// Always derived from `{kind, hash}`, never stored independently.
    pub fn content_address_name(&self, hash: &Hash40) -> String {
        format!("{}{}", self.name_prefix(), hash.to_hex())
    }
}

impl std::fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_tag())
    }
}

impl std::str::FromStr for FragmentKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_type_tag(s).ok_or_else(|| TypeError::UnknownTypeTag(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tag_roundtrip() {
        for kind in [FragmentKind::Function, FragmentKind::ClassLike] {
            assert_eq!(FragmentKind::from_type_tag(kind.type_tag()), Some(kind));
        }
    }

    #[test]
    fn unknown_tag_is_none() {
        assert_eq!(FragmentKind::from_type_tag("php-undefined"), None);
        assert_eq!(FragmentKind::from_type_tag(""), None);
    }

    #[test]
    fn content_address_name_lengths() {
        let hash = Hash40::of_body(b"x");
        // fn_ + 40 = 43 chars, C_ + 40 = 42 chars
        assert_eq!(FragmentKind::Function.content_address_name(&hash).len(), 43);
        assert_eq!(FragmentKind::ClassLike.content_address_name(&hash).len(), 42);
    }

    #[test]
    fn content_address_name_embeds_hash() {
        let hash = Hash40::of_body(b"embed");
        let name = FragmentKind::Function.content_address_name(&hash);
        assert!(name.starts_with("fn_"));
        assert!(name.contains(&hash.to_hex()));
    }

    #[test]
    fn from_str_rejects_unknown() {
        let err = "php-undefined".parse::<FragmentKind>().unwrap_err();
        assert_eq!(err, TypeError::UnknownTypeTag("php-undefined".into()));
    }
}
