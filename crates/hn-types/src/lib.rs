//! Foundation types for hashnamed.
//!
//! This crate provides the identity types used throughout the hashnamed
//! system. Every other hashnamed crate depends on `hn-types`.
//!
//! # Key Types
//!
//! - [`Hash40`] — truncated SHA-256 content address of a fragment's canonical body
//! - [`FragmentKind`] — function vs. class-like fragment classification
//! - [`ContentAddress`] — parsed `fn_*` / `C_*` / `obj_*` identifier

pub mod address;
pub mod error;
pub mod hash;
pub mod kind;

pub use address::ContentAddress;
pub use error::TypeError;
pub use hash::Hash40;
pub use kind::FragmentKind;
