//! Content-address resolution and installation for hashnamed.
//!
//! The central type is [`CodeStore`]: an explicit context object owning the
//! repository registry, the fetch collaborator, and the loaded-object cache,
//! so multiple independent configurations can coexist and tests run in
//! isolation — there is no process-global state.
//!
//! # Operations
//!
//! - [`CodeStore::install`] — parse raw fragment source, derive its content
//!   address, and write it into the local repository.
//! - [`CodeStore::resolve`] — locate a hash across the configured
//!   repositories in order, verify integrity, and promote the object into
//!   the local repository.
//! - [`CodeStore::resolve_address`] / [`CodeStore::load_address`] — dispatch
//!   on the `fn_*` / `C_*` / `obj_*` identifier convention, consulting the
//!   cache first.
//!
//! Loading verified code into the host process is delegated to the
//! [`CodeLoader`] collaborator; this crate only locates, verifies, and
//! stores bytes plus metadata.

pub mod cache;
pub mod classmap;
pub mod error;
pub mod loader;
pub mod resolved;
pub mod store;

pub use cache::LoadedObjectCache;
pub use classmap::{scan_class_tree, ClassMap, ClassMapEntry};
pub use error::{CoreError, CoreResult, LoadError};
pub use loader::{CodeLoader, RecordingLoader};
pub use resolved::ResolvedObject;
pub use store::CodeStore;
