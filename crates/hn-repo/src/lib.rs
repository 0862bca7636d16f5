//! Repository registry and fetch collaborators for hashnamed.
//!
//! A [`RepositoryRegistry`] is an ordered mapping of repository keys to
//! location prefixes. Exactly one repository — keyed [`LOCAL_KEY`] — is the
//! authoritative, writable local cache; all others are read-only remote
//! sources consulted in insertion order on local miss.
//!
//! Byte retrieval is abstracted behind the [`Fetcher`] trait, which treats
//! local file reads and remote HTTP(S) GETs uniformly and collapses failure
//! and empty results into "no data" — the resolver's fallback loop never
//! distinguishes the two.

pub mod fetch;
pub mod registry;

pub use fetch::{Fetcher, FileFetcher, HttpFetcher, InMemoryFetcher, StandardFetcher};
pub use registry::{RepoEntry, Repository, RepositoryRegistry, LOCAL_KEY};
