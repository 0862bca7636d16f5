use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use hn_code::dialect::{qualified_name, storage_prelude};
use hn_code::fragment;
use hn_header::{decode, encode, fields, ObjectHeader};
use hn_repo::{Fetcher, RepoEntry, RepositoryRegistry, StandardFetcher};
use hn_types::{ContentAddress, FragmentKind, Hash40};

use crate::cache::LoadedObjectCache;
use crate::error::{CoreError, CoreResult};
use crate::loader::CodeLoader;
use crate::resolved::ResolvedObject;

/// Fields every candidate header must or may carry, in storage order.
const REQUESTED_FIELDS: &[(&str, bool)] = &[
    (fields::HASH, true),
    (fields::NAME, true),
    (fields::TYPE, true),
    (fields::RENAMED, false),
    (fields::NAMESPACE, false),
];

/// The store: repository registry, fetch collaborator, and loaded-object
/// cache behind one explicit context object.
pub struct CodeStore {
    registry: RepositoryRegistry,
    fetcher: Box<dyn Fetcher>,
    cache: LoadedObjectCache,
    accept_remote_renamed: bool,
}

impl std::fmt::Debug for CodeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeStore")
            .field("registry", &self.registry)
            .field("cache_len", &self.cache.len())
            .field("accept_remote_renamed", &self.accept_remote_renamed)
            .finish()
    }
}

impl CodeStore {
    /// Build a store from an existing registry and fetcher.
    pub fn new(registry: RepositoryRegistry, fetcher: Box<dyn Fetcher>) -> Self {
        Self {
            registry,
            fetcher,
            cache: LoadedObjectCache::new(),
            accept_remote_renamed: true,
        }
    }

    /// Convenience constructor: create `local_dir` if needed, register it as
    /// the local repository, and use the standard scheme-dispatching fetcher.
    pub fn open(local_dir: impl AsRef<Path>) -> CoreResult<Self> {
        let local_dir = local_dir.as_ref();
        std::fs::create_dir_all(local_dir).map_err(|source| CoreError::Storage {
            path: local_dir.to_path_buf(),
            source,
        })?;
        let local_dir = local_dir
            .canonicalize()
            .map_err(|source| CoreError::Storage {
                path: local_dir.to_path_buf(),
                source,
            })?;
        let mut registry = RepositoryRegistry::new();
        registry.add_local(local_dir.to_string_lossy());
        Ok(Self::new(registry, Box::new(StandardFetcher::new())))
    }

    /// Add repositories to the search list. Returns how many were new.
    pub fn add_repositories(&mut self, entries: impl IntoIterator<Item = RepoEntry>) -> usize {
        self.registry.add(entries)
    }

    pub fn registry(&self) -> &RepositoryRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &LoadedObjectCache {
        &self.cache
    }

    /// Whether remote candidates already stored under their content-address
    /// name are accepted. On by default; turn off to only trust remotes that
    /// publish original-named objects.
    pub fn set_accept_remote_renamed(&mut self, accept: bool) {
        self.accept_remote_renamed = accept;
    }

    // ---- resolution ----

    /// Locate `hash` across the configured repositories in search order.
    ///
    /// The first candidate that decodes, matches the hash, and survives
    /// re-verification wins; it is promoted into the local repository in the
    /// form selected by `prefer_hashnamed` (content-address names vs the
    /// original declared name) and recorded in the cache. `expected`
    /// constrains the fragment kind: a remote mismatch just skips the
    /// candidate, a local mismatch is a hard error.
    pub fn resolve(
        &mut self,
        hash: &Hash40,
        prefer_hashnamed: bool,
        expected: Option<FragmentKind>,
    ) -> CoreResult<Option<ResolvedObject>> {
        let local_root = PathBuf::from(
            &self
                .registry
                .local()
                .ok_or(CoreError::NoLocalRepository)?
                .location,
        );

        let repos: Vec<_> = self.registry.iter().cloned().collect();
        for repo in repos {
            let url = repo.url_for(hash);
            let Some(data) = self.fetcher.fetch(&url) else {
                continue;
            };
            debug!(repo = %repo.key, %url, "candidate fetched");
            match self.try_candidate(&repo, data, hash, prefer_hashnamed, expected, &local_root)? {
                Some(object) => {
                    self.cache.insert(object.clone());
                    return Ok(Some(object));
                }
                None => continue,
            }
        }
        Ok(None)
    }

    /// Validate one fetched candidate and, if it holds, store it locally.
    ///
    /// `Ok(None)` means "unusable candidate, try the next repository".
    fn try_candidate(
        &self,
        repo: &hn_repo::Repository,
        data: Vec<u8>,
        hash: &Hash40,
        prefer_hashnamed: bool,
        expected: Option<FragmentKind>,
        local_root: &Path,
    ) -> CoreResult<Option<ResolvedObject>> {
        let Ok(text) = String::from_utf8(data) else {
            debug!(repo = %repo.key, "candidate is not valid UTF-8");
            return Ok(None);
        };
        let Some(header) = decode(&text, REQUESTED_FIELDS, true) else {
            debug!(repo = %repo.key, "candidate has no decodable header");
            return Ok(None);
        };
        // required fields are guaranteed present by the decode rules
        let full_digest = header.get(fields::HASH).unwrap_or_default().to_string();
        let name = header.get(fields::NAME).unwrap_or_default().to_string();
        let type_tag = header.get(fields::TYPE).unwrap_or_default();

        if !full_digest.starts_with(&hash.to_hex()) {
            warn!(repo = %repo.key, %hash, "candidate header hash does not match request");
            return Ok(None);
        }
        let Some(kind) = FragmentKind::from_type_tag(type_tag) else {
            debug!(repo = %repo.key, type_tag, "unknown fragment type tag");
            return Ok(None);
        };
        if let Some(expected) = expected {
            if kind != expected {
                if repo.is_local {
                    return Err(CoreError::UnexpectedKind {
                        hash: *hash,
                        expected,
                        actual: kind,
                    });
                }
                debug!(repo = %repo.key, %kind, %expected, "remote kind mismatch, skipping");
                return Ok(None);
            }
        }

        let renamed_field = header.get(fields::RENAMED).filter(|v| !v.is_empty());
        let is_renamed = renamed_field.is_some();
        // a renamed value embedding the hash is an adopted alternate name and
        // becomes the authoritative content-address name; anything else falls
        // back to the derived one
        let hashnamed_name = match renamed_field {
            Some(value) if value.contains(&hash.to_hex()) => value.to_string(),
            _ => kind.content_address_name(hash),
        };
        if is_renamed && !repo.is_local && !self.accept_remote_renamed {
            debug!(repo = %repo.key, "renamed remote object rejected by policy");
            return Ok(None);
        }

        // decode always derives a layout; 0 would only mean a header bug
        let body_offset = header.layout().map(|l| l.body_offset).unwrap_or(0);
        let body = &text[body_offset..];
        let canonical = if is_renamed {
            body.replace(&hashnamed_name, &name)
        } else {
            body.to_string()
        };
        if Hash40::of_body(canonical.as_bytes()) != *hash {
            warn!(repo = %repo.key, %hash, "candidate failed integrity verification");
            return Ok(None);
        }

        let namespace = header.get(fields::NAMESPACE).map(str::to_string);
        let local_path = local_root.join(hash.subdir()).join(hash.to_hex());

        // already stored locally in the requested form: nothing to write
        let needs_write = !(repo.is_local && is_renamed == prefer_hashnamed);
        let mut stored_header = header;
        if needs_write {
            let stored_body = if prefer_hashnamed {
                stored_header.set(fields::RENAMED, &hashnamed_name);
                canonical.replace(&name, &hashnamed_name)
            } else {
                stored_header.remove(fields::RENAMED);
                canonical.clone()
            };
            write_unit(&local_path, &stored_header, &stored_body)?;
        }

        let chosen = if prefer_hashnamed {
            hashnamed_name.as_str()
        } else {
            name.as_str()
        };
        let call_name = qualified_name(namespace.as_deref(), chosen);
        Ok(Some(ResolvedObject {
            hash: *hash,
            kind,
            name,
            namespace,
            hashnamed_name,
            call_name,
            local_path,
            header: stored_header,
        }))
    }

    // ---- installation ----

    /// Parse raw fragment source, derive its content address, and write it
    /// into the local repository.
    ///
    /// With `save_hashnamed` the stored body carries the content-address
    /// name (and a `renamed` header field); otherwise the declared name is
    /// kept verbatim. The descriptor is returned without touching the cache,
    /// since nothing has been loaded yet.
    pub fn install(
        &mut self,
        code: &str,
        kind: FragmentKind,
        save_hashnamed: bool,
    ) -> CoreResult<ResolvedObject> {
        let parsed =
            fragment::parse(code, kind).ok_or(CoreError::InvalidFragment(kind))?;
        let local_root = PathBuf::from(
            &self
                .registry
                .local()
                .ok_or(CoreError::NoLocalRepository)?
                .location,
        );

        let hashnamed_name = kind.content_address_name(&parsed.hash);
        let mut header = ObjectHeader::new();
        header.set(fields::TYPE, kind.type_tag());
        if let Some(namespace) = &parsed.namespace {
            header.set(fields::NAMESPACE, namespace);
        }
        header.set(fields::NAME, &parsed.name);
        header.set(fields::HASH, &parsed.full_digest);

        let body = if save_hashnamed {
            header.set(fields::RENAMED, &hashnamed_name);
            parsed.hashable.replace(&parsed.name, &hashnamed_name)
        } else {
            parsed.hashable.to_string()
        };

        let local_path = local_root
            .join(parsed.hash.subdir())
            .join(parsed.hash.to_hex());
        write_unit(&local_path, &header, &body)?;
        debug!(hash = %parsed.hash, name = %parsed.name, "unit installed");

        let chosen = if save_hashnamed {
            hashnamed_name.as_str()
        } else {
            parsed.name.as_str()
        };
        let call_name = qualified_name(parsed.namespace.as_deref(), chosen);
        Ok(ResolvedObject {
            hash: parsed.hash,
            kind: parsed.kind,
            name: parsed.name,
            namespace: parsed.namespace,
            hashnamed_name,
            call_name,
            local_path,
            header,
        })
    }

    /// Install a function and load it through `loader`, verifying that the
    /// call name is actually defined afterwards.
    pub fn install_function(
        &mut self,
        code: &str,
        save_hashnamed: bool,
        loader: &mut dyn CodeLoader,
    ) -> CoreResult<ResolvedObject> {
        self.install_and_load(code, FragmentKind::Function, save_hashnamed, loader)
    }

    /// Install a class-like fragment and load it through `loader`.
    pub fn install_class(
        &mut self,
        code: &str,
        save_hashnamed: bool,
        loader: &mut dyn CodeLoader,
    ) -> CoreResult<ResolvedObject> {
        self.install_and_load(code, FragmentKind::ClassLike, save_hashnamed, loader)
    }

    fn install_and_load(
        &mut self,
        code: &str,
        kind: FragmentKind,
        save_hashnamed: bool,
        loader: &mut dyn CodeLoader,
    ) -> CoreResult<ResolvedObject> {
        let object = self.install(code, kind, save_hashnamed)?;
        loader
            .load(&object.local_path)
            .map_err(|source| CoreError::Load {
                path: object.local_path.clone(),
                source,
            })?;
        if !loader.is_defined(&object.call_name, kind) {
            return Err(CoreError::NotDefined {
                kind,
                call_name: object.call_name,
                path: object.local_path,
            });
        }
        self.cache.insert(object.clone());
        Ok(object)
    }

    // ---- address dispatch ----

    /// Resolve a public content-address identifier (`fn_*`, `C_*`, `obj_*`),
    /// consulting the cache first.
    pub fn resolve_address(&mut self, address: &str) -> CoreResult<Option<ResolvedObject>> {
        let parsed = ContentAddress::parse(address)?;
        if let Some(cached) = self.cache.get(&parsed.hash) {
            if let Some(expected) = parsed.kind {
                if cached.kind != expected {
                    return Err(CoreError::UnexpectedKind {
                        hash: parsed.hash,
                        expected,
                        actual: cached.kind,
                    });
                }
            }
            return Ok(Some(cached.clone()));
        }
        self.resolve(&parsed.hash, true, parsed.kind)
    }

    /// Resolve an identifier and, for `fn_*`/`C_*`, load the stored unit
    /// into the host and verify the symbol is defined. `obj_*` identifiers
    /// only fetch the descriptor.
    pub fn load_address(
        &mut self,
        address: &str,
        loader: &mut dyn CodeLoader,
    ) -> CoreResult<Option<ResolvedObject>> {
        let parsed = ContentAddress::parse(address)?;
        let Some(object) = self.resolve_address(address)? else {
            return Ok(None);
        };
        if let Some(kind) = parsed.kind {
            loader
                .load(&object.local_path)
                .map_err(|source| CoreError::Load {
                    path: object.local_path.clone(),
                    source,
                })?;
            if !loader.is_defined(&object.call_name, kind) {
                return Err(CoreError::NotDefined {
                    kind,
                    call_name: object.call_name,
                    path: object.local_path,
                });
            }
        }
        Ok(Some(object))
    }
}

/// Write a stored unit: script tag, comment-wrapped header, blank line, body.
fn write_unit(path: &Path, header: &ObjectHeader, body: &str) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| CoreError::Storage {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let mut contents = storage_prelude(&encode(header, None));
    contents.push_str(body);
    std::fs::write(path, contents).map_err(|source| CoreError::Storage {
        path: path.to_path_buf(),
        source,
    })
}
