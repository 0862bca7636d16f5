use hn_types::Hash40;
use tracing::warn;

/// Key reserved for the single authoritative local repository.
pub const LOCAL_KEY: &str = "LOCAL";

/// A configured repository: a key and a location prefix.
///
/// The location is a URL or filesystem path prefix; candidate objects live at
/// `<location>/<hash40[0..2]>/<hash40>` beneath it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Repository {
    /// Unique identifier within the registry.
    pub key: String,
    /// URL or path prefix.
    pub location: String,
    /// Whether this is the authoritative, writable local repository.
    pub is_local: bool,
}

impl Repository {
    /// Candidate fetch location for a hash under this repository.
    pub fn url_for(&self, hash: &Hash40) -> String {
        let prefix = self.location.trim_end_matches('/');
        format!("{}/{}/{}", prefix, hash.subdir(), hash.to_hex())
    }
}

/// An entry passed to [`RepositoryRegistry::add`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RepoEntry {
    /// Anonymous entry: the location doubles as the key; deduplicated by
    /// location against everything already registered.
    Location(String),
    /// Named entry. The key `LOCAL` marks the authoritative local repository.
    Keyed { key: String, location: String },
}

impl RepoEntry {
    /// Convenience constructor for the local repository entry.
    pub fn local(location: impl Into<String>) -> Self {
        Self::Keyed {
            key: LOCAL_KEY.to_string(),
            location: location.into(),
        }
    }
}

/// Ordered collection of repositories; insertion order is search order.
///
/// Keys are unique and first-wins: re-adding an existing key is a no-op.
/// This also enforces the single-local invariant — once `LOCAL` is
/// registered it can never be displaced or duplicated.
#[derive(Clone, Debug, Default)]
pub struct RepositoryRegistry {
    repos: Vec<Repository>,
}

impl RepositoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add repositories, returning the count of newly added entries.
    ///
    /// Anonymous entries are skipped when any existing entry already uses
    /// the same location. Named entries are skipped when the key exists; a
    /// differing location for an existing key is logged and ignored.
    pub fn add(&mut self, entries: impl IntoIterator<Item = RepoEntry>) -> usize {
        let mut added = 0;
        for entry in entries {
            let (key, location) = match entry {
                RepoEntry::Location(location) => {
                    // anonymous: dedup against every stored location
                    if self.repos.iter().any(|r| r.location == location) {
                        continue;
                    }
                    (location.clone(), location)
                }
                RepoEntry::Keyed { key, location } => (key, location),
            };
            if let Some(existing) = self.repos.iter().find(|r| r.key == key) {
                if existing.location != location {
                    warn!(
                        key = %key,
                        kept = %existing.location,
                        ignored = %location,
                        "repository key already registered; keeping first location"
                    );
                }
                continue;
            }
            let is_local = key == LOCAL_KEY;
            self.repos.push(Repository {
                key,
                location,
                is_local,
            });
            added += 1;
        }
        added
    }

    /// Register the local repository. No-op if `LOCAL` already exists.
    pub fn add_local(&mut self, location: impl Into<String>) -> usize {
        self.add([RepoEntry::local(location)])
    }

    /// Register an anonymous remote repository by location.
    pub fn add_remote(&mut self, location: impl Into<String>) -> usize {
        self.add([RepoEntry::Location(location.into())])
    }

    /// Repositories in search order.
    pub fn iter(&self) -> impl Iterator<Item = &Repository> {
        self.repos.iter()
    }

    /// Candidate fetch location for a hash in the named repository.
    pub fn url_for(&self, key: &str, hash: &Hash40) -> Option<String> {
        self.repos
            .iter()
            .find(|r| r.key == key)
            .map(|r| r.url_for(hash))
    }

    /// The authoritative local repository, if configured.
    pub fn local(&self) -> Option<&Repository> {
        self.repos.iter().find(|r| r.is_local)
    }

    /// Whether the named repository is the local one.
    pub fn is_local(&self, key: &str) -> bool {
        key == LOCAL_KEY || self.repos.iter().any(|r| r.key == key && r.is_local)
    }

    pub fn len(&self) -> usize {
        self.repos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash() -> Hash40 {
        Hash40::from_hex("cf9a51c914fd6ef41e06ac4078f05373d000ee0b").unwrap()
    }

    #[test]
    fn add_counts_new_entries_only() {
        let mut registry = RepositoryRegistry::new();
        let added = registry.add([
            RepoEntry::local("/tmp/cache"),
            RepoEntry::Location("https://repo.example/objects/".into()),
        ]);
        assert_eq!(added, 2);
        assert_eq!(registry.len(), 2);

        // idempotent re-add
        let added = registry.add([RepoEntry::local("/tmp/cache")]);
        assert_eq!(added, 0);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn anonymous_entries_dedup_by_location() {
        let mut registry = RepositoryRegistry::new();
        registry.add_remote("https://a.example/");
        let added = registry.add_remote("https://a.example/");
        assert_eq!(added, 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn insertion_order_is_search_order() {
        let mut registry = RepositoryRegistry::new();
        registry.add_local("/cache");
        registry.add_remote("https://first.example/");
        registry.add_remote("https://second.example/");
        let keys: Vec<_> = registry.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["LOCAL", "https://first.example/", "https://second.example/"]
        );
    }

    #[test]
    fn exactly_one_local_first_wins() {
        let mut registry = RepositoryRegistry::new();
        registry.add_local("/cache-one");
        registry.add_local("/cache-two");
        let locals: Vec<_> = registry.iter().filter(|r| r.is_local).collect();
        assert_eq!(locals.len(), 1);
        assert_eq!(registry.local().unwrap().location, "/cache-one");
    }

    #[test]
    fn url_builds_subdir_and_hash() {
        let mut registry = RepositoryRegistry::new();
        registry.add_remote("https://repo.example/objects/");
        let url = registry.url_for("https://repo.example/objects/", &hash()).unwrap();
        assert_eq!(
            url,
            "https://repo.example/objects/cf/cf9a51c914fd6ef41e06ac4078f05373d000ee0b"
        );
    }

    #[test]
    fn url_for_unknown_key_is_none() {
        let registry = RepositoryRegistry::new();
        assert!(registry.url_for("nope", &hash()).is_none());
    }

    #[test]
    fn local_absent_by_default() {
        let mut registry = RepositoryRegistry::new();
        registry.add_remote("https://a.example/");
        assert!(registry.local().is_none());
        assert!(!registry.is_local("https://a.example/"));
        assert!(registry.is_local(LOCAL_KEY));
    }
}
