use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use tracing::debug;

/// Uniform byte retrieval for candidate objects.
///
/// Local file reads and remote HTTP(S) GETs look the same to the resolver.
/// `None` means "no data here" — read failure, transport failure, and an
/// empty body are deliberately indistinguishable, because the resolver's only
/// reaction to any of them is to try the next repository.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Option<Vec<u8>>;
}

/// Fetcher over the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileFetcher;

impl Fetcher for FileFetcher {
    fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        match std::fs::read(url) {
            Ok(data) if !data.is_empty() => Some(data),
            Ok(_) => None,
            Err(e) => {
                debug!(path = url, error = %e, "file fetch failed");
                None
            }
        }
    }
}

/// Fetcher over HTTP(S) using a blocking client.
#[derive(Debug)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        // construction only fails on broken TLS backends; there is no
        // degraded client worth running with
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("http client construction");
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        let response = match self.client.get(url).send() {
            Ok(r) => r,
            Err(e) => {
                debug!(url, error = %e, "http fetch failed");
                return None;
            }
        };
        if !response.status().is_success() {
            debug!(url, status = %response.status(), "http fetch non-success");
            return None;
        }
        match response.bytes() {
            Ok(bytes) if !bytes.is_empty() => Some(bytes.to_vec()),
            Ok(_) => None,
            Err(e) => {
                debug!(url, error = %e, "http body read failed");
                None
            }
        }
    }
}

/// Default fetcher: dispatches on scheme — `http://`/`https://` go over the
/// network, everything else is treated as a filesystem path.
#[derive(Debug, Default)]
pub struct StandardFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

impl StandardFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Fetcher for StandardFetcher {
    fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        if url.starts_with("http://") || url.starts_with("https://") {
            self.http.fetch(url)
        } else {
            self.file.fetch(url)
        }
    }
}

/// In-memory fetcher keyed by exact URL. Intended for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemoryFetcher {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryFetcher {
    /// Create a new empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a URL to a byte payload.
    pub fn insert(&self, url: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.objects
            .write()
            .expect("lock poisoned")
            .insert(url.into(), data.into());
    }

    /// Remove a URL mapping. Returns `true` if it existed.
    pub fn remove(&self, url: &str) -> bool {
        self.objects
            .write()
            .expect("lock poisoned")
            .remove(url)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }
}

impl Fetcher for InMemoryFetcher {
    fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        let map = self.objects.read().expect("lock poisoned");
        map.get(url).filter(|data| !data.is_empty()).cloned()
    }
}
