use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Persistent CLI configuration, stored as `remotes.toml` in the cache dir.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Remote repository locations, in search order.
    #[serde(default)]
    pub remotes: Vec<String>,
}

impl CliConfig {
    pub fn path_in(cache_dir: impl AsRef<Path>) -> PathBuf {
        cache_dir.as_ref().join("remotes.toml")
    }

    /// Load the config, or the default when none was saved yet.
    pub fn load(cache_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = Self::path_in(cache_dir);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn save(&self, cache_dir: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = Self::path_in(&cache_dir);
        std::fs::create_dir_all(cache_dir.as_ref())
            .with_context(|| format!("creating {}", cache_dir.as_ref().display()))?;
        let text = toml::to_string_pretty(self).context("serializing config")?;
        std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))
    }

    /// Add a remote unless already present. Returns `true` if added.
    pub fn add_remote(&mut self, location: impl Into<String>) -> bool {
        let location = location.into();
        if self.remotes.contains(&location) {
            return false;
        }
        self.remotes.push(location);
        true
    }

    /// Remove a remote. Returns `true` if it existed.
    pub fn remove_remote(&mut self, location: &str) -> bool {
        let before = self.remotes.len();
        self.remotes.retain(|r| r != location);
        self.remotes.len() != before
    }
}
