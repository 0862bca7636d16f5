use std::collections::HashSet;
use std::path::{Path, PathBuf};

use hn_types::FragmentKind;

use crate::error::LoadError;

/// Host-side code loading, kept behind a trait so the store never executes
/// anything itself.
///
/// `load` must be idempotent: the store may call it again for a path it
/// already loaded (for instance after a cache hit).
pub trait CodeLoader {
    /// Load the stored unit at `path` into the host.
    fn load(&mut self, path: &Path) -> Result<(), LoadError>;

    /// Whether `call_name` is now defined in the host as the given kind.
    fn is_defined(&self, call_name: &str, kind: FragmentKind) -> bool;
}

/// Loader that records load calls without executing anything.
///
/// In the default mode every name asked about counts as defined once any
/// load succeeded; `strict` mode only admits names registered via
/// [`RecordingLoader::define`], which lets tests exercise the
/// defined-check failure path.
#[derive(Debug, Default)]
pub struct RecordingLoader {
    auto_define: bool,
    loaded: Vec<PathBuf>,
    defined: HashSet<String>,
}

impl RecordingLoader {
    pub fn new() -> Self {
        Self {
            auto_define: true,
            ..Self::default()
        }
    }

    /// A loader where only explicitly defined names count.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Mark a call name as defined.
    pub fn define(&mut self, call_name: impl Into<String>) {
        self.defined.insert(call_name.into());
    }

    /// Paths passed to `load`, in call order.
    pub fn loaded(&self) -> &[PathBuf] {
        &self.loaded
    }
}

impl CodeLoader for RecordingLoader {
    fn load(&mut self, path: &Path) -> Result<(), LoadError> {
        self.loaded.push(path.to_path_buf());
        Ok(())
    }

    fn is_defined(&self, call_name: &str, _kind: FragmentKind) -> bool {
        if self.auto_define && !self.loaded.is_empty() {
            return true;
        }
        self.defined.contains(call_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_load_calls_in_order() {
        let mut loader = RecordingLoader::new();
        loader.load(Path::new("/a")).unwrap();
        loader.load(Path::new("/b")).unwrap();
        assert_eq!(loader.loaded(), [PathBuf::from("/a"), PathBuf::from("/b")]);
    }

    #[test]
    fn auto_define_needs_a_load_first() {
        let mut loader = RecordingLoader::new();
        assert!(!loader.is_defined("\\f", FragmentKind::Function));
        loader.load(Path::new("/a")).unwrap();
        assert!(loader.is_defined("\\f", FragmentKind::Function));
    }

    #[test]
    fn strict_mode_only_admits_registered_names() {
        let mut loader = RecordingLoader::strict();
        loader.load(Path::new("/a")).unwrap();
        assert!(!loader.is_defined("\\f", FragmentKind::Function));
        loader.define("\\f");
        assert!(loader.is_defined("\\f", FragmentKind::Function));
    }
}
