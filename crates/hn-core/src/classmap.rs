use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;
use walkdir::WalkDir;

use hn_code::dialect::qualified_name;
use hn_code::fragment;
use hn_types::FragmentKind;

use crate::error::{CoreError, CoreResult};

/// One class-like declaration found while scanning a source tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMapEntry {
    pub namespace: Option<String>,
    pub class_name: String,
    pub path: PathBuf,
}

impl ClassMapEntry {
    /// Fully qualified name this entry maps from.
    pub fn qualified(&self) -> String {
        qualified_name(self.namespace.as_deref(), &self.class_name)
    }
}

/// Walk `root` and yield every parseable class-like fragment.
///
/// Hidden entries are skipped; unreadable and non-UTF-8 files are logged and
/// ignored, since a source tree routinely contains assets that are not code.
pub fn scan_class_tree(root: impl AsRef<Path>) -> Vec<ClassMapEntry> {
    let mut entries = Vec::new();
    let walker = WalkDir::new(root).into_iter().filter_entry(|e| {
        e.depth() == 0
            || !e
                .file_name()
                .to_str()
                .map(|name| name.starts_with('.'))
                .unwrap_or(false)
    });
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let source = match std::fs::read_to_string(entry.path()) {
            Ok(source) => source,
            Err(e) => {
                debug!(path = %entry.path().display(), error = %e, "skipping unreadable file");
                continue;
            }
        };
        if let Some(parsed) = fragment::parse(&source, FragmentKind::ClassLike) {
            entries.push(ClassMapEntry {
                namespace: parsed.namespace,
                class_name: parsed.name,
                path: entry.path().to_path_buf(),
            });
        }
    }
    entries
}

/// Qualified-class-name to file-path map, persistable as JSON.
///
/// The map is sorted by name, so rebuilding it from an unchanged tree yields
/// byte-identical output.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMap {
    classes: BTreeMap<String, PathBuf>,
}

impl ClassMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map by scanning `root`. Later duplicates of a qualified name
    /// replace earlier ones.
    pub fn scan(root: impl AsRef<Path>) -> Self {
        let mut map = Self::new();
        for entry in scan_class_tree(root) {
            map.classes.insert(entry.qualified(), entry.path);
        }
        map
    }

    /// Path of a class by fully qualified name.
    pub fn get(&self, qualified: &str) -> Option<&Path> {
        self.classes.get(qualified).map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.classes
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Persist the map as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| CoreError::Storage {
            path: path.to_path_buf(),
            source: source.into(),
        })?;
        std::fs::write(path, json).map_err(|source| CoreError::Storage {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a previously saved map.
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CoreError::Storage {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| CoreError::Storage {
            path: path.to_path_buf(),
            source: source.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, rel: &str, contents: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    #[test]
    fn scan_finds_classes_and_skips_noise() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/A.php", "<?php\nclass Alpha { }\n");
        write(
            dir.path(),
            "src/sub/B.php",
            "<?php\nnamespace acme;\nclass Beta { }\n",
        );
        write(dir.path(), "src/free.php", "<?php\nfunction loose() { }\n");
        write(dir.path(), "README", "not code at all");
        write(dir.path(), ".hidden/C.php", "<?php\nclass Hidden { }\n");

        let map = ClassMap::scan(dir.path());
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("\\Alpha").unwrap(), dir.path().join("src/A.php"));
        assert_eq!(
            map.get("acme\\Beta").unwrap(),
            dir.path().join("src/sub/B.php")
        );
        assert!(map.get("\\Hidden").is_none());
    }

    #[test]
    fn duplicate_qualified_names_keep_latest() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a/X.php", "<?php\nclass Same { }\n");
        write(dir.path(), "z/X.php", "<?php\nclass Same { }\n");
        let map = ClassMap::scan(dir.path());
        assert_eq!(map.len(), 1);
        assert!(map.get("\\Same").is_some());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/A.php", "<?php\nclass Alpha { }\n");
        let map = ClassMap::scan(dir.path().join("src"));

        let out = dir.path().join("classmap.json");
        map.save(&out).unwrap();
        let loaded = ClassMap::load(&out).unwrap();
        assert_eq!(loaded, map);
    }

    #[test]
    fn load_missing_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClassMap::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CoreError::Storage { .. }));
    }
}
