use std::collections::HashMap;

use hn_types::Hash40;

use crate::resolved::ResolvedObject;

/// Cache of objects already resolved in this store's lifetime.
///
/// Keyed by hash; a hit means the unit is on disk, verified, and (after a
/// load call) defined in the host, so repeated lookups skip the repository
/// walk entirely.
#[derive(Clone, Debug, Default)]
pub struct LoadedObjectCache {
    objects: HashMap<Hash40, ResolvedObject>,
}

impl LoadedObjectCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, hash: &Hash40) -> Option<&ResolvedObject> {
        self.objects.get(hash)
    }

    pub fn contains(&self, hash: &Hash40) -> bool {
        self.objects.contains_key(hash)
    }

    /// Record a resolved object, replacing any previous entry for its hash.
    pub fn insert(&mut self, object: ResolvedObject) {
        self.objects.insert(object.hash, object);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hn_types::FragmentKind;

    fn object(byte: u8) -> ResolvedObject {
        let hash = Hash40::of_body(&[byte]);
        ResolvedObject {
            hash,
            kind: FragmentKind::Function,
            name: "f".into(),
            namespace: None,
            hashnamed_name: FragmentKind::Function.content_address_name(&hash),
            call_name: "\\f".into(),
            local_path: "/tmp/x".into(),
            header: hn_header::ObjectHeader::new(),
        }
    }

    #[test]
    fn insert_and_get() {
        let mut cache = LoadedObjectCache::new();
        let obj = object(1);
        let hash = obj.hash;
        cache.insert(obj);
        assert!(cache.contains(&hash));
        assert_eq!(cache.get(&hash).unwrap().name, "f");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn insert_replaces_same_hash() {
        let mut cache = LoadedObjectCache::new();
        let mut obj = object(2);
        let hash = obj.hash;
        cache.insert(obj.clone());
        obj.name = "g".into();
        cache.insert(obj);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&hash).unwrap().name, "g");
    }

    #[test]
    fn clear_empties() {
        let mut cache = LoadedObjectCache::new();
        cache.insert(object(3));
        cache.clear();
        assert!(cache.is_empty());
    }
}
