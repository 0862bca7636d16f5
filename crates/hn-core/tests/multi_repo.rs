//! End-to-end resolution across a local cache and file-based remote
//! repositories.

use hn_core::{CodeStore, RecordingLoader};
use hn_repo::RepoEntry;
use hn_types::{FragmentKind, Hash40};

const FN_CODE: &str = "function test($a) {\n    return $a + 1;\n}";
const FN_HASH: &str = "cf9a51c914fd6ef41e06ac4078f05373d000ee0b";

/// Populate `dir` as a repository holding `code`, returning the hash.
fn publish(dir: &std::path::Path, code: &str, kind: FragmentKind, hashnamed: bool) -> Hash40 {
    let mut store = CodeStore::open(dir).unwrap();
    store.install(code, kind, hashnamed).unwrap().hash
}

#[test]
fn resolves_from_remote_and_promotes_locally() {
    let remote = tempfile::tempdir().unwrap();
    let hash = publish(remote.path(), FN_CODE, FragmentKind::Function, false);

    let local = tempfile::tempdir().unwrap();
    let mut store = CodeStore::open(local.path()).unwrap();
    store.add_repositories([RepoEntry::Location(
        remote.path().to_string_lossy().into_owned(),
    )]);

    let object = store
        .resolve(&hash, true, Some(FragmentKind::Function))
        .unwrap()
        .unwrap();
    assert_eq!(object.hash.to_hex(), FN_HASH);
    assert_eq!(object.call_name, format!("\\fn_{FN_HASH}"));

    // promoted copy lives under the local root, sharded by hash prefix
    assert!(object.local_path.starts_with(local.path().canonicalize().unwrap()));
    let stored = std::fs::read_to_string(&object.local_path).unwrap();
    assert!(stored.contains(&format!("renamed: fn_{FN_HASH}")));

    // second resolution is served from the local copy, which searches first
    let again = store.resolve(&hash, true, None).unwrap().unwrap();
    assert_eq!(again.hash, hash);
}

#[test]
fn remote_renamed_object_is_unrenamed_and_verified() {
    let remote = tempfile::tempdir().unwrap();
    let hash = publish(remote.path(), FN_CODE, FragmentKind::Function, true);

    let local = tempfile::tempdir().unwrap();
    let mut store = CodeStore::open(local.path()).unwrap();
    store.add_repositories([RepoEntry::Location(
        remote.path().to_string_lossy().into_owned(),
    )]);

    // ask for the original-name form: the renamed remote body must be
    // transformed back before verification and storage
    let object = store.resolve(&hash, false, None).unwrap().unwrap();
    assert_eq!(object.name, "test");
    assert_eq!(object.call_name, "\\test");
    let stored = std::fs::read_to_string(&object.local_path).unwrap();
    assert!(stored.contains("function test("));
    assert!(!stored.contains("renamed:"));
}

#[test]
fn renamed_remote_rejected_when_policy_disallows() {
    let remote = tempfile::tempdir().unwrap();
    let hash = publish(remote.path(), FN_CODE, FragmentKind::Function, true);

    let local = tempfile::tempdir().unwrap();
    let mut store = CodeStore::open(local.path()).unwrap();
    store.add_repositories([RepoEntry::Location(
        remote.path().to_string_lossy().into_owned(),
    )]);
    store.set_accept_remote_renamed(false);

    assert!(store.resolve(&hash, true, None).unwrap().is_none());
}

#[test]
fn tampered_remote_falls_through_to_next_repository() {
    let bad = tempfile::tempdir().unwrap();
    let hash = publish(bad.path(), FN_CODE, FragmentKind::Function, false);
    let stored_path = bad
        .path()
        .join(hash.subdir())
        .join(hash.to_hex());
    let stored = std::fs::read_to_string(&stored_path).unwrap();
    std::fs::write(&stored_path, stored.replace("$a + 1", "$a + 2")).unwrap();

    let good = tempfile::tempdir().unwrap();
    publish(good.path(), FN_CODE, FragmentKind::Function, false);

    let local = tempfile::tempdir().unwrap();
    let mut store = CodeStore::open(local.path()).unwrap();
    store.add_repositories([
        RepoEntry::Location(bad.path().to_string_lossy().into_owned()),
        RepoEntry::Location(good.path().to_string_lossy().into_owned()),
    ]);

    let object = store.resolve(&hash, false, None).unwrap().unwrap();
    assert_eq!(object.name, "test");
    let stored = std::fs::read_to_string(&object.local_path).unwrap();
    assert!(stored.contains("$a + 1"));
}

#[test]
fn repository_order_decides_between_equivalent_sources() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let hash = publish(first.path(), FN_CODE, FragmentKind::Function, false);
    publish(second.path(), FN_CODE, FragmentKind::Function, true);

    let local = tempfile::tempdir().unwrap();
    let mut store = CodeStore::open(local.path()).unwrap();
    store.add_repositories([
        RepoEntry::Location(first.path().to_string_lossy().into_owned()),
        RepoEntry::Location(second.path().to_string_lossy().into_owned()),
    ]);

    // both sources hold the same content; either way the hash is identical
    let object = store.resolve(&hash, true, None).unwrap().unwrap();
    assert_eq!(object.hash, hash);
    assert_eq!(object.hashnamed_name, format!("fn_{FN_HASH}"));
}

#[test]
fn load_address_resolves_loads_and_caches() {
    let remote = tempfile::tempdir().unwrap();
    let hash = publish(remote.path(), FN_CODE, FragmentKind::Function, false);

    let local = tempfile::tempdir().unwrap();
    let mut store = CodeStore::open(local.path()).unwrap();
    store.add_repositories([RepoEntry::Location(
        remote.path().to_string_lossy().into_owned(),
    )]);

    let mut loader = RecordingLoader::new();
    let address = format!("fn_{}", hash.to_hex());
    let object = store.load_address(&address, &mut loader).unwrap().unwrap();
    assert_eq!(loader.loaded(), [object.local_path.clone()]);
    assert!(store.cache().contains(&hash));

    // cache hit: no second repository walk is needed
    let again = store.load_address(&address, &mut loader).unwrap().unwrap();
    assert_eq!(again, object);
    assert_eq!(loader.loaded().len(), 2);
}

#[test]
fn missing_everywhere_is_none() {
    let remote = tempfile::tempdir().unwrap();
    let local = tempfile::tempdir().unwrap();
    let mut store = CodeStore::open(local.path()).unwrap();
    store.add_repositories([RepoEntry::Location(
        remote.path().to_string_lossy().into_owned(),
    )]);

    let hash = Hash40::of_body(b"never published");
    assert!(store
        .resolve(&hash, false, Some(FragmentKind::Function))
        .unwrap()
        .is_none());
    let address = format!("fn_{}", hash.to_hex());
    let mut loader = RecordingLoader::new();
    assert!(store.load_address(&address, &mut loader).unwrap().is_none());
}
