use serde_json::json;
use synced_json::{Error, SyncedDict, SyncedList};

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("synced_json_test_{}.json", name))
}

#[test]
fn second_collection_observes_committed_writes() {
    let path = temp_path("reload_fresh");
    let _ = std::fs::remove_file(&path);

    let a = SyncedDict::open(&path, false).unwrap();
    a.insert("from_a", 1).unwrap();

    let b = SyncedDict::open(&path, false).unwrap();
    b.reload().unwrap();
    assert_eq!(b.get("from_a").unwrap(), Some(json!(1)));
    assert_eq!(b.to_base().unwrap(), a.to_base().unwrap());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn reload_discards_uncommitted_divergence() {
    let path = temp_path("reload_discard");
    let _ = std::fs::remove_file(&path);

    let doc = SyncedDict::open(&path, false).unwrap();
    doc.insert("a", 1).unwrap();

    // someone else rewrites the file behind our back
    std::fs::write(&path, serde_json::to_vec(&json!({"a": 99})).unwrap()).unwrap();
    assert_eq!(doc.get("a").unwrap(), Some(json!(1)));

    doc.reload().unwrap();
    assert_eq!(doc.get("a").unwrap(), Some(json!(99)));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn shape_mismatch_fails_validation_on_open() {
    let path = temp_path("reload_shape_open");
    let _ = std::fs::remove_file(&path);
    std::fs::write(&path, b"[1, 2, 3]").unwrap();

    assert!(matches!(
        SyncedDict::open(&path, false),
        Err(Error::Validation(_))
    ));
    // the list view of the same file is fine
    let list = SyncedList::open(&path, false).unwrap();
    assert_eq!(list.len().unwrap(), 3);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn shape_mismatch_fails_validation_on_reload() {
    let path = temp_path("reload_shape");
    let _ = std::fs::remove_file(&path);

    let doc = SyncedDict::open(&path, false).unwrap();
    doc.insert("a", 1).unwrap();

    std::fs::write(&path, b"[]").unwrap();
    assert!(matches!(doc.reload(), Err(Error::Validation(_))));
    // cache untouched by the failed reload
    assert_eq!(doc.get("a").unwrap(), Some(json!(1)));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn reload_of_deleted_resource_resets_to_empty() {
    let path = temp_path("reload_deleted");
    let _ = std::fs::remove_file(&path);

    let doc = SyncedDict::open(&path, false).unwrap();
    doc.insert("a", 1).unwrap();

    std::fs::remove_file(&path).unwrap();
    doc.reload().unwrap();
    assert!(doc.is_empty().unwrap());
}

#[test]
fn failed_write_leaves_cache_mutated() {
    let dir = std::env::temp_dir().join("synced_json_vanishing_dir");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("doc.json");

    let doc = SyncedDict::open(&path, true).unwrap();
    doc.insert("a", 1).unwrap();

    // make the next write fail by removing the directory out from under it
    std::fs::remove_dir_all(&dir).unwrap();
    assert!(matches!(doc.insert("b", 2), Err(Error::Io(_))));

    // optimistic update, pessimistic persistence: the cache kept the value
    assert_eq!(doc.get("b").unwrap(), Some(json!(2)));

    // reload resynchronizes with disk truth (file gone -> empty)
    doc.reload().unwrap();
    assert_eq!(doc.get("b").unwrap(), None);
}

#[test]
fn uncoordinated_writers_last_write_wins() {
    let path = temp_path("reload_race");
    let _ = std::fs::remove_file(&path);

    let a = SyncedDict::open(&path, false).unwrap();
    let b = SyncedDict::open(&path, false).unwrap();

    a.insert("a", 1).unwrap();
    b.insert("b", 2).unwrap();

    // b never saw a's entry, so its full-document write dropped it
    let raw: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(raw, json!({"b": 2}));
    let _ = std::fs::remove_file(&path);
}
