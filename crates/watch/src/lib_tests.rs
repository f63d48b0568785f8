use super::*;
use std::fs;
use std::sync::Arc;

use parking_lot::RwLock;
use tempfile::tempdir;
use trigrep_engine::Index;

fn fresh(dir: &Path) -> (SharedIndex, Arc<RwLock<PathTable>>) {
    let _ = dir;
    (
        Arc::new(RwLock::new(Index::new())),
        Arc::new(RwLock::new(PathTable::new())),
    )
}

#[test]
fn classify_maps_create_and_modify_to_created_or_modified() {
    assert!(matches!(
        classify(EventKind::Create(notify::event::CreateKind::File)),
        Some(Kind::CreatedOrModified)
    ));
    assert!(matches!(
        classify(EventKind::Modify(notify::event::ModifyKind::Any)),
        Some(Kind::CreatedOrModified)
    ));
}

#[test]
fn classify_maps_remove_to_deleted() {
    assert!(matches!(
        classify(EventKind::Remove(notify::event::RemoveKind::File)),
        Some(Kind::Deleted)
    ));
}

#[test]
fn classify_ignores_access_and_other_events() {
    assert!(classify(EventKind::Access(notify::event::AccessKind::Any)).is_none());
    assert!(classify(EventKind::Other).is_none());
}

#[test]
fn created_path_not_in_index_is_added() {
    let dir = tempdir().unwrap();
    let full = dir.path().join("new.rs");
    fs::write(&full, "fn new_fn() {}\n").unwrap();
    let (index, paths) = fresh(dir.path());

    apply(
        Kind::CreatedOrModified,
        &full,
        Path::new("new.rs"),
        &index,
        &paths,
    );

    let id = paths.read().id_for(Path::new("new.rs")).unwrap();
    assert!(index.read().contains(id));
    assert!(index.read().content(id).unwrap().contains("new_fn"));
}

#[test]
fn created_path_already_in_index_is_treated_as_modified() {
    let dir = tempdir().unwrap();
    let full = dir.path().join("dup.rs");
    fs::write(&full, "fn first() {}\n").unwrap();
    let (index, paths) = fresh(dir.path());
    apply(
        Kind::CreatedOrModified,
        &full,
        Path::new("dup.rs"),
        &index,
        &paths,
    );
    let original_id = paths.read().id_for(Path::new("dup.rs")).unwrap();

    fs::write(&full, "fn second() {}\n").unwrap();
    apply(
        Kind::CreatedOrModified,
        &full,
        Path::new("dup.rs"),
        &index,
        &paths,
    );

    let id = paths.read().id_for(Path::new("dup.rs")).unwrap();
    assert_eq!(id, original_id);
    assert!(index.read().content(id).unwrap().contains("second"));
    assert!(!index.read().content(id).unwrap().contains("first"));
}

#[test]
fn modified_path_not_in_index_is_treated_as_created() {
    let dir = tempdir().unwrap();
    let full = dir.path().join("ghost.rs");
    fs::write(&full, "fn ghost() {}\n").unwrap();
    let (index, paths) = fresh(dir.path());

    apply(
        Kind::CreatedOrModified,
        &full,
        Path::new("ghost.rs"),
        &index,
        &paths,
    );

    assert_eq!(index.read().len(), 1);
    assert!(paths.read().id_for(Path::new("ghost.rs")).is_some());
}

#[test]
fn deleted_path_in_index_is_removed() {
    let dir = tempdir().unwrap();
    let full = dir.path().join("gone.rs");
    fs::write(&full, "fn gone() {}\n").unwrap();
    let (index, paths) = fresh(dir.path());
    apply(
        Kind::CreatedOrModified,
        &full,
        Path::new("gone.rs"),
        &index,
        &paths,
    );
    let id = paths.read().id_for(Path::new("gone.rs")).unwrap();

    apply(Kind::Deleted, &full, Path::new("gone.rs"), &index, &paths);

    assert!(!index.read().contains(id));
    assert!(paths.read().id_for(Path::new("gone.rs")).is_none());
}

#[test]
fn deleted_path_not_in_index_is_a_no_op() {
    let dir = tempdir().unwrap();
    let full = dir.path().join("never_seen.rs");
    let (index, paths) = fresh(dir.path());

    apply(
        Kind::Deleted,
        &full,
        Path::new("never_seen.rs"),
        &index,
        &paths,
    );

    assert!(index.read().is_empty());
}

#[test]
fn read_failure_leaves_index_unchanged() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does_not_exist.rs");
    let (index, paths) = fresh(dir.path());

    apply(
        Kind::CreatedOrModified,
        &missing,
        Path::new("does_not_exist.rs"),
        &index,
        &paths,
    );

    assert!(index.read().is_empty());
    assert!(paths.read().is_empty());
}
