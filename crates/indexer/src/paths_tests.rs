use super::*;
use std::path::PathBuf;

#[test]
fn insert_and_lookup_both_directions() {
    let mut table = PathTable::new();
    table.insert(DocId(0), PathBuf::from("a.rs"));
    table.insert(DocId(1), PathBuf::from("b.rs"));

    assert_eq!(table.id_for(Path::new("a.rs")), Some(DocId(0)));
    assert_eq!(table.path_for(DocId(1)), Some(Path::new("b.rs")));
    assert_eq!(table.len(), 2);
}

#[test]
fn reinserting_same_id_under_new_path_drops_old_path_mapping() {
    let mut table = PathTable::new();
    table.insert(DocId(0), PathBuf::from("old.rs"));
    table.insert(DocId(0), PathBuf::from("new.rs"));

    assert_eq!(table.id_for(Path::new("old.rs")), None);
    assert_eq!(table.id_for(Path::new("new.rs")), Some(DocId(0)));
    assert_eq!(table.len(), 1);
}

#[test]
fn reinserting_same_path_under_new_id_drops_old_id_mapping() {
    let mut table = PathTable::new();
    table.insert(DocId(0), PathBuf::from("a.rs"));
    table.insert(DocId(1), PathBuf::from("a.rs"));

    assert_eq!(table.path_for(DocId(0)), None);
    assert_eq!(table.id_for(Path::new("a.rs")), Some(DocId(1)));
    assert_eq!(table.len(), 1);
}

#[test]
fn remove_by_path_clears_both_sides() {
    let mut table = PathTable::new();
    table.insert(DocId(0), PathBuf::from("a.rs"));

    let removed = table.remove_by_path(Path::new("a.rs"));
    assert_eq!(removed, Some(DocId(0)));
    assert!(table.is_empty());
    assert_eq!(table.path_for(DocId(0)), None);
}

#[test]
fn remove_by_path_missing_is_a_no_op() {
    let mut table = PathTable::new();
    assert_eq!(table.remove_by_path(Path::new("missing.rs")), None);
}
