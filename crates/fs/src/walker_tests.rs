use super::*;

use crossbeam::channel;
use std::{
    fs::{create_dir, write},
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering as AtomicOrdering},
    },
};

fn default_ctx() -> ScanContext {
    ScanContext {
        ignore: IgnoreEngine::default(),
    }
}

#[test]
fn inspect_fs_entry_returns_record_for_regular_file() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let root = tmp.path();

    let file_path = root.join("file.txt");
    write(&file_path, b"hello world").expect("write file");

    let ctx = default_ctx();

    let mut entries = fs::read_dir(root).expect("read_dir");
    let dir_entry = entries
        .find(|res| {
            res.as_ref()
                .ok()
                .map(|e| e.file_name() == "file.txt")
                .unwrap_or(false)
        })
        .expect("file entry")
        .expect("file entry ok");

    let outcome = inspect_fs_entry(&dir_entry, &ctx)
        .expect("inspect_fs_entry ok")
        .expect("some entry");

    assert_eq!(outcome.full_path, file_path);
    assert_eq!(outcome.name, "file.txt");
    assert!(!outcome.is_dir);
    assert!(!outcome.is_symlink);
}

#[test]
fn inspect_fs_entry_marks_directories() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let root = tmp.path();

    let subdir = root.join("sub");
    create_dir(&subdir).expect("create subdir");

    let ctx = default_ctx();

    let mut entries = fs::read_dir(root).expect("read_dir");
    let dir_entry = entries
        .find(|res| {
            res.as_ref()
                .ok()
                .map(|e| e.file_name() == "sub")
                .unwrap_or(false)
        })
        .expect("subdir entry")
        .expect("subdir entry ok");

    let outcome = inspect_fs_entry(&dir_entry, &ctx)
        .expect("inspect_fs_entry ok")
        .expect("some entry");

    assert_eq!(outcome.full_path, subdir);
    assert_eq!(outcome.name, "sub");
    assert!(outcome.is_dir);
    assert!(!outcome.is_symlink);
}

#[test]
fn inspect_fs_entry_skips_hidden_files() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let root = tmp.path();

    let hidden_path = root.join(".hidden");
    write(&hidden_path, b"x").expect("write hidden file");

    let ctx = default_ctx();

    let mut entries = fs::read_dir(root).expect("read_dir");
    let dir_entry = entries
        .find(|res| {
            res.as_ref()
                .ok()
                .map(|e| e.file_name() == ".hidden")
                .unwrap_or(false)
        })
        .expect("hidden entry")
        .expect("hidden entry ok");

    assert!(inspect_fs_entry(&dir_entry, &ctx).expect("ok").is_none());
}

#[test]
fn scan_dir_parallel_enqueues_subdirs_and_builds_batch() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let root = tmp.path();

    // root/
    //   a.txt
    //   sub/
    //     b.txt
    write(root.join("a.txt"), b"a").expect("write a.txt");
    create_dir(root.join("sub")).expect("create sub");
    write(root.join("sub").join("b.txt"), b"b").expect("write b.txt");

    let ctx = default_ctx();
    let (work_tx, work_rx) = channel::unbounded::<PathBuf>();
    let mut batch = Vec::new();
    let pending = AtomicUsize::new(0);

    scan_dir_parallel(root, &work_tx, &mut batch, &ctx, &pending).expect("scan_dir_parallel");

    let queued = work_rx.try_recv().expect("a subdir should be queued");
    assert_eq!(queued, root.join("sub"));
    assert!(work_rx.try_recv().is_err(), "only one subdir expected");

    let mut names: Vec<_> = batch.iter().map(|r| r.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["a.txt", "sub"]);

    assert_eq!(pending.load(AtomicOrdering::Relaxed), 1);
}

#[test]
fn walk_parallel_scans_tree_and_emits_all_records() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let root = tmp.path().to_path_buf();

    write(root.join("a.txt"), b"a").expect("write a.txt");
    create_dir(root.join("sub")).expect("create sub");
    write(root.join("sub").join("b.txt"), b"b").expect("write b.txt");

    let ctx = Arc::new(default_ctx());
    let (file_tx, file_rx) = channel::unbounded::<Vec<FileRecord>>();

    walk_parallel(vec![root.clone()], file_tx.clone(), ctx, 4).expect("walk_parallel");

    drop(file_tx);

    let mut records: Vec<FileRecord> = Vec::new();
    while let Ok(batch) = file_rx.recv() {
        records.extend(batch);
    }

    let mut rel_paths: Vec<PathBuf> = records
        .iter()
        .map(|r| r.full_path.strip_prefix(&root).unwrap().to_path_buf())
        .collect();
    rel_paths.sort();

    let expected = vec![
        PathBuf::from("a.txt"),
        PathBuf::from("sub"),
        PathBuf::from("sub/b.txt"),
    ];
    assert_eq!(rel_paths, expected);
}

#[test]
fn walk_parallel_skips_ignored_subtrees() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let root = tmp.path().to_path_buf();

    write(root.join("a.txt"), b"a").expect("write a.txt");
    create_dir(root.join(".git")).expect("create .git");
    write(root.join(".git").join("HEAD"), b"ref: refs/heads/main").expect("write HEAD");

    let ctx = Arc::new(default_ctx());
    let (file_tx, file_rx) = channel::unbounded::<Vec<FileRecord>>();

    walk_parallel(vec![root.clone()], file_tx.clone(), ctx, 2).expect("walk_parallel");
    drop(file_tx);

    let mut records: Vec<FileRecord> = Vec::new();
    while let Ok(batch) = file_rx.recv() {
        records.extend(batch);
    }

    let rel_paths: Vec<PathBuf> = records
        .iter()
        .map(|r| r.full_path.strip_prefix(&root).unwrap().to_path_buf())
        .collect();

    assert_eq!(rel_paths, vec![PathBuf::from("a.txt")]);
}

#[test]
fn walk_parallel_with_no_roots_emits_nothing() {
    let ctx = Arc::new(default_ctx());
    let (file_tx, file_rx) = channel::unbounded::<Vec<FileRecord>>();

    walk_parallel(Vec::new(), file_tx.clone(), ctx, 4).expect("walk_parallel");

    drop(file_tx);
    assert!(file_rx.recv().is_err());
}
