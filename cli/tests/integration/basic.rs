//! Basic functionality integration tests for the spcp CLI.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;

#[path = "../common/mod.rs"]
mod common;
use common::{TestFixture, write_sparse_file};

#[test]
fn test_single_file_copy() {
    let fx = TestFixture::new();
    fs::write(fx.src.path().join("test.txt"), "hello world").unwrap();

    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.arg(fx.src.path().join("test.txt"))
        .arg(fx.dst.path())
        .assert()
        .success();

    // The copy lands at DESTINATION/<basename of SOURCE>.
    assert_eq!(
        fs::read_to_string(fx.dst.path().join("test.txt")).unwrap(),
        "hello world"
    );
}

#[test]
fn test_recursive_directory_copy() {
    let fx = TestFixture::new();
    let tree = fx.src.path().join("tree");
    fs::create_dir_all(tree.join("subdir/nested")).unwrap();
    fs::write(tree.join("file1.txt"), "content1").unwrap();
    fs::write(tree.join("subdir/file2.txt"), "content2").unwrap();
    fs::write(tree.join("subdir/nested/file3.txt"), "content3").unwrap();

    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.arg(&tree).arg(fx.dst.path()).assert().success();

    let root = fx.dst.path().join("tree");
    assert_eq!(fs::read_to_string(root.join("file1.txt")).unwrap(), "content1");
    assert_eq!(
        fs::read_to_string(root.join("subdir/file2.txt")).unwrap(),
        "content2"
    );
    assert_eq!(
        fs::read_to_string(root.join("subdir/nested/file3.txt")).unwrap(),
        "content3"
    );
}

#[test]
fn test_empty_directories_are_recreated() {
    let fx = TestFixture::new();
    let tree = fx.src.path().join("tree");
    fs::create_dir_all(tree.join("empty1")).unwrap();
    fs::create_dir_all(tree.join("full/empty2")).unwrap();
    fs::write(tree.join("full/f.txt"), "x").unwrap();

    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.arg(&tree).arg(fx.dst.path()).assert().success();

    assert!(fx.dst.path().join("tree/empty1").is_dir());
    assert!(fx.dst.path().join("tree/full/empty2").is_dir());
}

#[test]
fn test_summary_printed() {
    let fx = TestFixture::new();
    let tree = fx.src.path().join("tree");
    fs::create_dir_all(&tree).unwrap();
    fs::write(tree.join("f.txt"), "payload").unwrap();

    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.arg(&tree)
        .arg(fx.dst.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Copied 1 files"));
}

#[test]
fn test_quiet_suppresses_output() {
    let fx = TestFixture::new();
    let tree = fx.src.path().join("tree");
    fs::create_dir_all(&tree).unwrap();
    fs::write(tree.join("f.txt"), "payload").unwrap();

    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.arg("-q")
        .arg(&tree)
        .arg(fx.dst.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_jobs_flag() {
    let fx = TestFixture::new();
    let tree = fx.src.path().join("tree");
    fs::create_dir_all(&tree).unwrap();
    for i in 0..20 {
        fs::write(tree.join(format!("f{i}.txt")), format!("content {i}")).unwrap();
    }

    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.arg("-j")
        .arg("2")
        .arg(&tree)
        .arg(fx.dst.path())
        .assert()
        .success();

    for i in 0..20 {
        assert_eq!(
            fs::read_to_string(fx.dst.path().join(format!("tree/f{i}.txt"))).unwrap(),
            format!("content {i}")
        );
    }
}

#[test]
fn test_sparse_file_inside_tree() {
    let fx = TestFixture::new();
    let tree = fx.src.path().join("tree");
    fs::create_dir_all(&tree).unwrap();
    write_sparse_file(&tree.join("image.bin"), 8192, b"deadbeef");

    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.arg(&tree)
        .arg(fx.dst.path())
        .arg("512")
        .assert()
        .success();

    let content = fs::read(fx.dst.path().join("tree/image.bin")).unwrap();
    assert_eq!(content.len(), 8200);
    assert!(content[..8192].iter().all(|&b| b == 0));
    assert_eq!(&content[8192..], b"deadbeef");
}
