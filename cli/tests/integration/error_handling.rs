//! Error paths and exit codes of the spcp CLI.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_missing_source_fails() {
    let dst = TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.arg("/definitely/not/a/real/path")
        .arg(dst.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("[ERROR]"));
}

#[test]
fn test_missing_arguments_is_usage_error() {
    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_copy_into_itself_rejected() {
    let src = TempDir::new().unwrap();
    fs::write(src.path().join("f.txt"), "x").unwrap();

    // Destination root resolves to a subdirectory of the source.
    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.arg(src.path())
        .arg(src.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("into itself"));
}

#[test]
fn test_error_message_names_the_path() {
    let dst = TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.arg("/no/such/source")
        .arg(dst.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("/no/such/source"));
}

#[cfg(unix)]
#[test]
fn test_broken_symlink_in_tree_fails_copy() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    let tree = src.path().join("tree");
    fs::create_dir_all(&tree).unwrap();
    fs::write(tree.join("good.txt"), "fine").unwrap();
    std::os::unix::fs::symlink("/nonexistent/target", tree.join("broken")).unwrap();

    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.arg(&tree)
        .arg(dst.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("[ERROR]"));
}
