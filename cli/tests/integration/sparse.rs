//! Sparse copying behavior of the spcp CLI.

use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;

#[path = "../common/mod.rs"]
mod common;
use common::{TestFixture, write_sparse_file};

#[test]
fn test_sparse_copy_preserves_logical_size_and_content() {
    let fx = TestFixture::new();
    let src_file = fx.src.path().join("disk.img");
    write_sparse_file(&src_file, 1 << 20, b"trailing data");

    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.arg(&src_file)
        .arg(fx.dst.path())
        .arg("512")
        .assert()
        .success();

    let copy = fx.dst.path().join("disk.img");
    let content = fs::read(&copy).unwrap();
    assert_eq!(content.len() as u64, (1 << 20) + 13);
    assert!(content[..1 << 20].iter().all(|&b| b == 0));
    assert_eq!(&content[1 << 20..], b"trailing data");
}

#[cfg(target_os = "linux")]
#[test]
fn test_sparse_copy_does_not_allocate_holes() {
    use std::os::unix::fs::MetadataExt;

    let fx = TestFixture::new();
    let src_file = fx.src.path().join("disk.img");
    write_sparse_file(&src_file, 1 << 20, b"x");

    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.arg(&src_file)
        .arg(fx.dst.path())
        .arg("4096")
        .assert()
        .success();

    let meta = fs::metadata(fx.dst.path().join("disk.img")).unwrap();
    assert_eq!(meta.len(), (1 << 20) + 1);
    // The hole must stay unallocated on disk.
    assert!(meta.blocks() * 512 < 1 << 19);
}

#[test]
fn test_zero_block_size_disables_sparse_copying() {
    let fx = TestFixture::new();
    let src_file = fx.src.path().join("zeros.bin");
    fs::write(&src_file, vec![0u8; 100_000]).unwrap();

    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.arg(&src_file)
        .arg(fx.dst.path())
        .arg("0")
        .assert()
        .success();

    let content = fs::read(fx.dst.path().join("zeros.bin")).unwrap();
    assert_eq!(content, vec![0u8; 100_000]);
}

#[test]
fn test_interleaved_data_and_holes() {
    let fx = TestFixture::new();
    let src_file = fx.src.path().join("mixed.bin");
    let mut content = vec![0u8; 64 * 1024];
    content[0..512].fill(0xaa);
    content[20_000..20_100].fill(0xbb);
    content[60_000..60_001].fill(0xcc);
    fs::write(&src_file, &content).unwrap();

    let mut cmd = cargo_bin_cmd!("spcp");
    cmd.arg(&src_file)
        .arg(fx.dst.path())
        .arg("512")
        .assert()
        .success();

    assert_eq!(fs::read(fx.dst.path().join("mixed.bin")).unwrap(), content);
}
