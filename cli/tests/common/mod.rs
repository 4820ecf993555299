//! Common test utilities for integration tests.

use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;
use tempfile::TempDir;

/// A test fixture that provides source and destination directories.
pub struct TestFixture {
    pub src: TempDir,
    pub dst: TempDir,
}

impl TestFixture {
    /// Create a new test fixture with fresh source and destination directories.
    pub fn new() -> Self {
        Self {
            src: TempDir::new().expect("Failed to create temp source dir"),
            dst: TempDir::new().expect("Failed to create temp dest dir"),
        }
    }
}

/// Create a sparse file: `hole` zero bytes followed by `data`.
pub fn write_sparse_file(path: &Path, hole: u64, data: &[u8]) {
    let mut file = File::create(path).expect("Failed to create sparse file");
    file.seek(SeekFrom::Start(hole))
        .expect("Failed to seek past hole");
    file.write_all(data).expect("Failed to write data tail");
}
