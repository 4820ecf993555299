//! Single-file copy pipeline.
//!
//! Chunks flow from a [`MappedReader`] straight into a [`HoleWriter`];
//! with sparse detection on, skipped zero blocks never cross the pipeline
//! and reappear as holes on the destination. Mode bits are replicated
//! best-effort after the data.

use crate::error::{Error, Result};
use crate::options::CopyOptions;
use crate::reader::MappedReader;
use crate::writer::HoleWriter;
use std::fs;
use std::io;
use std::path::Path;

/// Copy a single file from `src` to `dst`.
///
/// `dst` names the destination file itself, not a containing directory;
/// missing parent directories are created. An existing destination file is
/// overwritten. Returns the number of data bytes written (holes excluded).
///
/// If a progress handler is configured, byte-based percentages are
/// reported as chunks land.
///
/// # Errors
///
/// Returns [`Error::IsADirectory`] when `src` is a directory, and the
/// usual source/destination errors otherwise.
///
/// # Example
///
/// ```no_run
/// use sparcp::{CopyOptions, copy_file};
/// use std::path::Path;
///
/// let written = copy_file(
///     Path::new("disk.img"),
///     Path::new("/backup/disk.img"),
///     &CopyOptions::default(),
/// )?;
/// println!("{written} data bytes written");
/// # Ok::<(), sparcp::Error>(())
/// ```
pub fn copy_file(src: &Path, dst: &Path, options: &CopyOptions) -> Result<u64> {
    let meta = fs::metadata(src).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            Error::SourceNotFound(src.to_path_buf())
        } else {
            Error::SourceInaccessible {
                path: src.to_path_buf(),
                source: e,
            }
        }
    })?;
    if meta.is_dir() {
        return Err(Error::IsADirectory(src.to_path_buf()));
    }
    if let Some(parent) = dst.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreation {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }
    copy_file_contents(src, dst, options, true)
}

/// Copy a single file, wrapping the result in [`CopyStats`].
pub(crate) fn copy_file_with_stats(
    src: &Path,
    dst: &Path,
    options: &CopyOptions,
) -> Result<super::CopyStats> {
    let start = std::time::Instant::now();
    let bytes_copied = copy_file(src, dst, options)?;
    Ok(super::CopyStats {
        files_copied: 1,
        dirs_created: 0,
        bytes_copied,
        duration: start.elapsed(),
    })
}

/// The chunk loop shared by the single-file entry point and the workers.
///
/// `report_bytes` turns on byte-based percent reporting; directory copies
/// leave it off because their progress is entry-based.
pub(crate) fn copy_file_contents(
    src: &Path,
    dst: &Path,
    options: &CopyOptions,
    report_bytes: bool,
) -> Result<u64> {
    let mut reader = MappedReader::open(src, 0, None)?;
    reader.set_sparse_block_size(options.sparse_block_size);
    let mut writer = HoleWriter::create(dst)?;

    let sparse = options.sparse_block_size > 0;
    let size = reader.file_size();
    let mut copied = 0u64;
    let mut last_percent = None;

    while reader.has_more() {
        {
            let chunk = reader.read_chunk(options.chunk_size, sparse);
            copied += chunk.data.len() as u64;
            writer.write_chunk(chunk.data, chunk.offset)?;
        }
        if report_bytes && size > 0 {
            if let Some(handler) = &options.progress_handler {
                let percent = (100 * reader.bytes_consumed() / size) as u32;
                if last_percent != Some(percent) {
                    last_percent = Some(percent);
                    handler(percent);
                }
            }
        }
    }

    if options.preserve_permissions {
        if let Err(e) = writer.set_permissions(reader.permissions()) {
            options.warn(&format!(
                "failed to set permissions on '{}': {e}",
                dst.display()
            ));
        }
    }
    if options.fsync {
        writer.sync()?;
    }
    Ok(copied)
}
