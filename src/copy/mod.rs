//! Core copy operations.
//!
//! [`copy`] dispatches on the source type; [`copy_dir`] and [`copy_file`]
//! are the explicit entry points.

mod dir;
mod file;

pub use dir::{CopyStats, copy_dir};
pub use file::copy_file;
pub(crate) use file::copy_file_with_stats;

use crate::error::{Error, Result};
use crate::options::CopyOptions;
use std::fs;
use std::io;
use std::path::Path;

/// Copy `src` to `dst`, whether `src` is a file or a directory.
///
/// Directories are copied recursively with [`copy_dir`]; single files go
/// through [`copy_file`] with byte-based progress.
///
/// # Errors
///
/// Returns [`Error::SourceNotFound`] when `src` does not exist, otherwise
/// whatever the dispatched operation returns.
///
/// # Example
///
/// ```no_run
/// use sparcp::{CopyOptions, copy};
/// use std::path::Path;
///
/// let stats = copy(Path::new("data"), Path::new("/backup/data"), &CopyOptions::default())?;
/// println!("{} files copied", stats.files_copied);
/// # Ok::<(), sparcp::Error>(())
/// ```
pub fn copy(src: &Path, dst: &Path, options: &CopyOptions) -> Result<CopyStats> {
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
        copy_dir(src, dst, options)
    } else {
        copy_file_with_stats(src, dst, options)
    }
}
