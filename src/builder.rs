//! Builder API for ergonomic copying operations.
//!
//! The builder pattern provides a fluent interface for configuring and
//! executing copy operations. This is often more convenient than manually
//! constructing [`CopyOptions`].
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use sparcp::CopyBuilder;
//!
//! // Simple copy with defaults
//! let stats = CopyBuilder::new("src", "dst").run()?;
//! println!("Copied {} files", stats.files_copied);
//! # Ok::<(), sparcp::Error>(())
//! ```
//!
//! ## With Options
//!
//! ```no_run
//! use sparcp::CopyBuilder;
//!
//! let stats = CopyBuilder::new("src", "dst")
//!     .workers(8)               // Use 8 worker threads
//!     .sparse_block_size(4096)  // Coarser hole detection
//!     .no_permissions()         // Leave destination modes to the umask
//!     .run()?;
//! # Ok::<(), sparcp::Error>(())
//! ```

use crate::copy::{CopyStats, copy, copy_dir, copy_file_with_stats};
use crate::error::Result;
use crate::options::CopyOptions;
use crate::progress::ProgressHandler;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// A builder for configuring and executing copy operations.
///
/// `CopyBuilder` provides a fluent interface that is often more ergonomic
/// than constructing [`CopyOptions`] manually. It automatically detects
/// whether the source is a file or directory and calls the appropriate
/// function.
///
/// # Example
///
/// ```no_run
/// use sparcp::CopyBuilder;
///
/// let stats = CopyBuilder::new("/data/images", "/backup/images")
///     .workers(16)
///     .fsync()
///     .run()?;
/// # Ok::<(), sparcp::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct CopyBuilder {
    src: PathBuf,
    dst: PathBuf,
    options: CopyOptions,
}

impl CopyBuilder {
    /// Create a new `CopyBuilder` with the given source and destination
    /// paths, using default options.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Self {
        Self {
            src: src.as_ref().to_path_buf(),
            dst: dst.as_ref().to_path_buf(),
            options: CopyOptions::default(),
        }
    }

    /// Set the number of copy worker threads.
    ///
    /// Default is twice the available parallelism. Clamped to at least 1.
    #[must_use]
    pub fn workers(mut self, n: usize) -> Self {
        self.options = self.options.with_workers(n);
        self
    }

    /// Set the sparse detection block size in bytes.
    ///
    /// Zero runs of at least this size become holes in the destination.
    /// A value of 0 disables sparse detection.
    #[must_use]
    pub fn sparse_block_size(mut self, size: usize) -> Self {
        self.options = self.options.with_sparse_block_size(size);
        self
    }

    /// Disable sparse detection; every byte of every file is copied.
    #[must_use]
    pub fn no_sparse(mut self) -> Self {
        self.options = self.options.without_sparse_detection();
        self
    }

    /// Set the maximum bytes per read/write chunk.
    #[must_use]
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.options = self.options.with_chunk_size(size);
        self
    }

    /// Disable mode-bit replication.
    ///
    /// By default, file permissions are copied from source to destination.
    #[must_use]
    pub fn no_permissions(mut self) -> Self {
        self.options = self.options.without_permissions();
        self
    }

    /// Sync each file to disk after writing.
    ///
    /// Improves durability at the cost of throughput.
    #[must_use]
    pub fn fsync(mut self) -> Self {
        self.options = self.options.with_fsync();
        self
    }

    /// Set a cancellation token for cooperative cancellation.
    ///
    /// When the token is set to `true`, the copy stops starting new files
    /// and returns [`Error::Cancelled`](crate::Error::Cancelled) with
    /// partial statistics. In-flight files always finish.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sparcp::CopyBuilder;
    /// use std::sync::Arc;
    /// use std::sync::atomic::AtomicBool;
    ///
    /// let cancel = Arc::new(AtomicBool::new(false));
    /// // Pass a clone to a signal handler or another thread
    /// let result = CopyBuilder::new("src", "dst")
    ///     .cancel_token(cancel)
    ///     .run();
    /// ```
    #[must_use]
    pub fn cancel_token(mut self, token: Arc<AtomicBool>) -> Self {
        self.options = self.options.with_cancel_token(token);
        self
    }

    /// Set a warning handler for non-fatal issues.
    ///
    /// The handler receives messages for conditions that do not stop the
    /// copy, such as a failed mode-bit replication.
    #[must_use]
    pub fn on_warning(mut self, handler: fn(&str)) -> Self {
        self.options = self.options.with_warn_handler(handler);
        self
    }

    /// Set a handler for overall progress percentages.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sparcp::CopyBuilder;
    /// use std::sync::Arc;
    ///
    /// let stats = CopyBuilder::new("src", "dst")
    ///     .on_progress(Arc::new(|pct| println!("{pct}%")))
    ///     .run()?;
    /// # Ok::<(), sparcp::Error>(())
    /// ```
    #[must_use]
    pub fn on_progress(mut self, handler: ProgressHandler) -> Self {
        self.options = self.options.with_progress_handler(handler);
        self
    }

    /// Get a reference to the current options.
    pub fn options(&self) -> &CopyOptions {
        &self.options
    }

    /// Execute the copy operation.
    ///
    /// Automatically detects whether the source is a file or directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the source does not exist or cannot be read,
    /// the destination cannot be written, the destination resolves into
    /// the source tree, or the operation is cancelled.
    pub fn run(self) -> Result<CopyStats> {
        copy(&self.src, &self.dst, &self.options)
    }

    /// Execute the copy operation for a directory only.
    ///
    /// Returns an error if the source is not a directory.
    pub fn run_dir(self) -> Result<CopyStats> {
        copy_dir(&self.src, &self.dst, &self.options)
    }

    /// Execute the copy operation for a single file only.
    ///
    /// Returns an error if the source is a directory.
    pub fn run_file(self) -> Result<CopyStats> {
        copy_file_with_stats(&self.src, &self.dst, &self.options)
    }
}
