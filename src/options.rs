//! Configuration options for copy operations.
//!
//! This module provides [`CopyOptions`] for configuring copy behavior.
//!
//! # Example
//!
//! ```
//! use sparcp::CopyOptions;
//!
//! // Create options with builder pattern
//! let options = CopyOptions::default()
//!     .with_workers(8)
//!     .with_sparse_block_size(4096)
//!     .with_fsync();
//! ```

use crate::progress::ProgressHandler;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::thread;

/// Default chunk size for read/write operations (128 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 128 * 1024;

/// Options for copy operations.
///
/// Use [`Default::default()`] to get sensible defaults, then customize
/// using the builder methods.
///
/// # Default Values
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `workers` | 2x available parallelism | Copy worker threads |
/// | `sparse_block_size` | 512 | Zero-run granularity (0 disables) |
/// | `chunk_size` | 128 KiB | Max bytes per read/write chunk |
/// | `preserve_permissions` | `true` | Copy file mode bits |
/// | `fsync` | `false` | Sync each file to disk after writing |
///
/// # Example
///
/// ```
/// use sparcp::CopyOptions;
///
/// let options = CopyOptions::default()
///     .with_workers(32)            // More parallelism for local SSD
///     .without_sparse_detection(); // Plain full-data copy
/// ```
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CopyOptions {
    /// Number of copy worker threads (default: 2x available parallelism)
    ///
    /// The traversal runs on the calling thread in parallel with the
    /// workers, so even `workers = 1` overlaps enumeration and copying.
    pub workers: usize,

    /// Sparse detection block size in bytes (default: 512)
    ///
    /// A block of this many bytes that is entirely zero is skipped on
    /// read and reproduced as a hole on write. Set to 0 to disable
    /// sparse detection and copy every byte.
    pub sparse_block_size: usize,

    /// Maximum bytes handed to the writer per chunk (default: 128 KiB)
    pub chunk_size: usize,

    /// Whether to replicate source mode bits (default: true)
    ///
    /// Replication is best-effort; a failure is reported through the
    /// warning handler and does not fail the copy.
    pub preserve_permissions: bool,

    /// Whether to sync each file to disk after writing (default: false)
    pub fsync: bool,

    /// Cancellation token (optional)
    ///
    /// Store `true` into the token to stop the copy cooperatively. Files
    /// already in flight finish; the operation returns
    /// [`Error::Cancelled`](crate::Error::Cancelled) with partial stats.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub cancel: Option<Arc<AtomicBool>>,

    /// Callback for warnings (optional)
    ///
    /// If not set and the `tracing` feature is enabled, warnings are
    /// logged via tracing. Otherwise, warnings are silently ignored.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub warn_handler: Option<fn(&str)>,

    /// Callback for overall progress percentages (optional)
    ///
    /// For directory copies, invoked with each distinct percent of
    /// completed entries once traversal has finished. For single-file
    /// copies, invoked with byte-based percents as chunks land.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub progress_handler: Option<ProgressHandler>,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            sparse_block_size: crate::reader::DEFAULT_SPARSE_BLOCK_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            preserve_permissions: true,
            fsync: false,
            cancel: None,
            warn_handler: None,
            progress_handler: None,
        }
    }
}

fn default_workers() -> usize {
    thread::available_parallelism().map_or(8, |n| n.get().saturating_mul(2))
}

impl CopyOptions {
    /// Set the number of copy worker threads
    ///
    /// Value is clamped to at least 1.
    #[must_use]
    pub fn with_workers(mut self, n: usize) -> Self {
        self.workers = n.max(1);
        self
    }

    /// Set the sparse detection block size in bytes (0 disables)
    #[must_use]
    pub fn with_sparse_block_size(mut self, size: usize) -> Self {
        self.sparse_block_size = size;
        self
    }

    /// Disable sparse detection; every byte is copied
    #[must_use]
    pub fn without_sparse_detection(mut self) -> Self {
        self.sparse_block_size = 0;
        self
    }

    /// Set the maximum chunk size in bytes
    ///
    /// Value is clamped to at least 1.
    #[must_use]
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    /// Disable mode-bit replication
    ///
    /// Destination files keep the default umask permissions.
    #[must_use]
    pub fn without_permissions(mut self) -> Self {
        self.preserve_permissions = false;
        self
    }

    /// Sync each file to disk after writing
    #[must_use]
    pub fn with_fsync(mut self) -> Self {
        self.fsync = true;
        self
    }

    /// Attach a cancellation token
    #[must_use]
    pub fn with_cancel_token(mut self, token: Arc<AtomicBool>) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Create options with a warning handler
    #[must_use]
    pub fn with_warn_handler(mut self, handler: fn(&str)) -> Self {
        self.warn_handler = Some(handler);
        self
    }

    /// Attach a progress handler
    #[must_use]
    pub fn with_progress_handler(mut self, handler: ProgressHandler) -> Self {
        self.progress_handler = Some(handler);
        self
    }

    pub(crate) fn warn(&self, msg: &str) {
        if let Some(handler) = self.warn_handler {
            handler(msg);
        } else {
            #[cfg(feature = "tracing")]
            tracing::warn!("{}", msg);
        }
    }
}

impl fmt::Debug for CopyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopyOptions")
            .field("workers", &self.workers)
            .field("sparse_block_size", &self.sparse_block_size)
            .field("chunk_size", &self.chunk_size)
            .field("preserve_permissions", &self.preserve_permissions)
            .field("fsync", &self.fsync)
            .field("cancel", &self.cancel)
            .field("warn_handler", &self.warn_handler.is_some())
            .field("progress_handler", &self.progress_handler.is_some())
            .finish()
    }
}
