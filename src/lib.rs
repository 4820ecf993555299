//! # sparcp
//!
//! Parallel, sparse-file-aware recursive copying for Rust.
//!
//! ## Core Features
//!
//! - **Parallel copying**: a fixed worker pool copies files while the
//!   directory tree is still being enumerated
//! - **Sparse awareness**: zero-filled regions are detected on read and
//!   reproduced as holes on write, so a mostly-empty disk image copies in
//!   seconds and stays small on disk
//! - **Memory-mapped reads**: sources are read through `mmap` in large
//!   chunks instead of buffered read calls
//! - **Deterministic traversal**: entries are visited in ascending name
//!   order, so runs are reproducible
//! - **Honest progress**: percentages are only reported once the total is
//!   final; 100% is delivered exactly once
//! - **First-error-wins**: the first failure on any thread aborts the
//!   whole operation and is the error you get back
//! - **Permission preserving**: source mode bits are replicated
//!   best-effort
//! - **Cancellable**: a shared atomic token stops the copy cooperatively
//!
//! ## Quick Start with Builder API
//!
//! The easiest way to use sparcp is with the [`CopyBuilder`]:
//!
//! ```no_run
//! use sparcp::CopyBuilder;
//!
//! // Simple copy with smart defaults
//! let stats = CopyBuilder::new("src", "dst").run()?;
//! println!("Copied {} files ({} bytes)", stats.files_copied, stats.bytes_copied);
//! # Ok::<(), sparcp::Error>(())
//! ```
//!
//! ### Copying Disk Images
//!
//! ```no_run
//! use sparcp::CopyBuilder;
//!
//! // Coarser hole detection, more workers
//! let stats = CopyBuilder::new("/var/lib/images", "/backup/images")
//!     .workers(16)
//!     .sparse_block_size(4096)
//!     .run()?;
//! # Ok::<(), sparcp::Error>(())
//! ```
//!
//! ## Function API
//!
//! For more control, use the function API with [`CopyOptions`]:
//!
//! ```no_run
//! use sparcp::{CopyOptions, copy_dir};
//! use std::path::Path;
//!
//! let options = CopyOptions::default()
//!     .with_workers(8)
//!     .without_sparse_detection() // Copy every byte
//!     .with_fsync();              // Durability over speed
//!
//! let stats = copy_dir(Path::new("src"), Path::new("dst"), &options)?;
//! println!("Copied {} files", stats.files_copied);
//! # Ok::<(), sparcp::Error>(())
//! ```
//!
//! ## How Sparse Copying Works
//!
//! Each source file is memory-mapped and scanned in fixed-size blocks
//! (512 bytes by default). Runs of all-zero blocks are skipped; the
//! writer extends the destination past them by truncation, which creates
//! holes on filesystems that support them and reads back as zeros
//! everywhere. The destination always ends up byte-identical to the
//! source at its full logical size.
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `progress` | Progress bar support with indicatif |
//! | `tracing` | Structured logging with tracing crate |
//! | `serde` | Serialize/Deserialize for [`CopyOptions`] |
//! | `full` | Enable all optional features |

#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod copy;
mod error;
mod options;
mod pool;
mod progress;
mod reader;
mod sparse;
mod state;
mod walk;
mod writer;

pub mod utils;

pub use builder::CopyBuilder;
pub use copy::{CopyStats, copy, copy_dir, copy_file};
pub use error::{Error, Result};
pub use options::CopyOptions;
pub use progress::ProgressHandler;
pub use reader::{Chunk, DEFAULT_SPARSE_BLOCK_SIZE, MappedReader, file_checksum};
pub use sparse::is_zero_block;
pub use writer::HoleWriter;

#[cfg(feature = "progress")]
#[cfg_attr(docsrs, doc(cfg(feature = "progress")))]
pub use progress::create_progress_bar;
