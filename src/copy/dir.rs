//! Parallel directory copy orchestration.
//!
//! The caller's thread walks the source tree, creating destination
//! directories and queueing one task per file, while a fixed set of worker
//! threads consumes the queue and runs the file pipeline. The two run
//! concurrently, so the entry total is only final once the walk returns;
//! at that point reporting is enabled and the queue is closed, and workers
//! exit when they have drained it. Any failure is first-error-wins: the
//! first error recorded aborts the walk, flushes the queue, and becomes
//! the return value.

use super::file::copy_file_contents;
use crate::error::{Error, Result};
use crate::options::CopyOptions;
use crate::pool::CopyTask;
use crate::state::SharedState;
use crate::utils::path::ensure_outside_source;
use crate::walk::{TreeVisit, walk};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::thread;
use std::time::{Duration, Instant};

/// Statistics from a copy operation.
#[derive(Debug, Clone, Default)]
pub struct CopyStats {
    /// Number of files copied
    pub files_copied: u64,
    /// Number of directories created (destination root included)
    pub dirs_created: u64,
    /// Total data bytes written (holes excluded)
    pub bytes_copied: u64,
    /// Wall-clock time of the whole operation
    pub duration: Duration,
}

/// Recursively copy the directory `src` to `dst`.
///
/// `dst` becomes the root of the copy; it is created if missing and its
/// existing content is left in place (conflicting files are overwritten).
/// Files are copied by [`options.workers`](CopyOptions::workers) threads
/// in parallel with the traversal.
///
/// # Errors
///
/// Returns [`Error::NotADirectory`] when `src` is not a directory,
/// [`Error::SelfDestination`] when `dst` resolves inside `src`,
/// [`Error::Cancelled`] with partial stats when the cancellation token
/// fires, and the first error any thread recorded otherwise.
///
/// # Example
///
/// ```no_run
/// use sparcp::{CopyOptions, copy_dir};
/// use std::path::Path;
///
/// let stats = copy_dir(
///     Path::new("/data/vm-images"),
///     Path::new("/backup/vm-images"),
///     &CopyOptions::default().with_workers(8),
/// )?;
/// println!("{} files, {} bytes", stats.files_copied, stats.bytes_copied);
/// # Ok::<(), sparcp::Error>(())
/// ```
pub fn copy_dir(src: &Path, dst: &Path, options: &CopyOptions) -> Result<CopyStats> {
    let start = Instant::now();

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
    if !meta.is_dir() {
        return Err(Error::NotADirectory(src.to_path_buf()));
    }
    ensure_outside_source(src, dst)?;

    let created_root = !dst.exists();
    fs::create_dir_all(dst).map_err(|e| Error::DirectoryCreation {
        path: dst.to_path_buf(),
        source: e,
    })?;

    let state = SharedState::new(options);
    thread::scope(|scope| {
        for _ in 0..options.workers.max(1) {
            scope.spawn(|| worker_loop(&state, options));
        }

        let visitor = CopyVisitor { state: &state };
        let root = DirContext {
            dst: dst.to_path_buf(),
        };
        if let Err(err) = walk(src, &visitor, &root) {
            state.fail(err);
        }

        // The walk is over: the totals are final and no new tasks will
        // arrive. Workers exit once the backlog is drained.
        state.progress.enable_reporting();
        state.queue.close();
    });

    let stats = CopyStats {
        files_copied: state.files_copied.load(Ordering::Relaxed),
        dirs_created: state.dirs_created.load(Ordering::Relaxed) + u64::from(created_root),
        bytes_copied: state.bytes_copied.load(Ordering::Relaxed),
        duration: start.elapsed(),
    };

    if let Some(err) = state.take_error() {
        return Err(err);
    }
    if state.cancelled() {
        return Err(Error::Cancelled {
            files_copied: stats.files_copied,
            bytes_copied: stats.bytes_copied,
            dirs_created: stats.dirs_created,
        });
    }
    Ok(stats)
}

fn worker_loop(state: &SharedState, options: &CopyOptions) {
    while let Some(task) = state.queue.pop() {
        if state.aborted() {
            // Drain the backlog without copying.
            continue;
        }
        match copy_file_contents(&task.src, &task.dst, options, false) {
            Ok(bytes) => {
                state.bytes_copied.fetch_add(bytes, Ordering::Relaxed);
                state.files_copied.fetch_add(1, Ordering::Relaxed);
                state.progress.note_completed();
            }
            Err(err) => state.fail(err),
        }
    }
}

/// Per-directory traversal context: the mirrored destination directory.
struct DirContext {
    dst: PathBuf,
}

struct CopyVisitor<'a> {
    state: &'a SharedState,
}

impl TreeVisit for CopyVisitor<'_> {
    type Context = DirContext;

    fn enter_dir(&self, _parent: &Path, name: &OsStr, ctx: &DirContext) -> Option<DirContext> {
        let dst = ctx.dst.join(name);
        self.state.progress.note_discovered();
        if let Err(e) = fs::create_dir_all(&dst) {
            self.state.fail(Error::DirectoryCreation { path: dst, source: e });
            return None;
        }
        self.state.dirs_created.fetch_add(1, Ordering::Relaxed);
        self.state.progress.note_completed();
        Some(DirContext { dst })
    }

    fn visit_file(&self, parent: &Path, name: &OsStr, ctx: &DirContext) {
        self.state.progress.note_discovered();
        self.state.queue.push(CopyTask {
            src: parent.join(name),
            dst: ctx.dst.join(name),
        });
    }

    fn cancelled(&self) -> bool {
        self.state.aborted()
    }
}
