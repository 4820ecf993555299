//! Deterministic depth-first directory traversal.
//!
//! The walker visits each directory's entries in ascending alphabetical
//! order (by raw file name) and calls back into a [`TreeVisit`]
//! implementation. Subdirectory descent happens depth-first on the calling
//! thread; the per-directory context returned by `enter_dir` lives on the
//! recursion frame and is dropped when the walk leaves that directory.
//!
//! Symbolic links and special files are reported as files; `.` and `..`
//! are never reported.

use crate::error::{Error, Result};
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

/// Hooks invoked by [`walk`] for every entry of the traversed tree.
///
/// Implementations are shared by reference, so mutable bookkeeping lives
/// behind interior mutability.
pub(crate) trait TreeVisit {
    /// Per-directory state threaded through the recursion by value.
    type Context;

    /// Called when a subdirectory is found. Returning `None` skips the
    /// subtree without failing the walk.
    fn enter_dir(&self, parent: &Path, name: &OsStr, ctx: &Self::Context) -> Option<Self::Context>;

    /// Called for every non-directory entry.
    fn visit_file(&self, parent: &Path, name: &OsStr, ctx: &Self::Context);

    /// Polled at iteration boundaries; returning true ends the walk early
    /// with `Ok`.
    fn cancelled(&self) -> bool {
        false
    }
}

/// Walk `dir` depth-first, calling `visitor` for each entry.
///
/// # Errors
///
/// Returns [`Error::SourceInaccessible`] when a directory cannot be
/// enumerated or an entry's type cannot be determined. Enumeration errors
/// are fatal for the whole walk.
pub(crate) fn walk<V: TreeVisit>(dir: &Path, visitor: &V, ctx: &V::Context) -> Result<()> {
    if visitor.cancelled() {
        return Ok(());
    }

    let iter = fs::read_dir(dir).map_err(|e| Error::SourceInaccessible {
        path: dir.to_path_buf(),
        source: e,
    })?;
    let mut entries = Vec::new();
    for entry in iter {
        entries.push(entry.map_err(|e| Error::SourceInaccessible {
            path: dir.to_path_buf(),
            source: e,
        })?);
    }
    entries.sort_by_key(fs::DirEntry::file_name);

    for entry in entries {
        if visitor.cancelled() {
            return Ok(());
        }
        let file_type = entry.file_type().map_err(|e| Error::SourceInaccessible {
            path: entry.path(),
            source: e,
        })?;
        let name = entry.file_name();
        if file_type.is_dir() {
            if let Some(child) = visitor.enter_dir(dir, &name, ctx) {
                walk(&entry.path(), visitor, &child)?;
            }
        } else {
            visitor.visit_file(dir, &name, ctx);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tempfile::tempdir;

    struct Recorder {
        events: Mutex<Vec<String>>,
        skip_dirs: bool,
        stop_after: Option<usize>,
        stopped: AtomicBool,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                events: Mutex::new(Vec::new()),
                skip_dirs: false,
                stop_after: None,
                stopped: AtomicBool::new(false),
            }
        }

        fn record(&self, event: String) {
            let mut events = match self.events.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            events.push(event);
            if let Some(limit) = self.stop_after {
                if events.len() >= limit {
                    self.stopped.store(true, Ordering::SeqCst);
                }
            }
        }

        fn events(&self) -> Vec<String> {
            match self.events.lock() {
                Ok(guard) => guard.clone(),
                Err(poisoned) => poisoned.into_inner().clone(),
            }
        }
    }

    impl TreeVisit for Recorder {
        type Context = PathBuf;

        fn enter_dir(&self, _parent: &Path, name: &OsStr, ctx: &PathBuf) -> Option<PathBuf> {
            let rel = ctx.join(name);
            self.record(format!("dir {}", rel.display()));
            if self.skip_dirs { None } else { Some(rel) }
        }

        fn visit_file(&self, _parent: &Path, name: &OsStr, ctx: &PathBuf) {
            self.record(format!("file {}", ctx.join(name).display()));
        }

        fn cancelled(&self) -> bool {
            self.stopped.load(Ordering::SeqCst)
        }
    }

    fn build_tree(root: &Path) {
        fs::create_dir(root.join("zeta")).unwrap();
        fs::create_dir(root.join("alpha")).unwrap();
        fs::write(root.join("middle.txt"), b"m").unwrap();
        fs::write(root.join("alpha/b.txt"), b"b").unwrap();
        fs::write(root.join("alpha/a.txt"), b"a").unwrap();
        fs::write(root.join("zeta/z.txt"), b"z").unwrap();
    }

    #[test]
    fn test_visits_in_ascending_name_order() {
        let dir = tempdir().unwrap();
        build_tree(dir.path());

        let recorder = Recorder::new();
        walk(dir.path(), &recorder, &PathBuf::new()).unwrap();

        assert_eq!(
            recorder.events(),
            vec![
                "dir alpha",
                "file alpha/a.txt",
                "file alpha/b.txt",
                "file middle.txt",
                "dir zeta",
                "file zeta/z.txt",
            ]
        );
    }

    #[test]
    fn test_none_context_skips_subtree() {
        let dir = tempdir().unwrap();
        build_tree(dir.path());

        let recorder = Recorder {
            skip_dirs: true,
            ..Recorder::new()
        };
        walk(dir.path(), &recorder, &PathBuf::new()).unwrap();

        assert_eq!(
            recorder.events(),
            vec!["dir alpha", "file middle.txt", "dir zeta"]
        );
    }

    #[test]
    fn test_cancellation_stops_walk() {
        let dir = tempdir().unwrap();
        build_tree(dir.path());

        let recorder = Recorder {
            stop_after: Some(2),
            ..Recorder::new()
        };
        walk(dir.path(), &recorder, &PathBuf::new()).unwrap();

        assert_eq!(recorder.events().len(), 2);
    }

    #[test]
    fn test_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let recorder = Recorder::new();
        let result = walk(&dir.path().join("absent"), &recorder, &PathBuf::new());
        assert!(matches!(result, Err(Error::SourceInaccessible { .. })));
    }
}
