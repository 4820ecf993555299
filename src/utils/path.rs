//! Path helpers for destination resolution.

use crate::error::{Error, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// The default destination root for a copy: `dst` joined with the last
/// component of `src`. Trailing separators on `src` are ignored; when no
/// component can be determined (e.g. `/`), `dst` itself is returned.
#[must_use]
pub fn destination_root(src: &Path, dst: &Path) -> PathBuf {
    let name = src.file_name().map(OsString::from).or_else(|| {
        fs::canonicalize(src)
            .ok()
            .and_then(|real| real.file_name().map(OsString::from))
    });
    match name {
        Some(name) => dst.join(name),
        None => dst.to_path_buf(),
    }
}

/// Reject a destination that resolves inside the source directory.
///
/// The destination usually does not exist yet, so it is resolved through
/// its deepest existing ancestor; symlinked paths into the source tree are
/// caught as well.
///
/// # Errors
///
/// Returns [`Error::SelfDestination`] when `dst` is `src` or a descendant
/// of it, and [`Error::SourceInaccessible`] when `src` cannot be resolved.
pub(crate) fn ensure_outside_source(src: &Path, dst: &Path) -> Result<()> {
    let src_real = fs::canonicalize(src).map_err(|e| Error::SourceInaccessible {
        path: src.to_path_buf(),
        source: e,
    })?;
    if resolve_prospective(dst).starts_with(&src_real) {
        return Err(Error::SelfDestination {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
        });
    }
    Ok(())
}

/// Resolve a possibly non-existent path: canonicalize the deepest existing
/// ancestor and re-append the remaining components.
fn resolve_prospective(path: &Path) -> PathBuf {
    let mut tail: Vec<OsString> = Vec::new();
    let mut probe = path.to_path_buf();
    loop {
        if let Ok(real) = fs::canonicalize(&probe) {
            return tail.iter().rev().fold(real, |p, seg| p.join(seg));
        }
        match (probe.parent(), probe.file_name()) {
            (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
                tail.push(name.to_os_string());
                probe = parent.to_path_buf();
            }
            _ => return path.to_path_buf(),
        }
    }
}
