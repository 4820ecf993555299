//! Hole-preserving destination file writer.
//!
//! [`HoleWriter`] receives the chunks produced by the read side and places
//! them at their logical offsets. A gap between the tracked size and a
//! chunk's offset is bridged by extending the file via truncation, which
//! creates a hole on filesystems that support them (and reads back as
//! zeros everywhere). Chunks must arrive in ascending offset order; within
//! data the writer is strictly sequential.

use crate::error::{Error, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Writer for one destination file with hole-aware placement.
///
/// The writer tracks the file size itself; the underlying cursor is kept
/// at the tracked size at all times.
#[derive(Debug)]
pub struct HoleWriter {
    path: PathBuf,
    file: File,
    len: u64,
}

impl HoleWriter {
    /// Create or open `path` for writing.
    ///
    /// With `truncate_existing` an existing file is emptied first; without
    /// it, writing continues from the current end of the file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DestinationUnwritable`] if the file cannot be
    /// opened or its size determined.
    pub fn open(path: &Path, truncate_existing: bool) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(truncate_existing)
            .open(path)
            .map_err(|e| write_error(path, e))?;
        let len = file
            .metadata()
            .map_err(|e| write_error(path, e))?
            .len();
        let mut writer = Self {
            path: path.to_path_buf(),
            file,
            len,
        };
        if len > 0 {
            writer.seek_to_len()?;
        }
        Ok(writer)
    }

    /// Create `path`, emptying it if it already exists.
    pub fn create(path: &Path) -> Result<Self> {
        Self::open(path, true)
    }

    /// The destination path this writer was opened on.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current tracked file size in bytes.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.len
    }

    /// True if nothing has been written and the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Write `data` at the logical offset `offset`.
    ///
    /// If `offset` is past the current size, the file is first extended to
    /// `offset` by truncation, creating a hole. An empty `data` with an
    /// offset past the size is valid and only performs the extension; that
    /// is how a file ending in a hole gets its final logical size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if `offset` lies behind the tracked
    /// size (chunks must arrive in ascending order), and
    /// [`Error::DestinationUnwritable`] on write or truncation failure.
    pub fn write_chunk(&mut self, data: &[u8], offset: u64) -> Result<u64> {
        if offset < self.len {
            return Err(Error::Internal(format!(
                "chunk offset {offset} behind write position {} for '{}'",
                self.len,
                self.path.display()
            )));
        }
        if offset > self.len {
            self.truncate_to(offset)?;
        }

        let mut rest = data;
        while !rest.is_empty() {
            match self.file.write(rest) {
                Ok(0) => {
                    return Err(write_error(
                        &self.path,
                        io::Error::new(io::ErrorKind::WriteZero, "write returned zero bytes"),
                    ));
                }
                Ok(n) => {
                    rest = &rest[n..];
                    self.len += n as u64;
                }
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
                    ) => {}
                Err(e) => return Err(write_error(&self.path, e)),
            }
        }
        Ok(data.len() as u64)
    }

    /// Set the file length to `size`, extending with a hole or discarding
    /// data past `size`. The write cursor follows.
    pub fn truncate_to(&mut self, size: u64) -> Result<()> {
        if size == self.len {
            return Ok(());
        }
        loop {
            match self.file.set_len(size) {
                Ok(()) => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(write_error(&self.path, e)),
            }
        }
        self.len = size;
        self.seek_to_len()
    }

    /// Replicate `permissions` onto the destination file.
    ///
    /// Retries on interruption; any other failure is returned so the
    /// caller can decide whether it is fatal (the copy pipeline treats it
    /// as a warning).
    pub fn set_permissions(&self, permissions: fs::Permissions) -> Result<()> {
        loop {
            match self.file.set_permissions(permissions.clone()) {
                Ok(()) => return Ok(()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(write_error(&self.path, e)),
            }
        }
    }

    /// Flush file content and metadata to the storage device.
    pub fn sync(&self) -> Result<()> {
        self.file
            .sync_all()
            .map_err(|e| write_error(&self.path, e))
    }

    fn seek_to_len(&mut self) -> Result<()> {
        self.file
            .seek(SeekFrom::Start(self.len))
            .map(|_| ())
            .map_err(|e| write_error(&self.path, e))
    }
}

fn write_error(path: &Path, source: io::Error) -> Error {
    Error::DestinationUnwritable {
        path: path.to_path_buf(),
        source,
    }
}
