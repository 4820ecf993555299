//! Memory-mapped source file reader with sparse-aware chunking.
//!
//! [`MappedReader`] opens a source file read-only, maps a byte range into
//! memory, and hands out chunks tagged with their logical file offset. In
//! sparse mode it skips zero-filled blocks entirely, so the writer can
//! reconstruct them as holes instead of copying zeros.
//!
//! The mapping is owned by the reader and unmapped exactly once when the
//! reader is dropped, on every exit path including early error returns.

use crate::error::{Error, Result};
use crate::sparse::is_zero_block;
use std::fs::{self, File};
use std::hash::Hasher;
use std::io;
use std::path::{Path, PathBuf};

use memmap2::{Mmap, MmapOptions};

/// Default sparse detection block size in bytes.
///
/// A block of this many bytes that scans as all-zero is treated as a hole
/// candidate. Small enough to catch modest holes, large enough that the
/// scan cost stays negligible next to the copy itself.
pub const DEFAULT_SPARSE_BLOCK_SIZE: usize = 512;

/// A chunk of file data returned by [`MappedReader::read_chunk`].
///
/// `offset` is the **logical file offset** of the first byte in `data`,
/// not a position within any internal buffer. The offset is what lets the
/// write side place data after a skipped hole.
#[derive(Debug)]
pub struct Chunk<'a> {
    /// Logical offset of `data[0]` within the source file
    pub offset: u64,
    /// The chunk bytes (empty when only holes remain)
    pub data: &'a [u8],
}

/// Reader over a memory-mapped byte range of one source file.
///
/// # Example
///
/// ```no_run
/// use sparcp::MappedReader;
/// use std::path::Path;
///
/// let mut reader = MappedReader::open(Path::new("input.bin"), 0, None)?;
/// while reader.has_more() {
///     let chunk = reader.read_chunk(128 * 1024, true);
///     println!("{} bytes at offset {}", chunk.data.len(), chunk.offset);
/// }
/// # Ok::<(), sparcp::Error>(())
/// ```
#[derive(Debug)]
pub struct MappedReader {
    path: PathBuf,
    map: Option<Mmap>,
    file_len: u64,
    permissions: fs::Permissions,
    read_begin: u64,
    read_end: u64,
    consumed: u64,
    sparse_block_size: usize,
}

impl MappedReader {
    /// Open `path` and map the byte range `begin..end` for reading.
    ///
    /// `end = None` means end-of-file. Opening a zero-length file, or a
    /// range where `begin == end`, succeeds with nothing to read and no
    /// mapping established. The mapping offset is page-aligned internally
    /// by the mapping layer; the visible read cursor starts exactly at
    /// `begin`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceNotFound`] if the file does not exist,
    /// [`Error::InvalidRange`] if `begin > end` or `end` is past the end
    /// of the file, and [`Error::SourceInaccessible`] for open, stat, or
    /// map failures (including unmappable file types).
    pub fn open(path: &Path, begin: u64, end: Option<u64>) -> Result<Self> {
        let file = File::open(path).map_err(|e| open_error(path, e))?;
        let meta = file.metadata().map_err(|e| Error::SourceInaccessible {
            path: path.to_path_buf(),
            source: e,
        })?;
        let file_len = meta.len();
        let permissions = meta.permissions();

        let trivial = |read_begin: u64, read_end: u64| Self {
            path: path.to_path_buf(),
            map: None,
            file_len,
            permissions: permissions.clone(),
            read_begin,
            read_end,
            consumed: 0,
            sparse_block_size: DEFAULT_SPARSE_BLOCK_SIZE,
        };

        // An empty file has nothing to map regardless of the range asked for.
        if file_len == 0 {
            return Ok(trivial(begin, begin));
        }

        let read_end = end.unwrap_or(file_len);
        if begin > read_end || read_end > file_len {
            return Err(Error::InvalidRange {
                path: path.to_path_buf(),
                begin,
                end: read_end,
                len: file_len,
            });
        }
        if begin == read_end {
            return Ok(trivial(begin, read_end));
        }

        // SAFETY: the mapping is read-only and private; mutating the source
        // file while it is being copied is outside the engine's contract.
        let map = unsafe {
            MmapOptions::new()
                .offset(begin)
                .len((read_end - begin) as usize)
                .map(&file)
        }
        .map_err(|e| Error::SourceInaccessible {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            map: Some(map),
            file_len,
            permissions,
            read_begin: begin,
            read_end,
            consumed: 0,
            sparse_block_size: DEFAULT_SPARSE_BLOCK_SIZE,
        })
    }

    /// Set the sparse detection block size. A value of 0 disables sparse
    /// detection even when `read_chunk` asks for it.
    pub fn set_sparse_block_size(&mut self, size: usize) {
        self.sparse_block_size = size;
    }

    /// The source path this reader was opened on.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total size of the underlying file in bytes.
    #[must_use]
    pub fn file_size(&self) -> u64 {
        self.file_len
    }

    /// Permissions of the source file as captured at open time.
    #[must_use]
    pub fn permissions(&self) -> fs::Permissions {
        self.permissions.clone()
    }

    /// Bytes consumed from the read range so far (skipped holes included).
    #[must_use]
    pub fn bytes_consumed(&self) -> u64 {
        self.consumed
    }

    /// True while the read cursor has not reached the end of the range.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.consumed < self.read_end - self.read_begin
    }

    /// Read up to `max_size` bytes from the current cursor position.
    ///
    /// The returned [`Chunk`] carries the logical file offset of its first
    /// byte. With `sparse` set and a non-zero sparse block size the read
    /// runs in two phases: skip consecutive all-zero blocks (advancing the
    /// cursor without producing data), then accumulate consecutive
    /// non-zero blocks until `max_size` is reached or the next zero block
    /// begins. When everything left in the range is zero, the cursor jumps
    /// to the end and an empty chunk with `offset` at the range end is
    /// returned; writing that empty chunk at its offset is what gives the
    /// destination its full logical size.
    ///
    /// If `max_size` is smaller than the sparse block size, the read falls
    /// back to a plain copy of up to `max_size` bytes.
    pub fn read_chunk(&mut self, max_size: usize, sparse: bool) -> Chunk<'_> {
        if sparse && self.sparse_block_size > 0 && max_size >= self.sparse_block_size {
            self.read_sparse(max_size)
        } else {
            self.read_plain(max_size)
        }
    }

    fn read_plain(&mut self, max_size: usize) -> Chunk<'_> {
        let total = self.range_len();
        let pos = self.consumed as usize;
        let take = max_size.min(total.saturating_sub(pos));
        let offset = self.read_begin + self.consumed;
        self.consumed += take as u64;
        let buf = self.map.as_deref().unwrap_or(&[]);
        Chunk {
            offset,
            data: &buf[pos..pos + take],
        }
    }

    fn read_sparse(&mut self, max_size: usize) -> Chunk<'_> {
        let total = self.range_len();
        let block = self.sparse_block_size;

        let (start, len, new_pos) = {
            let buf = self.map.as_deref().unwrap_or(&[]);
            let mut pos = self.consumed as usize;

            // Phase 1: skip over consecutive zero blocks.
            loop {
                if pos >= total {
                    break;
                }
                let window = block.min(total - pos);
                if is_zero_block(&buf[pos..pos + window]) {
                    pos += window;
                } else {
                    break;
                }
            }

            // Phase 2: accumulate consecutive non-zero blocks. The block
            // that ends the run stays unconsumed so the next call sees it
            // in phase 1; a trailing hole therefore always surfaces as a
            // final empty chunk at the range end.
            let start = pos;
            let mut len = 0usize;
            while pos < total {
                let window = block.min(total - pos);
                if len + window > max_size {
                    break;
                }
                if is_zero_block(&buf[pos..pos + window]) {
                    break;
                }
                len += window;
                pos += window;
            }

            (start, len, pos)
        };

        self.consumed = if len == 0 {
            // Everything remaining was zero: consume it all.
            total as u64
        } else {
            new_pos as u64
        };

        let offset = self.read_begin + if len == 0 { total as u64 } else { start as u64 };
        let buf = self.map.as_deref().unwrap_or(&[]);
        Chunk {
            offset,
            data: &buf[start..start + len],
        }
    }

    fn range_len(&self) -> usize {
        (self.read_end - self.read_begin) as usize
    }

    pub(crate) fn mapped(&self) -> &[u8] {
        self.map.as_deref().unwrap_or(&[])
    }
}

fn open_error(path: &Path, source: io::Error) -> Error {
    if source.kind() == io::ErrorKind::NotFound {
        Error::SourceNotFound(path.to_path_buf())
    } else {
        Error::SourceInaccessible {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Hash the entire content of a file.
///
/// Convenience utility for comparing a source and its copy. Uses the
/// standard library hasher over the mapped content; the value is not a
/// stable cross-version contract. An empty file hashes to 0.
pub fn file_checksum(path: &Path) -> Result<u64> {
    let reader = MappedReader::open(path, 0, None)?;
    if reader.file_size() == 0 {
        return Ok(0);
    }
    let mut hasher = std::hash::DefaultHasher::new();
    hasher.write(reader.mapped());
    Ok(hasher.finish())
}
