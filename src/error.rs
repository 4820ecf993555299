//! Error types for sparcp.
//!
//! This module provides the [`Error`] enum containing all possible errors
//! that can occur during copy operations, and the [`Result`] type alias.
//!
//! # Error Categories
//!
//! | Category | Errors |
//! |----------|--------|
//! | Input | [`Error::SourceNotFound`], [`Error::SourceInaccessible`], [`Error::InvalidRange`] |
//! | Output | [`Error::DestinationUnwritable`], [`Error::DirectoryCreation`] |
//! | Validation | [`Error::NotADirectory`], [`Error::IsADirectory`], [`Error::SelfDestination`] |
//! | Control | [`Error::Cancelled`] |
//! | Invariant | [`Error::Internal`] |
//!
//! Every error is fatal for the copy as a whole: the first one recorded wins,
//! the shared abort flag is raised, and the top-level call reports it. The
//! only non-fatal condition in the engine (a failed chmod on the destination)
//! is routed through the warning handler instead of this enum.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for sparcp operations.
///
/// This is a type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during copy operations.
///
/// All errors include relevant path information to aid debugging.
/// Use the [`std::error::Error`] trait methods to access underlying
/// causes where applicable.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Source path does not exist
    #[error("Source path does not exist: {0}")]
    SourceNotFound(PathBuf),

    /// Failed to stat, open, or map a source path
    #[error("Could not read source '{path}': {source}")]
    SourceInaccessible {
        /// The source path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to create, write, truncate, or sync a destination file
    #[error("Could not write destination '{path}': {source}")]
    DestinationUnwritable {
        /// The destination path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to create a destination directory
    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreation {
        /// The directory path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Requested read range is not valid for the file
    #[error("Invalid read range {begin}..{end} for '{path}' (file size {len})")]
    InvalidRange {
        /// The file the range was requested on
        path: PathBuf,
        /// Requested begin offset
        begin: u64,
        /// Requested end offset
        end: u64,
        /// Actual file size
        len: u64,
    },

    /// Source is not a directory, use `copy_file` instead
    #[error("Source is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Source is a directory, use `copy_dir` instead
    #[error("Source is a directory, use copy_dir instead: {0}")]
    IsADirectory(PathBuf),

    /// Destination resolves into the source tree
    #[error("Cannot copy '{src}' into itself: '{dst}'")]
    SelfDestination {
        /// The source directory
        src: PathBuf,
        /// The offending destination
        dst: PathBuf,
    },

    /// Operation was cancelled via cancellation token
    ///
    /// This error carries partial statistics so the caller knows what was
    /// completed before cancellation. Work already done is not rolled back.
    #[error("Operation cancelled ({files_copied} files copied, {bytes_copied} bytes)")]
    Cancelled {
        /// Number of files fully copied before cancellation
        files_copied: u64,
        /// Total data bytes written before cancellation
        bytes_copied: u64,
        /// Number of directories created before cancellation
        dirs_created: u64,
    },

    /// Invariant violation inside the engine
    #[error("Internal error: {0}")]
    Internal(String),
}
