//! Error types for buffer, scanning, and block editing operations.
//!
//! Scan problems (orphaned or malformed annotations, unterminated blocks) are
//! not errors: they are reported as [`crate::ScanDiagnostic`] values so one bad
//! annotation never aborts a whole run. This enum only covers failures that
//! prevent an operation from completing.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::block::BlockId;

/// Errors from Terraform file operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TfError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    ReadError {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The file content is not valid UTF-8.
    #[error("{} is not valid UTF-8 text", path.display())]
    InvalidEncoding {
        /// Path of the offending file.
        path: PathBuf,
    },

    /// The buffer could not be written back.
    #[error("failed to write {}: {source}", path.display())]
    WriteError {
        /// Path of the file being written.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// A line index fell outside the buffer.
    #[error("line index {index} is out of range for a buffer of {len} lines")]
    LineOutOfRange {
        /// The requested line index (zero-based).
        index: usize,
        /// Number of lines in the buffer.
        len: usize,
    },

    /// A block edit addressed a line outside the block.
    #[error("line index {index} lies outside block lines {start}..={end}")]
    LineOutsideBlock {
        /// The requested line index (zero-based).
        index: usize,
        /// First line of the block.
        start: usize,
        /// Last line of the block.
        end: usize,
    },

    /// A block edit tried to remove the line that declares the block.
    #[error("line index {index} declares the block and cannot be deleted")]
    DeclarationLine {
        /// The declaration line index (zero-based).
        index: usize,
    },

    /// No block exists for the given identifier.
    #[error("no block with id {id}")]
    UnknownBlock {
        /// The missing block identifier.
        id: BlockId,
    },
}

impl TfError {
    /// Creates a read error.
    #[must_use]
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a write error.
    #[must_use]
    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a line out of range error.
    #[must_use]
    pub const fn line_out_of_range(index: usize, len: usize) -> Self {
        Self::LineOutOfRange { index, len }
    }
}
