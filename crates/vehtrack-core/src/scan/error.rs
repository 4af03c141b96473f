use thiserror::Error;

use crate::record::RecordError;
use crate::source::SourceError;

/// Coarse classification of scan failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The scanner was configured with unusable options.
    Config,
    /// The source could not be read.
    Io,
    /// The source delivered fewer bytes than its size promised.
    ShortRead,
    /// Consumed bytes stopped lining up with record boundaries.
    Framing,
    /// A complete record carried out-of-domain values.
    Validation,
}

/// Errors that end a scan. Every variant is terminal.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid chunk size {chunk_size}: {reason}")]
    InvalidChunkSize {
        chunk_size: usize,
        reason: &'static str,
    },
    #[error("source error: {0}")]
    Source(#[from] SourceError),
    #[error("short read at offset {offset}: expected {expected} bytes, got {actual}")]
    ShortRead {
        offset: u64,
        expected: usize,
        actual: usize,
    },
    #[error(
        "framing error at offset {offset}: consumed {consumed} bytes, not a multiple of {width}"
    )]
    Framing {
        offset: u64,
        consumed: usize,
        width: usize,
    },
    #[error("framing error at offset {offset}: {len} trailing bytes do not form a record")]
    TrailingBytes { offset: u64, len: usize },
    #[error("invalid record at offset {offset}: {source}")]
    Validation {
        offset: u64,
        #[source]
        source: RecordError,
    },
}

impl ScanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScanError::InvalidChunkSize { .. } => ErrorKind::Config,
            ScanError::Source(_) => ErrorKind::Io,
            ScanError::ShortRead { .. } => ErrorKind::ShortRead,
            ScanError::Framing { .. } | ScanError::TrailingBytes { .. } => ErrorKind::Framing,
            ScanError::Validation { .. } => ErrorKind::Validation,
        }
    }

    /// Absolute file offset the failure refers to, when there is one.
    pub fn offset(&self) -> Option<u64> {
        match self {
            ScanError::ShortRead { offset, .. }
            | ScanError::Framing { offset, .. }
            | ScanError::TrailingBytes { offset, .. }
            | ScanError::Validation { offset, .. } => Some(*offset),
            ScanError::InvalidChunkSize { .. } | ScanError::Source(_) => None,
        }
    }
}
