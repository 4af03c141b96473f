//! Chunked byte sources.
//!
//! A source knows its total size up front and copies bytes into a window of a
//! caller-owned buffer. It has no knowledge of records; the scanner decides how
//! much to ask for and where the bytes land.

mod stream;

pub use stream::StreamSource;

use std::path::PathBuf;

use thiserror::Error;

/// A readable byte resource with a size fixed at open time.
pub trait ByteSource {
    /// Total length of the resource in bytes.
    fn total_size(&self) -> u64;

    /// Copy up to `max_len` bytes from the read position into
    /// `buffer[offset..offset + max_len]` and advance the read position.
    ///
    /// Returns the number of bytes copied. Returning fewer than `max_len`
    /// bytes (including zero) is how end of input is signalled; it is not an
    /// error.
    ///
    /// # Errors
    /// Returns `SourceError` when the underlying read fails or the window does
    /// not fit inside `buffer`.
    fn read_into(
        &mut self,
        buffer: &mut [u8],
        offset: usize,
        max_len: usize,
    ) -> Result<usize, SourceError>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn total_size(&self) -> u64 {
        (**self).total_size()
    }

    fn read_into(
        &mut self,
        buffer: &mut [u8],
        offset: usize,
        max_len: usize,
    ) -> Result<usize, SourceError> {
        (**self).read_into(buffer, offset, max_len)
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("read window {offset}+{len} exceeds buffer of {capacity} bytes")]
    OutOfBounds {
        offset: usize,
        len: usize,
        capacity: usize,
    },
}
