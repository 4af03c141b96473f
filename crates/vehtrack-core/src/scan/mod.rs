//! Rolling record scanner.
//!
//! The scanner tops up a bounded buffer from a `ByteSource`, decodes every
//! complete record at the front of the buffer, checks that the bytes consumed
//! in the pass line up with record boundaries, then shifts the unconsumed tail
//! to the front and reads again. Records that straddle two reads are decoded
//! once the second read lands; nothing is skipped and nothing is re-read.
//!
//! Every failure is terminal. A misaligned stream makes every later record
//! meaningless, so there is no resynchronisation and no skip-and-continue.

pub mod buffer;
pub mod error;
pub mod scanner;

pub use error::{ErrorKind, ScanError};
pub use scanner::{
    DEFAULT_CHUNK_SIZE, RecordScanner, ScanOptions, ScanSummary, TrailingPolicy, buffer_capacity,
    scan,
};
