use tracing::{debug, trace, warn};

use crate::record::layout::{self, RECORD_WIDTH};
use crate::record::reader::RecordReader;
use crate::record::{Decoded, RecordError, VehicleRecord, decode_record};
use crate::source::ByteSource;

use super::buffer::ScanBuffer;
use super::error::ScanError;

/// Default number of bytes requested from the source per read.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// What to do with bytes left over once the source is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailingPolicy {
    /// Drop them silently.
    Ignore,
    /// Drop them and log a warning.
    #[default]
    Warn,
    /// Fail the scan with a framing error.
    Error,
}

/// Tunables for a scan. None of them change which records are decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Bytes requested per read.
    pub chunk_size: usize,
    pub trailing: TrailingPolicy,
    /// Stop after this many records.
    pub limit: Option<u64>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            trailing: TrailingPolicy::default(),
            limit: None,
        }
    }
}

impl ScanOptions {
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            ..Self::default()
        }
    }
}

/// Outcome of a scan that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Records handed to the sink.
    pub records: u64,
    /// Bytes consumed as whole records.
    pub bytes_consumed: u64,
    /// Bytes left over at end of input that did not form a record.
    pub trailing_bytes: u64,
    /// Number of scan passes (one per top-up).
    pub passes: u64,
    /// The scan stopped because `ScanOptions::limit` was reached.
    pub limited: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Filling,
    Scanning,
    Compacting,
    Done,
    Failed,
}

/// Buffer capacity used for a given chunk size: room for a full chunk of new
/// bytes on top of a chunk plus one record of leftover.
pub fn buffer_capacity(chunk_size: usize) -> Option<usize> {
    chunk_size.checked_mul(2)?.checked_add(RECORD_WIDTH)
}

/// Rolling record scanner over a `ByteSource`.
///
/// The scanner owns its source and `run` consumes the scanner, so the
/// underlying handle is released however the scan ends.
///
/// Invariants:
/// - `file_offset` is the absolute offset of `buffer[0]` and always sits on a
///   record boundary.
/// - Bytes read from the source are `file_offset + buffer.len()`.
/// - Memory use is `buffer_capacity(chunk_size)` regardless of input size.
///
/// # Examples
/// ```
/// use vehtrack_core::{
///     Position, RecordScanner, ScanOptions, StreamSource, VehicleRecord, encode_record,
/// };
///
/// let record = VehicleRecord {
///     id: 42,
///     registration: "ABC123XYZ".to_string(),
///     position: Position { lat: 51.5, lon: -0.12 },
///     timestamp: 1_700_000_000_000,
/// };
/// let source = StreamSource::from_bytes(encode_record(&record)?.to_vec());
///
/// let mut decoded = Vec::new();
/// let summary = RecordScanner::new(source, ScanOptions::with_chunk_size(7))?
///     .run(|record| decoded.push(record))?;
/// assert_eq!(summary.records, 1);
/// assert_eq!(decoded, vec![record]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct RecordScanner<S> {
    source: S,
    options: ScanOptions,
    buffer: ScanBuffer,
    total_size: u64,
    file_offset: u64,
    pass_consumed: usize,
    state: ScanState,
    summary: ScanSummary,
}

impl<S: ByteSource> RecordScanner<S> {
    /// # Errors
    /// Returns `ScanError::InvalidChunkSize` when the chunk size is zero or
    /// the derived buffer capacity does not fit in memory addressing.
    pub fn new(source: S, options: ScanOptions) -> Result<Self, ScanError> {
        let chunk_size = options.chunk_size;
        if chunk_size == 0 {
            return Err(ScanError::InvalidChunkSize {
                chunk_size,
                reason: "must be at least one byte",
            });
        }
        let capacity = buffer_capacity(chunk_size).ok_or(ScanError::InvalidChunkSize {
            chunk_size,
            reason: "scan buffer capacity overflows",
        })?;

        let total_size = source.total_size();
        Ok(Self {
            source,
            options,
            buffer: ScanBuffer::new(capacity),
            total_size,
            file_offset: 0,
            pass_consumed: 0,
            state: ScanState::Filling,
            summary: ScanSummary::default(),
        })
    }

    /// Drive the read/decode/compact loop until the source is exhausted,
    /// handing each decoded record to `sink` in file order.
    ///
    /// # Errors
    /// Any I/O, short read, framing or validation failure ends the scan.
    /// Records emitted before the failure stay emitted.
    pub fn run<F>(mut self, mut sink: F) -> Result<ScanSummary, ScanError>
    where
        F: FnMut(VehicleRecord),
    {
        debug!(
            total_size = self.total_size,
            chunk_size = self.options.chunk_size,
            capacity = self.buffer.capacity(),
            "starting record scan"
        );

        while self.state != ScanState::Done {
            let step = match self.state {
                ScanState::Filling => self.fill(),
                ScanState::Scanning => self.scan_pass(&mut sink),
                ScanState::Compacting => self.compact(),
                ScanState::Done | ScanState::Failed => break,
            };
            match step {
                Ok(next) => {
                    trace!(from = ?self.state, to = ?next, "scan state");
                    self.state = next;
                }
                Err(err) => {
                    self.state = ScanState::Failed;
                    debug!(
                        file_offset = self.file_offset,
                        records = self.summary.records,
                        error = %err,
                        "record scan failed"
                    );
                    return Err(err);
                }
            }
        }

        Ok(self.summary)
    }

    fn unread(&self) -> u64 {
        let read_position = self.file_offset + self.buffer.len() as u64;
        self.total_size.saturating_sub(read_position)
    }

    fn fill(&mut self) -> Result<ScanState, ScanError> {
        let unread = self.unread();
        if unread == 0 {
            return self.finish();
        }

        let chunk_size = self.options.chunk_size;
        let (request, full_chunk) = if unread > chunk_size as u64 {
            (chunk_size, true)
        } else {
            // unread <= chunk_size, so it fits in usize.
            (unread as usize, false)
        };
        if request > self.buffer.spare() {
            return Err(ScanError::Validation {
                offset: self.file_offset,
                source: self.oversized_record_error(),
            });
        }

        let offset = self.buffer.len();
        let read = self
            .source
            .read_into(self.buffer.storage_mut(), offset, request)?;
        if read == 0 || (full_chunk && read < request) {
            return Err(ScanError::ShortRead {
                offset: self.file_offset + offset as u64,
                expected: request,
                actual: read,
            });
        }
        self.buffer.commit(read);
        Ok(ScanState::Scanning)
    }

    fn scan_pass<F>(&mut self, sink: &mut F) -> Result<ScanState, ScanError>
    where
        F: FnMut(VehicleRecord),
    {
        let bytes = self.buffer.filled();
        let mut cursor = 0;
        while !self.limit_reached() {
            match decode_record(&bytes[cursor..]) {
                Ok(Decoded::Complete { record, width }) => {
                    sink(record);
                    self.summary.records += 1;
                    cursor += width;
                }
                Ok(Decoded::Incomplete) => break,
                Err(source) => {
                    return Err(ScanError::Validation {
                        offset: self.file_offset + cursor as u64,
                        source,
                    });
                }
            }
        }

        self.pass_consumed = cursor;
        self.summary.passes += 1;
        Ok(ScanState::Compacting)
    }

    fn compact(&mut self) -> Result<ScanState, ScanError> {
        let consumed = self.pass_consumed;
        if consumed % RECORD_WIDTH != 0 {
            return Err(ScanError::Framing {
                offset: self.file_offset,
                consumed,
                width: RECORD_WIDTH,
            });
        }

        self.buffer.compact(consumed);
        self.file_offset += consumed as u64;
        self.pass_consumed = 0;
        self.summary.bytes_consumed = self.file_offset;
        debug!(
            pass = self.summary.passes,
            consumed,
            file_offset = self.file_offset,
            leftover = self.buffer.len(),
            "scan pass compacted"
        );

        if self.limit_reached() {
            self.summary.limited = true;
            debug!(records = self.summary.records, "record limit reached");
            return Ok(ScanState::Done);
        }
        if self.unread() == 0 {
            return self.finish();
        }
        Ok(ScanState::Filling)
    }

    fn finish(&mut self) -> Result<ScanState, ScanError> {
        let leftover = self.buffer.len();
        self.summary.trailing_bytes = leftover as u64;
        if !self.buffer.is_empty() {
            match self.options.trailing {
                TrailingPolicy::Ignore => {}
                TrailingPolicy::Warn => warn!(
                    offset = self.file_offset,
                    bytes = leftover,
                    "dropping incomplete trailing record"
                ),
                TrailingPolicy::Error => {
                    return Err(ScanError::TrailingBytes {
                        offset: self.file_offset,
                        len: leftover,
                    });
                }
            }
        }
        Ok(ScanState::Done)
    }

    fn limit_reached(&self) -> bool {
        self.options
            .limit
            .is_some_and(|limit| self.summary.records >= limit)
    }

    // Only a registration longer than the whole leftover window can stop the
    // buffer from taking another chunk.
    fn oversized_record_error(&self) -> RecordError {
        let reader = RecordReader::new(self.buffer.filled());
        match reader.find_terminator(layout::REGISTRATION_OFFSET) {
            Some(terminator) => RecordError::RegistrationLength {
                expected: layout::REGISTRATION_LEN,
                actual: terminator - layout::REGISTRATION_OFFSET,
            },
            None => RecordError::UnterminatedRegistration {
                scanned: self
                    .buffer
                    .len()
                    .saturating_sub(layout::REGISTRATION_OFFSET),
            },
        }
    }
}

/// Scan `source` with `options`, handing every record to `sink`.
///
/// # Errors
/// See [`RecordScanner::run`].
pub fn scan<S, F>(source: S, options: &ScanOptions, sink: F) -> Result<ScanSummary, ScanError>
where
    S: ByteSource,
    F: FnMut(VehicleRecord),
{
    RecordScanner::new(source, options.clone())?.run(sink)
}
