//! vehtrack core library for streaming vehicle position files.
//!
//! Position files are flat sequences of fixed-layout binary records with no
//! header, footer or count. This crate reads them in bounded chunks through a
//! `ByteSource`, decodes records with a rolling scanner that carries partial
//! records across reads, and aggregates the result into a deterministic
//! report. Record decoding is byte-oriented and side-effect free; all I/O is
//! isolated in `source`.
//!
//! Invariants:
//! - Memory use is bounded by the chunk size, never by the input size.
//! - Decoded records do not depend on the chunk size used to read them.
//! - Every failure (I/O, short read, framing, validation) ends the scan; no
//!   record is skipped and the stream is never resynchronised.
//! - The wire format is little-endian with IEEE-754 `f32` coordinates,
//!   independent of the host byte order.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use vehtrack_core::{ScanOptions, load_file};
//!
//! let report = load_file(Path::new("VehiclePositions.dat"), &ScanOptions::default())?;
//! println!("records: {}", report.scan.records_total);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod load;
mod record;
mod scan;
mod source;

pub use load::{LoadError, load_file, load_source, scan_file};
pub use record::layout::RECORD_WIDTH;
pub use record::{Position, RecordError, VehicleRecord, decode_record, encode_record};
pub use scan::{
    DEFAULT_CHUNK_SIZE, ErrorKind, RecordScanner, ScanError, ScanOptions, ScanSummary,
    TrailingPolicy, buffer_capacity, scan,
};
pub use source::{ByteSource, SourceError, StreamSource};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no record time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Load report with deterministic content.
///
/// # Examples
/// ```
/// use vehtrack_core::make_stub_report;
///
/// let report = make_stub_report("positions.dat", 300);
/// assert_eq!(report.report_version, vehtrack_core::REPORT_VERSION);
/// assert_eq!(report.scan.records_total, 0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    /// RFC3339 time of the last record, or the epoch when unknown.
    pub generated_at: String,
    pub input: InputInfo,
    pub scan: ScanInfo,
    /// Timestamp range; absent when no records were decoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<TimestampSummary>,
    /// Position bounding box; absent when no records were decoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<PositionBounds>,
    pub registrations: RegistrationSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the loader.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Scan outcome counters.
///
/// # Examples
/// ```
/// use vehtrack_core::ScanInfo;
///
/// let scan = ScanInfo {
///     records_total: 2,
///     bytes_consumed: 60,
///     trailing_bytes: 0,
///     limited: false,
/// };
/// assert_eq!(scan.bytes_consumed, 60);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanInfo {
    pub records_total: u64,
    pub bytes_consumed: u64,
    /// Bytes at the end of the input that did not form a record.
    pub trailing_bytes: u64,
    /// The scan stopped at a record limit before the end of the input.
    pub limited: bool,
}

/// Raw timestamp range, plus RFC3339 renderings when the values are valid
/// Unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimestampSummary {
    pub min: u64,
    pub max: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionBounds {
    pub lat_min: f32,
    pub lat_max: f32,
    pub lon_min: f32,
    pub lon_max: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrationSummary {
    /// Number of distinct registrations seen.
    pub distinct: u64,
    /// Largest number of records sharing one registration.
    pub max_records_per_registration: u64,
}

/// Build a stub report with base fields filled and empty aggregates.
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "vehtrack".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        scan: ScanInfo::default(),
        timestamps: None,
        bounds: None,
        registrations: RegistrationSummary::default(),
    }
}
