use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::record::VehicleRecord;
use crate::scan::{ScanError, ScanOptions, ScanSummary, scan};
use crate::source::{ByteSource, SourceError, StreamSource};
use crate::{DEFAULT_GENERATED_AT, Report, ScanInfo, make_stub_report};

mod stats;

use stats::RecordStats;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
}

pub fn load_file(path: &Path, options: &ScanOptions) -> Result<Report, LoadError> {
    let source = StreamSource::open(path)?;
    load_source(path, source, options)
}

pub fn load_source<S: ByteSource>(
    path: &Path,
    source: S,
    options: &ScanOptions,
) -> Result<Report, LoadError> {
    let input_bytes = source.total_size();
    let mut stats = RecordStats::default();
    let summary = scan(source, options, |record| stats.add(&record))?;

    info!(
        path = %path.display(),
        records = summary.records,
        passes = summary.passes,
        trailing_bytes = summary.trailing_bytes,
        "loaded vehicle positions"
    );

    let mut report = make_stub_report(&path.display().to_string(), input_bytes);
    report.scan = ScanInfo {
        records_total: summary.records,
        bytes_consumed: summary.bytes_consumed,
        trailing_bytes: summary.trailing_bytes,
        limited: summary.limited,
    };
    report.timestamps = stats.timestamps();
    report.bounds = stats.bounds();
    report.registrations = stats.registrations();
    report.generated_at = report
        .timestamps
        .as_ref()
        .and_then(|ts| ts.time_end.clone().or(ts.time_start.clone()))
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
    Ok(report)
}

/// Decode `path` and hand every record to `sink` in file order.
pub fn scan_file<F>(path: &Path, options: &ScanOptions, sink: F) -> Result<ScanSummary, LoadError>
where
    F: FnMut(VehicleRecord),
{
    let source = StreamSource::open(path)?;
    let summary = scan(source, options, sink)?;
    info!(
        path = %path.display(),
        records = summary.records,
        "decoded vehicle positions"
    );
    Ok(summary)
}
