use std::fs;
use std::path::{Path, PathBuf};

use vehtrack_core::{ErrorKind, LoadError, Report, ScanOptions, TrailingPolicy, load_file};

fn repo_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

fn load_expected_report(dir: &str) -> Report {
    let expected_path = repo_root().join(dir).join("expected_report.json");

    let expected_json = fs::read_to_string(&expected_path).expect("read expected_report.json");
    serde_json::from_str(&expected_json).expect("parse expected report")
}

fn run_golden_with(dir: &str, options: &ScanOptions) {
    let input = repo_root().join(dir).join("input.dat");
    let expected = load_expected_report(dir);

    let mut actual = load_file(&input, options).expect("load input");
    actual.input.path = expected.input.path.clone();
    actual.tool.version = expected.tool.version.clone();

    let actual_value = serde_json::to_value(actual).expect("serialize actual");
    let expected_value = serde_json::to_value(expected).expect("serialize expected");

    assert_eq!(actual_value, expected_value, "golden mismatch in {dir}");
}

fn run_golden(dir: &str) {
    run_golden_with(dir, &ScanOptions::default());
}

#[test]
fn golden_empty() {
    run_golden("tests/golden/empty");
}

#[test]
fn golden_single() {
    run_golden("tests/golden/single");
}

#[test]
fn golden_fleet() {
    run_golden("tests/golden/fleet");
}

#[test]
fn golden_fleet_with_tiny_chunks() {
    for chunk_size in [1, 7, 29, 30, 31, 359, 360, 361] {
        run_golden_with("tests/golden/fleet", &ScanOptions::with_chunk_size(chunk_size));
    }
}

#[test]
fn golden_trailing() {
    run_golden("tests/golden/trailing");
}

#[test]
fn golden_single_keeps_epoch_generated_at() {
    let report = load_expected_report("tests/golden/single");
    let timestamps = report.timestamps.expect("timestamps");
    assert_eq!(timestamps.min, 1_700_000_000_000);
    assert!(timestamps.time_end.is_none());
    assert_eq!(report.generated_at, vehtrack_core::DEFAULT_GENERATED_AT);
}

#[test]
fn golden_fleet_has_registration_counts() {
    let report = load_expected_report("tests/golden/fleet");
    assert_eq!(report.scan.records_total, 12);
    assert_eq!(report.registrations.distinct, 6);
    assert_eq!(report.registrations.max_records_per_registration, 4);
}

#[test]
fn trailing_fixture_fails_under_strict_policy() {
    let input = repo_root()
        .join("tests")
        .join("golden")
        .join("trailing")
        .join("input.dat");
    let options = ScanOptions {
        trailing: TrailingPolicy::Error,
        ..ScanOptions::default()
    };

    let err = load_file(&input, &options).unwrap_err();
    let LoadError::Scan(err) = err else {
        panic!("expected scan error, got {err:?}");
    };
    assert_eq!(err.kind(), ErrorKind::Framing);
    assert_eq!(err.offset(), Some(90));
}

#[test]
fn invalid_latitude_fixture_reports_record_offset() {
    let input = repo_root()
        .join("tests")
        .join("fixtures")
        .join("invalid_latitude.dat");

    let err = load_file(&input, &ScanOptions::default()).unwrap_err();
    let LoadError::Scan(err) = err else {
        panic!("expected scan error, got {err:?}");
    };
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.offset(), Some(60));
    assert!(err.to_string().contains("60"));
}
