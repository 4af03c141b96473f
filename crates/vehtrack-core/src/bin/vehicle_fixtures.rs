use std::fs;
use std::path::{Path, PathBuf};

use vehtrack_core::{Position, VehicleRecord, encode_record};

const EXAMPLE: (u32, &str, f32, f32, u64) = (42, "ABC123XYZ", 51.5, -0.12, 1_700_000_000_000);

const FLEET: [(u32, &str, f32, f32, u64); 12] = [
    (1001, "CA123456G", -33.875, 18.375, 1_700_000_000),
    (1002, "GP555111Z", -26.25, 28.0625, 1_700_000_030),
    (1003, "ND000001X", -29.75, 31.0, 1_700_000_060),
    (1001, "CA123456G", -33.9375, 18.5, 1_700_000_090),
    (1004, "WC 77-12B", -34.0, 18.25, 1_700_000_120),
    (1002, "GP555111Z", -26.125, 28.125, 1_700_000_150),
    (1001, "CA123456G", -33.875, 18.625, 1_700_000_180),
    (1005, "EC 9-30-5", -33.0, 27.875, 1_700_000_210),
    (1003, "ND000001X", -29.875, 30.875, 1_700_000_240),
    (1002, "GP555111Z", -26.0, 28.25, 1_700_000_270),
    (1001, "CA123456G", -33.75, 18.75, 1_700_000_300),
    (1006, "LP 0042-Q", -23.875, 29.5, 1_700_000_330),
];

const TRAILING_RECORDS: usize = 3;
const TRAILING_BYTES: usize = 7;
const INVALID_LATITUDE: f32 = 91.0;

fn main() -> Result<(), String> {
    let golden = PathBuf::from("tests").join("golden");
    write_input(&golden.join("empty"), &[])?;
    write_input(&golden.join("single"), &encode_rows(&[EXAMPLE])?)?;
    write_input(&golden.join("fleet"), &encode_rows(&FLEET)?)?;

    let mut trailing = encode_rows(&FLEET[..TRAILING_RECORDS])?;
    let partial = encode_rows(&FLEET[TRAILING_RECORDS..=TRAILING_RECORDS])?;
    trailing.extend_from_slice(&partial[..TRAILING_BYTES]);
    write_input(&golden.join("trailing"), &trailing)?;

    let fixtures = PathBuf::from("tests").join("fixtures");
    let mut invalid = FLEET[..3].to_vec();
    invalid[2].2 = INVALID_LATITUDE;
    write_file(
        &fixtures.join("invalid_latitude.dat"),
        &encode_rows(&invalid)?,
    )?;
    Ok(())
}

fn encode_rows(rows: &[(u32, &str, f32, f32, u64)]) -> Result<Vec<u8>, String> {
    let mut bytes = Vec::with_capacity(rows.len() * vehtrack_core::RECORD_WIDTH);
    for &(id, registration, lat, lon, timestamp) in rows {
        let record = VehicleRecord {
            id,
            registration: registration.to_string(),
            position: Position { lat, lon },
            timestamp,
        };
        let encoded = encode_record(&record)
            .map_err(|err| format!("cannot encode record {id}: {err}"))?;
        bytes.extend_from_slice(&encoded);
    }
    Ok(bytes)
}

fn write_input(dir: &Path, bytes: &[u8]) -> Result<(), String> {
    write_file(&dir.join("input.dat"), bytes)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| format!("failed to create {}: {}", parent.display(), err))?;
    }
    fs::write(path, bytes).map_err(|err| format!("failed to write {}: {}", path.display(), err))
}
