use serde::{Deserialize, Serialize};

use super::error::RecordError;
use super::layout;
use super::reader::{RecordReader, shifted};

/// Geographic position in degrees, as stored on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f32,
    pub lon: f32,
}

/// One decoded vehicle position record.
///
/// # Examples
/// ```
/// use vehtrack_core::{Position, VehicleRecord};
///
/// let record = VehicleRecord {
///     id: 42,
///     registration: "ABC123XYZ".to_string(),
///     position: Position { lat: 51.5, lon: -0.12 },
///     timestamp: 1_700_000_000_000,
/// };
/// assert_eq!(record.registration.len(), 9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub id: u32,
    /// Nine printable ASCII bytes.
    pub registration: String,
    pub position: Position,
    /// Producer-defined counter; its unit is not interpreted here.
    pub timestamp: u64,
}

/// Outcome of a decode attempt at the start of a byte window.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// A full record and the number of bytes it occupied.
    Complete { record: VehicleRecord, width: usize },
    /// Not enough bytes yet to know where the record ends.
    Incomplete,
}

/// Decode the record starting at `bytes[0]`.
///
/// Returns `Ok(Decoded::Incomplete)` when the window is too short to hold a
/// complete record; nothing is consumed in that case.
///
/// # Errors
/// Returns `RecordError` when a complete record is present but its fields are
/// out of domain.
pub fn decode_record(bytes: &[u8]) -> Result<Decoded, RecordError> {
    let reader = RecordReader::new(bytes);
    if reader.len() <= layout::MIN_LOOKAHEAD {
        return Ok(Decoded::Incomplete);
    }

    let id = reader.read_u32_le(layout::ID_RANGE)?;
    let Some(terminator) = reader.find_terminator(layout::REGISTRATION_OFFSET) else {
        return Ok(Decoded::Incomplete);
    };
    let tail = terminator + 1;
    if reader.len() - tail < layout::TAIL_LEN {
        return Ok(Decoded::Incomplete);
    }

    let registration = reader.read_slice(layout::REGISTRATION_OFFSET..terminator)?;
    let lat = reader.read_f32_le(shifted(layout::LAT_RANGE, tail))?;
    let lon = reader.read_f32_le(shifted(layout::LON_RANGE, tail))?;
    let timestamp = reader.read_u64_le(shifted(layout::TIMESTAMP_RANGE, tail))?;

    validate_registration(registration)?;
    validate_position(lat, lon)?;

    Ok(Decoded::Complete {
        record: VehicleRecord {
            id,
            registration: String::from_utf8_lossy(registration).into_owned(),
            position: Position { lat, lon },
            timestamp,
        },
        width: tail + layout::TAIL_LEN,
    })
}

fn validate_registration(bytes: &[u8]) -> Result<(), RecordError> {
    if bytes.len() != layout::REGISTRATION_LEN {
        return Err(RecordError::RegistrationLength {
            expected: layout::REGISTRATION_LEN,
            actual: bytes.len(),
        });
    }
    match bytes
        .iter()
        .position(|b| !(b.is_ascii_graphic() || *b == b' '))
    {
        Some(index) => Err(RecordError::RegistrationNotPrintable {
            index,
            byte: bytes[index],
        }),
        None => Ok(()),
    }
}

fn validate_position(lat: f32, lon: f32) -> Result<(), RecordError> {
    // Written as range checks so NaN is rejected.
    if !(-layout::LAT_LIMIT..=layout::LAT_LIMIT).contains(&lat) {
        return Err(RecordError::LatitudeOutOfRange { value: lat });
    }
    if !(-layout::LON_LIMIT..=layout::LON_LIMIT).contains(&lon) {
        return Err(RecordError::LongitudeOutOfRange { value: lon });
    }
    Ok(())
}
