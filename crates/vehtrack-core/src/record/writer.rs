use super::error::RecordError;
use super::layout;
use super::parser::VehicleRecord;
use super::reader::shifted;

/// Encode a record in the fixed 30-byte wire layout.
///
/// Position values are written as given, so out-of-range fixtures can be
/// produced; only the registration must fit the fixed-width field.
///
/// # Errors
/// Returns `RecordError::RegistrationLength` when the registration is not
/// exactly nine bytes.
///
/// # Examples
/// ```
/// use vehtrack_core::{Position, VehicleRecord, encode_record};
///
/// let record = VehicleRecord {
///     id: 7,
///     registration: "CA123456G".to_string(),
///     position: Position { lat: -33.9, lon: 18.4 },
///     timestamp: 1_700_000_000,
/// };
/// let bytes = encode_record(&record)?;
/// assert_eq!(bytes.len(), 30);
/// assert_eq!(bytes[13], 0);
/// # Ok::<(), vehtrack_core::RecordError>(())
/// ```
pub fn encode_record(record: &VehicleRecord) -> Result<[u8; layout::RECORD_WIDTH], RecordError> {
    let registration = record.registration.as_bytes();
    if registration.len() != layout::REGISTRATION_LEN {
        return Err(RecordError::RegistrationLength {
            expected: layout::REGISTRATION_LEN,
            actual: registration.len(),
        });
    }

    let mut bytes = [0u8; layout::RECORD_WIDTH];
    let terminator = layout::REGISTRATION_OFFSET + layout::REGISTRATION_LEN;
    let tail = terminator + 1;
    bytes[layout::ID_RANGE].copy_from_slice(&record.id.to_le_bytes());
    bytes[layout::REGISTRATION_OFFSET..terminator].copy_from_slice(registration);
    bytes[terminator] = layout::TERMINATOR;
    bytes[shifted(layout::LAT_RANGE, tail)].copy_from_slice(&record.position.lat.to_le_bytes());
    bytes[shifted(layout::LON_RANGE, tail)].copy_from_slice(&record.position.lon.to_le_bytes());
    bytes[shifted(layout::TIMESTAMP_RANGE, tail)].copy_from_slice(&record.timestamp.to_le_bytes());
    Ok(bytes)
}
