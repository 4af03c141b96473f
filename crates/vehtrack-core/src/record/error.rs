use thiserror::Error;

/// Errors returned by record decoding and validation.
///
/// Note: this error type lives in an internal module; the example is
/// illustrative and not compiled as a public doctest.
///
/// # Examples
/// ```text
/// use vehtrack_core::record::error::RecordError;
///
/// let err = RecordError::LatitudeOutOfRange { value: 91.0 };
/// assert!(err.to_string().contains("latitude"));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("record too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("registration must be {expected} bytes, got {actual}")]
    RegistrationLength { expected: usize, actual: usize },
    #[error("registration byte {index} is not printable: 0x{byte:02x}")]
    RegistrationNotPrintable { index: usize, byte: u8 },
    #[error("registration not terminated within {scanned} bytes")]
    UnterminatedRegistration { scanned: usize },
    #[error("latitude {value} outside [-90, 90]")]
    LatitudeOutOfRange { value: f32 },
    #[error("longitude {value} outside [-180, 180]")]
    LongitudeOutOfRange { value: f32 },
}
