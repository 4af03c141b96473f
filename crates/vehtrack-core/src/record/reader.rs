use super::error::RecordError;
use super::layout;

/// Bounds-checked little-endian reads over a window of scan buffer bytes.
pub struct RecordReader<'a> {
    bytes: &'a [u8],
}

impl<'a> RecordReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], RecordError> {
        self.bytes.get(range.clone()).ok_or(RecordError::TooShort {
            needed: range.end,
            actual: self.bytes.len(),
        })
    }

    pub fn read_u32_le(&self, range: std::ops::Range<usize>) -> Result<u32, RecordError> {
        Ok(u32::from_le_bytes(self.read_array(range)?))
    }

    pub fn read_f32_le(&self, range: std::ops::Range<usize>) -> Result<f32, RecordError> {
        Ok(f32::from_le_bytes(self.read_array(range)?))
    }

    pub fn read_u64_le(&self, range: std::ops::Range<usize>) -> Result<u64, RecordError> {
        Ok(u64::from_le_bytes(self.read_array(range)?))
    }

    /// Position of the first registration terminator at or after `start`.
    pub fn find_terminator(&self, start: usize) -> Option<usize> {
        self.bytes
            .get(start..)?
            .iter()
            .position(|&b| b == layout::TERMINATOR)
            .map(|pos| start + pos)
    }

    fn read_array<const N: usize>(
        &self,
        range: std::ops::Range<usize>,
    ) -> Result<[u8; N], RecordError> {
        let bytes = self.read_slice(range)?;
        bytes.try_into().map_err(|_| RecordError::TooShort {
            needed: N,
            actual: bytes.len(),
        })
    }
}

/// Shift a tail-relative range to an absolute position in the record.
pub fn shifted(range: std::ops::Range<usize>, base: usize) -> std::ops::Range<usize> {
    base + range.start..base + range.end
}

#[cfg(test)]
mod tests {
    use super::{RecordReader, shifted};
    use crate::record::error::RecordError;

    #[test]
    fn reads_little_endian_fields() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0xdead_beefu32.to_le_bytes());
        bytes.extend_from_slice(&(-12.5f32).to_le_bytes());
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        let reader = RecordReader::new(&bytes);

        assert_eq!(reader.read_u32_le(0..4).unwrap(), 0xdead_beef);
        assert_eq!(reader.read_f32_le(4..8).unwrap(), -12.5);
        assert_eq!(reader.read_u64_le(8..16).unwrap(), u64::MAX);
    }

    #[test]
    fn read_past_end_is_too_short() {
        let bytes = [0u8; 6];
        let reader = RecordReader::new(&bytes);
        let err = reader.read_u64_le(0..8).unwrap_err();
        assert_eq!(
            err,
            RecordError::TooShort {
                needed: 8,
                actual: 6
            }
        );
    }

    #[test]
    fn read_with_wrong_width_is_too_short() {
        let bytes = [0u8; 8];
        let reader = RecordReader::new(&bytes);
        assert!(matches!(
            reader.read_u32_le(0..3),
            Err(RecordError::TooShort { needed: 4, .. })
        ));
    }

    #[test]
    fn find_terminator_starts_at_offset() {
        let bytes = [0u8, 1, 2, 0, 4];
        let reader = RecordReader::new(&bytes);
        assert_eq!(reader.find_terminator(0), Some(0));
        assert_eq!(reader.find_terminator(1), Some(3));
        assert_eq!(reader.find_terminator(4), None);
        assert_eq!(reader.find_terminator(9), None);
    }

    #[test]
    fn shifted_moves_range() {
        assert_eq!(shifted(4..8, 14), 18..22);
    }
}
