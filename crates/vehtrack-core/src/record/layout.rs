pub const ID_RANGE: std::ops::Range<usize> = 0..4;
pub const REGISTRATION_OFFSET: usize = 4;
pub const REGISTRATION_LEN: usize = 9;
pub const TERMINATOR: u8 = 0x00;

// Relative to the byte after the registration terminator.
pub const LAT_RANGE: std::ops::Range<usize> = 0..4;
pub const LON_RANGE: std::ops::Range<usize> = 4..8;
pub const TIMESTAMP_RANGE: std::ops::Range<usize> = 8..16;
pub const TAIL_LEN: usize = 16;

pub const RECORD_WIDTH: usize = REGISTRATION_OFFSET + REGISTRATION_LEN + 1 + TAIL_LEN;

/// A decode is only attempted when strictly more bytes than this remain.
pub const MIN_LOOKAHEAD: usize = 21;

pub const LAT_LIMIT: f32 = 90.0;
pub const LON_LIMIT: f32 = 180.0;
