//! Vehicle position record decoding.
//!
//! Records follow the layered structure used throughout the crate:
//! - `layout`: byte offsets and widths (source of truth)
//! - `reader`: bounds-checked little-endian reads
//! - `parser`: decode and validate one record from a byte window
//! - `writer`: encode a record in the same layout
//! - `error`: explicit validation errors
//!
//! The wire layout is `[id:u32][registration:9 bytes + NUL][lat:f32][lon:f32]
//! [timestamp:u64]`, little-endian, no padding, 30 bytes per valid record.
//! The registration is NUL-terminated on the wire, so a decoder only knows a
//! record is complete once it has seen the terminator and the 16-byte tail.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;
pub mod writer;

pub use error::RecordError;
pub use parser::{Decoded, Position, VehicleRecord, decode_record};
pub use writer::encode_record;
