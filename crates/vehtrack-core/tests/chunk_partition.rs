use std::io::{self, Read};

use quickcheck::{QuickCheck, TestResult};
use vehtrack_core::{
    Position, RECORD_WIDTH, ScanOptions, StreamSource, VehicleRecord, encode_record, scan,
};

/// Reader that hands out bytes in sizes taken from `splits`, cycling.
struct Splitting {
    data: Vec<u8>,
    pos: usize,
    splits: Vec<usize>,
    next: usize,
}

impl Read for Splitting {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.data.len() - self.pos;
        if remaining == 0 || buf.is_empty() {
            return Ok(0);
        }
        let step = match self.splits.get(self.next % self.splits.len().max(1)) {
            Some(split) => 1 + split % 64,
            None => remaining,
        };
        self.next += 1;
        let n = step.min(remaining).min(buf.len());
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

fn build_record(seed: (u32, u16, i16, i16, u64)) -> VehicleRecord {
    let (id, reg, lat, lon, timestamp) = seed;
    VehicleRecord {
        id,
        registration: format!("RG {reg:06}"),
        position: Position {
            lat: f32::from(lat) / 400.0,
            lon: f32::from(lon) / 200.0,
        },
        timestamp,
    }
}

/// Property: the decoded records never depend on the chunk size or on how
/// the reader splits its output.
#[test]
fn chunk_partition_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(seeds: Vec<(u32, u16, i16, i16, u64)>, chunk: usize, splits: Vec<usize>) -> TestResult {
        let records: Vec<VehicleRecord> = seeds.into_iter().map(build_record).collect();
        let mut bytes = Vec::with_capacity(records.len() * RECORD_WIDTH);
        for record in &records {
            match encode_record(record) {
                Ok(encoded) => bytes.extend_from_slice(&encoded),
                Err(_) => return TestResult::discard(),
            }
        }

        let total = bytes.len() as u64;
        let source = StreamSource::new(
            Splitting {
                data: bytes,
                pos: 0,
                splits,
                next: 0,
            },
            total,
        );
        let options = ScanOptions::with_chunk_size(1 + chunk % 256);

        let mut decoded = Vec::new();
        let summary = match scan(source, &options, |record| decoded.push(record)) {
            Ok(summary) => summary,
            Err(err) => return TestResult::error(err.to_string()),
        };

        TestResult::from_bool(
            decoded == records
                && summary.records == records.len() as u64
                && summary.bytes_consumed == total
                && summary.trailing_bytes == 0,
        )
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(Vec<(u32, u16, i16, i16, u64)>, usize, Vec<usize>) -> TestResult);
}
