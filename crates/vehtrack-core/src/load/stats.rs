use std::collections::HashMap;

use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::record::VehicleRecord;
use crate::{PositionBounds, RegistrationSummary, TimestampSummary};

/// Running aggregates over decoded records.
#[derive(Debug, Default)]
pub struct RecordStats {
    timestamps: Option<(u64, u64)>,
    bounds: Option<PositionBounds>,
    per_registration: HashMap<String, u64>,
}

impl RecordStats {
    pub fn add(&mut self, record: &VehicleRecord) {
        let ts = record.timestamp;
        self.timestamps = Some(match self.timestamps {
            None => (ts, ts),
            Some((min, max)) => (min.min(ts), max.max(ts)),
        });

        let (lat, lon) = (record.position.lat, record.position.lon);
        self.bounds = Some(match self.bounds.take() {
            None => PositionBounds {
                lat_min: lat,
                lat_max: lat,
                lon_min: lon,
                lon_max: lon,
            },
            Some(bounds) => PositionBounds {
                lat_min: bounds.lat_min.min(lat),
                lat_max: bounds.lat_max.max(lat),
                lon_min: bounds.lon_min.min(lon),
                lon_max: bounds.lon_max.max(lon),
            },
        });

        *self
            .per_registration
            .entry(record.registration.clone())
            .or_default() += 1;
    }

    pub fn timestamps(&self) -> Option<TimestampSummary> {
        let (min, max) = self.timestamps?;
        Some(TimestampSummary {
            min,
            max,
            time_start: unix_seconds_to_rfc3339(min),
            time_end: unix_seconds_to_rfc3339(max),
        })
    }

    pub fn bounds(&self) -> Option<PositionBounds> {
        self.bounds.clone()
    }

    pub fn registrations(&self) -> RegistrationSummary {
        RegistrationSummary {
            distinct: self.per_registration.len() as u64,
            max_records_per_registration: self
                .per_registration
                .values()
                .copied()
                .max()
                .unwrap_or(0),
        }
    }
}

/// Format a timestamp as RFC 3339, reading it as Unix seconds.
///
/// Returns `None` when the value is outside the representable date range,
/// which is the case for producers that count in finer units.
fn unix_seconds_to_rfc3339(ts: u64) -> Option<String> {
    let seconds = i64::try_from(ts).ok()?;
    OffsetDateTime::from_unix_timestamp(seconds)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}

#[cfg(test)]
mod tests {
    use super::{RecordStats, unix_seconds_to_rfc3339};
    use crate::record::{Position, VehicleRecord};

    fn record(registration: &str, lat: f32, lon: f32, timestamp: u64) -> VehicleRecord {
        VehicleRecord {
            id: 1,
            registration: registration.to_string(),
            position: Position { lat, lon },
            timestamp,
        }
    }

    #[test]
    fn empty_stats_have_no_bounds() {
        let stats = RecordStats::default();
        assert!(stats.timestamps().is_none());
        assert!(stats.bounds().is_none());
        assert_eq!(stats.registrations().distinct, 0);
        assert_eq!(stats.registrations().max_records_per_registration, 0);
    }

    #[test]
    fn stats_track_extremes_and_registrations() {
        let mut stats = RecordStats::default();
        stats.add(&record("CA123456G", -33.5, 18.5, 1_700_000_060));
        stats.add(&record("GP555111Z", -26.25, 28.0, 1_700_000_000));
        stats.add(&record("CA123456G", -34.0, 18.25, 1_700_000_120));

        let ts = stats.timestamps().unwrap();
        assert_eq!(ts.min, 1_700_000_000);
        assert_eq!(ts.max, 1_700_000_120);
        assert_eq!(ts.time_start.as_deref(), Some("2023-11-14T22:13:20Z"));

        let bounds = stats.bounds().unwrap();
        assert_eq!(bounds.lat_min, -34.0);
        assert_eq!(bounds.lat_max, -26.25);
        assert_eq!(bounds.lon_min, 18.25);
        assert_eq!(bounds.lon_max, 28.0);

        let registrations = stats.registrations();
        assert_eq!(registrations.distinct, 2);
        assert_eq!(registrations.max_records_per_registration, 2);
    }

    #[test]
    fn out_of_range_time_is_omitted() {
        assert_eq!(unix_seconds_to_rfc3339(0).as_deref(), Some("1970-01-01T00:00:00Z"));
        assert!(unix_seconds_to_rfc3339(1_700_000_000_000).is_none());
        assert!(unix_seconds_to_rfc3339(u64::MAX).is_none());
    }
}
