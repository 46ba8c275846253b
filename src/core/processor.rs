//! Payload processing contract and time-zone helpers.
//!
//! A [`DataProcessor`] converts one raw payload into zero or more normalized
//! [`ProgramRecord`]s, applying the source's own field-extraction and
//! time-zone rules. The core trusts the contract: timestamps come back in
//! the canonical target zone, records without a usable title are dropped,
//! and whole-window JSON sources filter to the date the URL was built for.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};

use crate::models::{ProgramRecord, RawPayload};

/// Seconds east of UTC for the canonical target zone (UTC-05:00, no DST).
const TARGET_OFFSET_SECONDS: i32 = -5 * 3600;

/// The canonical target time zone all records are normalized into.
pub fn target_offset() -> FixedOffset {
    FixedOffset::east_opt(TARGET_OFFSET_SECONDS).expect("target offset is in range")
}

/// Converts one raw payload into normalized program records.
///
/// One implementation per source. `date_key` is the window date the request
/// URL was generated for; sources whose payloads span several days filter on
/// it, sources whose payloads inherently cover one day (or one hour slice)
/// ignore it.
pub trait DataProcessor {
    fn process(
        &self,
        payload: &RawPayload,
        default_description: &str,
        date_key: NaiveDate,
    ) -> Vec<ProgramRecord>;
}

/// Origin-to-target time-zone conversion for a source.
///
/// Both zones are fixed offsets: the target zone has no daylight saving, and
/// origin offsets use standard time.
#[derive(Debug, Clone, Copy)]
pub struct ZoneShift {
    source: FixedOffset,
    target: FixedOffset,
}

impl ZoneShift {
    /// A shift from the given origin offset into the canonical target zone.
    pub fn from_source(source: FixedOffset) -> Self {
        Self {
            source,
            target: target_offset(),
        }
    }

    /// Interpret `local` as a wall-clock time in the origin zone and return
    /// the corresponding wall-clock time in the target zone.
    pub fn to_target(&self, local: NaiveDateTime) -> NaiveDateTime {
        match self.source.from_local_datetime(&local).single() {
            Some(dt) => dt.with_timezone(&self.target).naive_local(),
            // Fixed offsets never produce ambiguous or skipped local times.
            None => local,
        }
    }

    /// Convert a Unix timestamp (seconds) the way the upstream guides do:
    /// the UTC wall-clock reading is re-interpreted in the origin zone, then
    /// shifted into the target zone.
    pub fn epoch_to_target(&self, seconds: i64) -> Option<NaiveDateTime> {
        DateTime::from_timestamp(seconds, 0).map(|dt| self.to_target(dt.naive_utc()))
    }

    /// Format a converted datetime as the record's `(date, hour)` pair.
    pub fn date_and_hour(&self, local: NaiveDateTime) -> (String, String) {
        let shifted = self.to_target(local);
        (
            shifted.format("%Y-%m-%d").to_string(),
            shifted.format("%H:%M").to_string(),
        )
    }
}

/// Parse an ISO-8601 timestamp into its wall-clock reading, discarding any
/// offset suffix. `2025-03-01T20:00:00-05:00`, `2025-03-01T20:00:00Z`, and
/// `2025-03-01T20:00:00` all yield 20:00 on 2025-03-01.
pub fn naive_wall_clock(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    raw.parse::<NaiveDateTime>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amsterdam() -> ZoneShift {
        ZoneShift::from_source(FixedOffset::east_opt(3600).unwrap())
    }

    #[test]
    fn test_shift_moves_evening_show_across_midnight() {
        // 02:30 in UTC+1 is 20:30 the previous day in UTC-5.
        let local = "2025-03-02T02:30:00".parse().unwrap();
        let (date, hour) = amsterdam().date_and_hour(local);
        assert_eq!(date, "2025-03-01");
        assert_eq!(hour, "20:30");
    }

    #[test]
    fn test_identity_shift_when_source_equals_target() {
        let shift = ZoneShift::from_source(target_offset());
        let local = "2025-03-01T20:00:00".parse().unwrap();
        let (date, hour) = shift.date_and_hour(local);
        assert_eq!((date.as_str(), hour.as_str()), ("2025-03-01", "20:00"));
    }

    #[test]
    fn test_epoch_conversion_reinterprets_utc_reading() {
        // 1741003200 = 2025-03-03 12:00:00 UTC; the 12:00 reading taken as
        // Amsterdam wall-clock lands at 06:00 in UTC-5.
        let shifted = amsterdam().epoch_to_target(1_741_003_200).unwrap();
        assert_eq!(shifted.format("%Y-%m-%d %H:%M").to_string(), "2025-03-03 06:00");
    }

    #[test]
    fn test_naive_wall_clock_discards_offsets() {
        let with_offset = naive_wall_clock("2025-03-01T20:00:00-05:00").unwrap();
        let with_zulu = naive_wall_clock("2025-03-01T20:00:00Z").unwrap();
        let bare = naive_wall_clock("2025-03-01T20:00:00").unwrap();
        assert_eq!(with_offset, bare);
        assert_eq!(with_zulu, bare);
        assert!(naive_wall_clock("soon").is_none());
    }
}
