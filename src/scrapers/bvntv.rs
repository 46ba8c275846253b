//! BVN TV guide source.
//!
//! A JSON list API queried once per day at `{base}{YYYY-MM-DD}/`. Each
//! payload can spill into neighboring days after time-zone conversion, so
//! records are filtered to the request's date key. Broadcast times originate
//! in Amsterdam local time.

use chrono::{FixedOffset, NaiveDate, NaiveDateTime};
use tracing::warn;

use crate::core::processor::{DataProcessor, ZoneShift};
use crate::models::{ProgramRecord, RawPayload};

pub struct BvnTvDataProcessor {
    shift: ZoneShift,
}

impl BvnTvDataProcessor {
    pub fn new() -> Self {
        // Guide times are Amsterdam local (CET).
        Self {
            shift: ZoneShift::from_source(FixedOffset::east_opt(3600).expect("offset in range")),
        }
    }
}

impl DataProcessor for BvnTvDataProcessor {
    fn process(
        &self,
        payload: &RawPayload,
        default_description: &str,
        date_key: NaiveDate,
    ) -> Vec<ProgramRecord> {
        let Some(events) = payload.as_json().and_then(|v| v.as_array()) else {
            warn!("BVN payload was not a JSON array; skipping");
            return Vec::new();
        };

        let target_date = date_key.format("%Y-%m-%d").to_string();
        let mut records = Vec::new();

        for event in events {
            let Some(start) = event.get("start").and_then(|v| v.as_str()) else {
                continue;
            };
            let Ok(local) = NaiveDateTime::parse_from_str(start, "%Y-%m-%d %H:%M:%S") else {
                warn!(start, "Unparseable BVN start time; skipping entry");
                continue;
            };

            let title = event
                .get("title")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .trim();
            if title.is_empty() {
                continue;
            }

            let content = event
                .get("content")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .unwrap_or(default_description);

            let (date, hour) = self.shift.date_and_hour(local);
            if date == target_date {
                records.push(ProgramRecord {
                    date,
                    hour,
                    title: title.to_string(),
                    content: content.to_string(),
                });
            }
        }

        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::date_window::parse_start_date;
    use serde_json::json;

    fn payload() -> RawPayload {
        RawPayload::Json(json!([
            {"start": "2025-03-01 20:30:00", "title": "Journaal", "content": "Het laatste nieuws"},
            {"start": "2025-03-01 21:00:00", "title": "Documentaire", "content": ""},
            {"start": "2025-03-01 22:00:00", "title": "", "content": "geen titel"},
            {"start": "2025-03-02 09:00:00", "title": "Ochtendshow", "content": "x"}
        ]))
    }

    #[test]
    fn test_records_shift_to_target_zone_and_filter_by_date_key() {
        let processor = BvnTvDataProcessor::new();
        // 20:30 CET on 2025-03-01 is 14:30 in UTC-5, same day.
        let records = processor.process(
            &payload(),
            "Programma BVN",
            parse_start_date("2025-03-01").unwrap(),
        );
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].hour, "14:30");
        assert_eq!(records[0].title, "Journaal");
        // The 2025-03-02 entry shifts to 03:00 on its own day and is
        // filtered out for this date key.
        assert!(records.iter().all(|r| r.date == "2025-03-01"));
    }

    #[test]
    fn test_empty_synopsis_falls_back_to_default() {
        let processor = BvnTvDataProcessor::new();
        let records = processor.process(
            &payload(),
            "Programma BVN",
            parse_start_date("2025-03-01").unwrap(),
        );
        assert_eq!(records[1].content, "Programma BVN");
    }

    #[test]
    fn test_untitled_entries_are_dropped() {
        let processor = BvnTvDataProcessor::new();
        let records = processor.process(
            &payload(),
            "Programma BVN",
            parse_start_date("2025-03-01").unwrap(),
        );
        assert!(records.iter().all(|r| !r.title.is_empty()));
    }

    #[test]
    fn test_non_array_payload_yields_nothing() {
        let processor = BvnTvDataProcessor::new();
        let records = processor.process(
            &RawPayload::Text("<html>".to_string()),
            "d",
            parse_start_date("2025-03-01").unwrap(),
        );
        assert!(records.is_empty());
    }
}
