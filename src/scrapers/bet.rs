//! BET schedule source.
//!
//! A JSON API queried once per day at `{base}{YYYYMMDD}/`, answering with a
//! `tvSchedules` array that spans more than the requested day, so records
//! are filtered to the request's date key. Air times are US Eastern
//! (standard time).

use chrono::{FixedOffset, NaiveDate};
use tracing::warn;

use crate::core::processor::{naive_wall_clock, DataProcessor, ZoneShift};
use crate::core::url_generator::{FormattedUrls, UrlFormatter};
use crate::models::{ProgramRecord, RawPayload};

/// `{base}{YYYYMMDD}/`
pub struct BetUrlFormatter;

impl UrlFormatter for BetUrlFormatter {
    fn format_url(&self, date: NaiveDate, base_url: &str) -> FormattedUrls {
        FormattedUrls::Single(format!("{base_url}{}/", date.format("%Y%m%d")))
    }
}

pub struct BetDataProcessor {
    shift: ZoneShift,
}

impl BetDataProcessor {
    pub fn new() -> Self {
        Self {
            shift: ZoneShift::from_source(
                FixedOffset::west_opt(5 * 3600).expect("offset in range"),
            ),
        }
    }
}

impl DataProcessor for BetDataProcessor {
    fn process(
        &self,
        payload: &RawPayload,
        default_description: &str,
        date_key: NaiveDate,
    ) -> Vec<ProgramRecord> {
        let Some(schedules) = payload
            .as_json()
            .and_then(|v| v.get("tvSchedules"))
            .and_then(|v| v.as_array())
        else {
            warn!("BET payload had no tvSchedules array; skipping");
            return Vec::new();
        };

        let target_date = date_key.format("%Y-%m-%d").to_string();
        let mut records = Vec::new();

        for event in schedules {
            let Some(local) = event
                .get("airTime")
                .and_then(|v| v.as_str())
                .and_then(naive_wall_clock)
            else {
                continue;
            };

            let title = event
                .get("seriesTitle")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .trim();
            if title.is_empty() {
                continue;
            }

            let episode_title = event
                .get("episodeTitle")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty());
            let synopsis = event
                .get("meta")
                .and_then(|m| m.get("description"))
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty());

            let content = match (episode_title, synopsis) {
                (Some(episode), Some(synopsis)) => format!("{episode} - {synopsis}"),
                (None, Some(synopsis)) => synopsis.to_string(),
                (Some(episode), None) => episode.to_string(),
                (None, None) => default_description.to_string(),
            };

            let (date, hour) = self.shift.date_and_hour(local);
            if date == target_date {
                records.push(ProgramRecord {
                    date,
                    hour,
                    title: title.to_string(),
                    content,
                });
            }
        }

        records
    }
}
