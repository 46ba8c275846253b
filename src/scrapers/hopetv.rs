//! Hope TV source.
//!
//! A JSON schedule API addressed per day: the formatter appends the ISO
//! date plus a percent-encoded midnight-with-offset suffix, matching what
//! the site's own frontend requests. `startsAt` instants are UTC readings
//! of US Eastern wall-clock time. The endpoint drops requests often enough
//! that the channel is wired to the retrying fetcher.

use chrono::{FixedOffset, NaiveDate};
use serde_json::Value;
use tracing::warn;

use crate::core::processor::{naive_wall_clock, DataProcessor, ZoneShift};
use crate::core::url_generator::{FormattedUrls, UrlFormatter};
use crate::models::{ProgramRecord, RawPayload};

/// `{base}{YYYY-MM-DD}` + url-encoded `T00:00:00-05:00`.
pub struct HopeTvUrlFormatter;

impl UrlFormatter for HopeTvUrlFormatter {
    fn format_url(&self, date: NaiveDate, base_url: &str) -> FormattedUrls {
        FormattedUrls::Single(format!(
            "{base_url}{}{}",
            date.format("%Y-%m-%d"),
            urlencoding::encode("T00:00:00-05:00")
        ))
    }
}

fn nested_str<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value.pointer(pointer).and_then(|v| v.as_str())
}

pub struct HopeTvDataProcessor {
    shift: ZoneShift,
}

impl HopeTvDataProcessor {
    pub fn new() -> Self {
        Self {
            shift: ZoneShift::from_source(
                FixedOffset::west_opt(5 * 3600).expect("offset in range"),
            ),
        }
    }
}

impl DataProcessor for HopeTvDataProcessor {
    fn process(
        &self,
        payload: &RawPayload,
        default_description: &str,
        _date_key: NaiveDate,
    ) -> Vec<ProgramRecord> {
        let Some(items) = payload.as_json().and_then(|v| v.as_array()) else {
            warn!("Hope TV payload was not a JSON array; skipping");
            return Vec::new();
        };

        let mut records = Vec::new();

        for item in items {
            let Some(local) = item
                .get("startsAt")
                .and_then(|v| v.as_str())
                .and_then(naive_wall_clock)
            else {
                continue;
            };

            // Older payloads carry flat titles; newer ones nest them under
            // the episode.
            let mut title = item
                .get("showTitle")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .trim();
            let mut episode_title = item.get("episodeTitle").and_then(|v| v.as_str());
            if title.is_empty() {
                title = nested_str(item, "/episode/show/title").unwrap_or("").trim();
                episode_title = nested_str(item, "/episode/title");
            }
            if title.is_empty() {
                continue;
            }

            let episode_title = episode_title.filter(|s| !s.is_empty());
            let description = item
                .get("description")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty());

            let content = match (episode_title, description) {
                (Some(episode), Some(description)) => format!("{episode} - {description}"),
                (Some(episode), None) => episode.to_string(),
                (None, Some(description)) => description.to_string(),
                (None, None) => default_description.to_string(),
            };

            let (date, hour) = self.shift.date_and_hour(local);
            records.push(ProgramRecord {
                date,
                hour,
                title: title.to_string(),
                content,
            });
        }

        records
    }
}
