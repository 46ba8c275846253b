//! Game Show Network source.
//!
//! The schedule lives in a server-rendered page as an embedded
//! `siteSettings.schedule = [...]` script blob. The page is
//! date-independent: every window date resolves to the same request, and the
//! duplicate remover collapses the repeated slots. Timestamps are epoch
//! seconds in UTC.

use chrono::{FixedOffset, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::core::processor::{DataProcessor, ZoneShift};
use crate::core::url_generator::{FormattedUrls, UrlFormatter};
use crate::models::{ProgramRecord, RawPayload};

static SCHEDULE_BLOB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<script[^>]*>\s*siteSettings\.schedule\s*=\s*(\[.*?\]);").expect("valid regex")
});

/// The schedule page covers the whole window; every date maps to the base
/// URL unchanged.
pub struct SchedulePageUrlFormatter;

impl UrlFormatter for SchedulePageUrlFormatter {
    fn format_url(&self, _date: NaiveDate, base_url: &str) -> FormattedUrls {
        FormattedUrls::Single(base_url.to_string())
    }
}

pub struct GameShowNetworkDataProcessor {
    shift: ZoneShift,
}

impl GameShowNetworkDataProcessor {
    pub fn new() -> Self {
        Self {
            shift: ZoneShift::from_source(FixedOffset::east_opt(0).expect("offset in range")),
        }
    }
}

impl DataProcessor for GameShowNetworkDataProcessor {
    fn process(
        &self,
        payload: &RawPayload,
        default_description: &str,
        _date_key: NaiveDate,
    ) -> Vec<ProgramRecord> {
        let Some(html) = payload.as_text() else {
            warn!("Game Show Network payload was not text; skipping");
            return Vec::new();
        };
        let Some(blob) = SCHEDULE_BLOB
            .captures(html)
            .and_then(|captures| captures.get(1))
        else {
            warn!("No embedded schedule found in Game Show Network page");
            return Vec::new();
        };
        let schedule: Vec<Value> = match serde_json::from_str(blob.as_str()) {
            Ok(schedule) => schedule,
            Err(e) => {
                warn!(error = %e, "Embedded Game Show Network schedule is not valid JSON");
                return Vec::new();
            }
        };

        let mut records = Vec::new();

        for item in schedule {
            let Some(start) = item.get("startTime").and_then(|v| v.as_i64()) else {
                continue;
            };
            let Some(title) = item
                .get("title")
                .and_then(|v| v.as_str())
                .filter(|t| !t.trim().is_empty())
            else {
                continue;
            };
            let Some(shifted) = self.shift.epoch_to_target(start) else {
                continue;
            };

            let host = item
                .get("host")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty());
            let description = item
                .get("description")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty());

            let content = match (host, description) {
                (Some(host), Some(description)) => format!("{host} - {description}"),
                (None, Some(description)) => description.to_string(),
                (Some(host), None) => host.to_string(),
                (None, None) => default_description.to_string(),
            };

            records.push(ProgramRecord {
                date: shifted.format("%Y-%m-%d").to_string(),
                hour: shifted.format("%H:%M").to_string(),
                title: title.trim().to_string(),
                content,
            });
        }

        records
    }
}
