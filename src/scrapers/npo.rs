//! NPO guide source (fan-out).
//!
//! One guide API multiplexes the NPO1/NPO2/NPO3 streams: the formatter
//! produces `{base}{DD-MM-YYYY}&guid=` and the orchestrator appends each
//! sub-channel's identifier. Payloads carry epoch `programStart` timestamps,
//! in seconds or milliseconds depending on the backend, read as Amsterdam
//! local time.

use chrono::{FixedOffset, NaiveDate};
use tracing::warn;

use crate::core::processor::{DataProcessor, ZoneShift};
use crate::core::url_generator::{FormattedUrls, UrlFormatter};
use crate::models::{ProgramRecord, RawPayload};

/// `{base}{DD-MM-YYYY}&guid=`; the sub-channel id completes the URL.
pub struct NpoUrlFormatter;

impl UrlFormatter for NpoUrlFormatter {
    fn format_url(&self, date: NaiveDate, base_url: &str) -> FormattedUrls {
        FormattedUrls::Single(format!("{base_url}{}&guid=", date.format("%d-%m-%Y")))
    }
}

pub struct NpoDataProcessor {
    shift: ZoneShift,
}

impl NpoDataProcessor {
    pub fn new() -> Self {
        Self {
            shift: ZoneShift::from_source(FixedOffset::east_opt(3600).expect("offset in range")),
        }
    }
}

impl DataProcessor for NpoDataProcessor {
    fn process(
        &self,
        payload: &RawPayload,
        default_description: &str,
        _date_key: NaiveDate,
    ) -> Vec<ProgramRecord> {
        let Some(programs) = payload.as_json().and_then(|v| v.as_array()) else {
            warn!("NPO payload was not a JSON array; skipping");
            return Vec::new();
        };

        let mut records = Vec::new();

        for program in programs {
            let title = program
                .get("mainTitle")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .trim();
            if title.is_empty() {
                continue;
            }

            let Some(mut start) = program.get("programStart").and_then(|v| v.as_i64()) else {
                continue;
            };
            // Some backends report milliseconds.
            if start > 10_i64.pow(10) {
                start /= 1000;
            }
            let Some(shifted) = self.shift.epoch_to_target(start) else {
                continue;
            };

            let content = program
                .get("synopsis")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .unwrap_or(default_description);

            records.push(ProgramRecord {
                date: shifted.format("%Y-%m-%d").to_string(),
                hour: shifted.format("%H:%M").to_string(),
                title: title.to_string(),
                content: content.to_string(),
            });
        }

        records
    }
}
