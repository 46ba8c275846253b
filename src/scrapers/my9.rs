//! MY9 (TitanTV grid) source.
//!
//! The grid API serves one hour of listings per request, so the formatter
//! expands every window date into 24 URLs, `{base}{YYYYMMDD}{HHMM}/`. Each
//! payload inherently covers its own slice, so no date-key filtering is
//! needed; the overlap between consecutive slices is collapsed by the
//! duplicate remover.

use chrono::{FixedOffset, NaiveDate};
use serde_json::Value;
use tracing::warn;

use crate::core::processor::{naive_wall_clock, DataProcessor, ZoneShift};
use crate::core::url_generator::{FormattedUrls, UrlFormatter};
use crate::models::{ProgramRecord, RawPayload};

/// `{base}{YYYYMMDD}{HHMM}/` for each hour of the day.
pub struct My9UrlFormatter;

impl UrlFormatter for My9UrlFormatter {
    fn format_url(&self, date: NaiveDate, base_url: &str) -> FormattedUrls {
        let compact = date.format("%Y%m%d");
        FormattedUrls::Many(
            (0..24)
                .map(|hour| format!("{base_url}{compact}{hour:02}00/"))
                .collect(),
        )
    }
}

/// First localized text of a TitanTV `[{"Text": …}]` field.
fn first_text(event: &Value, field: &str) -> Option<String> {
    event
        .get(field)?
        .as_array()?
        .first()?
        .get("Text")?
        .as_str()
        .map(str::to_string)
}

pub struct My9DataProcessor {
    shift: ZoneShift,
}

impl My9DataProcessor {
    pub fn new() -> Self {
        Self {
            shift: ZoneShift::from_source(
                FixedOffset::west_opt(5 * 3600).expect("offset in range"),
            ),
        }
    }
}

impl DataProcessor for My9DataProcessor {
    fn process(
        &self,
        payload: &RawPayload,
        default_description: &str,
        _date_key: NaiveDate,
    ) -> Vec<ProgramRecord> {
        let Some(shows) = payload
            .as_json()
            .and_then(|v| v.pointer("/Json/Channels/0/Days/0/Shows"))
            .and_then(|v| v.as_array())
        else {
            warn!("MY9 payload had no show list; skipping");
            return Vec::new();
        };

        let mut records = Vec::new();

        for show in shows {
            let Some(local) = show
                .get("StartTime")
                .and_then(|v| v.as_str())
                .and_then(naive_wall_clock)
            else {
                continue;
            };

            let Some(title) = first_text(show, "Title").filter(|t| !t.trim().is_empty()) else {
                continue;
            };
            if title == "No Programming Available" {
                continue;
            }

            let episode_title = first_text(show, "EpisodeTitle").filter(|s| !s.is_empty());
            let synopsis = first_text(show, "Description").filter(|s| !s.is_empty());

            let content = match (episode_title, synopsis) {
                (Some(episode), Some(synopsis)) => format!("{episode} - {synopsis}"),
                (None, Some(synopsis)) => synopsis,
                (Some(episode), None) => episode,
                (None, None) => default_description.to_string(),
            };

            let (date, hour) = self.shift.date_and_hour(local);
            records.push(ProgramRecord {
                date,
                hour,
                title,
                content,
            });
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
        RawPayload::Json(json!({"Json": {"Channels": [{"Days": [{"Shows": [
            {
                "StartTime": "2025-03-01T14:00:00",
                "Title": [{"Text": "Judge Court"}],
                "EpisodeTitle": [{"Text": "Case 42"}],
                "Description": [{"Text": "A dispute over a fence."}]
            },
            {
                "StartTime": "2025-03-01T15:00:00",
                "Title": [{"Text": "No Programming Available"}]
            },
            {
                "StartTime": "2025-03-01T16:00:00",
                "Title": [{"Text": "Plain Show"}]
            }
        ]}]}]}}))
    }

    #[test]
    fn test_formatter_expands_one_date_into_24_urls() {
        let date = parse_start_date("2025-03-01").unwrap();
        let FormattedUrls::Many(urls) = My9UrlFormatter.format_url(date, "https://grid/") else {
            panic!("expected hourly batch");
        };
        assert_eq!(urls.len(), 24);
        assert_eq!(urls[0], "https://grid/202503010000/");
        assert_eq!(urls[13], "https://grid/202503011300/");
        assert_eq!(urls[23], "https://grid/202503012300/");
    }

    #[test]
    fn test_nested_show_list_is_extracted() {
        let processor = My9DataProcessor::new();
        let records = processor.process(
            &payload(),
            "Programma My9",
            parse_start_date("2025-03-01").unwrap(),
        );
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Judge Court");
        assert_eq!(records[0].content, "Case 42 - A dispute over a fence.");
        assert_eq!(records[0].hour, "14:00");
    }

    #[test]
    fn test_placeholder_slots_are_skipped() {
        let processor = My9DataProcessor::new();
        let records = processor.process(
            &payload(),
            "Programma My9",
            parse_start_date("2025-03-01").unwrap(),
        );
        assert!(records.iter().all(|r| r.title != "No Programming Available"));
    }

    #[test]
    fn test_bare_show_falls_back_to_default_description() {
        let processor = My9DataProcessor::new();
        let records = processor.process(
            &payload(),
            "Programma My9",
            parse_start_date("2025-03-01").unwrap(),
        );
        assert_eq!(records[1].title, "Plain Show");
        assert_eq!(records[1].content, "Programma My9");
    }
}
