//! MeTV Toons source.
//!
//! A server-rendered schedule page per day at `{base}{YYYY-MM-DD}/`. The
//! page shows the currently airing program in its own section followed by
//! the remaining slots as `div.sched-item` rows; times are a 12-hour clock
//! in US Eastern. The upstream serves this page unreliably, so the channel
//! is wired to the retrying fetcher.

use chrono::{FixedOffset, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::core::processor::{DataProcessor, ZoneShift};
use crate::models::{ProgramRecord, RawPayload};

static CLOCK_12H: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2}:\d{2})\s*(am|pm)").expect("valid regex"));

/// Convert a raw `6:00am ET`-style string to `HH:MM`.
fn to_24h(raw: &str) -> Option<String> {
    let lowered = raw.to_lowercase();
    let captures = CLOCK_12H.captures(&lowered)?;
    let time = NaiveTime::parse_from_str(&format!("{}{}", &captures[1], &captures[2]), "%I:%M%p")
        .ok()?;
    Some(time.format("%H:%M").to_string())
}

/// Joined text of the first element matching `selector` under `scope`.
fn text_of(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope.select(selector).next().map(|element| {
        element
            .text()
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    })
}

pub struct MeTvToonsDataProcessor {
    shift: ZoneShift,
}

impl MeTvToonsDataProcessor {
    pub fn new() -> Self {
        Self {
            shift: ZoneShift::from_source(
                FixedOffset::west_opt(5 * 3600).expect("offset in range"),
            ),
        }
    }

    fn record(
        &self,
        date_key: NaiveDate,
        hour: Option<String>,
        title: Option<String>,
        episode: Option<String>,
        description: Option<String>,
        default_description: &str,
    ) -> Option<ProgramRecord> {
        let title = title.filter(|t| !t.is_empty())?;
        let hour = hour?;
        let time = NaiveTime::parse_from_str(&format!("{hour}:00"), "%H:%M:%S").ok()?;

        let episode = episode.filter(|s| !s.is_empty());
        let description = description.filter(|s| !s.is_empty());
        let content = match (episode, description) {
            (Some(episode), Some(description)) => format!("{episode} - {description}"),
            (None, Some(description)) => description,
            (Some(episode), None) => episode,
            (None, None) => default_description.to_string(),
        };

        let (date, hour) = self.shift.date_and_hour(date_key.and_time(time));
        Some(ProgramRecord {
            date,
            hour,
            title,
            content,
        })
    }
}

impl DataProcessor for MeTvToonsDataProcessor {
    fn process(
        &self,
        payload: &RawPayload,
        default_description: &str,
        date_key: NaiveDate,
    ) -> Vec<ProgramRecord> {
        let Some(html) = payload.as_text() else {
            warn!("MeTV Toons payload was not text; skipping");
            return Vec::new();
        };

        let document = Html::parse_document(html);
        let container_selector = Selector::parse("#schedule_container").expect("valid selector");
        let current_selector =
            Selector::parse("section.current-show-wrapper").expect("valid selector");
        let current_time = Selector::parse(".sched-show-title").expect("valid selector");
        let current_title = Selector::parse(".current-show-title").expect("valid selector");
        let current_episode = Selector::parse(".current-episode-title").expect("valid selector");
        let item_selector = Selector::parse("div.sched-item").expect("valid selector");
        let item_time = Selector::parse(".sched-show-time").expect("valid selector");
        let item_title = Selector::parse(".sched-show-name").expect("valid selector");
        let item_episode = Selector::parse(".sched-episode-title").expect("valid selector");
        let paragraph = Selector::parse("p").expect("valid selector");

        let Some(container) = document.select(&container_selector).next() else {
            warn!("No schedule container in MeTV Toons page");
            return Vec::new();
        };

        let mut records = Vec::new();

        // The currently airing show carries its start time inside its
        // header line.
        if let Some(current) = container.select(&current_selector).next() {
            let hour = text_of(current, &current_time).and_then(|raw| to_24h(&raw));
            if let Some(record) = self.record(
                date_key,
                hour,
                text_of(current, &current_title),
                text_of(current, &current_episode),
                text_of(current, &paragraph),
                default_description,
            ) {
                records.push(record);
            }
        }

        for item in container.select(&item_selector) {
            let hour = text_of(item, &item_time).and_then(|raw| to_24h(&raw));
            if let Some(record) = self.record(
                date_key,
                hour,
                text_of(item, &item_title),
                text_of(item, &item_episode),
                text_of(item, &paragraph),
                default_description,
            ) {
                records.push(record);
            }
        }

        records
    }
}
