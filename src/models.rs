//! Data models shared across the pipeline.
//!
//! This module defines the two types every stage of the pipeline speaks:
//! - [`ProgramRecord`]: one normalized broadcast slot, the unit the
//!   aggregator, duplicate remover, and serializer operate on
//! - [`RawPayload`]: the untyped body a fetcher hands to a data processor,
//!   either parsed JSON or raw text depending on the response content type

use serde_json::Value;

/// One scheduled broadcast slot, normalized into the pipeline's canonical
/// target time zone.
///
/// Records are produced by the per-source data processors and are opaque to
/// the core: `date` and `hour` drive ordering and deduplication, `title` and
/// `content` are free text cleaned up by the serializer on write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramRecord {
    /// Calendar date, ISO `YYYY-MM-DD`, target time zone.
    pub date: String,
    /// Time of day, 24-hour `HH:MM`, target time zone.
    pub hour: String,
    /// Display title. Processors drop records without a usable one.
    pub title: String,
    /// Synopsis text; the per-channel default description when the source
    /// has none.
    pub content: String,
}

/// A raw payload as retrieved by a [`DataFetcher`](crate::core::fetcher::DataFetcher).
///
/// HTTP fetchers pick the variant from the response `Content-Type`; JSON APIs
/// yield [`RawPayload::Json`], scraped pages yield [`RawPayload::Text`].
#[derive(Debug, Clone)]
pub enum RawPayload {
    /// A parsed JSON document.
    Json(Value),
    /// Plain text or HTML.
    Text(String),
}

impl RawPayload {
    /// The parsed JSON document, if this payload is JSON.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            RawPayload::Json(value) => Some(value),
            RawPayload::Text(_) => None,
        }
    }

    /// The raw text body, if this payload is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawPayload::Json(_) => None,
            RawPayload::Text(text) => Some(text),
        }
    }
}
