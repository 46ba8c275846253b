//! The generic harvesting pipeline.
//!
//! Everything under this module is source-agnostic. A channel run is the
//! composition `date window × URL formatter → fetch → process → aggregate →
//! dedup → serialize`, driven by the [`orchestrator`]. The per-source pieces
//! plug in through three narrow contracts:
//!
//! - [`url_generator::UrlFormatter`]: one calendar date → one or many request URLs
//! - [`fetcher::DataFetcher`]: one request URL → one raw payload, or nothing
//! - [`processor::DataProcessor`]: one raw payload → zero or more normalized records
//!
//! The pipeline is strictly sequential: URLs are fetched one at a time in
//! generation order, which is what makes the first-occurrence-wins dedup rule
//! and the serializer's date-header logic deterministic.

pub mod aggregator;
pub mod date_window;
pub mod dedup;
pub mod fetcher;
pub mod orchestrator;
pub mod processor;
pub mod url_generator;
pub mod writer;
