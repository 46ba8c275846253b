//! The composition root for one channel run.
//!
//! An orchestrator owns a channel's configuration and its three plug-ins,
//! and drives `GENERATE_URLS → (FETCH → PROCESS → AGGREGATE)* → DEDUP →
//! SERIALIZE` to completion. Plain channels fill one bucket; fan-out
//! channels repeat the fetch/process step once per sub-channel identifier
//! and write one file per sub-channel.
//!
//! Fetching is strictly sequential in URL-generation order. A URL whose
//! fetch reports absence contributes nothing and the run continues; a bucket
//! that never receives a record produces no file. Write failures are logged
//! per bucket and never abort the remaining buckets.

use std::error::Error;

use chrono::NaiveDate;
use tracing::{debug, error, info};

use crate::config::ChannelConfig;
use crate::core::aggregator::Aggregator;
use crate::core::dedup::{remove_duplicates, DedupPolicy};
use crate::core::fetcher::DataFetcher;
use crate::core::processor::DataProcessor;
use crate::core::url_generator::{UrlFormatter, UrlGenerator};
use crate::core::writer;

/// Drives the full pipeline for one channel (or each of its sub-channels).
pub struct Orchestrator<F, D, P> {
    config: ChannelConfig,
    formatter: F,
    fetcher: D,
    processor: P,
    dedup_policy: DedupPolicy,
}

impl<F, D, P> Orchestrator<F, D, P>
where
    F: UrlFormatter,
    D: DataFetcher,
    P: DataProcessor,
{
    pub fn new(config: ChannelConfig, formatter: F, fetcher: D, processor: P) -> Self {
        let dedup_policy = config.dedup_policy;
        Self {
            config,
            formatter,
            fetcher,
            processor,
            dedup_policy,
        }
    }

    /// Run the pipeline for the date window centered on `start`.
    pub async fn run(
        &self,
        start: NaiveDate,
        days_range: i64,
        replacements: &[(String, String)],
    ) -> Result<(), Box<dyn Error>> {
        let generator = UrlGenerator::new(&self.config.url, &self.formatter);
        let urls = generator.request_urls(start, days_range);
        info!(urls = urls.len(), "Generated request URLs");

        let mut aggregator = Aggregator::new();

        if self.config.sub_channels.is_empty() {
            let file_name = self
                .config
                .file_name
                .as_deref()
                .ok_or("channel config missing file_name")?;
            let default_description = self
                .config
                .default_description
                .as_deref()
                .ok_or("channel config missing default_description")?;

            for request in &urls {
                debug!(url = %request.url, date = %request.date, "Processing URL");
                if let Some(payload) = self.fetcher.fetch(&request.url).await {
                    let records =
                        self.processor
                            .process(&payload, default_description, request.date);
                    aggregator.append(file_name, records);
                }
            }
        } else {
            for request in &urls {
                for sub in &self.config.sub_channels {
                    let sub_url = format!("{}{}", request.url, sub.id);
                    debug!(url = %sub_url, sub_channel = %sub.file_name, "Processing sub-channel URL");
                    if let Some(payload) = self.fetcher.fetch(&sub_url).await {
                        let records = self.processor.process(
                            &payload,
                            &sub.default_description,
                            request.date,
                        );
                        aggregator.append(&sub.file_name, records);
                    }
                }
            }
        }

        let buckets = remove_duplicates(aggregator.into_buckets(), self.dedup_policy);
        info!(buckets = buckets.len(), "Aggregation complete");

        for (file_name, bucket) in &buckets {
            if let Err(e) =
                writer::save_bucket(file_name, bucket, replacements, &self.config.output_path).await
            {
                error!(file = %file_name, error = %e, "Failed to write listing file");
            }
        }

        Ok(())
    }
}
