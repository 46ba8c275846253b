//! Per-source plug-ins and the channel registry.
//!
//! Each submodule contributes the URL formatter and data processor for one
//! source; [`run_channel`] is the explicit, static registry binding a
//! channel key to its plug-ins and driving one
//! [`Orchestrator`](crate::core::orchestrator::Orchestrator) run. Available
//! channels are enumerable without touching the network.
//!
//! # Sources
//!
//! | Channel | Payload | Notes |
//! |---------|---------|-------|
//! | `bvntv` | JSON list API | day-sliced, date-key filtered |
//! | `bet` | JSON API | day-sliced, date-key filtered |
//! | `my9` | JSON grid API | hour-sliced, 24 requests per day |
//! | `npo` | JSON guide API | fan-out over three sub-channels |
//! | `gameshownetwork` | HTML page | embedded schedule blob, date-independent |
//! | `metvtoons` | HTML page | scraped schedule rows, retried fetches |
//! | `hopetv` | JSON API | encoded day parameter, retried fetches |

use std::error::Error;
use std::time::Duration;

use chrono::NaiveDate;

use crate::config::ChannelConfig;
use crate::core::fetcher::{HttpFetcher, RetryingFetcher};
use crate::core::orchestrator::Orchestrator;
use crate::core::url_generator::DefaultUrlFormatter;

pub mod bet;
pub mod bvntv;
pub mod gameshownetwork;
pub mod hopetv;
pub mod metvtoons;
pub mod my9;
pub mod npo;

/// Attempts and fixed delay for sources with flaky upstreams.
const RETRY_ATTEMPTS: usize = 3;
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// The channel keys this build can harvest.
pub fn available_channels() -> &'static [&'static str] {
    &[
        "bet",
        "bvntv",
        "gameshownetwork",
        "hopetv",
        "metvtoons",
        "my9",
        "npo",
    ]
}

/// Run the pipeline for one channel key with its registered plug-ins.
///
/// Unknown keys are a configuration failure reported to the caller; batch
/// runs skip the channel and continue.
pub async fn run_channel(
    key: &str,
    config: ChannelConfig,
    start: NaiveDate,
    days_range: i64,
    replacements: &[(String, String)],
) -> Result<(), Box<dyn Error>> {
    match key {
        "bvntv" => {
            let fetcher = HttpFetcher::new(&config.headers)?;
            Orchestrator::new(
                config,
                DefaultUrlFormatter,
                fetcher,
                bvntv::BvnTvDataProcessor::new(),
            )
            .run(start, days_range, replacements)
            .await
        }
        "bet" => {
            let fetcher = HttpFetcher::new(&config.headers)?;
            Orchestrator::new(config, bet::BetUrlFormatter, fetcher, bet::BetDataProcessor::new())
                .run(start, days_range, replacements)
                .await
        }
        "my9" => {
            let fetcher = HttpFetcher::new(&config.headers)?;
            Orchestrator::new(config, my9::My9UrlFormatter, fetcher, my9::My9DataProcessor::new())
                .run(start, days_range, replacements)
                .await
        }
        "npo" => {
            let fetcher = HttpFetcher::new(&config.headers)?;
            Orchestrator::new(config, npo::NpoUrlFormatter, fetcher, npo::NpoDataProcessor::new())
                .run(start, days_range, replacements)
                .await
        }
        "gameshownetwork" => {
            let fetcher = HttpFetcher::new(&config.headers)?;
            Orchestrator::new(
                config,
                gameshownetwork::SchedulePageUrlFormatter,
                fetcher,
                gameshownetwork::GameShowNetworkDataProcessor::new(),
            )
            .run(start, days_range, replacements)
            .await
        }
        "metvtoons" => {
            let fetcher = RetryingFetcher::new(
                HttpFetcher::new(&config.headers)?,
                RETRY_ATTEMPTS,
                RETRY_DELAY,
            );
            Orchestrator::new(
                config,
                DefaultUrlFormatter,
                fetcher,
                metvtoons::MeTvToonsDataProcessor::new(),
            )
            .run(start, days_range, replacements)
            .await
        }
        "hopetv" => {
            let fetcher = RetryingFetcher::new(
                HttpFetcher::new(&config.headers)?,
                RETRY_ATTEMPTS,
                RETRY_DELAY,
            );
            Orchestrator::new(
                config,
                hopetv::HopeTvUrlFormatter,
                fetcher,
                hopetv::HopeTvDataProcessor::new(),
            )
            .run(start, days_range, replacements)
            .await
        }
        other => Err(format!("no scraper registered for channel: {other}").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;
    use crate::core::date_window::parse_start_date;

    #[test]
    fn test_every_builtin_channel_is_registered() {
        let channels = config::builtin_channels();
        for key in channels.keys() {
            assert!(
                available_channels().contains(&key.as_str()),
                "builtin channel {key} has no registered scraper"
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_channel_is_a_configuration_error() {
        let config = config::builtin_channels()["bet"].clone();
        let result = run_channel(
            "does-not-exist",
            config,
            parse_start_date("2025-03-01").unwrap(),
            0,
            &[],
        )
        .await;
        assert!(result.is_err());
    }
}
