//! Payload retrieval.
//!
//! A [`DataFetcher`] retrieves one raw payload per request URL. Transport
//! failure is never an error to the pipeline: fetchers log what went wrong
//! and report absence, and the orchestrator simply skips that URL.
//!
//! Two implementations ship here:
//! - [`HttpFetcher`]: a single-attempt GET; the payload variant is chosen by
//!   the response `Content-Type`
//! - [`RetryingFetcher`]: a decorator adding a fixed number of attempts with
//!   a fixed delay, for sources whose upstream drops requests routinely

use std::error::Error;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::models::RawPayload;
use crate::utils::truncate_for_log;

/// Retrieves one raw payload per request URL, or signals absence.
///
/// Implementations own their retry/backoff policy; the orchestrator never
/// retries above this layer.
pub trait DataFetcher {
    async fn fetch(&self, url: &str) -> Option<RawPayload>;
}

/// Single-attempt HTTP GET fetcher.
///
/// Static per-channel headers are baked into the client at construction.
/// A response with an `application/json` content type is parsed into
/// [`RawPayload::Json`]; anything else is returned as text.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(headers: &[(String, String)]) -> Result<Self, Box<dyn Error>> {
        let mut header_map = HeaderMap::new();
        for (name, value) in headers {
            header_map.insert(
                HeaderName::from_bytes(name.as_bytes())?,
                HeaderValue::from_str(value)?,
            );
        }
        let client = reqwest::Client::builder()
            .default_headers(header_map)
            .build()?;
        Ok(Self { client })
    }

    async fn try_fetch(&self, url: &str) -> Result<RawPayload, Box<dyn Error>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|content_type| content_type.contains("application/json"));

        if is_json {
            Ok(RawPayload::Json(response.json().await?))
        } else {
            Ok(RawPayload::Text(response.text().await?))
        }
    }
}

impl DataFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Option<RawPayload> {
        match self.try_fetch(url).await {
            Ok(payload) => {
                if let RawPayload::Text(body) = &payload {
                    debug!(%url, preview = %truncate_for_log(body, 200), "Fetched text payload");
                }
                info!(%url, "Retrieved data");
                Some(payload)
            }
            Err(e) => {
                error!(%url, error = %e, "Error retrieving data");
                None
            }
        }
    }
}

/// Decorator that retries an inner fetcher a fixed number of times with a
/// fixed delay between attempts.
pub struct RetryingFetcher<F> {
    inner: F,
    max_attempts: usize,
    delay: Duration,
}

impl<F: DataFetcher> RetryingFetcher<F> {
    pub fn new(inner: F, max_attempts: usize, delay: Duration) -> Self {
        Self {
            inner,
            max_attempts,
            delay,
        }
    }
}

impl<F: DataFetcher> DataFetcher for RetryingFetcher<F> {
    async fn fetch(&self, url: &str) -> Option<RawPayload> {
        for attempt in 1..=self.max_attempts {
            debug!(attempt, max = self.max_attempts, %url, "Fetching");
            if let Some(payload) = self.inner.fetch(url).await {
                return Some(payload);
            }
            if attempt < self.max_attempts {
                warn!(attempt, max = self.max_attempts, %url, "Attempt failed; waiting before retry");
                sleep(self.delay).await;
            }
        }
        error!(attempts = self.max_attempts, %url, "Failed to fetch data after all attempts");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails `failures` times, then yields a payload.
    struct FlakyFetcher {
        failures: usize,
        calls: AtomicUsize,
    }

    impl DataFetcher for FlakyFetcher {
        async fn fetch(&self, _url: &str) -> Option<RawPayload> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                None
            } else {
                Some(RawPayload::Text("ok".to_string()))
            }
        }
    }

    #[tokio::test]
    async fn test_retrying_fetcher_recovers_within_budget() {
        let fetcher = RetryingFetcher::new(
            FlakyFetcher {
                failures: 2,
                calls: AtomicUsize::new(0),
            },
            3,
            Duration::from_millis(1),
        );
        let payload = fetcher.fetch("https://example.com/").await;
        assert!(matches!(payload, Some(RawPayload::Text(t)) if t == "ok"));
    }

    #[tokio::test]
    async fn test_retrying_fetcher_reports_absence_after_exhaustion() {
        let fetcher = RetryingFetcher::new(
            FlakyFetcher {
                failures: 5,
                calls: AtomicUsize::new(0),
            },
            3,
            Duration::from_millis(1),
        );
        assert!(fetcher.fetch("https://example.com/").await.is_none());
        assert_eq!(fetcher.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_http_fetcher_rejects_malformed_headers() {
        let headers = vec![("bad header name".to_string(), "value".to_string())];
        assert!(HttpFetcher::new(&headers).is_err());
    }
}
