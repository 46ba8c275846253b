//! Request-URL generation over a date window.
//!
//! A [`UrlFormatter`] turns one calendar date into one or many request URLs
//! for its source; the [`UrlGenerator`] walks the whole window and flattens
//! the results into a single ordered sequence. Order is significant: it is
//! the order the orchestrator fetches in, and the order the duplicate
//! remover's first-occurrence-wins rule is defined against.

use chrono::NaiveDate;

use crate::core::date_window;

/// Maps one calendar date to the request URL(s) covering it.
///
/// One implementation per source. Most sources produce a single URL per day;
/// hour-sliced grid APIs produce 24.
pub trait UrlFormatter {
    fn format_url(&self, date: NaiveDate, base_url: &str) -> FormattedUrls;
}

/// The result of formatting one date: a single URL or an ordered batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattedUrls {
    Single(String),
    Many(Vec<String>),
}

/// The common day-sliced shape shared by several sources:
/// `{base}{YYYY-MM-DD}/`.
pub struct DefaultUrlFormatter;

impl UrlFormatter for DefaultUrlFormatter {
    fn format_url(&self, date: NaiveDate, base_url: &str) -> FormattedUrls {
        FormattedUrls::Single(format!("{base_url}{}/", date.format("%Y-%m-%d")))
    }
}

/// One request URL together with the window date it was generated for.
///
/// Carrying the date here is what lets the orchestrator hand each data
/// processor its date key without anyone re-parsing URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUrl {
    pub date: NaiveDate,
    pub url: String,
}

/// Composes a date window with a source's [`UrlFormatter`].
pub struct UrlGenerator<'a, F: UrlFormatter> {
    base_url: &'a str,
    formatter: &'a F,
}

impl<'a, F: UrlFormatter> UrlGenerator<'a, F> {
    pub fn new(base_url: &'a str, formatter: &'a F) -> Self {
        Self { base_url, formatter }
    }

    /// The flat, order-preserving sequence of request URLs for the window
    /// centered on `start` with the given day radius.
    pub fn request_urls(&self, start: NaiveDate, radius: i64) -> Vec<RequestUrl> {
        let mut urls = Vec::new();
        for date in date_window::dates(start, radius) {
            match self.formatter.format_url(date, self.base_url) {
                FormattedUrls::Single(url) => urls.push(RequestUrl { date, url }),
                FormattedUrls::Many(batch) => {
                    urls.extend(batch.into_iter().map(|url| RequestUrl { date, url }));
                }
            }
        }
        urls
    }
}
