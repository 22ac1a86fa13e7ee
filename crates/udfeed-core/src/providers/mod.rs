//! Upstream provider adapters and the seams the resolvers call them through.

pub mod quandl;
pub mod yahoo;

pub use quandl::QuandlHistoryProvider;
pub use yahoo::{ChartMeta, YahooHistoryProvider, YahooMetadataProvider, YqlQuoteProvider};

use std::future::Future;
use std::pin::Pin;

use time::{Date, OffsetDateTime};

use crate::domain::Resolution;
use crate::http_client::FetchError;
use crate::FeedError;

/// Calendar window of a history request, normalized to UTC days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    pub fn from_unix(from: i64, to: i64) -> Result<Self, FeedError> {
        let start = unix_to_date(from).ok_or(FeedError::InvalidRange { from, to })?;
        let end = unix_to_date(to).ok_or(FeedError::InvalidRange { from, to })?;
        Ok(Self { start, end })
    }

    /// `Y-M-D` with a 1-indexed month, used for cache keys and the secondary
    /// provider's date filters.
    pub fn start_ymd(&self) -> String {
        format_ymd(self.start)
    }

    pub fn end_ymd(&self) -> String {
        format_ymd(self.end)
    }
}

fn unix_to_date(seconds: i64) -> Option<Date> {
    OffsetDateTime::from_unix_timestamp(seconds)
        .ok()
        .map(|datetime| datetime.date())
}

fn format_ymd(date: Date) -> String {
    format!("{}-{}-{}", date.year(), date.month() as u8, date.day())
}

/// One history fetch against a specific provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Provider-facing symbol, the store's canonical name.
    pub symbol: String,
    pub range: DateRange,
    pub resolution: Resolution,
}

pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<String, FetchError>> + Send + 'a>>;

/// Seam between the history resolver and a provider tier. Implementations
/// perform exactly one outbound request and never retry.
pub trait HistoryFetcher: Send + Sync {
    fn fetch<'a>(&'a self, query: &'a HistoryQuery) -> FetchFuture<'a>;
}

/// Seam between the quote resolver and the quote provider: one batched call
/// for all bare symbols.
pub trait QuoteFetcher: Send + Sync {
    fn fetch_quotes<'a>(&'a self, symbols: &'a [String]) -> FetchFuture<'a>;
}
