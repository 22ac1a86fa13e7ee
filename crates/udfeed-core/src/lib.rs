//! Core contracts for udfeed.
//!
//! This crate contains:
//! - UDF wire types (series, quote batches, symbol descriptors)
//! - Upstream provider fetchers and payload converters
//! - The primary/secondary history resolution with its failover gate
//! - The bulk-cleared secondary history cache

pub mod cache;
pub mod convert;
pub mod domain;
pub mod error;
pub mod gate;
pub mod history;
pub mod http_client;
pub mod providers;
pub mod quotes;
pub mod symbols;

pub use cache::HistoryCache;
pub use domain::{
    Bar, QuoteBatch, QuoteEntry, QuoteStatus, QuoteValues, Resolution, Series, SeriesStatus,
    TickerLabel, UdfSeries,
};
pub use error::{FeedError, StoreError};
pub use gate::{FailoverGate, GateState};
pub use history::HistoryResolver;
pub use http_client::{
    fetch_body, FetchError, HttpClient, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient, DEFAULT_FETCH_TIMEOUT_MS,
};
pub use providers::{
    ChartMeta, DateRange, HistoryFetcher, HistoryQuery, QuandlHistoryProvider, QuoteFetcher,
    YahooHistoryProvider, YahooMetadataProvider, YqlQuoteProvider,
};
pub use quotes::QuoteResolver;
pub use symbols::{SymbolInfo, SymbolMatch, SymbolStore};
