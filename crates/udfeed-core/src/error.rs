use thiserror::Error;

use crate::http_client::FetchError;

/// Symbol store failure surfaced through the [`crate::symbols::SymbolStore`] seam.
///
/// The concrete store lives in its own crate; this keeps the core free of any
/// database dependency while still carrying the underlying message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("symbol store error: {0}")]
pub struct StoreError(pub String);

/// Top-level error type for feed resolution.
///
/// `Display` output doubles as the UDF `errmsg` payload, so variant messages
/// start with the stable error token the charting client matches on.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("unknown_symbol {0}")]
    UnknownSymbol(String),

    #[error("unsupported_resolution: {0}")]
    UnsupportedResolution(String),

    #[error("invalid date range: from={from} to={to}")]
    InvalidRange { from: i64, to: i64 },

    #[error("fetch_failure: {0}")]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
