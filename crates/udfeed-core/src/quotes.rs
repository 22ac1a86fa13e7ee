//! Quote resolution: one batched upstream call per request.

use std::sync::Arc;

use crate::convert::convert_quote_batch;
use crate::domain::{QuoteBatch, TickerLabel};
use crate::providers::QuoteFetcher;

pub struct QuoteResolver {
    fetcher: Arc<dyn QuoteFetcher>,
}

impl QuoteResolver {
    pub fn new(fetcher: Arc<dyn QuoteFetcher>) -> Self {
        Self { fetcher }
    }

    /// Resolve a comma-separated list of `EXCHANGE:SYMBOL` labels.
    ///
    /// The upstream is asked once for the deduplicated bare symbols; entries
    /// come back in request order. A failed fetch degrades to a batch-level
    /// error envelope rather than an HTTP failure.
    pub async fn quotes(&self, symbols_csv: &str) -> QuoteBatch {
        let requested: Vec<TickerLabel> = symbols_csv
            .split(',')
            .filter(|piece| !piece.trim().is_empty())
            .map(TickerLabel::parse)
            .collect();

        if requested.is_empty() {
            return QuoteBatch::error("no symbols requested");
        }

        let mut bare: Vec<String> = Vec::with_capacity(requested.len());
        for label in &requested {
            if !bare.iter().any(|existing| existing == label.bare()) {
                bare.push(label.bare().to_owned());
            }
        }

        match self.fetcher.fetch_quotes(&bare).await {
            Ok(body) => convert_quote_batch(&requested, &body),
            Err(error) => {
                tracing::warn!(%error, count = requested.len(), "quote fetch failed");
                QuoteBatch::error(format!("quote fetch failed: {error}"))
            }
        }
    }
}
