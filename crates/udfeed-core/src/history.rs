//! History resolution across the primary and secondary tiers.
//!
//! While the failover gate is closed, the symbol is resolved against the
//! store and the primary tier is tried first; a failed primary fetch opens
//! the gate and falls through to the secondary tier. While the gate is open
//! the request goes straight to the secondary tier with the raw request
//! symbol, skipping the store entirely. Secondary payloads are cached per
//! symbol and range, and a secondary fetch failure is terminal for the
//! request.

use std::sync::Arc;

use crate::cache::HistoryCache;
use crate::convert::{convert_primary_history, convert_secondary_history};
use crate::domain::Resolution;
use crate::error::FeedError;
use crate::gate::FailoverGate;
use crate::providers::{DateRange, HistoryFetcher, HistoryQuery};
use crate::symbols::SymbolStore;

pub struct HistoryResolver {
    store: Arc<dyn SymbolStore>,
    primary: Arc<dyn HistoryFetcher>,
    secondary: Arc<dyn HistoryFetcher>,
    gate: Arc<FailoverGate>,
    cache: HistoryCache,
}

impl HistoryResolver {
    pub fn new(
        store: Arc<dyn SymbolStore>,
        primary: Arc<dyn HistoryFetcher>,
        secondary: Arc<dyn HistoryFetcher>,
        gate: Arc<FailoverGate>,
        cache: HistoryCache,
    ) -> Self {
        Self {
            store,
            primary,
            secondary,
            gate,
            cache,
        }
    }

    /// Serialized UDF history payload for one symbol and range. The caller
    /// has already validated the resolution.
    pub async fn history(
        &self,
        symbol: &str,
        from: i64,
        to: i64,
        resolution: Resolution,
    ) -> Result<String, FeedError> {
        let range = DateRange::from_unix(from, to)?;

        if !self.gate.allow_primary() {
            tracing::debug!(symbol, "failover gate open, skipping primary tier");
            let query = HistoryQuery {
                symbol: symbol.to_owned(),
                range,
                resolution,
            };
            return self.secondary_history(&query).await;
        }

        let info = self
            .store
            .lookup(symbol)?
            .ok_or_else(|| FeedError::UnknownSymbol(symbol.to_owned()))?;
        let query = HistoryQuery {
            symbol: info.name,
            range,
            resolution,
        };

        match self.primary.fetch(&query).await {
            Ok(body) => {
                let series = convert_primary_history(&body);
                tracing::debug!(symbol, bars = series.bars.len(), "served primary history");
                Ok(series.to_payload()?)
            }
            Err(error) => {
                tracing::warn!(symbol, %error, "primary history failed, opening failover gate");
                self.gate.record_failure();
                self.secondary_history(&query).await
            }
        }
    }

    async fn secondary_history(&self, query: &HistoryQuery) -> Result<String, FeedError> {
        let key = format!(
            "{}|{}|{}",
            query.symbol,
            query.range.start_ymd(),
            query.range.end_ymd()
        );

        if let Some(payload) = self.cache.get(&key).await {
            tracing::debug!(symbol = %query.symbol, "served secondary history from cache");
            return Ok(payload);
        }

        let body = self.secondary.fetch(query).await?;
        let series = convert_secondary_history(&body);
        let payload = series.to_payload()?;
        self.cache.insert(key, payload.clone()).await;
        tracing::debug!(symbol = %query.symbol, bars = series.bars.len(), "served secondary history");
        Ok(payload)
    }
}
