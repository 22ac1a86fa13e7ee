use std::sync::Arc;
use std::time::Duration;

use udfeed_core::{
    FailoverGate, HistoryCache, HistoryResolver, HttpClient, QuandlHistoryProvider, QuoteResolver,
    SymbolStore, YahooHistoryProvider, YahooMetadataProvider, YqlQuoteProvider,
};

use crate::config::ServerConfig;

/// Shared application state, passed to route handlers via `axum::extract::State`.
pub struct AppState {
    pub config: ServerConfig,
    pub store: Arc<dyn SymbolStore>,
    pub history: HistoryResolver,
    pub quotes: QuoteResolver,
    pub metadata: YahooMetadataProvider,
    pub gate: Arc<FailoverGate>,
    pub cache: HistoryCache,
    pub http: Arc<dyn HttpClient>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        store: Arc<dyn SymbolStore>,
        http: Arc<dyn HttpClient>,
    ) -> Arc<Self> {
        let timeout_ms = config.fetch_timeout_ms;
        let gate = Arc::new(FailoverGate::new(Duration::from_secs(config.cooldown_secs)));
        let cache = HistoryCache::new();

        let primary = Arc::new(
            YahooHistoryProvider::new(http.clone(), timeout_ms).with_host(&config.history_host),
        );
        let secondary = Arc::new(
            QuandlHistoryProvider::new(http.clone(), config.quandl_api_key.clone(), timeout_ms)
                .with_host(&config.quandl_host),
        );
        let history =
            HistoryResolver::new(store.clone(), primary, secondary, gate.clone(), cache.clone());

        let quotes = QuoteResolver::new(Arc::new(
            YqlQuoteProvider::new(http.clone(), timeout_ms).with_host(&config.quote_host),
        ));

        let metadata =
            YahooMetadataProvider::new(http.clone(), timeout_ms).with_host(&config.metadata_host);

        Arc::new(Self {
            config,
            store,
            history,
            quotes,
            metadata,
            gate,
            cache,
            http,
        })
    }
}
