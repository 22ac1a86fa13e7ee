//! Yahoo-facing adapters: CSV history, batched YQL quotes, and instrument
//! metadata.

use std::sync::Arc;

use serde::Deserialize;

use crate::http_client::{fetch_body, FetchError, HttpClient, HttpRequest};

use super::{FetchFuture, HistoryFetcher, HistoryQuery, QuoteFetcher};

pub const DEFAULT_HISTORY_HOST: &str = "ichart.finance.yahoo.com";
pub const DEFAULT_QUOTE_HOST: &str = "query.yahooapis.com";
pub const DEFAULT_METADATA_HOST: &str = "chartapi.finance.yahoo.com";

/// Primary history tier: the `table.csv` daily/weekly/monthly endpoint.
///
/// The endpoint's `a`/`d` month parameters are 0-indexed; that is this
/// provider's own URL convention, not a normalization choice of ours.
pub struct YahooHistoryProvider {
    host: String,
    client: Arc<dyn HttpClient>,
    timeout_ms: u64,
}

impl YahooHistoryProvider {
    pub fn new(client: Arc<dyn HttpClient>, timeout_ms: u64) -> Self {
        Self {
            host: DEFAULT_HISTORY_HOST.to_owned(),
            client,
            timeout_ms,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    fn url_for(&self, query: &HistoryQuery) -> String {
        let start = query.range.start;
        let end = query.range.end;
        format!(
            "https://{}/table.csv?s={}&a={}&b={}&c={}&d={}&e={}&f={}&g={}&ignore=.csv",
            self.host,
            urlencoding::encode(&query.symbol),
            start.month() as u8 - 1,
            start.day(),
            start.year(),
            end.month() as u8 - 1,
            end.day(),
            end.year(),
            query.resolution.as_str(),
        )
    }
}

impl HistoryFetcher for YahooHistoryProvider {
    fn fetch<'a>(&'a self, query: &'a HistoryQuery) -> FetchFuture<'a> {
        Box::pin(async move {
            let url = self.url_for(query);
            tracing::debug!(%url, "requesting primary history");
            fetch_body(
                self.client.as_ref(),
                HttpRequest::get(url).with_timeout_ms(self.timeout_ms),
            )
            .await
        })
    }
}

/// Batched realtime quotes via a YQL-style query endpoint. One call covers
/// the whole requested symbol list; there is no per-symbol retry.
pub struct YqlQuoteProvider {
    host: String,
    client: Arc<dyn HttpClient>,
    timeout_ms: u64,
}

impl YqlQuoteProvider {
    pub fn new(client: Arc<dyn HttpClient>, timeout_ms: u64) -> Self {
        Self {
            host: DEFAULT_QUOTE_HOST.to_owned(),
            client,
            timeout_ms,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    fn url_for(&self, symbols: &[String]) -> String {
        let list = symbols
            .iter()
            .map(|symbol| format!("'{}'", symbol.replace('\'', "")))
            .collect::<Vec<_>>()
            .join(",");
        let yql = format!("select * from yahoo.finance.quotes where symbol in ({list})");
        format!(
            "https://{}/v1/public/yql?q={}&format=json&env={}",
            self.host,
            urlencoding::encode(&yql),
            urlencoding::encode("store://datatables.org/alltableswithkeys"),
        )
    }
}

impl QuoteFetcher for YqlQuoteProvider {
    fn fetch_quotes<'a>(&'a self, symbols: &'a [String]) -> FetchFuture<'a> {
        Box::pin(async move {
            let url = self.url_for(symbols);
            tracing::debug!(%url, count = symbols.len(), "requesting quote batch");
            fetch_body(
                self.client.as_ref(),
                HttpRequest::get(url).with_timeout_ms(self.timeout_ms),
            )
            .await
        })
    }
}

/// Instrument metadata parsed out of the chartdata document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChartMeta {
    #[serde(default)]
    pub previous_close: Option<f64>,
    #[serde(default)]
    pub ticker: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartDocument {
    #[serde(default)]
    meta: Option<ChartMeta>,
}

/// Metadata tier used to enrich `/symbols` descriptors with a price scale.
///
/// The payload is parsed as structured JSON; anything unparseable yields
/// `None` so the caller falls back to descriptor defaults. Metadata failures
/// are never allowed to fail the symbol request itself.
pub struct YahooMetadataProvider {
    host: String,
    client: Arc<dyn HttpClient>,
    timeout_ms: u64,
}

impl YahooMetadataProvider {
    pub fn new(client: Arc<dyn HttpClient>, timeout_ms: u64) -> Self {
        Self {
            host: DEFAULT_METADATA_HOST.to_owned(),
            client,
            timeout_ms,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub async fn fetch_meta(&self, symbol: &str) -> Result<Option<ChartMeta>, FetchError> {
        let url = format!(
            "https://{}/instrument/1.0/{}/chartdata;type=quote;/json",
            self.host,
            urlencoding::encode(symbol),
        );
        tracing::debug!(%url, "requesting instrument metadata");

        let body = fetch_body(
            self.client.as_ref(),
            HttpRequest::get(url).with_timeout_ms(self.timeout_ms),
        )
        .await?;

        match serde_json::from_str::<ChartDocument>(strip_jsonp(&body)) {
            Ok(document) => Ok(document.meta),
            Err(error) => {
                tracing::warn!(%error, symbol, "unparseable instrument metadata");
                Ok(None)
            }
        }
    }
}

/// The metadata endpoint historically wrapped its JSON in a callback
/// invocation; accept both the bare and the wrapped form.
fn strip_jsonp(body: &str) -> &str {
    let trimmed = body.trim();
    match (trimmed.find('('), trimmed.rfind(')')) {
        (Some(open), Some(close)) if !trimmed.starts_with('{') && open < close => {
            trimmed[open + 1..close].trim()
        }
        _ => trimmed,
    }
}
