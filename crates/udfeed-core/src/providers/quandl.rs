//! Secondary history tier: the Quandl WIKI/PRICES datatable endpoint.

use std::sync::Arc;

use crate::http_client::{fetch_body, HttpClient, HttpRequest};

use super::{FetchFuture, HistoryFetcher, HistoryQuery};

pub const DEFAULT_QUANDL_HOST: &str = "www.quandl.com";

/// Fetches daily bars from the datatable API. The endpoint only serves daily
/// rows, so weekly and monthly requests are issued in daily granularity and
/// left to the chart library to aggregate.
pub struct QuandlHistoryProvider {
    host: String,
    api_key: String,
    client: Arc<dyn HttpClient>,
    timeout_ms: u64,
}

impl QuandlHistoryProvider {
    pub fn new(client: Arc<dyn HttpClient>, api_key: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            host: DEFAULT_QUANDL_HOST.to_owned(),
            api_key: api_key.into(),
            client,
            timeout_ms,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    fn url_for(&self, query: &HistoryQuery) -> String {
        format!(
            "https://{}/api/v3/datatables/WIKI/PRICES.json?api_key={}&ticker={}&date.gte={}&date.lte={}",
            self.host,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&query.symbol),
            query.range.start_ymd(),
            query.range.end_ymd(),
        )
    }
}

impl HistoryFetcher for QuandlHistoryProvider {
    fn fetch<'a>(&'a self, query: &'a HistoryQuery) -> FetchFuture<'a> {
        Box::pin(async move {
            let url = self.url_for(query);
            tracing::debug!(symbol = %query.symbol, "requesting secondary history");
            fetch_body(
                self.client.as_ref(),
                HttpRequest::get(url).with_timeout_ms(self.timeout_ms),
            )
            .await
        })
    }
}
