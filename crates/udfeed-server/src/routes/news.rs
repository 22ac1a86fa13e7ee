//! RSS proxy endpoints. Upstream bodies pass through verbatim; any upstream
//! failure becomes a UDF error envelope.

use std::sync::Arc;

use axum::extract::{RawQuery, State};

use udfeed_core::{fetch_body, HttpRequest};

use crate::error::UdfError;
use crate::routes::query_map;
use crate::state::AppState;

/// `/news?symbol=S`: headline RSS for one symbol.
pub async fn get_news(
    State(state): State<Arc<AppState>>,
    RawQuery(raw): RawQuery,
) -> Result<String, UdfError> {
    let params = query_map(raw.as_deref());
    let symbol = params
        .get("symbol")
        .filter(|value| !value.is_empty())
        .ok_or_else(|| UdfError::new("wrong_query"))?;

    let url = format!(
        "https://feeds.finance.yahoo.com/rss/2.0/headline?s={}&region=US&lang=en-US",
        urlencoding::encode(symbol),
    );
    proxy(&state, url).await
}

/// `/futuresmag`: the futures magazine firehose feed.
pub async fn get_futuresmag(State(state): State<Arc<AppState>>) -> Result<String, UdfError> {
    proxy(&state, "http://www.futuresmag.com/rss/all".to_owned()).await
}

async fn proxy(state: &AppState, url: String) -> Result<String, UdfError> {
    let request = HttpRequest::get(url).with_timeout_ms(state.config.fetch_timeout_ms);
    fetch_body(state.http.as_ref(), request).await.map_err(|error| {
        tracing::warn!(%error, "news proxy fetch failed");
        UdfError::new("Failed to get news")
    })
}
