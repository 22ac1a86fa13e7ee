use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::http::header;
use axum::response::IntoResponse;

use udfeed_core::Resolution;

use crate::error::UdfError;
use crate::routes::query_map;
use crate::state::AppState;

/// `/history?symbol=S&from=..&to=..&resolution=R`.
///
/// The resolution is validated before any upstream work; symbol resolution
/// and the two-tier fallback live in the resolver, which returns the
/// serialized payload as-is.
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    RawQuery(raw): RawQuery,
) -> Result<impl IntoResponse, UdfError> {
    let params = query_map(raw.as_deref());

    let resolution: Resolution = params
        .get("resolution")
        .map(String::as_str)
        .unwrap_or("")
        .parse()?;

    let symbol = params
        .get("symbol")
        .filter(|value| !value.is_empty())
        .ok_or_else(|| UdfError::new("wrong_query"))?;
    let from = parse_timestamp(params.get("from"))?;
    let to = parse_timestamp(params.get("to"))?;

    let payload = state.history.history(symbol, from, to, resolution).await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], payload))
}

fn parse_timestamp(value: Option<&String>) -> Result<i64, UdfError> {
    value
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| UdfError::new("wrong_query"))
}
