use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::Json;

use udfeed_core::QuoteBatch;

use crate::error::UdfError;
use crate::routes::query_map;
use crate::state::AppState;

/// `/quotes?symbols=CSV`: one batched provider call, request order kept.
pub async fn get_quotes(
    State(state): State<Arc<AppState>>,
    RawQuery(raw): RawQuery,
) -> Result<Json<QuoteBatch>, UdfError> {
    let params = query_map(raw.as_deref());
    let symbols = params
        .get("symbols")
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| UdfError::new("wrong_query"))?;

    Ok(Json(state.quotes.quotes(symbols).await))
}
