use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::Json;
use serde_json::{json, Value};

use udfeed_core::{FeedError, SymbolMatch};

use crate::error::UdfError;
use crate::routes::query_map;
use crate::state::AppState;

/// `/symbols?symbol=S`: descriptor for one symbol.
///
/// The price scale and ticker are enriched from the primary provider's
/// instrument metadata while the failover gate is closed; while it is open,
/// or when metadata is unavailable, the descriptor defaults stand.
pub async fn get_symbol(
    State(state): State<Arc<AppState>>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Value>, UdfError> {
    let params = query_map(raw.as_deref());
    let name = params
        .get("symbol")
        .filter(|value| !value.is_empty())
        .ok_or_else(|| UdfError::new("wrong_query"))?;

    let info = state
        .store
        .lookup(name)?
        .ok_or_else(|| FeedError::UnknownSymbol(name.clone()))?;

    let description = if info.description.is_empty() {
        info.name.clone()
    } else {
        info.description.clone()
    };

    let mut descriptor = json!({
        "name": info.name,
        "exchange-traded": info.exchange,
        "exchange-listed": info.exchange,
        "timezone": "America/New_York",
        "minmov": 1,
        "minmov2": 0,
        "pointvalue": 1,
        "session": "0930-1630",
        "has_intraday": false,
        "has_no_volume": info.symbol_type != "stock",
        "description": description,
        "type": info.symbol_type,
        "supported_resolutions": ["D", "W", "M"],
        "pricescale": 100,
        "ticker": info.name.to_uppercase(),
    });

    if state.gate.allow_primary() {
        match state.metadata.fetch_meta(&info.name).await {
            Ok(Some(meta)) => {
                if let Some(previous_close) = meta.previous_close {
                    descriptor["pricescale"] = json!(pricescale_for(previous_close));
                }
                if let Some(ticker) = meta.ticker {
                    descriptor["ticker"] = json!(ticker.to_uppercase());
                }
            }
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(%error, symbol = %info.name, "metadata fetch failed");
            }
        }
    }

    Ok(Json(descriptor))
}

/// Price scale derived from the decimal digits of the previous close.
/// Only meaningful for instruments with a 10-based minimal movement.
fn pricescale_for(previous_close: f64) -> u64 {
    let text = previous_close.to_string();
    match text.split_once('.') {
        Some((_, decimals)) if !decimals.is_empty() => {
            10u64.saturating_pow(decimals.len().min(9) as u32)
        }
        _ => 10,
    }
}

/// `/search?query=Q&type=T&exchange=E&limit=N`: fuzzy store search.
pub async fn search(
    State(state): State<Arc<AppState>>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Vec<SymbolMatch>>, UdfError> {
    let params = query_map(raw.as_deref());

    let limit: usize = params
        .get("limit")
        .and_then(|value| value.parse().ok())
        .filter(|&limit| limit > 0)
        .ok_or_else(|| UdfError::new("wrong_query"))?;

    let query = params.get("query").map(String::as_str).unwrap_or("");
    let symbol_type = params.get("type").map(String::as_str).unwrap_or("");
    let exchange = params.get("exchange").map(String::as_str).unwrap_or("");

    let matches = state.store.search(query, symbol_type, exchange, limit)?;
    Ok(Json(matches))
}

#[cfg(test)]
mod tests {
    use super::pricescale_for;

    #[test]
    fn pricescale_follows_decimal_digits() {
        assert_eq!(pricescale_for(120.55), 100);
        assert_eq!(pricescale_for(0.1234), 10_000);
        assert_eq!(pricescale_for(120.0), 10);
        assert_eq!(pricescale_for(120.5), 10);
    }
}
