use axum::Json;
use serde_json::{json, Value};

/// Static datafeed capabilities for the chart library.
pub async fn get_config() -> Json<Value> {
    Json(json!({
        "supports_search": true,
        "supports_group_request": false,
        "supports_marks": true,
        "supports_timescale_marks": true,
        "supports_time": true,
        "exchanges": [
            { "value": "", "name": "All Exchanges", "desc": "" },
            { "value": "NASDAQ", "name": "NASDAQ", "desc": "NASDAQ" },
            { "value": "NYSE", "name": "NYSE", "desc": "NYSE" },
            { "value": "NYSEARCA", "name": "NYSE Arca", "desc": "NYSE Arca" },
        ],
        "symbolsTypes": [
            { "name": "All types", "value": "" },
            { "name": "Stock", "value": "stock" },
            { "name": "Index", "value": "index" },
        ],
        "supportedResolutions": ["D", "W", "M"],
    }))
}
