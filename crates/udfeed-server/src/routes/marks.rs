//! Demo marks and server-time endpoints.

use axum::Json;
use serde_json::{json, Value};
use time::OffsetDateTime;

const DAY: i64 = 60 * 60 * 24;

/// Today's UTC midnight, the anchor all demo marks hang off.
fn utc_midnight_now() -> i64 {
    OffsetDateTime::now_utc()
        .date()
        .midnight()
        .assume_utc()
        .unix_timestamp()
}

/// `/marks`: column-array demo chart marks.
pub async fn get_marks() -> Json<Value> {
    let now = utc_midnight_now();

    Json(json!({
        "id": [0, 1, 2, 3, 4],
        "time": [now, now - DAY * 4, now - DAY * 7, now - DAY * 15, now - DAY * 30],
        "color": ["red", "blue", "green", "blue", "green"],
        "text": [
            "Today",
            "4 days back",
            "7 days back",
            "15 days back",
            "30 days back",
        ],
        "label": ["A", "B", "C", "D", "E"],
        "labelFontColor": ["white", "white", "red", "#FFFFFF", "#000"],
        "minSize": [14, 28, 7, 40, 14],
    }))
}

/// `/timescale_marks`: row-object demo timescale marks.
pub async fn get_timescale_marks() -> Json<Value> {
    let now = utc_midnight_now();

    Json(json!([
        { "id": "tsm1", "time": now, "color": "red", "label": "A", "tooltip": "" },
        {
            "id": "tsm2",
            "time": now - DAY * 4,
            "color": "blue",
            "label": "D",
            "tooltip": ["Dividends: $0.56"]
        },
        {
            "id": "tsm3",
            "time": now - DAY * 15,
            "color": "#999999",
            "label": "E",
            "tooltip": ["Earnings: $3.44", "Estimate: $3.60"]
        },
    ]))
}

/// `/time`: current server time in unix seconds, bare text body.
pub async fn get_time() -> String {
    OffsetDateTime::now_utc().unix_timestamp().to_string()
}
