pub mod config;
pub mod history;
pub mod marks;
pub mod news;
pub mod quotes;
pub mod symbols;

use std::collections::HashMap;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Assemble the UDF router.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/config", get(config::get_config))
        .route("/symbols", get(symbols::get_symbol))
        .route("/search", get(symbols::search))
        .route("/history", get(history::get_history))
        .route("/quotes", get(quotes::get_quotes))
        .route("/marks", get(marks::get_marks))
        .route("/timescale_marks", get(marks::get_timescale_marks))
        .route("/time", get(marks::get_time))
        .route("/news", get(news::get_news))
        .route("/futuresmag", get(news::get_futuresmag))
}

/// Decode a raw query string into a key→value map.
///
/// Parsing is done by hand rather than through a typed extractor so that a
/// missing or malformed parameter surfaces as a UDF error envelope instead of
/// an axum 400.
pub fn query_map(raw: Option<&str>) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let Some(raw) = raw else { return map };

    for pair in raw.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = match pair.split_once('=') {
            Some((key, value)) => (key, value),
            None => (pair, ""),
        };
        if let (Some(key), Some(value)) = (decode_component(key), decode_component(value)) {
            map.insert(key, value);
        }
    }

    map
}

/// Form-style decoding: `+` means space, so it must be rewritten before
/// percent-decoding or an encoded literal plus (`%2B`) would be lost.
fn decode_component(raw: &str) -> Option<String> {
    urlencoding::decode(&raw.replace('+', " "))
        .ok()
        .map(|decoded| decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::query_map;

    #[test]
    fn query_strings_decode_into_a_map() {
        let map = query_map(Some("symbol=NYSE%3AIBM&limit=30&flag"));
        assert_eq!(map.get("symbol").map(String::as_str), Some("NYSE:IBM"));
        assert_eq!(map.get("limit").map(String::as_str), Some("30"));
        assert_eq!(map.get("flag").map(String::as_str), Some(""));
        assert!(query_map(None).is_empty());
    }

    #[test]
    fn encoded_plus_and_form_spaces_both_survive() {
        let map = query_map(Some("query=C%2B%2B&name=big+blue"));
        assert_eq!(map.get("query").map(String::as_str), Some("C++"));
        assert_eq!(map.get("name").map(String::as_str), Some("big blue"));
    }
}
