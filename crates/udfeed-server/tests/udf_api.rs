//! Endpoint tests driven through `tower::ServiceExt::oneshot`; upstream
//! providers are replaced by a scripted transport keyed on the request URL.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use udfeed_core::http_client::{ExecuteFuture, HttpClient, HttpRequest, HttpResponse};
use udfeed_server::config::ServerConfig;
use udfeed_server::state::AppState;
use udfeed_symbols::SymbolDb;

const PRIMARY_CSV: &str = "Date,Open,High,Low,Close,Volume\n\
    2020-01-03,74.29,75.14,74.13,74.36,146322800\n\
    2020-01-02,74.06,75.15,73.80,75.09,135480400\n";

/// Scripted transport: answers by URL shape, no sockets involved.
struct ScriptedUpstream;

impl HttpClient for ScriptedUpstream {
    fn execute<'a>(&'a self, request: HttpRequest) -> ExecuteFuture<'a> {
        let url = request.url;
        Box::pin(async move {
            if url.contains("table.csv") {
                return Ok(HttpResponse::ok(PRIMARY_CSV));
            }
            if url.contains("yql") {
                return Ok(HttpResponse::ok(
                    serde_json::json!({
                        "query": {"results": {"quote": [
                            {
                                "symbol": "AAPL",
                                "Symbol": "AAPL",
                                "StockExchange": "NASDAQ",
                                "LastTradePriceOnly": "74.36",
                                "PercentChange": "-0.40%"
                            },
                            {
                                "symbol": "IBM",
                                "Symbol": "IBM",
                                "StockExchange": "NYSE",
                                "LastTradePriceOnly": "121.50"
                            }
                        ]}}
                    })
                    .to_string(),
                ));
            }
            if url.contains("chartdata") {
                return Ok(HttpResponse::ok(
                    r#"{"meta":{"previous_close":74.3575,"ticker":"aapl"}}"#,
                ));
            }
            Ok(HttpResponse::ok("{}"))
        })
    }
}

fn test_config() -> ServerConfig {
    ServerConfig {
        bind: "127.0.0.1".to_owned(),
        port: 0,
        db_path: String::new(),
        seed_demo: true,
        quandl_api_key: "test".to_owned(),
        cooldown_secs: 3600,
        cache_clear_secs: 10800,
        fetch_timeout_ms: 1000,
        history_host: "primary.test".to_owned(),
        quote_host: "quotes.test".to_owned(),
        metadata_host: "meta.test".to_owned(),
        quandl_host: "secondary.test".to_owned(),
    }
}

fn test_app() -> Router {
    let store = SymbolDb::open_in_memory().expect("in-memory store opens");
    store.seed_demo().expect("seeding succeeds");
    let state = AppState::new(test_config(), Arc::new(store), Arc::new(ScriptedUpstream));
    udfeed_server::app(state)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request builds"))
        .await
        .expect("request is handled");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body is readable")
        .to_bytes();
    let value = serde_json::from_slice(&bytes).expect("body is JSON");
    (status, value)
}

#[tokio::test]
async fn config_reports_capabilities() {
    let (status, body) = get_json(test_app(), "/config").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["supports_search"], Value::Bool(true));
    assert_eq!(body["supports_group_request"], Value::Bool(false));
    assert!(body["supportedResolutions"].as_array().is_some_and(|r| !r.is_empty()));
}

#[tokio::test]
async fn history_happy_path_serves_ascending_bars() {
    let uri = "/history?symbol=AAPL&from=1577836800&to=1580515200&resolution=d";
    let (status, body) = get_json(test_app(), uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["s"], "ok");
    let timestamps = body["t"].as_array().expect("t column present");
    assert_eq!(timestamps.len(), 2);
    assert!(timestamps[0].as_i64() < timestamps[1].as_i64());
    assert_eq!(body["c"][1], 74.36);
}

#[tokio::test]
async fn bad_resolution_is_an_error_envelope_over_http_200() {
    let uri = "/history?symbol=AAPL&from=1577836800&to=1580515200&resolution=x";
    let (status, body) = get_json(test_app(), uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["s"], "error");
    assert!(body["errmsg"]
        .as_str()
        .is_some_and(|m| m.contains("unsupported_resolution")));
}

#[tokio::test]
async fn unknown_symbol_is_an_error_envelope() {
    let uri = "/history?symbol=NOSUCH&from=1577836800&to=1580515200&resolution=d";
    let (status, body) = get_json(test_app(), uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["s"], "error");
    assert!(body["errmsg"].as_str().is_some_and(|m| m.contains("unknown_symbol")));
}

#[tokio::test]
async fn quotes_keep_request_order_and_original_labels() {
    let (status, body) = get_json(test_app(), "/quotes?symbols=NYSE:IBM,NASDAQ:AAPL").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["s"], "ok");
    let entries = body["d"].as_array().expect("d array present");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["n"], "NYSE:IBM");
    assert_eq!(entries[1]["n"], "NASDAQ:AAPL");
    assert_eq!(entries[1]["v"]["chp"], "0.40");
}

#[tokio::test]
async fn search_returns_store_matches() {
    let (status, body) = get_json(test_app(), "/search?query=IBM&type=&exchange=&limit=10").await;

    assert_eq!(status, StatusCode::OK);
    let hits = body.as_array().expect("response is an array");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["symbol"], "IBM");
    assert_eq!(hits[0]["full_name"], "NYSE:IBM");
}

#[tokio::test]
async fn search_without_a_limit_is_rejected() {
    let (status, body) = get_json(test_app(), "/search?query=IBM").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["s"], "error");
    assert_eq!(body["errmsg"], "wrong_query");
}

#[tokio::test]
async fn symbol_descriptor_is_enriched_from_metadata() {
    let (status, body) = get_json(test_app(), "/symbols?symbol=AAPL").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "AAPL");
    assert_eq!(body["exchange-listed"], "NASDAQ");
    assert_eq!(body["ticker"], "AAPL");
    // previous_close 74.3575 has four decimal digits.
    assert_eq!(body["pricescale"], 10_000);
    assert_eq!(body["has_no_volume"], Value::Bool(false));
}

#[tokio::test]
async fn time_returns_bare_unix_seconds() {
    let response = test_app()
        .oneshot(Request::builder().uri("/time").body(Body::empty()).expect("request builds"))
        .await
        .expect("request is handled");

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body is readable")
        .to_bytes();
    let text = std::str::from_utf8(&bytes).expect("body is utf-8");
    assert!(text.parse::<i64>().expect("body is an integer") > 1_500_000_000);
}

#[tokio::test]
async fn marks_carry_parallel_columns() {
    let (status, body) = get_json(test_app(), "/marks").await;
    assert_eq!(status, StatusCode::OK);
    let ids = body["id"].as_array().expect("id column present");
    let times = body["time"].as_array().expect("time column present");
    assert_eq!(ids.len(), times.len());
}
