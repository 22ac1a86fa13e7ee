//! UDF datafeed HTTP server: router assembly lives here so integration
//! tests can drive the app without binding a socket.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;

use state::AppState;

/// Build the full application router with CORS open to any origin, the way
/// the chart library expects a datafeed to answer.
pub fn app(state: Arc<AppState>) -> Router {
    routes::api_router()
        .layer(CorsLayer::permissive())
        .with_state(state)
}
