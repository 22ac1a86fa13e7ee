use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use udfeed_core::{FeedError, StoreError};

/// Unified error for the UDF endpoints.
///
/// The UDF protocol renders every failure as `{"s":"error","errmsg":...}` in
/// an HTTP 200 response; the chart library reads the body, not the status.
#[derive(Debug)]
pub struct UdfError(pub String);

impl UdfError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl std::fmt::Display for UdfError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for UdfError {}

impl From<FeedError> for UdfError {
    fn from(error: FeedError) -> Self {
        Self(error.to_string())
    }
}

impl From<StoreError> for UdfError {
    fn from(error: StoreError) -> Self {
        Self(error.to_string())
    }
}

impl IntoResponse for UdfError {
    fn into_response(self) -> Response {
        tracing::warn!(errmsg = %self.0, "request failed");
        let body = json!({ "s": "error", "errmsg": self.0 });
        (StatusCode::OK, axum::Json(body)).into_response()
    }
}
