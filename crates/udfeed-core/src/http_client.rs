//! Outbound HTTP transport used by the provider fetchers.
//!
//! One GET per call, a per-request idle timeout, and no retries; the
//! fallback policy lives in the history resolver, one level up.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;

/// Default idle-socket timeout applied to upstream fetches.
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 5_000;

/// Outbound GET request envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub timeout_ms: u64,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Response envelope returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// A failed upstream fetch. A non-200 status and a transport error are both
/// failures; the distinction only matters for the detail carried upward.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("request timed out after {0} ms")]
    Timeout(u64),
    #[error("transport error: {0}")]
    Transport(String),
}

pub type ExecuteFuture<'a> =
    Pin<Box<dyn Future<Output = Result<HttpResponse, FetchError>> + Send + 'a>>;

/// Transport contract implemented by the reqwest client in production and by
/// deterministic doubles in tests.
pub trait HttpClient: Send + Sync {
    fn execute<'a>(&'a self, request: HttpRequest) -> ExecuteFuture<'a>;
}

/// Fetch a body, treating any non-2xx status as a failure.
pub async fn fetch_body(client: &dyn HttpClient, request: HttpRequest) -> Result<String, FetchError> {
    let response = client.execute(request).await?;
    if !response.is_success() {
        return Err(FetchError::Status(response.status));
    }
    Ok(response.body)
}

/// No-op transport for deterministic offline tests: always 200 with an empty
/// JSON object body.
#[derive(Debug, Default)]
pub struct NoopHttpClient;

impl HttpClient for NoopHttpClient {
    fn execute<'a>(&'a self, request: HttpRequest) -> ExecuteFuture<'a> {
        let _ = request;
        Box::pin(async move { Ok(HttpResponse::ok("{}")) })
    }
}

/// Production transport backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Arc<reqwest::Client>,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: Arc::new(
                reqwest::Client::builder()
                    .user_agent("udfeed/0.1.0")
                    .build()
                    .unwrap_or_else(|_| reqwest::Client::new()),
            ),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute<'a>(&'a self, request: HttpRequest) -> ExecuteFuture<'a> {
        Box::pin(async move {
            let timeout = std::time::Duration::from_millis(request.timeout_ms);
            let response = self
                .client
                .get(&request.url)
                .timeout(timeout)
                .send()
                .await
                .map_err(|error| {
                    if error.is_timeout() {
                        FetchError::Timeout(request.timeout_ms)
                    } else {
                        FetchError::Transport(error.to_string())
                    }
                })?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|error| FetchError::Transport(error.to_string()))?;

            Ok(HttpResponse { status, body })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_default_to_the_idle_timeout() {
        let request = HttpRequest::get("https://example.test/table.csv");
        assert_eq!(request.timeout_ms, DEFAULT_FETCH_TIMEOUT_MS);
    }

    #[tokio::test]
    async fn non_success_status_is_a_fetch_failure() {
        struct FailingClient;
        impl HttpClient for FailingClient {
            fn execute<'a>(&'a self, _request: HttpRequest) -> ExecuteFuture<'a> {
                Box::pin(async move {
                    Ok(HttpResponse {
                        status: 503,
                        body: String::new(),
                    })
                })
            }
        }

        let error = fetch_body(&FailingClient, HttpRequest::get("https://example.test"))
            .await
            .expect_err("503 must fail");
        assert_eq!(error, FetchError::Status(503));
    }
}
