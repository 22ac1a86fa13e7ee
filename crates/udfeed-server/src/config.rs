use std::env;

use udfeed_core::http_client::DEFAULT_FETCH_TIMEOUT_MS;
use udfeed_core::providers::yahoo::{
    DEFAULT_HISTORY_HOST, DEFAULT_METADATA_HOST, DEFAULT_QUOTE_HOST,
};
use udfeed_core::providers::quandl::DEFAULT_QUANDL_HOST;

/// Server configuration derived from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,

    /// DuckDB file holding the symbol universe. Empty ⇒ in-memory.
    pub db_path: String,
    /// Seed a small demo universe into an empty store on startup.
    pub seed_demo: bool,

    pub quandl_api_key: String,

    pub cooldown_secs: u64,
    pub cache_clear_secs: u64,
    pub fetch_timeout_ms: u64,

    // Upstream hosts, overridable so tests and stubs can point elsewhere.
    pub history_host: String,
    pub quote_host: String,
    pub metadata_host: String,
    pub quandl_host: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            bind: env_str("UDF_BIND", "0.0.0.0"),
            port: env_u16("UDF_PORT", 8888),
            db_path: env_str("UDF_DB_PATH", ""),
            seed_demo: env_bool("UDF_SEED_DEMO", true),
            quandl_api_key: env_str("QUANDL_API_KEY", ""),
            cooldown_secs: env_u64("UDF_COOLDOWN_SECS", 60 * 60),
            cache_clear_secs: env_u64("UDF_CACHE_CLEAR_SECS", 3 * 60 * 60),
            fetch_timeout_ms: env_u64("UDF_FETCH_TIMEOUT_MS", DEFAULT_FETCH_TIMEOUT_MS),
            history_host: env_str("UDF_HISTORY_HOST", DEFAULT_HISTORY_HOST),
            quote_host: env_str("UDF_QUOTE_HOST", DEFAULT_QUOTE_HOST),
            metadata_host: env_str("UDF_METADATA_HOST", DEFAULT_METADATA_HOST),
            quandl_host: env_str("UDF_QUANDL_HOST", DEFAULT_QUANDL_HOST),
        }
    }
}

fn env_str(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .map(|s| matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
