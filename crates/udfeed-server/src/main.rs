use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use udfeed_core::{ReqwestHttpClient, StoreError};
use udfeed_server::config::ServerConfig;
use udfeed_server::state::AppState;
use udfeed_symbols::SymbolDb;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();

    let store = match open_store(&config) {
        Ok(store) => Arc::new(store),
        Err(error) => {
            tracing::error!(%error, "failed to open symbol store");
            std::process::exit(1);
        }
    };

    let http = Arc::new(ReqwestHttpClient::new());
    let state = AppState::new(config.clone(), store, http);

    state
        .cache
        .spawn_clear_task(Duration::from_secs(config.cache_clear_secs));

    let addr: SocketAddr = format!("{}:{}", config.bind, config.port)
        .parse()
        .expect("invalid bind address");

    tracing::info!("udfeed listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, udfeed_server::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

fn open_store(config: &ServerConfig) -> Result<SymbolDb, StoreError> {
    let store = if config.db_path.is_empty() {
        tracing::info!("no UDF_DB_PATH set, using an in-memory symbol store");
        SymbolDb::open_in_memory()?
    } else {
        SymbolDb::open(&config.db_path)?
    };

    if config.seed_demo && store.count()? == 0 {
        store.seed_demo()?;
    }

    Ok(store)
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    tracing::info!("shutdown signal received, stopping");
}
