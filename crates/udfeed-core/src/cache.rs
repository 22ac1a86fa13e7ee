//! In-memory cache for secondary-provider history payloads.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Keyed store of pre-serialized history payloads.
///
/// Entries are only ever written for secondary-provider results and are never
/// evicted individually; a background task wipes the whole map on a fixed
/// interval. Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct HistoryCache {
    inner: Arc<tokio::sync::RwLock<HashMap<String, String>>>,
}

impl HistoryCache {
    /// Interval between full cache wipes: three hours.
    pub const DEFAULT_CLEAR_INTERVAL: Duration = Duration::from_secs(3 * 60 * 60);

    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    pub async fn insert(&self, key: String, payload: String) {
        let mut map = self.inner.write().await;
        map.insert(key, payload);
    }

    /// Discard every entry. Runs on a timer, independent of any request.
    pub async fn clear(&self) {
        let mut map = self.inner.write().await;
        map.clear();
    }

    pub async fn len(&self) -> usize {
        let map = self.inner.read().await;
        map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Spawn the periodic bulk-clear task on the current runtime.
    pub fn spawn_clear_task(&self, every: Duration) -> tokio::task::JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(every);
            // The first tick fires immediately; skip it so a fresh cache
            // is not cleared at startup.
            tick.tick().await;
            loop {
                tick.tick().await;
                let dropped = cache.len().await;
                cache.clear().await;
                tracing::debug!(dropped, "cleared history cache");
            }
        })
    }
}
