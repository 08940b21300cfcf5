use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use corelib::Stock;
use tokio::sync::Mutex;

use super::{StoreKey, WatchlistStore};

/// Process-local store. Values are kept serialized so it fails the same
/// way a durable backend would on malformed data.
#[derive(Clone, Default)]
pub struct MemoryWatchlistStore {
    map: Arc<Mutex<HashMap<StoreKey, String>>>,
}

impl MemoryWatchlistStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw serialized value under `key`.
    pub async fn raw(&self, key: StoreKey) -> Option<String> {
        self.map.lock().await.get(&key).cloned()
    }

    /// Overwrite the raw value under `key`, bypassing serialization.
    pub async fn put_raw(&self, key: StoreKey, value: impl Into<String>) {
        self.map.lock().await.insert(key, value.into());
    }
}

#[async_trait]
impl WatchlistStore for MemoryWatchlistStore {
    async fn save(&self, key: StoreKey, stocks: &[Stock]) -> anyhow::Result<()> {
        let value = serde_json::to_string(stocks).context("serialize stock list")?;
        self.map.lock().await.insert(key, value);
        Ok(())
    }

    async fn get(&self, key: StoreKey) -> anyhow::Result<Vec<Stock>> {
        match self.map.lock().await.get(&key) {
            Some(v) => serde_json::from_str(v)
                .with_context(|| format!("corrupt stock list under '{}'", key)),
            None => Ok(Vec::new()),
        }
    }
}
