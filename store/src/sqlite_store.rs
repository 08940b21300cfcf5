//! SQLite-backed implementation of `WatchlistStore`.
//!
//! Lists are stored as JSON text in a single key-value table, one row per
//! `StoreKey`, so the on-disk value is exactly the serialized list.
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use common::logger::warn_if_slow;
use corelib::Stock;
use sqlx::{Row, SqlitePool};
use tracing::{debug, instrument};

use super::{StoreKey, WatchlistStore};

pub struct SqliteWatchlistStore {
    pool: SqlitePool,
}

impl SqliteWatchlistStore {
    /// Wrap an existing pool. Call `migrate` before first use.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to `url` (e.g. `sqlite://watchlist.db?mode=rwc`) and ensure
    /// the schema exists.
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let pool = SqlitePool::connect(url)
            .await
            .with_context(|| format!("open sqlite database {}", url))?;

        let store = Self::from_pool(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at_ms INTEGER NOT NULL
            );
        "#,
        )
        .execute(&self.pool)
        .await
        .context("create kv_store table")?;

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl WatchlistStore for SqliteWatchlistStore {
    /// Upsert the serialized list under `key`.
    #[instrument(skip(self, stocks), fields(key = %key, count = stocks.len()))]
    async fn save(&self, key: StoreKey, stocks: &[Stock]) -> anyhow::Result<()> {
        let value = serde_json::to_string(stocks).context("serialize stock list")?;
        let now_ms = chrono::Utc::now().timestamp_millis();

        warn_if_slow("sqlite_save", Duration::from_millis(50), async {
            sqlx::query(
                r#"
                INSERT INTO kv_store (key, value, updated_at_ms)
                VALUES (?, ?, ?)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at_ms = excluded.updated_at_ms;
            "#,
            )
            .bind(key.as_str())
            .bind(&value)
            .bind(now_ms)
            .execute(&self.pool)
            .await
        })
        .await
        .with_context(|| format!("failed to save '{}'", key))?;

        debug!("stock list persisted");
        Ok(())
    }

    #[instrument(skip(self), fields(key = %key))]
    async fn get(&self, key: StoreKey) -> anyhow::Result<Vec<Stock>> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to read '{}'", key))?;

        let Some(row) = row else {
            debug!("no stored list; starting empty");
            return Ok(Vec::new());
        };

        let value: String = row.get("value");
        let stocks: Vec<Stock> = serde_json::from_str(&value)
            .with_context(|| format!("corrupt stock list under '{}'", key))?;

        Ok(stocks)
    }
}
