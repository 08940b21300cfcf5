//! Key-value persistence of stock lists.

pub mod memory_store;
pub mod sqlite_store;

use std::fmt;
use std::str::FromStr;

use corelib::Stock;

pub use memory_store::MemoryWatchlistStore;
pub use sqlite_store::SqliteWatchlistStore;

/// Keys a stock list may be stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StoreKey {
    #[default]
    Watchlist,
    Stocks,
    Starred,
}

impl StoreKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Watchlist => "watchlist",
            StoreKey::Stocks => "stocks",
            StoreKey::Starred => "starred",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "watchlist" => Ok(StoreKey::Watchlist),
            "stocks" => Ok(StoreKey::Stocks),
            "starred" => Ok(StoreKey::Starred),
            other => Err(anyhow::anyhow!("Invalid store key: {}", other)),
        }
    }
}

#[async_trait::async_trait]
pub trait WatchlistStore: Send + Sync {
    /// Replace the list stored under `key`.
    async fn save(&self, key: StoreKey, stocks: &[Stock]) -> anyhow::Result<()>;

    /// The list stored under `key`, or an empty list when nothing was saved.
    async fn get(&self, key: StoreKey) -> anyhow::Result<Vec<Stock>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_text() {
        for key in [StoreKey::Watchlist, StoreKey::Stocks, StoreKey::Starred] {
            assert_eq!(key.as_str().parse::<StoreKey>().unwrap(), key);
        }
        assert!("favourites".parse::<StoreKey>().is_err());
    }
}
