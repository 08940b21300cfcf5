use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use corelib::{DisplayMode, Stock, StockPrice};
use futures::future::AbortHandle;

use crate::types::Snapshot;

/// Mutable state owned by the synchronizer. Never handed out; consumers
/// only see `Snapshot`s.
pub(crate) struct SyncState {
    pub watchlist: BTreeMap<String, Stock>,
    pub search_results: Vec<Stock>,
    pub display_mode: DisplayMode,
    pub query: String,
    pub loading: bool,
    pub error: Option<String>,
    pub online: bool,
    pub refreshed_at: Option<DateTime<Utc>>,

    /// Bumped by every dispatched search; only the current generation may
    /// write search results.
    pub search_generation: u64,
    pub inflight_search: Option<AbortHandle>,
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            watchlist: BTreeMap::new(),
            search_results: Vec::new(),
            display_mode: DisplayMode::default(),
            query: String::new(),
            loading: false,
            error: None,
            online: true,
            refreshed_at: None,
            search_generation: 0,
            inflight_search: None,
        }
    }
}

impl SyncState {
    pub fn search_entry(&self, ticker: &str) -> Option<&Stock> {
        self.search_results.iter().find(|s| s.ticker == ticker)
    }

    pub fn search_entry_mut(&mut self, ticker: &str) -> Option<&mut Stock> {
        self.search_results.iter_mut().find(|s| s.ticker == ticker)
    }

    /// Replace search results, tagging membership and dropping duplicate
    /// tickers (first one wins).
    pub fn set_search_results(&mut self, stocks: Vec<Stock>) -> Vec<Stock> {
        self.search_results.clear();
        for mut s in stocks {
            if self.search_entry(&s.ticker).is_some() {
                continue;
            }
            s.is_in_watchlist = self.watchlist.contains_key(&s.ticker);
            self.search_results.push(s);
        }
        self.search_results.clone()
    }

    /// Watchlist tickers first, then search-only tickers.
    pub fn tracked_tickers(&self) -> Vec<String> {
        let mut out: Vec<String> = self.watchlist.keys().cloned().collect();
        for s in &self.search_results {
            if !self.watchlist.contains_key(&s.ticker) {
                out.push(s.ticker.clone());
            }
        }
        out
    }

    pub fn watchlist_list(&self) -> Vec<Stock> {
        self.watchlist.values().cloned().collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            watchlist: self.watchlist_list(),
            search_results: self.search_results.clone(),
            display_mode: self.display_mode,
            query: self.query.clone(),
            loading: self.loading,
            error: self.error.clone(),
            online: self.online,
            refreshed_at: self.refreshed_at,
        }
    }
}

pub(crate) fn apply_price(stock: &mut Stock, p: &StockPrice) {
    stock.price = Some(p.price);
    stock.last_close_price = Some(p.last_close);
}
