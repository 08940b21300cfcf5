//! Watchlist synchronizer.
//!
//! Owns the watchlist and the current search results, and mediates between
//! the stock service, the local store and whoever renders snapshots:
//!
//! input → search → tag membership → batched price fetch → merge → persist
//!
//! Only the most recently dispatched search may write search results; older
//! ones are aborted and report `SearchOutcome::Cancelled`.

use std::collections::HashSet;
use std::sync::Arc;

use adapters::{StockApi, StockApiError};
use chrono::Utc;
use common::logger::{TraceId, root_span};
use corelib::{DisplayMode, PriceResponse, Stock};
use futures::future::{AbortHandle, Abortable};
use parking_lot::Mutex;
use store::WatchlistStore;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{Instrument, debug, error, info, instrument, warn};

use crate::config::SyncConfig;
use crate::errors::SyncError;
use crate::state::{SyncState, apply_price};
use crate::types::{SearchOutcome, Snapshot};

pub struct WatchlistSynchronizer {
    api: Arc<dyn StockApi>,
    store: Arc<dyn WatchlistStore>,
    cfg: SyncConfig,

    state: Mutex<SyncState>,

    /// Serializes store writes so the last write carries the latest list.
    persist_lock: tokio::sync::Mutex<()>,

    snapshot_tx: watch::Sender<Snapshot>,
}

impl WatchlistSynchronizer {
    pub fn new(
        api: Arc<dyn StockApi>,
        store: Arc<dyn WatchlistStore>,
        cfg: SyncConfig,
    ) -> Arc<Self> {
        let (snapshot_tx, _) = watch::channel(Snapshot::default());

        Arc::new(Self {
            api,
            store,
            cfg,
            state: Mutex::new(SyncState::default()),
            persist_lock: tokio::sync::Mutex::new(()),
            snapshot_tx,
        })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.cfg
    }

    /// Receiver of every published snapshot, starting with the current one.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.lock().snapshot()
    }

    /// Union of watchlist and search-result tickers.
    pub fn tracked_tickers(&self) -> Vec<String> {
        self.state.lock().tracked_tickers()
    }

    /// Load the persisted watchlist, then fetch its prices.
    ///
    /// A store failure leaves the watchlist empty and is surfaced as the
    /// current error.
    #[instrument(skip(self), fields(key = %self.cfg.store_key))]
    pub async fn start(&self) -> Result<(), SyncError> {
        let stored = match self.store.get(self.cfg.store_key).await {
            Ok(stocks) => stocks,
            Err(e) => {
                error!(error = ?e, "failed to load persisted watchlist");
                let err = SyncError::from(&e);
                self.set_error(err.to_string());
                return Err(err);
            }
        };

        let tickers: Vec<String> = {
            let mut st = self.state.lock();
            for mut s in stored {
                s.is_in_watchlist = true;
                st.watchlist.entry(s.ticker.clone()).or_insert(s);
            }
            self.publish(&st);
            st.watchlist.keys().cloned().collect()
        };

        info!(count = tickers.len(), "watchlist restored from store");

        self.refresh_prices(&tickers, false).await.map(|_| ())
    }

    /// Replace search results with the matches for `query`.
    ///
    /// An empty (or blank) query clears the results without a request.
    /// On success the matched tickers get a follow-up price fetch before
    /// this returns.
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let trace_id = TraceId::default();
        let span = root_span("search", &trace_id);

        self.search_inner(query).instrument(span).await
    }

    async fn search_inner(&self, query: &str) -> SearchOutcome {
        let trimmed = query.trim();
        let (abort, registration) = AbortHandle::new_pair();

        let generation = {
            let mut st = self.state.lock();
            st.search_results.clear();
            st.query = query.to_string();
            st.search_generation += 1;

            if let Some(prev) = st.inflight_search.take() {
                prev.abort();
                debug!("superseded in-flight search aborted");
            }

            if trimmed.is_empty() {
                st.loading = false;
                self.publish(&st);
                return SearchOutcome::Ok(Vec::new());
            }

            st.loading = true;
            st.inflight_search = Some(abort);
            self.publish(&st);
            st.search_generation
        };

        debug!(query = trimmed, generation, "search dispatched");

        let request = Abortable::new(self.api.search(trimmed), registration);
        let result = match timeout(self.cfg.request_timeout, request).await {
            Err(_) => Err(self.timeout_error("search")),
            Ok(Err(_aborted)) => {
                debug!(generation, "search cancelled");
                return SearchOutcome::Cancelled;
            }
            Ok(Ok(res)) => res.map_err(|e| self.api_error("search", &e)),
        };

        let tagged = {
            let mut st = self.state.lock();
            if st.search_generation != generation {
                // lost the race against a newer dispatch after completing
                debug!(generation, "stale search response dropped");
                return SearchOutcome::Cancelled;
            }

            st.inflight_search = None;
            st.loading = false;

            match result {
                Ok(stocks) => {
                    st.online = true;
                    let tagged = st.set_search_results(stocks);
                    self.publish(&st);
                    tagged
                }
                Err(err) => {
                    st.search_results.clear();
                    st.error = Some(err.to_string());
                    self.publish(&st);
                    return SearchOutcome::Error(err);
                }
            }
        };

        info!(matches = tagged.len(), "search results applied");

        let tickers: Vec<String> = tagged.iter().map(|s| s.ticker.clone()).collect();
        if let Err(e) = self.refresh_prices(&tickers, true).await {
            warn!(error = %e, "price fetch after search failed");
        }

        SearchOutcome::Ok(tagged)
    }

    /// Flip watchlist membership of `ticker` and persist the watchlist.
    ///
    /// Returns the new membership. Adding copies the search-result entry so
    /// its prices carry over. A store failure is logged and surfaced but
    /// does not undo the in-memory change.
    #[instrument(skip(self))]
    pub async fn toggle_watchlist(&self, ticker: &str) -> Result<bool, SyncError> {
        let member = {
            let mut st = self.state.lock();
            let from_search = st.search_entry(ticker).cloned();

            let member = match (st.watchlist.remove(ticker), from_search) {
                (Some(_), _) => false,
                (None, Some(mut s)) => {
                    s.is_in_watchlist = true;
                    st.watchlist.insert(s.ticker.clone(), s);
                    true
                }
                (None, None) => {
                    warn!("toggle for a ticker in neither list");
                    return Err(SyncError::UnknownTicker(ticker.to_string()));
                }
            };

            if let Some(entry) = st.search_entry_mut(ticker) {
                entry.is_in_watchlist = member;
            }

            self.publish(&st);
            member
        };

        info!(member, "watchlist membership toggled");

        // failure is already logged and surfaced
        let _ = self.persist_watchlist().await;

        Ok(member)
    }

    pub fn toggle_display_mode(&self) -> DisplayMode {
        let mut st = self.state.lock();
        st.display_mode = st.display_mode.toggled();
        self.publish(&st);
        st.display_mode
    }

    /// Fetch prices for `tickers` in one request and merge them.
    ///
    /// Watchlist entries are always updated. Search-only entries are
    /// updated when `apply_to_search` is set; an entry present in both
    /// lists is kept identical. Tickers missing from the response keep
    /// their previous prices. The store is rewritten only when a watchlist
    /// entry changed. Returns the number of entries updated.
    #[instrument(skip(self, tickers), fields(requested = tickers.len()))]
    pub async fn refresh_prices(
        &self,
        tickers: &[String],
        apply_to_search: bool,
    ) -> Result<usize, SyncError> {
        let batch = dedupe(tickers);
        if batch.is_empty() {
            return Ok(0);
        }

        let fetched = match timeout(self.cfg.request_timeout, self.api.prices(&batch)).await {
            Err(_) => Err(self.timeout_error("prices")),
            Ok(res) => res.map_err(|e| self.api_error("prices", &e)),
        };

        let prices = match fetched {
            Ok(p) => p,
            Err(err) => {
                self.set_error(err.to_string());
                return Err(err);
            }
        };

        let (updated, watchlist_changed) = self.merge_prices(&prices, apply_to_search);

        debug!(
            returned = prices.len(),
            updated, watchlist_changed, "prices merged"
        );

        if watchlist_changed {
            let _ = self.persist_watchlist().await;
        }

        Ok(updated)
    }

    fn merge_prices(&self, prices: &PriceResponse, apply_to_search: bool) -> (usize, bool) {
        let mut st = self.state.lock();
        let mut updated = 0;
        let mut watchlist_changed = false;

        for (ticker, p) in prices {
            let in_watchlist = match st.watchlist.get_mut(ticker) {
                Some(w) => {
                    apply_price(w, p);
                    updated += 1;
                    watchlist_changed = true;
                    true
                }
                None => false,
            };

            if apply_to_search || in_watchlist {
                if let Some(s) = st.search_entry_mut(ticker) {
                    apply_price(s, p);
                    updated += 1;
                }
            }
        }

        st.online = true;
        st.refreshed_at = Some(Utc::now());
        self.publish(&st);

        (updated, watchlist_changed)
    }

    /// Clear the current error, if any.
    pub fn dismiss_error(&self) {
        let mut st = self.state.lock();
        if st.error.take().is_some() {
            self.publish(&st);
        }
    }

    /// Write the watchlist as it is when the write starts.
    async fn persist_watchlist(&self) -> Result<(), SyncError> {
        let _guard = self.persist_lock.lock().await;
        let list: Vec<Stock> = self.state.lock().watchlist_list();

        match self.store.save(self.cfg.store_key, &list).await {
            Ok(()) => {
                debug!(count = list.len(), "watchlist persisted");
                Ok(())
            }
            Err(e) => {
                error!(error = ?e, "failed to persist watchlist");
                let err = SyncError::from(&e);
                self.set_error(err.to_string());
                Err(err)
            }
        }
    }

    fn api_error(&self, op: &'static str, e: &StockApiError) -> SyncError {
        warn!(op, error = %e, "stock service call failed");
        if e.is_transport() {
            self.set_offline();
        }
        SyncError::from(e)
    }

    fn timeout_error(&self, op: &'static str) -> SyncError {
        let ms = self.cfg.request_timeout.as_millis();
        warn!(op, timeout_ms = ms as u64, "stock service call timed out");
        self.set_offline();
        SyncError::Network(format!("{op} request timed out after {ms}ms"))
    }

    fn set_offline(&self) {
        let mut st = self.state.lock();
        if st.online {
            st.online = false;
            self.publish(&st);
        }
    }

    fn set_error(&self, msg: String) {
        let mut st = self.state.lock();
        st.error = Some(msg);
        self.publish(&st);
    }

    fn publish(&self, st: &SyncState) {
        self.snapshot_tx.send_replace(st.snapshot());
    }
}

fn dedupe(tickers: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    tickers
        .iter()
        .filter(|t| seen.insert(t.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use corelib::StockPrice;
    use store::{MemoryWatchlistStore, StoreKey};
    use tracing_test::traced_test;

    struct FixedApi;

    #[async_trait]
    impl StockApi for FixedApi {
        async fn search(&self, _: &str) -> Result<Vec<Stock>, StockApiError> {
            Ok(vec![Stock::new("AAPL", "Apple Inc.")])
        }

        async fn prices(&self, _: &[String]) -> Result<PriceResponse, StockApiError> {
            Ok(PriceResponse::from([(
                "AAPL".to_string(),
                StockPrice {
                    price: 145.3,
                    last_close: 147.38,
                },
            )]))
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl WatchlistStore for BrokenStore {
        async fn save(&self, _: StoreKey, _: &[Stock]) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("disk full"))
        }

        async fn get(&self, _: StoreKey) -> anyhow::Result<Vec<Stock>> {
            Err(anyhow::anyhow!("disk unreadable"))
        }
    }

    #[test]
    fn dedupe_keeps_first_occurrence_order() {
        let input: Vec<String> = ["B", "A", "B", "C", "A"].map(String::from).to_vec();
        assert_eq!(dedupe(&input), vec!["B", "A", "C"]);
    }

    #[tokio::test]
    #[traced_test]
    async fn persistence_failure_is_logged_and_not_rolled_back() {
        let sync = WatchlistSynchronizer::new(
            Arc::new(FixedApi),
            Arc::new(BrokenStore),
            SyncConfig::default(),
        );

        assert!(matches!(sync.search("apple").await, SearchOutcome::Ok(_)));
        let member = sync.toggle_watchlist("AAPL").await.unwrap();

        assert!(member);
        let snap = sync.snapshot();
        assert_eq!(snap.watchlist.len(), 1);
        assert!(snap.error.unwrap().contains("disk full"));
        assert!(logs_contain("failed to persist watchlist"));
    }

    #[tokio::test]
    #[traced_test]
    async fn unreadable_store_starts_empty_with_error() {
        let sync = WatchlistSynchronizer::new(
            Arc::new(FixedApi),
            Arc::new(BrokenStore),
            SyncConfig::default(),
        );

        let err = sync.start().await.unwrap_err();

        assert!(matches!(err, SyncError::Persistence(ref m) if m.contains("disk unreadable")));
        assert!(sync.snapshot().watchlist.is_empty());
        assert!(logs_contain("failed to load persisted watchlist"));
    }

    #[tokio::test]
    async fn snapshots_are_published_to_subscribers() {
        let sync = WatchlistSynchronizer::new(
            Arc::new(FixedApi),
            Arc::new(MemoryWatchlistStore::new()),
            SyncConfig::default(),
        );
        let mut rx = sync.subscribe();

        sync.toggle_display_mode();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().display_mode, DisplayMode::Percent);
    }
}
