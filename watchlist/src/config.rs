use std::time::Duration;

use store::StoreKey;

#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// Key the watchlist is persisted under.
    pub store_key: StoreKey,

    /// Quiet period raw search input must stay unchanged before a search
    /// is dispatched.
    pub search_debounce: Duration,

    /// Cadence of the background price refresh.
    pub refresh_every: Duration,

    /// Upper bound for a single service call. A call still outstanding
    /// after it fails as a network error.
    pub request_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            store_key: StoreKey::Watchlist,
            search_debounce: Duration::from_millis(300),
            refresh_every: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
        }
    }
}
