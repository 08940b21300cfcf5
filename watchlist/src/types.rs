use chrono::{DateTime, Utc};
use corelib::{DisplayMode, Stock};

use crate::errors::SyncError;

/// Result of a single `search` call.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Stocks returned by the service, tagged with watchlist membership.
    Ok(Vec<Stock>),

    /// A newer search superseded this one; nothing was applied.
    Cancelled,

    Error(SyncError),
}

impl SearchOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SearchOutcome::Cancelled)
    }
}

/// Immutable view of the synchronizer state, published on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Ordered by ticker.
    pub watchlist: Vec<Stock>,

    /// In the order the service returned them.
    pub search_results: Vec<Stock>,

    pub display_mode: DisplayMode,
    pub query: String,
    pub loading: bool,

    /// Single dismissible error; a newer one replaces it.
    pub error: Option<String>,

    /// False after a transport failure, until the next successful call.
    pub online: bool,

    /// Last successful price refresh.
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            watchlist: Vec::new(),
            search_results: Vec::new(),
            display_mode: DisplayMode::default(),
            query: String::new(),
            loading: false,
            error: None,
            online: true,
            refreshed_at: None,
        }
    }
}
