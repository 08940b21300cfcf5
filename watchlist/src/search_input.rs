//! Debounced search input.
//!
//! Raw keystrokes are coalesced: a value is dispatched only after it stayed
//! unchanged for the configured quiet period, and only if it differs from
//! the last dispatched value once surrounding whitespace is ignored. Each
//! dispatch runs as its own task so a newer query can supersede an
//! in-flight one.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::synchronizer::WatchlistSynchronizer;
use crate::types::SearchOutcome;

/// Handle feeding the debounce loop. Dropping it stops the loop.
pub struct SearchInput {
    tx: mpsc::UnboundedSender<String>,
    task: JoinHandle<()>,
}

impl SearchInput {
    /// Feed the current content of the search box. Returns false once the
    /// loop is gone.
    pub fn push(&self, text: impl Into<String>) -> bool {
        self.tx.send(text.into()).is_ok()
    }

    pub fn shutdown(self) {
        // Drop does the work.
    }
}

impl Drop for SearchInput {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub fn spawn_search_input(sync: &Arc<WatchlistSynchronizer>) -> SearchInput {
    let (tx, rx) = mpsc::unbounded_channel();
    let quiet = sync.config().search_debounce;
    let task = tokio::spawn(run_debounce_loop(Arc::clone(sync), rx, quiet));

    SearchInput { tx, task }
}

async fn run_debounce_loop(
    sync: Arc<WatchlistSynchronizer>,
    mut rx: mpsc::UnboundedReceiver<String>,
    quiet: Duration,
) {
    debug!(quiet_ms = quiet.as_millis() as u64, "search input loop started");

    let mut pending: Option<String> = None;
    let mut last_dispatched: Option<String> = None;

    loop {
        let Some(current) = pending.take() else {
            match rx.recv().await {
                Some(text) => {
                    pending = Some(text);
                    continue;
                }
                None => break,
            }
        };

        tokio::select! {
            next = rx.recv() => match next {
                Some(text) => pending = Some(text),
                None => {
                    dispatch(&sync, current, &mut last_dispatched);
                    break;
                }
            },
            _ = sleep(quiet) => dispatch(&sync, current, &mut last_dispatched),
        }
    }

    debug!("search input loop stopped");
}

fn dispatch(sync: &Arc<WatchlistSynchronizer>, query: String, last: &mut Option<String>) {
    // search trims too, so "app " is the same request as "app"
    let key = query.trim();
    if last.as_deref() == Some(key) {
        return;
    }
    *last = Some(key.to_string());

    let sync = Arc::clone(sync);
    tokio::spawn(async move {
        match sync.search(&query).await {
            SearchOutcome::Ok(stocks) => {
                info!(query = %query, matches = stocks.len(), "search completed")
            }
            SearchOutcome::Cancelled => debug!(query = %query, "search superseded"),
            SearchOutcome::Error(e) => warn!(query = %query, error = %e, "search failed"),
        }
    });
}
