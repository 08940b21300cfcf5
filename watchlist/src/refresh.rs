//! Periodic price refresh.
//!
//! Every `refresh_every` the union of watchlist and search-result tickers is
//! priced in one request. Failures are logged and the loop keeps going.

use std::sync::Arc;

use common::logger::child_span;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{Instrument, debug, info, warn};

use crate::synchronizer::WatchlistSynchronizer;

/// Running refresh loop. Stopped by `shutdown` or on drop.
pub struct RefreshLoop {
    task: JoinHandle<()>,
}

impl RefreshLoop {
    pub fn shutdown(self) {
        // Drop does the work.
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RefreshLoop {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub fn spawn_refresh_loop(sync: &Arc<WatchlistSynchronizer>) -> RefreshLoop {
    let task = tokio::spawn(run_refresh_loop(Arc::clone(sync)));
    RefreshLoop { task }
}

async fn run_refresh_loop(sync: Arc<WatchlistSynchronizer>) {
    let every = sync.config().refresh_every;

    // first tick one period from now, like a plain repeating timer
    let mut ticker = interval_at(Instant::now() + every, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(every_ms = every.as_millis() as u64, "price refresh loop started");

    loop {
        ticker.tick().await;

        let tickers = sync.tracked_tickers();
        if tickers.is_empty() {
            debug!("nothing tracked; skipping refresh");
            continue;
        }

        let span = child_span("periodic_refresh");
        match sync.refresh_prices(&tickers, true).instrument(span).await {
            Ok(updated) => debug!(tickers = tickers.len(), updated, "periodic refresh done"),
            Err(e) => warn!(error = %e, "periodic refresh failed"),
        }
    }
}
