#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use adapters::{StockApi, StockApiError};
use async_trait::async_trait;
use corelib::{PriceResponse, Stock, StockPrice};
use tokio::sync::Notify;

/// Scriptable stock service recording every call.
#[derive(Default)]
pub struct MockStockApi {
    pub search_results: Mutex<HashMap<String, Vec<Stock>>>,
    pub search_delays: Mutex<HashMap<String, Duration>>,
    pub prices: Mutex<PriceResponse>,

    pub fail_search: AtomicBool,
    pub fail_prices: AtomicBool,
    /// Search requests never complete.
    pub hang_search: AtomicBool,
    /// Price requests wait for a permit.
    pub price_gate: Mutex<Option<Arc<Notify>>>,

    pub search_calls: Mutex<Vec<String>>,
    pub price_calls: Mutex<Vec<Vec<String>>>,
}

impl MockStockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(self, query: &str, stocks: Vec<Stock>) -> Self {
        self.search_results
            .lock()
            .unwrap()
            .insert(query.to_string(), stocks);
        self
    }

    pub fn with_search_delay(self, query: &str, delay: Duration) -> Self {
        self.search_delays
            .lock()
            .unwrap()
            .insert(query.to_string(), delay);
        self
    }

    pub fn with_price(self, ticker: &str, price: f64, last_close: f64) -> Self {
        self.prices
            .lock()
            .unwrap()
            .insert(ticker.to_string(), StockPrice { price, last_close });
        self
    }

    pub fn gate_prices(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.price_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }

    pub fn price_calls(&self) -> Vec<Vec<String>> {
        self.price_calls.lock().unwrap().clone()
    }

    pub fn set_fail_search(&self, v: bool) {
        self.fail_search.store(v, Ordering::SeqCst);
    }

    pub fn set_fail_prices(&self, v: bool) {
        self.fail_prices.store(v, Ordering::SeqCst);
    }

    pub fn set_hang_search(&self, v: bool) {
        self.hang_search.store(v, Ordering::SeqCst);
    }
}

fn server_error() -> StockApiError {
    StockApiError::Status {
        code: 500,
        reason: "Internal Server Error".into(),
    }
}

#[async_trait]
impl StockApi for MockStockApi {
    async fn search(&self, query: &str) -> Result<Vec<Stock>, StockApiError> {
        self.search_calls.lock().unwrap().push(query.to_string());

        let delay = self.search_delays.lock().unwrap().get(query).copied();
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }

        if self.hang_search.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }

        if self.fail_search.load(Ordering::SeqCst) {
            return Err(server_error());
        }

        Ok(self
            .search_results
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }

    async fn prices(&self, tickers: &[String]) -> Result<PriceResponse, StockApiError> {
        self.price_calls.lock().unwrap().push(tickers.to_vec());

        let gate = self.price_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.fail_prices.load(Ordering::SeqCst) {
            return Err(server_error());
        }

        let all = self.prices.lock().unwrap();
        Ok(tickers
            .iter()
            .filter_map(|t| all.get(t).map(|p| (t.clone(), *p)))
            .collect())
    }
}
