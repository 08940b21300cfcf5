//! Wire shapes of the remote stock service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Stock;

/// `GET /search/` body: ticker → company name, in the service's
/// relevance order.
pub type SearchResponse = serde_json::Map<String, Value>;

/// `GET /prices/` body: ticker → prices.
pub type PriceResponse = BTreeMap<String, StockPrice>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockPrice {
    pub price: f64,
    pub last_close: f64,
}

/// Maps a search body to bare stocks (no prices, not in the watchlist),
/// keeping the order of the body.
pub fn stocks_from_search(res: SearchResponse) -> Vec<Stock> {
    res.into_iter()
        .map(|(ticker, name)| {
            let name = match name {
                Value::String(s) => s,
                other => other.to_string(),
            };
            Stock::new(ticker, name)
        })
        .collect()
}
