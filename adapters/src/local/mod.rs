//! Offline stock service: searches a fixed in-memory list instead of a
//! remote endpoint. Used when no search backend is configured.

pub mod fuzzy;

use async_trait::async_trait;
use corelib::{PriceResponse, Stock, StockPrice};
use tracing::debug;

use crate::stock_api::{StockApi, StockApiError};
pub use fuzzy::FuzzyMatcher;

pub struct LocalStockApi {
    stocks: Vec<Stock>,
    matcher: FuzzyMatcher,
}

impl LocalStockApi {
    pub fn new(stocks: Vec<Stock>) -> Self {
        Self::with_matcher(stocks, FuzzyMatcher::default())
    }

    pub fn with_matcher(stocks: Vec<Stock>, matcher: FuzzyMatcher) -> Self {
        Self { stocks, matcher }
    }

    /// Sample instruments for demos and offline runs.
    pub fn demo() -> Self {
        Self::new(vec![
            Stock::new("GOOGL", "Alphabet Inc.").with_prices(1515.99, 1524.38),
            Stock::new("AAPL", "Apple Inc.").with_prices(145.3, 147.38),
            Stock::new("AMZN", "Amazon.com Inc.").with_prices(3116.42, 3112.38),
            Stock::new("TSLA", "Tesla Inc.").with_prices(225.54, 225.38),
            Stock::new("META", "Meta Platforms").with_prices(325.38, 325.38),
            Stock::new("TDOC", "Teladoc Health").with_prices(18.54, 18.54),
            Stock::new("ALB", "Albert Bank").with_prices(52.28, 53.05),
        ])
    }

    pub fn stocks(&self) -> &[Stock] {
        &self.stocks
    }
}

#[async_trait]
impl StockApi for LocalStockApi {
    async fn search(&self, query: &str) -> Result<Vec<Stock>, StockApiError> {
        let hits: Vec<Stock> = self
            .matcher
            .search(query, &self.stocks)
            .into_iter()
            .map(|s| Stock::new(s.ticker.clone(), s.company_name.clone()))
            .collect();

        debug!(query, matches = hits.len(), "local fuzzy search");

        Ok(hits)
    }

    async fn prices(&self, tickers: &[String]) -> Result<PriceResponse, StockApiError> {
        let out = self
            .stocks
            .iter()
            .filter(|s| tickers.contains(&s.ticker))
            .filter_map(|s| match (s.price, s.last_close_price) {
                (Some(price), Some(last_close)) => {
                    Some((s.ticker.clone(), StockPrice { price, last_close }))
                }
                _ => None,
            })
            .collect();

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_strips_prices() {
        let api = LocalStockApi::demo();
        let hits = api.search("apple").await.unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].ticker, "AAPL");
        assert!(hits[0].price.is_none());
    }

    #[tokio::test]
    async fn prices_skip_unknown_and_unpriced() {
        let mut stocks = LocalStockApi::demo().stocks().to_vec();
        stocks.push(Stock::new("NEW", "Fresh Listing"));
        let api = LocalStockApi::new(stocks);

        let prices = api
            .prices(&["AAPL".into(), "NEW".into(), "NOPE".into()])
            .await
            .unwrap();

        assert_eq!(prices.len(), 1);
        assert_eq!(prices["AAPL"].last_close, 147.38);
    }
}
