pub mod client;
pub mod errors;
pub mod types;

use async_trait::async_trait;
use corelib::{PriceResponse, Stock};

pub use client::HttpStockApi;
pub use errors::StockApiError;
pub use types::{DEFAULT_API_KEY_HEADER, StockApiConfig};

/// Remote collaborator answering ticker/name searches and batched price lookups.
#[async_trait]
pub trait StockApi: Send + Sync {
    /// Stocks matching `query`, without prices.
    async fn search(&self, query: &str) -> Result<Vec<Stock>, StockApiError>;

    /// Prices for `tickers` in one round-trip. Unknown tickers are simply
    /// absent from the returned map.
    async fn prices(&self, tickers: &[String]) -> Result<PriceResponse, StockApiError>;
}
