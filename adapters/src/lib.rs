pub mod local;
pub mod stock_api;

pub use local::LocalStockApi;
pub use stock_api::{HttpStockApi, StockApi, StockApiConfig, StockApiError};
