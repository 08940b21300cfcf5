pub mod api_models;
pub mod stock;

pub use api_models::{PriceResponse, SearchResponse, StockPrice, stocks_from_search};
pub use stock::{DisplayMode, Stock};
