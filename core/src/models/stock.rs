use std::fmt;

use serde::{Deserialize, Serialize};

/// A tradable instrument as seen by the watchlist.
///
/// `ticker` is the identity: two records with the same ticker describe the
/// same instrument, wherever they live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub ticker: String,
    pub company_name: String,

    /// Latest traded price, absent until the first price fetch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    /// Previous session close, absent until the first price fetch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_close_price: Option<f64>,

    #[serde(default)]
    pub is_in_watchlist: bool,
}

impl Stock {
    pub fn new(ticker: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            company_name: company_name.into(),
            price: None,
            last_close_price: None,
            is_in_watchlist: false,
        }
    }

    pub fn with_prices(mut self, price: f64, last_close_price: f64) -> Self {
        self.price = Some(price);
        self.last_close_price = Some(last_close_price);
        self
    }
}

/// How the change against the previous close is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Amount,
    Percent,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Amount => DisplayMode::Percent,
            DisplayMode::Percent => DisplayMode::Amount,
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DisplayMode::Amount => "amount",
            DisplayMode::Percent => "percent",
        };
        f.write_str(s)
    }
}
