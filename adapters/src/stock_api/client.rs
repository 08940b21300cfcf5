use std::time::Duration;

use async_trait::async_trait;
use corelib::{PriceResponse, SearchResponse, Stock, stocks_from_search};
use reqwest::{Client, Response, header};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::{StockApi, StockApiConfig, StockApiError};

/// reqwest-backed client of the remote stock service.
#[derive(Clone)]
pub struct HttpStockApi {
    http: Client,
    base_url: String,
    api_key: String,
    api_key_header: String,
}

impl HttpStockApi {
    pub fn new(cfg: StockApiConfig) -> Result<Self, StockApiError> {
        let http = Client::builder()
            .timeout(cfg.timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key,
            api_key_header: cfg.api_key_header,
        })
    }

    pub fn search_url(&self) -> String {
        format!("{}/search/", self.base_url)
    }

    pub fn prices_url(&self) -> String {
        format!("{}/prices/", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        param: (&str, &str),
    ) -> Result<T, StockApiError> {
        let resp = self
            .http
            .get(url)
            .query(&[param])
            .header(self.api_key_header.as_str(), self.api_key.as_str())
            .header(header::CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let resp = check_status(resp)?;
        let body = resp.bytes().await?;

        Ok(serde_json::from_slice(&body)?)
    }
}

fn check_status(resp: Response) -> Result<Response, StockApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let err = StockApiError::Status {
        code: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("unknown").to_string(),
    };
    warn!(error = %err, url = %resp.url(), "stock service rejected request");
    Err(err)
}

#[async_trait]
impl StockApi for HttpStockApi {
    #[instrument(skip(self), level = "debug")]
    async fn search(&self, query: &str) -> Result<Vec<Stock>, StockApiError> {
        let res: SearchResponse = self.get_json(&self.search_url(), ("query", query)).await?;

        debug!(matches = res.len(), "stock search answered");

        Ok(stocks_from_search(res))
    }

    #[instrument(skip(self), fields(count = tickers.len()), level = "debug")]
    async fn prices(&self, tickers: &[String]) -> Result<PriceResponse, StockApiError> {
        if tickers.is_empty() {
            return Ok(PriceResponse::new());
        }

        let csv = tickers.join(",");
        let res: PriceResponse = self.get_json(&self.prices_url(), ("tickers", csv.as_str())).await?;

        debug!(priced = res.len(), "stock prices fetched");

        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let api = HttpStockApi::new(StockApiConfig::new("https://test-url.com/", "k")).unwrap();

        assert_eq!(api.search_url(), "https://test-url.com/search/");
        assert_eq!(api.prices_url(), "https://test-url.com/prices/");
    }
}
