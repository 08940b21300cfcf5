use thiserror::Error;

#[derive(Error, Debug)]
pub enum StockApiError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded {code} {reason}")]
    Status { code: u16, reason: String },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl StockApiError {
    /// True when the service could not be reached at all (as opposed to
    /// answering with an error).
    pub fn is_transport(&self) -> bool {
        match self {
            StockApiError::Http(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }
}
