use std::time::Duration;

pub const DEFAULT_API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Clone, Debug)]
pub struct StockApiConfig {
    /// Service root, with or without a trailing slash.
    pub base_url: String,

    pub api_key: String,

    /// Header the key travels in.
    pub api_key_header: String,

    /// Per-request bound; an outstanding request past it fails instead of
    /// hanging the caller.
    pub timeout: Duration,
}

impl StockApiConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            api_key_header: DEFAULT_API_KEY_HEADER.to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}
