use adapters::StockApiError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The stock service failed, timed out or could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The local store could not be read or written. In-memory state stays
    /// authoritative.
    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("unknown ticker: {0}")]
    UnknownTicker(String),
}

impl From<&StockApiError> for SyncError {
    fn from(e: &StockApiError) -> Self {
        SyncError::Network(e.to_string())
    }
}

impl From<&anyhow::Error> for SyncError {
    fn from(e: &anyhow::Error) -> Self {
        // alternate form keeps the context chain
        SyncError::Persistence(format!("{e:#}"))
    }
}
