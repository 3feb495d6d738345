//! Catalog client errors

use crate::dispatch::DispatchError;
use thiserror::Error;

/// Errors surfaced by the catalog client
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    #[error("API error {0}: {1}")]
    Status(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dispatcher error: {0}")]
    Dispatch(#[from] DispatchError),
}

impl CatalogError {
    /// Transient failures worth another attempt: timeouts, connection
    /// errors and non-2xx responses. A 2xx body that fails to parse is an
    /// upstream semantic failure and is returned as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CatalogError::Network(_) | CatalogError::Timeout(_) | CatalogError::Status(..)
        )
    }
}
