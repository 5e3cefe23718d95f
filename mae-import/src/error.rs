use mae_core::ImportError;
use thiserror::Error;

/// Why a single request to the parsing service failed.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The exchange completed and was classified (non-2xx, malformed body).
    #[error(transparent)]
    Import(#[from] ImportError),

    /// No usable response at all: DNS, refused connection, timeout.
    #[error("transport failure: {0:#}")]
    Transport(#[source] anyhow::Error),
}

impl RequestError {
    pub fn is_network(&self) -> bool {
        matches!(self, RequestError::Import(err) if err.is_network())
    }
}
