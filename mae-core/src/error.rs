//! Terminal outcomes of a failed import.

use thiserror::Error;

/// The only error kinds an import ever surfaces to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// The statement could not be read or was empty.
    #[error("statement file is empty or unreadable")]
    InvalidFile,

    /// The service answered with a non-2xx status.
    /// `status` is 0 when an unreachable service is folded into this class.
    #[error("server request failed ({status}): {message}")]
    Network { status: u16, message: String },

    /// A 2xx body that does not decode into a `rows` array of objects.
    #[error("server response did not contain transaction rows")]
    MalformedResponse,

    /// Every candidate mode was tried and none produced a transaction.
    #[error("no transactions found in statement{}", failure_suffix(.last_failure))]
    NoTransactions { last_failure: Option<String> },
}

fn failure_suffix(last_failure: &Option<String>) -> String {
    match last_failure {
        Some(m) => format!(" (last failure: {m})"),
        None => String::new(),
    }
}

impl ImportError {
    pub fn network(status: u16, message: impl Into<String>) -> Self {
        Self::Network {
            status,
            message: message.into(),
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}
