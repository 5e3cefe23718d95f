//! mae-core: data model shared by the statement importer crates

pub mod config;
pub mod error;
pub mod mode;
pub mod statement;
pub mod transaction;

pub use config::ImporterConfig;
pub use error::ImportError;
pub use mode::{ImportMode, candidate_modes};
pub use statement::StatementFile;
pub use transaction::{AccountSource, ImportResult, PartialError, Transaction};
