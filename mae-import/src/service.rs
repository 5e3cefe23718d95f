//! Read-only service endpoints: supported modes and health.

use serde::Deserialize;

use mae_core::{ImportError, ImportMode};

use crate::error::RequestError;
use crate::importer::StatementImporter;
use crate::request::{HEALTH_PATH, MODES_PATH, endpoint};
use crate::response::{error_message, is_success};

#[derive(Debug, Deserialize)]
struct ModesBody {
    modes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct HealthBody {
    status: String,
}

impl StatementImporter {
    /// Modes the service advertises, in the order it lists them.
    pub async fn list_modes(&self) -> Result<Vec<ImportMode>, RequestError> {
        let body: ModesBody = self.get_json(MODES_PATH).await?;
        Ok(body.modes.iter().filter_map(|m| ImportMode::parse(m)).collect())
    }

    /// The service's self-reported status, `"ok"` when healthy.
    pub async fn health(&self) -> Result<String, RequestError> {
        let body: HealthBody = self.get_json(HEALTH_PATH).await?;
        Ok(body.status)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, RequestError> {
        let url = endpoint(&self.base_url, path).map_err(RequestError::Transport)?;
        let raw = self
            .transport
            .get(url)
            .await
            .map_err(RequestError::Transport)?;
        if !is_success(raw.status) {
            return Err(ImportError::network(raw.status, error_message(&raw.body)).into());
        }
        serde_json::from_slice(&raw.body).map_err(|_| ImportError::MalformedResponse.into())
    }
}
