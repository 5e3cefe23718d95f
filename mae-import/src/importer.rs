//! Mode orchestrator.
//!
//! Candidate modes are tried strictly one after another, each exactly once.
//! The first mode whose rows map to at least one transaction wins. Failed
//! modes never abort the loop; once every mode is exhausted the last network
//! error is reported, or `NoTransactions` if none occurred.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use url::Url;

use mae_core::{ImportError, ImportMode, ImportResult, ImporterConfig, StatementFile, candidate_modes};
use mae_ingest::map_rows;

use crate::error::RequestError;
use crate::request::ProcessRequest;
use crate::response::classify;
use crate::transport::{HttpTransport, StatementTransport};

pub struct StatementImporter {
    pub(crate) config: ImporterConfig,
    pub(crate) base_url: Url,
    pub(crate) transport: Arc<dyn StatementTransport>,
}

impl StatementImporter {
    /// Build an importer over any transport. Fails only on an unparseable
    /// base URL.
    pub fn new(config: ImporterConfig, transport: Arc<dyn StatementTransport>) -> Result<Self> {
        let base_url = Url::parse(config.base_url.trim())
            .with_context(|| format!("invalid service base url: {}", config.base_url))?;
        Ok(Self {
            config,
            base_url,
            transport,
        })
    }

    /// Importer backed by the reqwest transport, honouring `timeout_secs`.
    pub fn over_http(config: ImporterConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout_secs.map(Duration::from_secs))?;
        Self::new(config, Arc::new(transport))
    }

    pub fn config(&self) -> &ImporterConfig {
        &self.config
    }

    pub fn candidate_modes(&self) -> Vec<ImportMode> {
        candidate_modes(&self.config)
    }

    /// Import a statement, trying each candidate mode in priority order.
    ///
    /// `StatementFile` cannot hold an empty buffer, so `InvalidFile` is
    /// raised at construction and never reaches this loop.
    pub async fn import(&self, file: &StatementFile) -> Result<ImportResult, ImportError> {
        let modes = self.candidate_modes();
        info!(file = file.filename(), bytes = file.len(), candidates = modes.len(), "importing statement");

        let mut last_network: Option<ImportError> = None;
        let mut last_failure: Option<String> = None;

        for mode in &modes {
            match self.attempt(mode, file).await {
                Ok(result) if !result.is_empty() => {
                    info!(
                        mode = %mode,
                        transactions = result.len(),
                        skipped = result.skipped_rows,
                        "import succeeded"
                    );
                    return Ok(result);
                }
                Ok(result) => {
                    info!(mode = %mode, skipped = result.skipped_rows, "mode produced no transactions");
                }
                Err(RequestError::Import(err)) if err.is_network() => {
                    warn!(mode = %mode, error = %err, "mode failed with server error");
                    last_network = Some(err);
                }
                Err(RequestError::Transport(err)) if self.config.unreachable_is_network => {
                    warn!(mode = %mode, error = %format!("{err:#}"), "service unreachable");
                    last_network = Some(ImportError::network(0, format!("{err:#}")));
                }
                Err(err) => {
                    warn!(mode = %mode, error = %err, "mode failed, trying next");
                    last_failure = Some(format!("{mode}: {err}"));
                }
            }
        }

        Err(last_network.unwrap_or(ImportError::NoTransactions { last_failure }))
    }

    /// One mode, end to end: build, send, classify, map.
    async fn attempt(&self, mode: &ImportMode, file: &StatementFile) -> Result<ImportResult, RequestError> {
        let request = ProcessRequest::new(&self.base_url, mode, file).map_err(RequestError::Transport)?;
        debug!(mode = %mode, url = %request.url, "attempting mode");

        let raw = self
            .transport
            .post_statement(request)
            .await
            .map_err(RequestError::Transport)?;
        let response = classify(raw.status, &raw.body)?;
        let mapped = map_rows(&response.rows);

        Ok(ImportResult {
            transactions: mapped.transactions,
            mode: mode.clone(),
            import_id: response.import_id,
            skipped_rows: mapped.skipped,
            partial_errors: response.errors,
        })
    }
}
