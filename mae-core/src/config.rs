//! Importer configuration, passed explicitly into the orchestrator.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/";
pub const DEFAULT_FALLBACK_MODE: &str = "m2u_current_account_debit";
pub const DEFAULT_DEBIT_MODE: &str = "maybank_debit";
pub const DEFAULT_CREDIT_MODE: &str = "maybank_credit";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImporterConfig {
    /// Root of the parsing service; `/process` is resolved against it.
    pub base_url: String,
    /// Caller's preferred mode. `None` means start with the fallback mode.
    pub mode: Option<String>,
    pub fallback_mode: String,
    pub debit_mode: String,
    pub credit_mode: String,
    /// Per-request timeout. `None` leaves the transport default in place.
    pub timeout_secs: Option<u64>,
    /// Report an unreachable service as `Network(0, ..)` instead of skipping
    /// to the next mode silently.
    pub unreachable_is_network: bool,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            mode: None,
            fallback_mode: DEFAULT_FALLBACK_MODE.to_string(),
            debit_mode: DEFAULT_DEBIT_MODE.to_string(),
            credit_mode: DEFAULT_CREDIT_MODE.to_string(),
            timeout_secs: None,
            unreachable_is_network: false,
        }
    }
}

impl ImporterConfig {
    /// Apply optional overrides from the config store. Blank values are
    /// treated as absent so the fixed defaults still apply.
    pub fn with_overrides(mut self, base_url: Option<&str>, mode: Option<&str>) -> Self {
        if let Some(url) = base_url.map(str::trim).filter(|u| !u.is_empty()) {
            self.base_url = url.to_string();
        }
        if let Some(m) = mode.map(str::trim).filter(|m| !m.is_empty()) {
            self.mode = Some(m.to_string());
        }
        self
    }
}
