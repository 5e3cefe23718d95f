//! Statement interpretation modes and the ordered candidate list.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ImporterConfig;

/// A token telling the parsing service which bank template to apply.
///
/// Always trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImportMode(String);

impl ImportMode {
    /// Trim the token; whitespace-only tokens yield `None`.
    pub fn parse(token: &str) -> Option<Self> {
        let t = token.trim();
        if t.is_empty() {
            None
        } else {
            Some(Self(t.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ImportMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| "mode token must not be blank".to_string())
    }
}

impl From<ImportMode> for String {
    fn from(mode: ImportMode) -> Self {
        mode.0
    }
}

/// Ordered, de-duplicated candidate modes for one import.
///
/// Priority: configured, fallback, debit, fallback again, credit.
/// Blank tokens are dropped and only the first occurrence of a token is kept
/// (case-sensitive).
pub fn candidate_modes(config: &ImporterConfig) -> Vec<ImportMode> {
    let preferred = config.mode.as_deref().unwrap_or(&config.fallback_mode);
    let raw = [
        preferred,
        config.fallback_mode.as_str(),
        config.debit_mode.as_str(),
        config.fallback_mode.as_str(),
        config.credit_mode.as_str(),
    ];
    dedup_modes(raw)
}

/// Trim, drop blanks and keep first occurrences.
pub fn dedup_modes<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Vec<ImportMode> {
    let mut out: Vec<ImportMode> = Vec::new();
    for mode in tokens.into_iter().filter_map(ImportMode::parse) {
        if !out.contains(&mode) {
            out.push(mode);
        }
    }
    out
}
