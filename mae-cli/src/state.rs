//! Per-user state directory for the `mae` binary.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `~/.mae`, where `config.toml` lives. Not created here.
pub fn mae_home() -> Result<PathBuf> {
    let home = std::env::var_os("HOME").context("HOME is not set; cannot locate ~/.mae")?;
    Ok(PathBuf::from(home).join(".mae"))
}

/// `mae_home`, created on first use.
pub fn ensure_mae_home() -> Result<PathBuf> {
    let dir = mae_home()?;
    if !dir.is_dir() {
        fs::create_dir_all(&dir).with_context(|| format!("create state dir {}", dir.display()))?;
        tracing::debug!(dir = %dir.display(), "created state dir");
    }
    Ok(dir)
}
