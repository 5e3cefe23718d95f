//! `~/.mae/config.toml`, holding an `ImporterConfig`.
//!
//! Precedence when building the effective config: CLI flag, then
//! environment (clap resolves both), then this file, then built-in defaults.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use mae_core::ImporterConfig;

use crate::state::ensure_mae_home;

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_mae_home()?.join("config.toml"))
}

pub fn load_config() -> Result<ImporterConfig> {
    load_config_from(&config_path()?)
}

/// A missing file yields defaults; fields absent from the file do too.
pub fn load_config_from(path: &Path) -> Result<ImporterConfig> {
    if !path.exists() {
        return Ok(ImporterConfig::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config_to(path: &Path, cfg: &ImporterConfig) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Write defaults unless a config already exists. Returns whether a file was written.
pub fn init_config_at(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config_to(path, &ImporterConfig::default())?;
    Ok(true)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if init_config_at(&p)? {
        println!("Wrote {}", p.display());
    } else {
        println!("Config already exists: {}", p.display());
    }
    Ok(())
}

/// File config with flag/env overrides applied on top.
pub fn effective_config(base_url: Option<&str>, mode: Option<&str>) -> Result<ImporterConfig> {
    Ok(load_config()?.with_overrides(base_url, mode))
}
