//! Config file discovery, TOML loading and CLI overrides.

use std::path::{Path, PathBuf};

use anyhow::Context;
use idleguard_core::{SessionConfig, SessionPolicy};

use crate::cli::WatchOpts;

/// `$XDG_CONFIG_HOME/idleguard/config.toml`, else `$HOME/.config/idleguard/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("idleguard").join("config.toml"))
}

pub fn parse_config(text: &str) -> anyhow::Result<SessionConfig> {
    toml::from_str(text).context("invalid config TOML")
}

/// An explicit path must exist. A missing default file means built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<SessionConfig> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => match default_config_path() {
            Some(path) => (path, false),
            None => return Ok(SessionConfig::default()),
        },
    };

    if !required && !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(SessionConfig::default());
    }

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = parse_config(&text).with_context(|| format!("in {}", path.display()))?;
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}

pub fn apply_overrides(mut config: SessionConfig, opts: &WatchOpts) -> SessionConfig {
    if let Some(timeout) = opts.timeout_minutes {
        config.timeout_minutes = timeout;
    }
    if let Some(warning) = opts.warning_minutes {
        config.warning_minutes = warning;
    }
    config
}

pub fn into_policy(config: SessionConfig) -> anyhow::Result<SessionPolicy> {
    config.into_policy().context("invalid session configuration")
}
