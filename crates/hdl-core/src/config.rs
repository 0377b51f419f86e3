use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::progress::ObserverOptions;
use crate::transfer::TransferOptions;

/// Global configuration loaded from `~/.config/hdl/config.toml`.
///
/// Request headers are fixed and deliberately absent here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HdlConfig {
    /// Upper bound on the size of one body chunk, in bytes (libcurl receive buffer).
    pub chunk_size: usize,
    /// Delay between two progress renders, in milliseconds.
    pub progress_interval_ms: u64,
    /// TCP/TLS connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Maximum number of redirects followed before giving up.
    pub max_redirections: u32,
    /// Transfers slower than this many bytes/s for `low_speed_time_secs` are aborted as stalled.
    pub low_speed_limit_bytes: u32,
    /// See `low_speed_limit_bytes`.
    pub low_speed_time_secs: u64,
    /// Sanitize server-supplied filenames for Linux (strips path separators, `..`, control chars).
    pub sanitize_filenames: bool,
}

impl Default for HdlConfig {
    fn default() -> Self {
        Self {
            chunk_size: 8192,
            progress_interval_ms: 1000,
            connect_timeout_secs: 30,
            max_redirections: 10,
            low_speed_limit_bytes: 1,
            low_speed_time_secs: 60,
            sanitize_filenames: true,
        }
    }
}

impl HdlConfig {
    /// Engine settings derived from this config.
    pub fn transfer_options(&self) -> TransferOptions {
        TransferOptions {
            chunk_size: self.chunk_size.max(1),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            max_redirections: self.max_redirections,
            low_speed_limit: self.low_speed_limit_bytes,
            low_speed_time: Duration::from_secs(self.low_speed_time_secs),
            sanitize_filenames: self.sanitize_filenames,
        }
    }

    /// Observer settings derived from this config.
    pub fn observer_options(&self) -> ObserverOptions {
        ObserverOptions {
            interval: Duration::from_millis(self.progress_interval_ms.max(1)),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("hdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<HdlConfig> {
    load_or_init_at(&config_path()?)
}

/// Like `load_or_init` for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<HdlConfig> {
    if !path.exists() {
        let default_cfg = HdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)
            .with_context(|| format!("failed to write default config {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: HdlConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
