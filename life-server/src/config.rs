//! Server configuration, read from a TOML file and overridable from the CLI.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

/// Server configuration (TOML).
///
/// Missing fields default to values suitable for local use.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind: String,

    /// Port to listen on.
    pub port: u16,

    /// Directory holding board records.
    pub data_dir: PathBuf,

    /// Requested step counts above this are clamped down to it.
    pub max_steps: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from("life-data"),
            max_steps: 1000,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.bind.trim().is_empty() {
            return Err(anyhow!("bind must be non-empty"));
        }
        if self.port == 0 {
            return Err(anyhow!("port must be > 0"));
        }
        if self.max_steps == 0 {
            return Err(anyhow!("max_steps must be > 0"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ServerConfig::default()`.
pub fn load_config(path: &Path) -> Result<ServerConfig> {
    if !path.exists() {
        let cfg = ServerConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ServerConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
