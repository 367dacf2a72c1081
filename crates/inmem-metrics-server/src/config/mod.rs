//! Server config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use inmem_metrics_core::error::{MetricsError, Result};

pub use schema::{ServerConfig, ServerSection};

/// Environment variable overriding the config path.
pub const CONFIG_PATH_ENV: &str = "INMEM_METRICS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "inmem-metrics.yaml";

pub fn load_from_file(path: &str) -> Result<ServerConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| MetricsError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServerConfig> {
    let cfg: ServerConfig = serde_yaml::from_str(s)
        .map_err(|e| MetricsError::Validation(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load `path`, or fall back to defaults when the file does not exist.
pub fn load_or_default(path: &str) -> Result<ServerConfig> {
    if Path::new(path).exists() {
        load_from_file(path)
    } else {
        tracing::info!(%path, "config file not found, using defaults");
        let cfg = ServerConfig::default();
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Resolve the config path from the environment.
pub fn config_path() -> String {
    std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}
