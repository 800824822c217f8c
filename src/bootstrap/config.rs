//! # Configuration Loader
//!
//! Reads the TOML configuration file and maps it onto [`BridgeConfig`].
//! Absent sections and fields take their defaults; anything present must
//! parse.

use std::path::{Path, PathBuf};

use anyhow::Context;
use cb_core::BridgeConfig;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "CLIPBRIDGE_CONFIG";

const APP_DIR_NAME: &str = "clipbridge";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Locate the configuration file.
///
/// `CLIPBRIDGE_CONFIG` wins when set and non-empty; otherwise
/// `<config dir>/clipbridge/config.toml`. `None` when the platform has no
/// config directory.
pub fn resolve_config_path() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME)),
    }
}

/// Load configuration from a TOML file
///
/// # Errors
///
/// Returns error if:
/// - File cannot be read (I/O error)
/// - Content is not valid TOML
/// - A value has the wrong type or an unknown permission state
pub fn load_config(config_path: &Path) -> anyhow::Result<BridgeConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
}

/// Load configuration, falling back to defaults when there is no file.
pub fn load_or_default(config_path: Option<&Path>) -> anyhow::Result<BridgeConfig> {
    match config_path {
        Some(path) if path.exists() => load_config(path),
        _ => Ok(BridgeConfig::default()),
    }
}
