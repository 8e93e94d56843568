//! Config file loading.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::LaunchConfig;
use crate::error::LaunchError;

/// Config file read when no path is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/rpctest/squared.toml";

/// Load configuration from the given path, or the default location.
///
/// A missing default file means built-in defaults; a missing explicit file
/// is an error.
pub fn load_config(path: Option<&Path>) -> Result<LaunchConfig, LaunchError> {
    let config_path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), Path::to_path_buf);

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| LaunchError::Config(format!("failed to read config: {e}")))?;
        let config: LaunchConfig = toml::from_str(&content)
            .map_err(|e| LaunchError::Config(format!("failed to parse config: {e}")))?;
        info!(path = %config_path.display(), "loaded config");
        Ok(config)
    } else if path.is_some() {
        Err(LaunchError::Config(format!(
            "config file {} does not exist",
            config_path.display()
        )))
    } else {
        Ok(LaunchConfig::default())
    }
}
