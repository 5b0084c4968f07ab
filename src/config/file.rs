//! Configuration file loading
//!
//! Handles loading configuration from YAML files.

use crate::config::Config;
use crate::error::ConfigError;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Path used when no `--config-file` is given
pub const DEFAULT_CONFIG_PATH: &str = "./config.yaml";

/// Configuration file handler
pub struct ConfigFile;

impl ConfigFile {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::FileNotFound(display.clone()),
            _ => ConfigError::Unreadable {
                path: display.clone(),
                source: e,
            },
        })?;

        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    /// Resolve the file to load.
    ///
    /// An explicit non-default path is used as is. The default path falls
    /// back to the per-user location when it does not exist.
    pub fn resolve(path: &str) -> PathBuf {
        let requested = PathBuf::from(path);
        if path != DEFAULT_CONFIG_PATH || requested.exists() {
            return requested;
        }

        Self::default_paths()
            .into_iter()
            .find(|p| p.exists())
            .unwrap_or(requested)
    }

    /// Get default configuration file paths
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(DEFAULT_CONFIG_PATH)];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("remind-us").join("config.yaml"));
        }

        paths
    }
}
