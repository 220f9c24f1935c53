mod defaults;
mod resolve;
mod util;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};
use crate::platform::paths;

pub use self::resolve::{CONFIG_ENV_VAR, ConfigSource, default_config_path, resolve_config_path};
pub use self::util::expand_tilde;

/// File name of the persisted location book inside the app config directory.
pub const STATE_FILE_NAME: &str = "state.json";

/// Settings for the reference backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    /// Where the location book is kept. `~` is expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_file: Option<String>,
    /// Overwrite flag used until the user sets one.
    #[serde(default = "defaults::default_overwrite")]
    pub default_overwrite: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            state_file: None,
            default_overwrite: defaults::default_overwrite(),
        }
    }
}

impl BridgeConfig {
    /// Resolved location-book path, `None` when no config directory exists.
    pub fn state_path(&self) -> Option<PathBuf> {
        match &self.state_file {
            Some(raw) => Some(expand_tilde(raw)),
            None => paths::app_config_dir().map(|d| d.join(STATE_FILE_NAME)),
        }
    }
}

/// Parse a YAML config file. An empty file yields the defaults.
pub fn load_config(path: &Path) -> Result<BridgeConfig> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        BridgeError::Config(format!("cannot read '{}': {e}", path.display()))
    })?;
    if raw.trim().is_empty() {
        return Ok(BridgeConfig::default());
    }
    let config: BridgeConfig = serde_yaml::from_str(&raw)?;
    if let Some(state_file) = &config.state_file {
        if state_file.trim().is_empty() {
            return Err(BridgeError::Config("state_file must not be empty".into()));
        }
    }
    Ok(config)
}

/// Resolve and load the config, falling back to defaults when none exists.
///
/// An explicitly named file that is missing is an error; a missing default
/// file is not.
pub fn load_or_default(explicit: Option<&Path>) -> Result<(Option<ConfigSource>, BridgeConfig)> {
    match resolve_config_path(explicit) {
        Some(source) => {
            tracing::info!("Using config: {source}");
            let config = load_config(source.path())?;
            Ok((Some(source), config))
        }
        None => {
            tracing::debug!("no config file found, using defaults");
            Ok((None, BridgeConfig::default()))
        }
    }
}
