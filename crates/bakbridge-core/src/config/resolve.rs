use std::fmt;
use std::path::{Path, PathBuf};

use crate::platform::paths;

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "BAKBRIDGE_CONFIG";

/// Tracks where the config file was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Passed in by the embedding application.
    Explicit(PathBuf),
    /// Set via the `BAKBRIDGE_CONFIG` env var.
    EnvVar(PathBuf),
    /// Found in the per-user config directory.
    UserDir(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> &Path {
        match self {
            ConfigSource::Explicit(p) => p,
            ConfigSource::EnvVar(p) => p,
            ConfigSource::UserDir(p) => p,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Explicit(p) => write!(f, "{} (explicit)", p.display()),
            ConfigSource::EnvVar(p) => write!(f, "{} ({CONFIG_ENV_VAR})", p.display()),
            ConfigSource::UserDir(p) => write!(f, "{} (user)", p.display()),
        }
    }
}

/// `<config_dir>/bakbridge/config.yaml`.
pub fn default_config_path() -> Option<PathBuf> {
    paths::app_config_dir().map(|d| d.join("config.yaml"))
}

/// Resolve which config file to use.
///
/// Priority: explicit path > `BAKBRIDGE_CONFIG` > existing user config file.
/// Returns `None` if nothing is found.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<ConfigSource> {
    if let Some(path) = explicit {
        return Some(ConfigSource::Explicit(path.to_path_buf()));
    }

    if let Some(val) = std::env::var_os(CONFIG_ENV_VAR) {
        if !val.is_empty() {
            return Some(ConfigSource::EnvVar(PathBuf::from(val)));
        }
    }

    default_config_path()
        .filter(|p| p.exists())
        .map(ConfigSource::UserDir)
}
