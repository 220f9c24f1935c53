//! Backend-side record of backup sources, destination and overwrite flag.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::BridgeConfig;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct BookState {
    #[serde(rename = "LOC")]
    locations: Vec<String>,
    #[serde(rename = "DES")]
    destination: String,
    #[serde(rename = "OVR")]
    overwrite: bool,
}

/// On-disk shape; every key is optional so older files still load.
#[derive(Debug, Default, Deserialize)]
struct BookFile {
    #[serde(rename = "LOC", default)]
    locations: Vec<String>,
    #[serde(rename = "DES", default)]
    destination: String,
    #[serde(rename = "OVR", default)]
    overwrite: Option<bool>,
}

/// Persisted backup locations.
///
/// Locations are unique and must be existing directories when added. Every
/// mutation is written through to the backing file before it takes effect,
/// so a failed save leaves the book unchanged.
#[derive(Debug, Clone)]
pub struct LocationBook {
    path: Option<PathBuf>,
    state: BookState,
}

impl LocationBook {
    /// A book that is never written to disk.
    pub fn in_memory(default_overwrite: bool) -> Self {
        Self {
            path: None,
            state: BookState {
                locations: Vec::new(),
                destination: String::new(),
                overwrite: default_overwrite,
            },
        }
    }

    /// Load the book at `path`. A missing or unparsable file yields an empty
    /// book; the file is rewritten on first mutation.
    pub fn open(path: impl Into<PathBuf>, default_overwrite: bool) -> Result<Self> {
        let path = path.into();
        let file = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str::<BookFile>(&raw).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), "unreadable location book, starting empty: {e}");
                BookFile::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no location book yet");
                BookFile::default()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path: Some(path),
            state: BookState {
                locations: file.locations,
                destination: file.destination,
                overwrite: file.overwrite.unwrap_or(default_overwrite),
            },
        })
    }

    /// Open the book named by `config`, or an in-memory one when there is
    /// no config directory to keep it in.
    pub fn from_config(config: &BridgeConfig) -> Result<Self> {
        match config.state_path() {
            Some(path) => Self::open(path, config.default_overwrite),
            None => {
                tracing::warn!("no config directory; location book will not be saved");
                Ok(Self::in_memory(config.default_overwrite))
            }
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn locations(&self) -> &[String] {
        &self.state.locations
    }

    pub fn destination(&self) -> &str {
        &self.state.destination
    }

    pub fn overwrite(&self) -> bool {
        self.state.overwrite
    }

    /// Add `location` if it is an existing directory not already listed.
    ///
    /// Returns whether it was added.
    pub fn add_location(&mut self, location: &str) -> Result<bool> {
        if !Path::new(location).is_dir() {
            tracing::info!(%location, "not adding location: not a directory");
            return Ok(false);
        }
        if self.state.locations.iter().any(|l| l == location) {
            tracing::info!(%location, "not adding location: already listed");
            return Ok(false);
        }
        self.update(|s| s.locations.push(location.to_string()))?;
        Ok(true)
    }

    /// Returns whether `location` was listed.
    pub fn remove_location(&mut self, location: &str) -> Result<bool> {
        let Some(index) = self.state.locations.iter().position(|l| l == location) else {
            return Ok(false);
        };
        self.update(|s| {
            s.locations.remove(index);
        })?;
        Ok(true)
    }

    /// Set the destination if `destination` is an existing directory.
    ///
    /// Returns whether it was accepted.
    pub fn set_destination(&mut self, destination: &str) -> Result<bool> {
        if destination.is_empty() || !Path::new(destination).is_dir() {
            return Ok(false);
        }
        self.update(|s| s.destination = destination.to_string())?;
        Ok(true)
    }

    pub fn set_overwrite(&mut self, value: bool) -> Result<()> {
        self.update(|s| s.overwrite = value)
    }

    /// Listed locations that are no longer directories.
    pub fn invalid_locations(&self) -> Vec<&str> {
        self.state
            .locations
            .iter()
            .filter(|l| !Path::new(l.as_str()).is_dir())
            .map(String::as_str)
            .collect()
    }

    fn update(&mut self, apply: impl FnOnce(&mut BookState)) -> Result<()> {
        let mut next = self.state.clone();
        apply(&mut next);
        if let Some(path) = &self.path {
            save(path, &next)?;
        }
        self.state = next;
        Ok(())
    }
}

/// Write to a temp file beside `path`, then rename over it, so a crash
/// mid-save never leaves a truncated book.
fn save(path: &Path, state: &BookState) -> Result<()> {
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => parent,
        None => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(state)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
