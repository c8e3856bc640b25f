//! Config store for loading and saving `claude_desktop_config.json`.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::fs::atomic_write;

use super::{DesktopConfig, paths};

#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Store for the default per-user config location.
    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(paths::default_config_path()?))
    }

    /// Store for an explicit path, falling back to the default location.
    pub fn from_override(config_path: Option<PathBuf>) -> Result<Self> {
        Ok(Self::new(paths::resolve_config_path(config_path)?))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn exists(&self) -> bool {
        self.config_path.is_file()
    }

    /// Load the config.
    ///
    /// - A missing file is created with an empty document so later runs see a
    ///   stable file.
    /// - An empty or whitespace-only file yields an empty document and is
    ///   left untouched on disk.
    /// - Malformed JSON fails with [`Error::ConfigFormat`]; nothing is
    ///   recovered.
    pub fn load(&self) -> Result<DesktopConfig> {
        debug!(path = %self.config_path.display(), "loading config");

        if !self.exists() {
            info!(
                path = %self.config_path.display(),
                "config file not found, creating a new one"
            );
            let config = DesktopConfig::new();
            self.save(&config)?;
            return Ok(config);
        }

        let content =
            std::fs::read_to_string(&self.config_path).map_err(|source| Error::ConfigRead {
                path: self.config_path.clone(),
                source,
            })?;
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

        if content.trim().is_empty() {
            warn!(
                path = %self.config_path.display(),
                "config file is empty, using an empty config"
            );
            return Ok(DesktopConfig::new());
        }

        serde_json::from_str(content).map_err(|err| self.format_error(err))
    }

    /// Serialize the whole document and atomically replace the file.
    pub fn save(&self, config: &DesktopConfig) -> Result<()> {
        debug!(path = %self.config_path.display(), "saving config");

        if let Some(parent) = self.config_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| self.write_error(source))?;
        }

        let mut bytes = serde_json::to_vec_pretty(config)
            .map_err(|err| self.write_error(std::io::Error::other(err)))?;
        bytes.push(b'\n');

        atomic_write(&self.config_path, &bytes).map_err(|source| self.write_error(source))?;
        Ok(())
    }

    pub(crate) fn format_error(&self, err: serde_json::Error) -> Error {
        Error::ConfigFormat {
            path: self.config_path.clone(),
            message: err.to_string(),
        }
    }

    fn write_error(&self, source: std::io::Error) -> Error {
        Error::ConfigWrite {
            path: self.config_path.clone(),
            source,
        }
    }
}
