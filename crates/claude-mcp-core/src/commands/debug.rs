//! Diagnostics about the config file, without modifying it.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::ConfigStore;
use crate::directory::{FILESYSTEM_SERVER, read_paths};
use crate::error::Result;

/// Snapshot of what the tool sees in the config file
#[derive(Debug, Clone, Serialize)]
pub struct DebugReport {
    pub config_path: PathBuf,
    pub exists: bool,
    pub size_bytes: Option<u64>,
    /// Parse failure, if the file could not be read as a config
    pub parse_error: Option<String>,
    pub servers: Vec<String>,
    pub extra_keys: Vec<String>,
    pub filesystem_command: Option<String>,
    pub filesystem_args: Vec<String>,
    pub directories: Vec<String>,
    pub backups: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct DebugCommand {
    store: ConfigStore,
}

impl DebugCommand {
    pub fn new(store: ConfigStore) -> Self {
        Self { store }
    }

    /// Inspect the config. Unlike the directory commands this never creates
    /// the file, and a parse failure is reported instead of returned.
    pub fn execute(&self) -> Result<DebugReport> {
        let config_path = self.store.config_path().to_path_buf();
        let exists = self.store.exists();
        let size_bytes = std::fs::metadata(&config_path).ok().map(|m| m.len());

        let mut report = DebugReport {
            config_path,
            exists,
            size_bytes,
            parse_error: None,
            servers: Vec::new(),
            extra_keys: Vec::new(),
            filesystem_command: None,
            filesystem_args: Vec::new(),
            directories: Vec::new(),
            backups: self.store.list_backups()?,
        };

        if !exists {
            return Ok(report);
        }

        let config = match self.store.load() {
            Ok(config) => config,
            Err(err) => {
                report.parse_error = Some(err.to_string());
                return Ok(report);
            }
        };

        report.servers = config.server_names().map(str::to_string).collect();
        report.extra_keys = config.extra.keys().cloned().collect();

        match config.server(FILESYSTEM_SERVER) {
            Ok(Some(entry)) => {
                report.directories = read_paths(&entry);
                report.filesystem_command = Some(entry.command);
                report.filesystem_args = entry.args;
            }
            Ok(None) => {}
            Err(err) => report.parse_error = Some(err.to_string()),
        }

        Ok(report)
    }
}
