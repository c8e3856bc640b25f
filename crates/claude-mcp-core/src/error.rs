//! Error taxonomy for configuration, directory and process operations.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::backup::RestoreStep;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The config file exists but is not a valid JSON object.
    #[error("Invalid config format in {path}: {message}")]
    ConfigFormat { path: PathBuf, message: String },

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine the per-user config directory")]
    ConfigDirUnavailable,

    #[error("Directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Directory is already allowed: {0}. Use --force to add it anyway.")]
    DuplicateDirectory(String),

    #[error("Directory is not in the allow-list: {0}")]
    DirectoryNotListed(String),

    #[error("The filesystem server is not configured")]
    NoFilesystemServer,

    #[error("Invalid index {index}: expected a value between 1 and {count}")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("No config file to back up at {}", .0.display())]
    BackupSourceMissing(PathBuf),

    #[error("Backup file not found: {}", .0.display())]
    BackupNotFound(PathBuf),

    #[error("Failed to create backup {path}: {source}")]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Restore failed during {step} step{}: {source}", snapshot_hint(.snapshot))]
    RestoreFailed {
        step: RestoreStep,
        snapshot: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error("Process {pid} did not exit within {}ms", .timeout.as_millis())]
    ProcessStopTimeout { pid: u32, timeout: Duration },

    #[error("Claude Desktop installation not found. Please start it manually.")]
    InstallationNotFound,

    #[error("Failed to launch {path}: {source}")]
    LaunchFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Claude Desktop was launched but is not running")]
    StartupNotConfirmed,
}

impl Error {
    /// Whether this is an expected, user-facing failure rather than an I/O or
    /// format fault. Both kinds exit with status 1.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Error::ConfigFormat { .. }
                | Error::ConfigRead { .. }
                | Error::ConfigWrite { .. }
                | Error::ConfigDirUnavailable
        )
    }
}

fn snapshot_hint(snapshot: &Option<PathBuf>) -> String {
    match snapshot {
        Some(path) => format!(" (previous config kept at {})", path.display()),
        None => String::new(),
    }
}
