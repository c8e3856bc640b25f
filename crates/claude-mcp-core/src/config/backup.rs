//! Timestamped backups of the desktop config and restore from them.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::fs::atomic_write;

use super::ConfigStore;
use super::paths::sibling_with_suffix;

const BACKUP_TAG: &str = "backup";
const SNAPSHOT_TAG: &str = "temp";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Steps of the restore protocol, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreStep {
    /// Copy the live config aside
    Snapshot,
    /// Replace the live config with the backup
    Replace,
    /// Delete the snapshot
    Cleanup,
}

impl fmt::Display for RestoreStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RestoreStep::Snapshot => "snapshot",
            RestoreStep::Replace => "replace",
            RestoreStep::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Copy the backup's bytes atomically over the live config.
fn replace_with_backup(backup_path: &Path, config_path: &Path) -> io::Result<()> {
    let bytes = std::fs::read(backup_path)?;
    atomic_write(config_path, &bytes)
}

impl ConfigStore {
    /// Copy the live config to `<config>.backup_<YYYYMMDD_HHMMSS>`.
    ///
    /// Two backups within the same second share a name; the later one wins.
    pub fn create_backup(&self) -> Result<PathBuf> {
        if !self.exists() {
            return Err(Error::BackupSourceMissing(self.config_path().to_path_buf()));
        }

        let backup_path = sibling_with_suffix(self.config_path(), BACKUP_TAG, &timestamp());
        info!(path = %backup_path.display(), "creating backup");

        std::fs::copy(self.config_path(), &backup_path).map_err(|source| Error::BackupFailed {
            path: backup_path.clone(),
            source,
        })?;
        Ok(backup_path)
    }

    /// Replace the live config with the contents of `backup_path`.
    ///
    /// 1. Snapshot: the live file (if any) is copied aside. A failure here
    ///    leaves the live file untouched.
    /// 2. Replace: the backup's bytes are written atomically over the live
    ///    file. A failure keeps the snapshot and reports where it is.
    /// 3. Cleanup: the snapshot is deleted. A failure is only logged.
    pub fn restore_from_backup(&self, backup_path: &Path) -> Result<()> {
        self.restore_with(backup_path, &timestamp(), replace_with_backup)
    }

    /// Restore with an explicit snapshot timestamp and replace step.
    pub(crate) fn restore_with<F>(&self, backup_path: &Path, stamp: &str, replace: F) -> Result<()>
    where
        F: FnOnce(&Path, &Path) -> io::Result<()>,
    {
        if !backup_path.is_file() {
            return Err(Error::BackupNotFound(backup_path.to_path_buf()));
        }
        info!(backup = %backup_path.display(), "restoring config from backup");

        let snapshot = self.snapshot_live_config(stamp)?;

        if let Err(source) = replace(backup_path, self.config_path()) {
            return Err(Error::RestoreFailed {
                step: RestoreStep::Replace,
                snapshot,
                source,
            });
        }

        if let Some(snapshot) = snapshot
            && let Err(err) = std::fs::remove_file(&snapshot)
        {
            warn!(
                step = %RestoreStep::Cleanup,
                snapshot = %snapshot.display(),
                error = %err,
                "failed to remove restore snapshot"
            );
        }

        Ok(())
    }

    /// Backups next to the config, oldest first.
    pub fn list_backups(&self) -> Result<Vec<PathBuf>> {
        let Some(dir) = self.config_path().parent() else {
            return Ok(Vec::new());
        };
        let Some(file_name) = self.config_path().file_name() else {
            return Ok(Vec::new());
        };
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let prefix = format!("{}.{BACKUP_TAG}_", file_name.to_string_lossy());
        let entries = std::fs::read_dir(dir).map_err(|source| Error::ConfigRead {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut backups: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(&prefix))
            .map(|entry| entry.path())
            .collect();
        // Timestamps are zero-padded, so name order is chronological
        backups.sort();
        Ok(backups)
    }

    fn snapshot_live_config(&self, stamp: &str) -> Result<Option<PathBuf>> {
        if !self.exists() {
            return Ok(None);
        }

        let snapshot = sibling_with_suffix(self.config_path(), SNAPSHOT_TAG, stamp);
        debug!(snapshot = %snapshot.display(), "snapshotting live config");

        match std::fs::copy(self.config_path(), &snapshot) {
            Ok(_) => Ok(Some(snapshot)),
            Err(source) => Err(Error::RestoreFailed {
                step: RestoreStep::Snapshot,
                snapshot: None,
                source,
            }),
        }
    }
}
