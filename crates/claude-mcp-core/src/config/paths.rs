//! Config path resolution helpers.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const CONFIG_DIR_NAME: &str = "Claude";
pub const CONFIG_FILE_NAME: &str = "claude_desktop_config.json";

/// Environment variable that overrides the config location.
pub const CONFIG_PATH_ENV: &str = "CLAUDE_MCP_CONFIG";

/// Location of the desktop config under a per-user config directory.
pub fn config_path_in(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)
}

/// Default location: `<user config dir>/Claude/claude_desktop_config.json`.
///
/// This is `%APPDATA%` on Windows, `~/Library/Application Support` on macOS
/// and `$XDG_CONFIG_HOME` (or `~/.config`) elsewhere.
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or(Error::ConfigDirUnavailable)?;
    Ok(config_path_in(&config_dir))
}

/// An explicit path wins over the default location.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => default_config_path(),
    }
}

/// Sibling path `<config>.<tag>_<timestamp>` used for backups and snapshots.
pub fn sibling_with_suffix(config_path: &Path, tag: &str, timestamp: &str) -> PathBuf {
    let mut name = config_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| CONFIG_FILE_NAME.into());
    name.push(format!(".{tag}_{timestamp}"));
    config_path.with_file_name(name)
}
