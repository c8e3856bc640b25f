//! Directory command implementation.
//!
//! Adds, removes and lists entries of the filesystem server's allow-list.
//! Every call is one load -> change -> save transaction against the config
//! file; nothing is cached between calls.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::{ConfigStore, DesktopConfig, ServerEntry};
use crate::directory::{
    DirectoryRecord, FILESYSTEM_SERVER, ensure_prefix, new_filesystem_server, read_paths,
    write_paths,
};
use crate::error::{Error, Result};
use crate::fs::normalize_path;

/// Options for adding a directory
#[derive(Debug, Clone)]
pub struct AddOptions {
    /// Directory to allow (relative paths resolve against the current directory)
    pub directory: PathBuf,
    /// Succeed even if the directory is already listed
    pub force: bool,
}

impl AddOptions {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            force: false,
        }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// Which allow-list entry to remove
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveTarget {
    /// Remove by path
    Path(PathBuf),
    /// Remove by 1-based position as shown by `list`
    Index(usize),
}

/// Result of an add or remove
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryReport {
    /// Absolute path that was added or removed
    pub path: String,
    /// Whether the allow-list changed
    pub changed: bool,
}

/// Command and arguments of the filesystem entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSummary {
    pub command: String,
    pub args: Vec<String>,
}

/// Directory allow-list orchestrator
#[derive(Debug, Clone)]
pub struct DirectoryCommand {
    store: ConfigStore,
}

impl DirectoryCommand {
    pub fn new(store: ConfigStore) -> Self {
        Self { store }
    }

    /// Create a directory command for the default config location
    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(ConfigStore::with_defaults()?))
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Add a directory to the allow-list
    pub fn add(&self, options: &AddOptions) -> Result<DirectoryReport> {
        self.add_path(&options.directory, options.force)
    }

    /// Add `path` to the allow-list.
    ///
    /// The path must be an existing directory. The filesystem entry is
    /// created if needed and its base arguments are repaired before the path
    /// is appended.
    pub fn add_path(&self, path: &Path, force: bool) -> Result<DirectoryReport> {
        let resolved = resolve(path)?;
        if !resolved.is_dir() {
            return Err(Error::DirectoryNotFound(resolved));
        }
        let resolved = path_string(&resolved);
        debug!(path = %resolved, force, "adding directory");

        let mut config = self.store.load()?;
        let mut entry = self
            .filesystem_server(&config)?
            .unwrap_or_else(new_filesystem_server);
        ensure_prefix(&mut entry);

        let mut paths = read_paths(&entry);
        let changed = if paths.contains(&resolved) {
            if !force {
                return Err(Error::DuplicateDirectory(resolved));
            }
            info!(path = %resolved, "directory already allowed, keeping list as is");
            false
        } else {
            paths.push(resolved.clone());
            write_paths(&mut entry, paths);
            true
        };

        self.save_filesystem_server(&mut config, &entry)?;
        if changed {
            info!(path = %resolved, "added directory");
        }

        Ok(DirectoryReport {
            path: resolved,
            changed,
        })
    }

    /// Remove an entry chosen by path or by index
    pub fn remove(&self, target: &RemoveTarget) -> Result<DirectoryReport> {
        match target {
            RemoveTarget::Path(path) => self.remove_path(path),
            RemoveTarget::Index(index) => self.remove_by_index(*index),
        }
    }

    /// Remove `path` from the allow-list
    pub fn remove_path(&self, path: &Path) -> Result<DirectoryReport> {
        let resolved = path_string(&resolve(path)?);
        debug!(path = %resolved, "removing directory");

        let mut config = self.store.load()?;
        let mut entry = self
            .filesystem_server(&config)?
            .ok_or(Error::NoFilesystemServer)?;

        let mut paths = read_paths(&entry);
        let Some(position) = paths.iter().position(|p| *p == resolved) else {
            return Err(Error::DirectoryNotListed(resolved));
        };
        paths.remove(position);
        write_paths(&mut entry, paths);

        self.save_filesystem_server(&mut config, &entry)?;
        info!(path = %resolved, "removed directory");

        Ok(DirectoryReport {
            path: resolved,
            changed: true,
        })
    }

    /// Remove the entry at the 1-based `index`
    pub fn remove_by_index(&self, index: usize) -> Result<DirectoryReport> {
        debug!(index, "removing directory by index");

        let mut config = self.store.load()?;
        let mut entry = self
            .filesystem_server(&config)?
            .ok_or(Error::NoFilesystemServer)?;

        let mut paths = read_paths(&entry);
        if index < 1 || index > paths.len() {
            return Err(Error::IndexOutOfRange {
                index,
                count: paths.len(),
            });
        }
        let removed = paths.remove(index - 1);
        write_paths(&mut entry, paths);

        self.save_filesystem_server(&mut config, &entry)?;
        info!(path = %removed, index, "removed directory");

        Ok(DirectoryReport {
            path: removed,
            changed: true,
        })
    }

    /// Allowed directories in order. Empty when the filesystem entry is absent.
    ///
    /// A config file that fails to parse is an error
    /// ([`Error::ConfigFormat`]), not an empty list, so a broken file is never
    /// reported as having no directories.
    pub fn list_paths(&self) -> Result<Vec<String>> {
        let config = self.store.load()?;
        Ok(self
            .filesystem_server(&config)?
            .map(|entry| read_paths(&entry))
            .unwrap_or_default())
    }

    /// Allowed directories with on-disk details and 1-based indices
    pub fn list_detailed(&self) -> Result<Vec<DirectoryRecord>> {
        let records = self
            .list_paths()?
            .into_iter()
            .enumerate()
            .map(|(i, path)| DirectoryRecord::inspect(i + 1, path))
            .collect();
        Ok(records)
    }

    /// Command line of the filesystem entry, if configured
    pub fn server_summary(&self) -> Result<Option<ServerSummary>> {
        let config = self.store.load()?;
        Ok(self
            .filesystem_server(&config)?
            .map(|entry| ServerSummary {
                command: entry.command,
                args: entry.args,
            }))
    }

    fn filesystem_server(&self, config: &DesktopConfig) -> Result<Option<ServerEntry>> {
        config
            .server(FILESYSTEM_SERVER)
            .map_err(|err| self.store.format_error(err))
    }

    fn save_filesystem_server(&self, config: &mut DesktopConfig, entry: &ServerEntry) -> Result<()> {
        config
            .set_server(FILESYSTEM_SERVER, entry)
            .map_err(|err| Error::ConfigWrite {
                path: self.store.config_path().to_path_buf(),
                source: std::io::Error::other(err),
            })?;
        self.store.save(config)
    }
}

fn resolve(path: &Path) -> Result<PathBuf> {
    normalize_path(path).map_err(|_| Error::DirectoryNotFound(path.to_path_buf()))
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::FILESYSTEM_PACKAGE;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    fn setup_test_env() -> (TempDir, DirectoryCommand) {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(temp.path().join("Claude").join("claude_desktop_config.json"));
        (temp, DirectoryCommand::new(store))
    }

    fn make_dir(temp: &TempDir, name: &str) -> PathBuf {
        let dir = temp.path().join(name);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn on_disk(cmd: &DirectoryCommand) -> Value {
        serde_json::from_str(&std::fs::read_to_string(cmd.store().config_path()).unwrap()).unwrap()
    }

    // ==========================================================================
    // Add tests
    // ==========================================================================

    #[test]
    fn test_add_creates_filesystem_entry() {
        let (temp, cmd) = setup_test_env();
        let dir = make_dir(&temp, "a");

        let report = cmd.add(&AddOptions::new(&dir)).unwrap();

        assert!(report.changed);
        assert_eq!(report.path, path_string(&dir));
        assert_eq!(
            on_disk(&cmd),
            json!({
                "mcpServers": {
                    "filesystem": {
                        "command": "npx",
                        "args": ["-y", FILESYSTEM_PACKAGE, path_string(&dir)]
                    }
                }
            })
        );
    }

    #[test]
    fn test_add_missing_directory_fails() {
        let (temp, cmd) = setup_test_env();

        let err = cmd
            .add(&AddOptions::new(temp.path().join("missing")))
            .unwrap_err();

        assert!(matches!(err, Error::DirectoryNotFound(_)));
        assert!(!cmd.store().exists());
    }

    #[test]
    fn test_add_file_is_not_a_directory() {
        let (temp, cmd) = setup_test_env();
        let file = temp.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();

        let err = cmd.add(&AddOptions::new(&file)).unwrap_err();

        assert!(matches!(err, Error::DirectoryNotFound(_)));
    }

    #[test]
    fn test_add_duplicate_without_force_fails() {
        let (temp, cmd) = setup_test_env();
        let dir = make_dir(&temp, "a");
        cmd.add(&AddOptions::new(&dir)).unwrap();
        let before = std::fs::read_to_string(cmd.store().config_path()).unwrap();

        let err = cmd.add(&AddOptions::new(&dir)).unwrap_err();

        assert!(matches!(err, Error::DuplicateDirectory(_)));
        assert_eq!(cmd.list_paths().unwrap().len(), 1);
        let after = std::fs::read_to_string(cmd.store().config_path()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_add_duplicate_with_force_does_not_duplicate() {
        let (temp, cmd) = setup_test_env();
        let dir = make_dir(&temp, "a");
        cmd.add(&AddOptions::new(&dir)).unwrap();

        let report = cmd.add(&AddOptions::new(&dir).with_force(true)).unwrap();

        assert!(!report.changed);
        assert_eq!(cmd.list_paths().unwrap(), vec![path_string(&dir)]);
    }

    #[test]
    fn test_add_normalizes_dot_segments() {
        let (temp, cmd) = setup_test_env();
        let dir = make_dir(&temp, "a");
        make_dir(&temp, "b");

        let messy = temp.path().join("b").join("..").join("a").join(".");
        let report = cmd.add(&AddOptions::new(messy)).unwrap();

        assert_eq!(report.path, path_string(&dir));
    }

    #[test]
    fn test_add_repairs_missing_base_args() {
        let (temp, cmd) = setup_test_env();
        let existing = make_dir(&temp, "existing");
        let added = make_dir(&temp, "added");
        std::fs::create_dir_all(cmd.store().config_path().parent().unwrap()).unwrap();
        std::fs::write(
            cmd.store().config_path(),
            serde_json::to_string(&json!({
                "mcpServers": {
                    "filesystem": {"command": "npx", "args": [path_string(&existing)]}
                }
            }))
            .unwrap(),
        )
        .unwrap();

        cmd.add(&AddOptions::new(&added)).unwrap();

        let summary = cmd.server_summary().unwrap().unwrap();
        assert_eq!(
            summary.args,
            vec![
                "-y".to_string(),
                FILESYSTEM_PACKAGE.to_string(),
                path_string(&existing),
                path_string(&added),
            ]
        );
    }

    // ==========================================================================
    // Remove tests
    // ==========================================================================

    #[test]
    fn test_remove_without_filesystem_server_fails() {
        let (temp, cmd) = setup_test_env();

        let err = cmd.remove_path(temp.path()).unwrap_err();
        assert!(matches!(err, Error::NoFilesystemServer));

        let err = cmd.remove_by_index(1).unwrap_err();
        assert!(matches!(err, Error::NoFilesystemServer));
    }

    #[test]
    fn test_remove_unlisted_path_fails() {
        let (temp, cmd) = setup_test_env();
        let dir = make_dir(&temp, "a");
        cmd.add(&AddOptions::new(&dir)).unwrap();

        let err = cmd.remove_path(&temp.path().join("b")).unwrap_err();

        assert!(matches!(err, Error::DirectoryNotListed(_)));
        assert_eq!(cmd.list_paths().unwrap().len(), 1);
    }

    #[test]
    fn test_remove_path_that_no_longer_exists() {
        let (temp, cmd) = setup_test_env();
        let dir = make_dir(&temp, "a");
        cmd.add(&AddOptions::new(&dir)).unwrap();
        std::fs::remove_dir(&dir).unwrap();

        let report = cmd.remove(&RemoveTarget::Path(dir.clone())).unwrap();

        assert_eq!(report.path, path_string(&dir));
        assert!(cmd.list_paths().unwrap().is_empty());
    }

    #[test]
    fn test_remove_by_index_bounds() {
        let (temp, cmd) = setup_test_env();
        cmd.add(&AddOptions::new(make_dir(&temp, "a"))).unwrap();
        cmd.add(&AddOptions::new(make_dir(&temp, "b"))).unwrap();

        for index in [0, 3] {
            let err = cmd.remove_by_index(index).unwrap_err();
            assert!(matches!(err, Error::IndexOutOfRange { count: 2, .. }));
        }
        assert_eq!(cmd.list_paths().unwrap().len(), 2);
    }

    #[test]
    fn test_remove_by_index_reindexes() {
        let (temp, cmd) = setup_test_env();
        let a = make_dir(&temp, "a");
        let b = make_dir(&temp, "b");
        cmd.add(&AddOptions::new(&a)).unwrap();
        cmd.add(&AddOptions::new(&b)).unwrap();

        let report = cmd.remove(&RemoveTarget::Index(1)).unwrap();

        assert_eq!(report.path, path_string(&a));
        let records = cmd.list_detailed().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].index, 1);
        assert_eq!(records[0].path, path_string(&b));
    }

    // ==========================================================================
    // List tests
    // ==========================================================================

    #[test]
    fn test_list_without_entry_is_empty() {
        let (_temp, cmd) = setup_test_env();

        assert!(cmd.list_paths().unwrap().is_empty());
        assert!(cmd.list_detailed().unwrap().is_empty());
        assert!(cmd.server_summary().unwrap().is_none());
    }

    #[test]
    fn test_list_detailed_marks_missing_directories() {
        let (temp, cmd) = setup_test_env();
        let a = make_dir(&temp, "a");
        let b = make_dir(&temp, "b");
        cmd.add(&AddOptions::new(&a)).unwrap();
        cmd.add(&AddOptions::new(&b)).unwrap();
        std::fs::remove_dir(&a).unwrap();

        let records = cmd.list_detailed().unwrap();

        assert_eq!(records[0].index, 1);
        assert!(!records[0].exists);
        assert!(records[0].created.is_none());
        assert_eq!(records[1].index, 2);
        assert!(records[1].exists);
    }

    #[test]
    fn test_list_on_malformed_config_fails() {
        let (_temp, cmd) = setup_test_env();
        std::fs::create_dir_all(cmd.store().config_path().parent().unwrap()).unwrap();
        std::fs::write(cmd.store().config_path(), "not json").unwrap();

        assert!(matches!(
            cmd.list_paths(),
            Err(Error::ConfigFormat { .. })
        ));
    }
}
