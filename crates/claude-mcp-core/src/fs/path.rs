//! Lexical path normalization.
//!
//! Paths stored in the allow-list are compared as strings, so every path is
//! brought to one absolute form first. Symlinks are not resolved.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Absolute, normalized form of `path` relative to the current directory.
pub fn normalize_path(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(absolutize(Path::new(""), path));
    }
    let cwd = std::env::current_dir()?;
    Ok(absolutize(&cwd, path))
}

/// Join `path` onto `base` (unless it is already absolute) and fold `.` and
/// `..` components. `..` never climbs above the root.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                let at_root = matches!(
                    normalized.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                );
                if !at_root {
                    normalized.pop();
                }
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}
