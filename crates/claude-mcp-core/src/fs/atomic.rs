//! Atomic file replacement.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Write `data` to a temporary sibling file, flush it, then rename it over
/// `path`. Readers see either the old content or the new content, never a
/// partial file. The rename is atomic on POSIX and on Windows when source and
/// target live on the same volume, which holds for a sibling file.
///
/// A symlinked `path` is written through: the link stays and its target is
/// replaced. An existing target keeps its permissions.
pub fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    let target = resolve_target(path);
    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    if let Ok(meta) = std::fs::metadata(&target) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(&target).map_err(|err| err.error)?;
    Ok(())
}

/// Follow `path` if it is a symlink. Dangling links are replaced as-is.
fn resolve_target(path: &Path) -> PathBuf {
    let is_link = std::fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);
    if !is_link {
        return path.to_path_buf();
    }
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
