use std::path::Path;

use chrono::{DateTime, Local};
use serde::Serialize;

/// A managed directory as seen at listing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryRecord {
    /// 1-based position in the allow-list
    pub index: usize,
    pub path: String,
    pub exists: bool,
    /// Creation time, when the platform reports one
    pub created: Option<DateTime<Local>>,
}

impl DirectoryRecord {
    /// Inspect `path` on disk. Metadata errors only drop the timestamp.
    pub fn inspect(index: usize, path: String) -> Self {
        let dir = Path::new(&path);
        let exists = dir.is_dir();
        let created = if exists {
            std::fs::metadata(dir)
                .and_then(|meta| meta.created())
                .ok()
                .map(DateTime::<Local>::from)
        } else {
            None
        };

        Self {
            index,
            path,
            exists,
            created,
        }
    }
}
