//! claude-mcp Core Library
//!
//! Manages the directory allow-list of the `filesystem` MCP server in the
//! Claude Desktop client config, with timestamped backups and control over
//! the running desktop app.

pub mod commands;
pub mod config;
pub mod desktop;
pub mod directory;
pub mod error;
pub mod fs;

pub use error::{Error, Result};

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{ConfigStore, DesktopConfig, RestoreStep, ServerEntry};

    // Commands
    pub use crate::commands::{
        AddOptions, DebugCommand, DebugReport, DirectoryCommand, DirectoryReport, RemoveTarget,
        ServerSummary,
    };

    // Directory allow-list
    pub use crate::directory::{DirectoryRecord, FILESYSTEM_SERVER};

    // Desktop app
    pub use crate::desktop::{
        DesktopApp, ProcessAlias, ProcessBackend, RestartReport, StopReport, SystemBackend,
    };

    pub use crate::error::{Error, Result};
}
