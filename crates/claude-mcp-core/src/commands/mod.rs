//! High-level commands for claude-mcp operations.
//!
//! These are the entry points the CLI calls; each one loads the config
//! fresh, applies one change and saves it back.

pub mod debug;
pub mod directory;

pub use debug::{DebugCommand, DebugReport};
pub use directory::{AddOptions, DirectoryCommand, DirectoryReport, RemoveTarget, ServerSummary};
