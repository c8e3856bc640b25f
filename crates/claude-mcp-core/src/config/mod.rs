//! Desktop client configuration: schema, path resolution, persistence and
//! backups.

pub mod backup;
pub mod paths;
pub mod schema;
pub mod store;

pub use backup::RestoreStep;
pub use paths::{config_path_in, default_config_path, resolve_config_path};
pub use schema::{DesktopConfig, ServerEntry};
pub use store::ConfigStore;
