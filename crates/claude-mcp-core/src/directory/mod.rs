//! The managed directory allow-list of the filesystem MCP server.

pub mod codec;
pub mod record;

pub use codec::{
    FILESYSTEM_BASE_ARGS, FILESYSTEM_PACKAGE, FILESYSTEM_SERVER, PACKAGE_RUNNER, PREFIX_LEN,
    ensure_prefix, new_filesystem_server, read_paths, write_paths,
};
pub use record::DirectoryRecord;
