//! View of a server entry's `args` as `[base args..] + [directory..]`.

use crate::config::ServerEntry;

/// Name of the server entry this tool manages.
pub const FILESYSTEM_SERVER: &str = "filesystem";

/// Launcher used for a freshly created filesystem entry.
pub const PACKAGE_RUNNER: &str = "npx";

pub const FILESYSTEM_PACKAGE: &str = "@modelcontextprotocol/server-filesystem";

/// Tokens that must precede every managed directory in `args`.
pub const FILESYSTEM_BASE_ARGS: [&str; 2] = ["-y", FILESYSTEM_PACKAGE];

pub const PREFIX_LEN: usize = FILESYSTEM_BASE_ARGS.len();

/// A filesystem entry with no directories.
pub fn new_filesystem_server() -> ServerEntry {
    ServerEntry::new(
        PACKAGE_RUNNER,
        FILESYSTEM_BASE_ARGS.iter().map(|s| s.to_string()).collect(),
    )
}

/// Insert any base token that is missing or out of place.
///
/// For each position `i`, a token that does not match the expected one gets
/// the expected token inserted in front of it. Applying this twice equals
/// applying it once.
///
/// Sharp edge: a mismatching token is shifted right, not replaced. A list
/// like `["/home/me"]` becomes `["-y", PKG, "/home/me"]`, which is the
/// intended repair, but an entry using a different package name keeps that
/// name as its first managed "directory".
pub fn ensure_prefix(entry: &mut ServerEntry) {
    for (i, expected) in FILESYSTEM_BASE_ARGS.iter().enumerate() {
        if entry.args.get(i).map(String::as_str) != Some(*expected) {
            entry.args.insert(i, expected.to_string());
        }
    }
}

/// Managed directories, in order.
pub fn read_paths(entry: &ServerEntry) -> Vec<String> {
    entry.args.iter().skip(PREFIX_LEN).cloned().collect()
}

/// Replace the managed directories, leaving the base tokens alone.
pub fn write_paths<I, S>(entry: &mut ServerEntry, paths: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    entry.args.truncate(PREFIX_LEN);
    entry.args.extend(paths.into_iter().map(Into::into));
}
