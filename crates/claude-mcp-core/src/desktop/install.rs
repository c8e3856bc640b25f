//! Known installation locations of the desktop app.

use std::path::PathBuf;

/// Candidate executables, most specific first. Empty on platforms without a
/// desktop build.
pub fn default_install_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if cfg!(windows) {
        if let Some(local) = dirs::data_local_dir() {
            candidates.push(
                local
                    .join("Programs")
                    .join("Claude")
                    .join("Claude Desktop.exe"),
            );
            candidates.push(local.join("AnthropicClaude").join("claude.exe"));
        }
        for var in ["ProgramFiles", "ProgramFiles(x86)"] {
            if let Some(dir) = std::env::var_os(var) {
                candidates.push(
                    PathBuf::from(dir)
                        .join("Claude Desktop")
                        .join("Claude Desktop.exe"),
                );
            }
        }
    } else if cfg!(target_os = "macos") {
        candidates.push(PathBuf::from("/Applications/Claude.app/Contents/MacOS/Claude"));
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join("Applications/Claude.app/Contents/MacOS/Claude"));
        }
    }

    candidates
}
