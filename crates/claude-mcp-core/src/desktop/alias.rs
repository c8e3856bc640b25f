//! Names under which the desktop app shows up in the process table.

/// Known process names of the desktop app. Add a variant here to recognize a
/// new name everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessAlias {
    ClaudeDesktop,
    Claude,
}

impl ProcessAlias {
    pub const ALL: [ProcessAlias; 2] = [ProcessAlias::ClaudeDesktop, ProcessAlias::Claude];

    pub fn process_name(self) -> &'static str {
        match self {
            ProcessAlias::ClaudeDesktop => "Claude Desktop",
            ProcessAlias::Claude => "Claude",
        }
    }

    /// Whether a process table name refers to this alias. A trailing `.exe`
    /// is ignored and the comparison is case-insensitive.
    pub fn matches(self, name: &str) -> bool {
        let stem = match name.len().checked_sub(4) {
            Some(split)
                if name.is_char_boundary(split) && name[split..].eq_ignore_ascii_case(".exe") =>
            {
                &name[..split]
            }
            _ => name,
        };
        stem.eq_ignore_ascii_case(self.process_name())
    }

    /// First alias matching `name`, if any.
    pub fn lookup(name: &str) -> Option<ProcessAlias> {
        Self::ALL.into_iter().find(|alias| alias.matches(name))
    }
}
