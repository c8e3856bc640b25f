//! OS process access.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use sysinfo::{Pid, ProcessStatus, ProcessesToUpdate, System};
use tracing::debug;

use super::ProcessAlias;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A process that matched one of the desktop aliases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningProcess {
    pub pid: u32,
    pub name: String,
    pub alias: ProcessAlias,
}

/// Process-table operations needed to stop and start the desktop app.
pub trait ProcessBackend {
    /// Running processes whose name matches one of `aliases`.
    fn find(&mut self, aliases: &[ProcessAlias]) -> Vec<RunningProcess>;

    /// Ask the OS to terminate `pid`. Returns false if the signal could not
    /// be delivered, e.g. because the process is already gone.
    fn kill(&mut self, pid: u32) -> bool;

    /// Block until `pid` has exited or `timeout` elapsed. Returns whether it
    /// exited.
    fn wait_for_exit(&mut self, pid: u32, timeout: Duration) -> bool;

    /// Launch `program` detached from this process.
    fn launch(&mut self, program: &Path) -> io::Result<()>;

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// [`ProcessBackend`] over the real process table.
pub struct SystemBackend {
    system: System,
}

impl SystemBackend {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }

    fn is_alive(&mut self, pid: Pid) -> bool {
        self.system
            .refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        match self.system.process(pid) {
            Some(process) => !matches!(process.status(), ProcessStatus::Zombie | ProcessStatus::Dead),
            None => false,
        }
    }
}

impl Default for SystemBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SystemBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemBackend").finish_non_exhaustive()
    }
}

impl ProcessBackend for SystemBackend {
    fn find(&mut self, aliases: &[ProcessAlias]) -> Vec<RunningProcess> {
        self.system.refresh_processes(ProcessesToUpdate::All, true);

        let mut found: Vec<RunningProcess> = self
            .system
            .processes()
            .iter()
            .filter_map(|(pid, process)| {
                let name = process.name().to_string_lossy().into_owned();
                let alias = aliases.iter().copied().find(|alias| alias.matches(&name))?;
                Some(RunningProcess {
                    pid: pid.as_u32(),
                    name,
                    alias,
                })
            })
            .collect();
        found.sort_by_key(|p| p.pid);
        found
    }

    fn kill(&mut self, pid: u32) -> bool {
        let pid = Pid::from_u32(pid);
        self.system
            .refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        match self.system.process(pid) {
            Some(process) => process.kill(),
            None => false,
        }
    }

    fn wait_for_exit(&mut self, pid: u32, timeout: Duration) -> bool {
        let pid = Pid::from_u32(pid);
        let deadline = Instant::now() + timeout;
        loop {
            if !self.is_alive(pid) {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    fn launch(&mut self, program: &Path) -> io::Result<()> {
        debug!(program = %program.display(), "launching");
        let child = Command::new(program)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        debug!(pid = child.id(), "launched");
        Ok(())
    }
}
