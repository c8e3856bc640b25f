//! Stop/start/restart sequencing for the desktop app.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Error, Result};

use super::{ProcessAlias, ProcessBackend, SystemBackend, default_install_candidates};

/// How long each process gets to exit after being killed.
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Pause between stop and start when restarting.
pub const DEFAULT_RESTART_WAIT: Duration = Duration::from_millis(2000);

/// How long after launch the app must show up in the process table.
pub const STARTUP_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopReport {
    /// PIDs that were terminated; empty if nothing was running
    pub stopped: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestartReport {
    pub stopped: Vec<u32>,
    pub launched: PathBuf,
}

#[derive(Debug)]
pub struct DesktopApp<B = SystemBackend> {
    backend: B,
    aliases: Vec<ProcessAlias>,
    install_candidates: Vec<PathBuf>,
    startup_grace: Duration,
}

impl DesktopApp<SystemBackend> {
    /// Desktop app on the real process table with the default install paths.
    pub fn system() -> Self {
        Self::new(SystemBackend::new(), default_install_candidates())
    }
}

impl<B: ProcessBackend> DesktopApp<B> {
    pub fn new(backend: B, install_candidates: Vec<PathBuf>) -> Self {
        Self {
            backend,
            aliases: ProcessAlias::ALL.to_vec(),
            install_candidates,
            startup_grace: STARTUP_GRACE,
        }
    }

    pub fn with_startup_grace(mut self, grace: Duration) -> Self {
        self.startup_grace = grace;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_running(&mut self) -> bool {
        !self.backend.find(&self.aliases).is_empty()
    }

    /// First install candidate that exists on disk.
    pub fn find_installation(&self) -> Option<PathBuf> {
        self.install_candidates
            .iter()
            .find(|path| path.is_file())
            .cloned()
    }

    /// Terminate every running instance, waiting up to `timeout` for each.
    pub fn stop(&mut self, timeout: Duration) -> Result<StopReport> {
        let processes = self.backend.find(&self.aliases);
        if processes.is_empty() {
            debug!("desktop app is not running");
            return Ok(StopReport {
                stopped: Vec::new(),
            });
        }

        let mut stopped = Vec::with_capacity(processes.len());
        for process in processes {
            info!(pid = process.pid, name = %process.name, "stopping desktop process");
            if !self.backend.kill(process.pid) {
                debug!(pid = process.pid, "kill signal not delivered");
            }
            if !self.backend.wait_for_exit(process.pid, timeout) {
                return Err(Error::ProcessStopTimeout {
                    pid: process.pid,
                    timeout,
                });
            }
            stopped.push(process.pid);
        }

        Ok(StopReport { stopped })
    }

    /// Launch the app and confirm it is running after the startup grace.
    pub fn start(&mut self) -> Result<PathBuf> {
        let path = self.find_installation().ok_or(Error::InstallationNotFound)?;
        info!(path = %path.display(), "starting desktop app");

        self.backend
            .launch(&path)
            .map_err(|source| Error::LaunchFailed {
                path: path.clone(),
                source,
            })?;
        self.backend.sleep(self.startup_grace);

        if !self.is_running() {
            return Err(Error::StartupNotConfirmed);
        }
        Ok(path)
    }

    /// Stop, wait `wait`, then start. The first failing step ends the
    /// sequence.
    pub fn restart(&mut self, wait: Duration) -> Result<RestartReport> {
        let stop = self.stop(DEFAULT_STOP_TIMEOUT)?;

        if !wait.is_zero() {
            debug!(wait_ms = wait.as_millis() as u64, "waiting before start");
            self.backend.sleep(wait);
        }

        let launched = self.start()?;
        Ok(RestartReport {
            stopped: stop.stopped,
            launched,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desktop::RunningProcess;
    use std::io;
    use std::path::Path;
    use tempfile::TempDir;

    #[derive(Debug, Default)]
    struct FakeBackend {
        running: Vec<RunningProcess>,
        /// PIDs that ignore kill
        stubborn: Vec<u32>,
        /// Whether a launch makes the app appear
        launch_starts_app: bool,
        launch_error: bool,
        calls: Vec<String>,
    }

    impl FakeBackend {
        fn with_running(pids: &[u32]) -> Self {
            Self {
                running: pids
                    .iter()
                    .map(|&pid| RunningProcess {
                        pid,
                        name: "Claude".to_string(),
                        alias: ProcessAlias::Claude,
                    })
                    .collect(),
                launch_starts_app: true,
                ..Self::default()
            }
        }
    }

    impl ProcessBackend for FakeBackend {
        fn find(&mut self, _aliases: &[ProcessAlias]) -> Vec<RunningProcess> {
            self.calls.push("find".to_string());
            self.running.clone()
        }

        fn kill(&mut self, pid: u32) -> bool {
            self.calls.push(format!("kill {pid}"));
            if !self.stubborn.contains(&pid) {
                self.running.retain(|p| p.pid != pid);
            }
            true
        }

        fn wait_for_exit(&mut self, pid: u32, _timeout: Duration) -> bool {
            self.calls.push(format!("wait {pid}"));
            !self.running.iter().any(|p| p.pid == pid)
        }

        fn launch(&mut self, program: &Path) -> io::Result<()> {
            self.calls.push("launch".to_string());
            if self.launch_error {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
            }
            if self.launch_starts_app {
                self.running.push(RunningProcess {
                    pid: 999,
                    name: program.display().to_string(),
                    alias: ProcessAlias::ClaudeDesktop,
                });
            }
            Ok(())
        }

        fn sleep(&mut self, duration: Duration) {
            self.calls.push(format!("sleep {}", duration.as_millis()));
        }
    }

    fn installed(temp: &TempDir) -> Vec<PathBuf> {
        let exe = temp.path().join("Claude Desktop.exe");
        std::fs::write(&exe, "").unwrap();
        vec![temp.path().join("missing.exe"), exe]
    }

    #[test]
    fn stop_when_nothing_runs_is_noop() {
        let mut app = DesktopApp::new(FakeBackend::default(), Vec::new());

        let report = app.stop(DEFAULT_STOP_TIMEOUT).unwrap();

        assert!(report.stopped.is_empty());
        assert_eq!(app.backend().calls, vec!["find"]);
    }

    #[test]
    fn stop_kills_every_instance() {
        let mut app = DesktopApp::new(FakeBackend::with_running(&[10, 11]), Vec::new());

        let report = app.stop(DEFAULT_STOP_TIMEOUT).unwrap();

        assert_eq!(report.stopped, vec![10, 11]);
        assert!(!app.is_running());
    }

    #[test]
    fn stop_times_out_on_stubborn_process() {
        let mut backend = FakeBackend::with_running(&[10, 11]);
        backend.stubborn.push(10);
        let mut app = DesktopApp::new(backend, Vec::new());

        let err = app.stop(Duration::from_millis(50)).unwrap_err();

        assert!(matches!(err, Error::ProcessStopTimeout { pid: 10, .. }));
        // The second process is never touched
        assert!(!app.backend().calls.contains(&"kill 11".to_string()));
    }

    #[test]
    fn start_without_installation_fails() {
        let temp = TempDir::new().unwrap();
        let mut app = DesktopApp::new(
            FakeBackend::default(),
            vec![temp.path().join("missing.exe")],
        );

        assert!(app.find_installation().is_none());
        assert!(matches!(app.start(), Err(Error::InstallationNotFound)));
    }

    #[test]
    fn start_uses_first_existing_candidate() {
        let temp = TempDir::new().unwrap();
        let candidates = installed(&temp);
        let backend = FakeBackend {
            launch_starts_app: true,
            ..FakeBackend::default()
        };
        let mut app = DesktopApp::new(backend, candidates.clone());

        let path = app.start().unwrap();

        assert_eq!(path, candidates[1]);
        assert!(app.backend().calls.contains(&"sleep 1000".to_string()));
    }

    #[test]
    fn start_not_confirmed_when_app_never_appears() {
        let temp = TempDir::new().unwrap();
        let mut app = DesktopApp::new(FakeBackend::default(), installed(&temp));

        assert!(matches!(app.start(), Err(Error::StartupNotConfirmed)));
    }

    #[test]
    fn start_reports_launch_failure() {
        let temp = TempDir::new().unwrap();
        let backend = FakeBackend {
            launch_error: true,
            ..FakeBackend::default()
        };
        let mut app = DesktopApp::new(backend, installed(&temp));

        assert!(matches!(app.start(), Err(Error::LaunchFailed { .. })));
    }

    #[test]
    fn restart_runs_stop_wait_start_in_order() {
        let temp = TempDir::new().unwrap();
        let mut app = DesktopApp::new(FakeBackend::with_running(&[42]), installed(&temp))
            .with_startup_grace(Duration::from_millis(5));

        let report = app.restart(Duration::from_millis(2000)).unwrap();

        assert_eq!(report.stopped, vec![42]);
        assert_eq!(
            app.backend().calls,
            vec![
                "find",
                "kill 42",
                "wait 42",
                "sleep 2000",
                "launch",
                "sleep 5",
                "find"
            ]
        );
    }

    #[test]
    fn restart_skips_zero_wait() {
        let temp = TempDir::new().unwrap();
        let mut app = DesktopApp::new(FakeBackend::with_running(&[]), installed(&temp))
            .with_startup_grace(Duration::ZERO);

        app.restart(Duration::ZERO).unwrap();

        assert!(!app.backend().calls.iter().any(|c| c == "sleep 2000"));
    }

    #[test]
    fn restart_stops_at_first_failure() {
        let temp = TempDir::new().unwrap();
        let mut backend = FakeBackend::with_running(&[7]);
        backend.stubborn.push(7);
        let mut app = DesktopApp::new(backend, installed(&temp));

        let err = app.restart(Duration::from_millis(100)).unwrap_err();

        assert!(matches!(err, Error::ProcessStopTimeout { pid: 7, .. }));
        assert!(!app.backend().calls.contains(&"launch".to_string()));
    }
}
