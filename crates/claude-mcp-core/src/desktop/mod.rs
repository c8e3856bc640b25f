//! Claude Desktop process lifecycle: detect, stop, start and restart.
//!
//! OS access goes through [`ProcessBackend`] so the sequencing in
//! [`DesktopApp`] can be exercised without real processes.

pub mod alias;
pub mod app;
pub mod backend;
pub mod install;

pub use alias::ProcessAlias;
pub use app::{
    DEFAULT_RESTART_WAIT, DEFAULT_STOP_TIMEOUT, DesktopApp, RestartReport, STARTUP_GRACE,
    StopReport,
};
pub use backend::{ProcessBackend, RunningProcess, SystemBackend};
pub use install::default_install_candidates;
