//! Data types and error definitions for process classification and reaping.

use nix::errno::Errno;
use serde::Serialize;
use thiserror::Error;

/// Read-only view of one live process, as seen in a single snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessRecord {
    pub pid: i32,
    pub name: String,
    /// Full command line; index 0 is the executable path when the OS reports one.
    pub args: Vec<String>,
    /// Clock ticks since boot; distinguishes this process from a later one reusing its pid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<u64>,
}

impl ProcessRecord {
    pub fn new(pid: i32, name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            pid,
            name: name.into(),
            args,
            start_time: None,
        }
    }

    pub fn with_start_time(mut self, start_time: u64) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Command line joined with spaces, for logs and reports.
    pub fn command_line(&self) -> String {
        self.args.join(" ")
    }
}

/// Errors that can occur while enumerating or signalling processes.
#[derive(Error, Debug)]
pub enum ProcError {
    #[error("Permission denied for PID {0}")]
    PermissionDenied(i32),
    #[error("Process {0} not found")]
    NotFound(i32),
    #[error("Failed to send signal to PID {0}: {1}")]
    SignalError(i32, String),
    #[error("Process {0} is still running after SIGKILL")]
    StillRunning(i32),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Procfs error: {0}")]
    ProcfsError(String),
    #[error("Other error: {0}")]
    Other(String),
}

impl ProcError {
    /// Maps the errno of a failed `kill(2)` to the matching variant.
    pub(crate) fn from_errno(pid: i32, errno: Errno) -> Self {
        match errno {
            Errno::ESRCH => ProcError::NotFound(pid),
            Errno::EPERM => ProcError::PermissionDenied(pid),
            other => ProcError::SignalError(pid, other.to_string()),
        }
    }
}

impl From<procfs::ProcError> for ProcError {
    fn from(err: procfs::ProcError) -> Self {
        ProcError::ProcfsError(err.to_string())
    }
}
