//! The process snapshot source the finder and reaper operate on.

use crate::process_kill::{kill_pid, terminate_pid};
use crate::process_list::{is_running, list_processes, start_time};
use crate::types::{ProcError, ProcessRecord};

/// Enumerates and signals OS processes.
///
/// `terminate`, `force_terminate` and `is_alive` report a process that no
/// longer exists as `ProcError::NotFound` or, for `is_alive`, `Ok(false)`.
pub trait ProcessTable {
    fn snapshot(&self) -> Result<Vec<ProcessRecord>, ProcError>;

    /// Graceful termination (SIGTERM).
    fn terminate(&self, pid: i32) -> Result<(), ProcError>;

    /// Unconditional termination (SIGKILL).
    fn force_terminate(&self, pid: i32) -> Result<(), ProcError>;

    fn is_alive(&self, pid: i32) -> Result<bool, ProcError>;

    /// Start time of the process currently holding `pid`, if the table tracks one.
    fn start_time(&self, _pid: i32) -> Result<Option<u64>, ProcError> {
        Ok(None)
    }
}

/// The host's live process table, read through `/proc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessTable;

impl ProcessTable for SystemProcessTable {
    fn snapshot(&self) -> Result<Vec<ProcessRecord>, ProcError> {
        list_processes()
    }

    fn terminate(&self, pid: i32) -> Result<(), ProcError> {
        terminate_pid(pid)
    }

    fn force_terminate(&self, pid: i32) -> Result<(), ProcError> {
        kill_pid(pid)
    }

    fn is_alive(&self, pid: i32) -> Result<bool, ProcError> {
        is_running(pid)
    }

    fn start_time(&self, pid: i32) -> Result<Option<u64>, ProcError> {
        start_time(pid).map(Some)
    }
}
