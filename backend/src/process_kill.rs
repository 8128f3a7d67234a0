//! Process signalling.

use crate::types::ProcError;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;

/// Ask a process to shut down with SIGTERM.
///
/// Returns `ProcError::NotFound` when the process is already gone.
pub fn terminate_pid(pid: i32) -> Result<(), ProcError> {
    send(pid, Signal::SIGTERM)
}

/// Kill a process unconditionally with SIGKILL.
pub fn kill_pid(pid: i32) -> Result<(), ProcError> {
    send(pid, Signal::SIGKILL)
}

fn send(pid: i32, sig: Signal) -> Result<(), ProcError> {
    // kill(2) treats 0 and negative pids as process groups
    if pid <= 0 {
        return Err(ProcError::SignalError(pid, "not a single-process PID".into()));
    }
    signal::kill(Pid::from_raw(pid), sig).map_err(|errno| ProcError::from_errno(pid, errno))
}
