//! Process enumeration and liveness checks backed by `/proc`.

use procfs::process::Process;
use tracing::{debug, warn};

use crate::types::{ProcError, ProcessRecord};

/// List every process currently visible in `/proc`.
///
/// Processes that exit while being read are skipped. A process whose command
/// line cannot be read is still listed, with empty args.
pub fn list_processes() -> Result<Vec<ProcessRecord>, ProcError> {
    let all_procs = procfs::process::all_processes()
        .map_err(|e| ProcError::Other(format!("Failed to read /proc: {}", e)))?;

    let mut processes = Vec::new();
    for proc_result in all_procs {
        let proc = match proc_result {
            Ok(proc) => proc,
            Err(e) => {
                debug!(error = %e, "Skipping process that vanished during enumeration");
                continue;
            }
        };
        processes.extend(read_record(&proc));
    }

    Ok(processes)
}

fn read_record(proc: &Process) -> Option<ProcessRecord> {
    let stat = match proc.stat() {
        Ok(stat) => stat,
        Err(procfs::ProcError::NotFound(_)) => {
            debug!(pid = proc.pid, "Process exited before its stat could be read");
            return None;
        }
        Err(e) => {
            warn!(pid = proc.pid, error = %e, "Skipping process with unreadable stat");
            return None;
        }
    };

    let args = match proc.cmdline() {
        Ok(args) => args,
        Err(procfs::ProcError::NotFound(_)) => {
            debug!(pid = stat.pid, "Process exited before its cmdline could be read");
            return None;
        }
        Err(e) => {
            warn!(pid = stat.pid, error = %e, "Cannot read cmdline, listing process without args");
            Vec::new()
        }
    };

    Some(ProcessRecord::new(stat.pid, stat.comm, args).with_start_time(stat.starttime))
}

/// Whether `pid` still refers to a running process.
///
/// Zombies count as exited: they only wait for their parent to reap them.
pub fn is_running(pid: i32) -> Result<bool, ProcError> {
    let stat = match Process::new(pid).and_then(|proc| proc.stat()) {
        Ok(stat) => stat,
        Err(procfs::ProcError::NotFound(_)) => return Ok(false),
        Err(procfs::ProcError::PermissionDenied(_)) => return Err(ProcError::PermissionDenied(pid)),
        Err(e) => return Err(e.into()),
    };
    Ok(stat.state != 'Z' && stat.state != 'X')
}

/// Start time of the process holding `pid`, in clock ticks since boot.
pub fn start_time(pid: i32) -> Result<u64, ProcError> {
    match Process::new(pid).and_then(|proc| proc.stat()) {
        Ok(stat) => Ok(stat.starttime),
        Err(procfs::ProcError::NotFound(_)) => Err(ProcError::NotFound(pid)),
        Err(procfs::ProcError::PermissionDenied(_)) => Err(ProcError::PermissionDenied(pid)),
        Err(e) => Err(e.into()),
    }
}
