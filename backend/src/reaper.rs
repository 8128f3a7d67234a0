//! Termination of benchmark servers left behind by earlier races.

use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::{Config, ReaperConfig};
use crate::matcher::is_benchmark_server_process;
use crate::paths::normalize_user_path;
use crate::process_table::{ProcessTable, SystemProcessTable};
use crate::types::{ProcError, ProcessRecord};

/// Kill every benchmark server on this host whose installation lives under `base_path`.
///
/// Uses the default configuration with environment overrides applied.
pub fn kill_running_es_instances(base_path: &str) -> Result<(), ProcError> {
    let config = Config::load(None)?;
    kill_running_es_instances_with(&SystemProcessTable, base_path, &config)
}

pub fn kill_running_es_instances_with<T>(
    table: &T,
    base_path: &str,
    config: &Config,
) -> Result<(), ProcError>
where
    T: ProcessTable + ?Sized,
{
    let base_path = normalize_user_path(base_path)?;
    reap_server_instances(table, &base_path, config).map(|_| ())
}

/// Terminate matching servers and wait for each to exit.
///
/// # Strategy
/// 1. SIGTERM every match of a fresh snapshot
/// 2. For each signalled pid in turn, poll until it exits or the grace period ends
/// 3. On timeout, SIGKILL once and poll again up to the kill timeout
///
/// A process that disappears at any step counts as terminated. Any other
/// failure aborts the sweep. Before SIGKILL the pid's start time is compared
/// with the snapshot, so a pid the kernel has handed to a new process is
/// left alone.
///
/// # Returns
/// The pids that received SIGTERM, in snapshot order.
pub fn reap_server_instances<T>(
    table: &T,
    base_path: &Path,
    config: &Config,
) -> Result<Vec<i32>, ProcError>
where
    T: ProcessTable + ?Sized,
{
    config.reaper.validate()?;
    let mut signalled = Vec::new();

    for process in table.snapshot()? {
        if !is_benchmark_server_process(&process.args, base_path, &config.matcher) {
            continue;
        }
        info!(
            pid = process.pid,
            cmdline = %process.command_line(),
            "Killing lingering benchmark server"
        );
        match table.terminate(process.pid) {
            Ok(()) => signalled.push(process),
            Err(ProcError::NotFound(pid)) => {
                debug!(pid, "Benchmark server exited before SIGTERM");
            }
            Err(e) => return Err(e),
        }
    }

    for process in &signalled {
        await_exit(table, process, &config.reaper)?;
    }

    Ok(signalled.into_iter().map(|p| p.pid).collect())
}

fn await_exit<T>(table: &T, process: &ProcessRecord, config: &ReaperConfig) -> Result<(), ProcError>
where
    T: ProcessTable + ?Sized,
{
    let pid = process.pid;
    if wait_until_gone(table, pid, config.grace_period(), config.poll_interval())? {
        return Ok(());
    }
    if pid_reused(table, process)? {
        debug!(pid, "PID no longer belongs to the signalled server, not escalating");
        return Ok(());
    }

    warn!(
        pid,
        grace_period_ms = config.grace_period_ms,
        "Benchmark server ignored SIGTERM, sending SIGKILL"
    );
    match table.force_terminate(pid) {
        Ok(()) => {}
        Err(ProcError::NotFound(_)) => return Ok(()),
        Err(e) => return Err(e),
    }

    if wait_until_gone(table, pid, config.kill_timeout(), config.poll_interval())? {
        Ok(())
    } else {
        Err(ProcError::StillRunning(pid))
    }
}

/// Whether `pid` was handed to a new process since the snapshot.
///
/// Tables without start times never report reuse.
fn pid_reused<T>(table: &T, process: &ProcessRecord) -> Result<bool, ProcError>
where
    T: ProcessTable + ?Sized,
{
    let Some(expected) = process.start_time else {
        return Ok(false);
    };
    match table.start_time(process.pid) {
        Ok(Some(current)) => Ok(current != expected),
        Ok(None) => Ok(false),
        Err(ProcError::NotFound(_)) => Ok(true),
        Err(e) => Err(e),
    }
}

/// Poll until `pid` is gone. Returns `false` if it outlived `timeout`.
fn wait_until_gone<T>(
    table: &T,
    pid: i32,
    timeout: Duration,
    interval: Duration,
) -> Result<bool, ProcError>
where
    T: ProcessTable + ?Sized,
{
    let deadline = Instant::now() + timeout;
    loop {
        match table.is_alive(pid) {
            Ok(false) | Err(ProcError::NotFound(_)) => return Ok(true),
            Ok(true) => {}
            Err(e) => return Err(e),
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(false);
        }
        thread::sleep(interval.min(deadline - now));
    }
}
