//! Discovery of other Rally CLI instances running on this host.

use crate::config::{Config, MatchPolicy};
use crate::matcher::is_tool_process;
use crate::process_table::{ProcessTable, SystemProcessTable};
use crate::types::{ProcError, ProcessRecord};

/// All other running Rally processes, excluding the calling process.
pub fn find_all_other_rally_processes() -> Result<Vec<ProcessRecord>, ProcError> {
    let config = Config::load(None)?;
    find_other_tool_processes(&SystemProcessTable, &config.matcher, own_pid())
}

/// Snapshot `table` and keep the tool processes other than `own_pid`, in snapshot order.
pub fn find_other_tool_processes<T>(
    table: &T,
    policy: &MatchPolicy,
    own_pid: i32,
) -> Result<Vec<ProcessRecord>, ProcError>
where
    T: ProcessTable + ?Sized,
{
    Ok(table
        .snapshot()?
        .into_iter()
        .filter(|p| is_tool_process(p.pid, &p.name, &p.args, own_pid, policy))
        .collect())
}

pub fn own_pid() -> i32 {
    std::process::id() as i32
}
