//! Subcommand handlers.

use anyhow::Context;
use rally_procs::{
    find_other_tool_processes, normalize_user_path, own_pid, reap_server_instances, Config,
    ProcessRecord, SystemProcessTable,
};
use tracing::info;

pub fn list(config: &Config, json: bool) -> anyhow::Result<()> {
    let processes = find_other_tool_processes(&SystemProcessTable, &config.matcher, own_pid())
        .context("failed to enumerate processes")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&processes)?);
        return Ok(());
    }

    if processes.is_empty() {
        println!("No other Rally processes are running.");
        return Ok(());
    }
    for line in format_table(&processes) {
        println!("{line}");
    }
    Ok(())
}

pub fn kill_es(config: &Config, base_path: &str) -> anyhow::Result<()> {
    let base = normalize_user_path(base_path)?;
    let signalled = reap_server_instances(&SystemProcessTable, &base, config)
        .with_context(|| format!("failed to kill benchmark servers under {}", base.display()))?;

    if signalled.is_empty() {
        println!("No benchmark servers found under {}.", base.display());
    } else {
        info!(count = signalled.len(), "Benchmark servers terminated");
        for pid in signalled {
            println!("Terminated PID {pid}");
        }
    }
    Ok(())
}

fn format_table(processes: &[ProcessRecord]) -> Vec<String> {
    let mut lines = vec![format!("{:>8}  {:<16}  {}", "PID", "NAME", "COMMAND")];
    lines.extend(
        processes
            .iter()
            .map(|p| format!("{:>8}  {:<16}  {}", p.pid, p.name, p.command_line())),
    );
    lines
}
