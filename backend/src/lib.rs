//! Finds and reaps processes belonging to a Rally benchmarking setup on Linux.
//!
//! Two operations share one classification layer: reaping benchmark servers
//! that leaked past an aborted race, and finding other running instances of
//! the Rally CLI. Both run against a [`ProcessTable`], backed by `procfs` and
//! `nix` in production and by a scripted fake in tests.

mod config;
mod finder;
mod matcher;
mod paths;
mod process_kill;
mod process_list;
mod process_table;
mod reaper;
#[cfg(test)]
mod testing;
mod types;

pub use config::{Config, MatchPolicy, ReaperConfig};
pub use finder::{find_all_other_rally_processes, find_other_tool_processes, own_pid};
pub use matcher::{is_benchmark_server_process, is_tool_process};
pub use paths::{expand_tilde, normalize_user_path};
pub use process_table::{ProcessTable, SystemProcessTable};
pub use reaper::{kill_running_es_instances, kill_running_es_instances_with, reap_server_instances};
pub use types::{ProcError, ProcessRecord};
