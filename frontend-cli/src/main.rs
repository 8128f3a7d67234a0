use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rally_procs::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "esrally-procs", version, about = "Inspect and clean up Rally processes")]
struct Cli {
    /// JSON file overriding the match policy and reaper timings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List other running Rally instances
    List {
        /// Print the processes as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Kill benchmark servers left behind under a races directory
    KillEs {
        /// Directory the leaked servers were installed under
        #[arg(long, default_value = "~/.rally/benchmarks/races")]
        base_path: String,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command {
        Command::List { json } => commands::list(&config, json),
        Command::KillEs { base_path } => commands::kill_es(&config, &base_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn kill_es_defaults_to_rally_races_directory() {
        let cli = Cli::parse_from(["esrally-procs", "kill-es"]);
        match cli.command {
            Command::KillEs { base_path } => assert_eq!(base_path, "~/.rally/benchmarks/races"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::parse_from([
            "esrally-procs",
            "list",
            "--json",
            "--config",
            "/tmp/procs.json",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/procs.json")));
        assert!(matches!(cli.command, Command::List { json: true }));
    }
}
