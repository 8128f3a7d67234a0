//! Match policy and reaper timing, loadable from JSON with environment overrides.

use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::ProcError;

pub const ENV_GRACE_PERIOD_MS: &str = "ESRALLY_PROCS_GRACE_PERIOD_MS";
pub const ENV_KILL_TIMEOUT_MS: &str = "ESRALLY_PROCS_KILL_TIMEOUT_MS";
pub const ENV_POLL_INTERVAL_MS: &str = "ESRALLY_PROCS_POLL_INTERVAL_MS";

/// Names and markers used to recognize Rally and the servers it launches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchPolicy {
    /// Process names under which the CLI itself shows up (case-insensitive).
    pub tool_names: Vec<String>,
    /// Interpreter names that require a look at the command line.
    pub interpreter_prefixes: Vec<String>,
    /// Script or module names that identify the CLI when run by an interpreter.
    pub entry_points: Vec<String>,
    /// Argument fragment identifying the server bootstrap class.
    pub server_bootstrap_marker: String,
    /// Options carrying the server's installation directory.
    pub path_home_options: Vec<String>,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            tool_names: vec!["esrally".into(), "rally".into()],
            interpreter_prefixes: vec!["python".into()],
            entry_points: vec!["esrally".into()],
            server_bootstrap_marker: "org.elasticsearch.bootstrap.Elasticsearch".into(),
            path_home_options: vec!["-Des.path.home=".into(), "-Ees.path.home=".into()],
        }
    }
}

/// Timing of the SIGTERM → SIGKILL escalation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaperConfig {
    pub grace_period_ms: u64,
    pub kill_timeout_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            grace_period_ms: 3000,
            kill_timeout_ms: 2000,
            poll_interval_ms: 100,
        }
    }
}

impl ReaperConfig {
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    pub fn kill_timeout(&self) -> Duration {
        Duration::from_millis(self.kill_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// A zero poll interval would spin on the liveness check.
    pub fn validate(&self) -> Result<(), ProcError> {
        if self.poll_interval_ms == 0 {
            return Err(ProcError::Config("poll_interval_ms must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub matcher: MatchPolicy,
    pub reaper: ReaperConfig,
}

impl Config {
    /// Load configuration from an optional JSON file, then apply environment overrides.
    ///
    /// Missing fields fall back to their defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ProcError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ProcError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            ProcError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ProcError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| ProcError::Config(e.to_string()))?;
        config.reaper.validate()?;
        Ok(config)
    }

    /// Override reaper timings from variables resolved through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ProcError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fields = [
            (ENV_GRACE_PERIOD_MS, &mut self.reaper.grace_period_ms),
            (ENV_KILL_TIMEOUT_MS, &mut self.reaper.kill_timeout_ms),
            (ENV_POLL_INTERVAL_MS, &mut self.reaper.poll_interval_ms),
        ];
        for (key, field) in fields {
            let Some(value) = lookup(key) else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            *field = value.parse().map_err(|_| {
                ProcError::Config(format!("{key} must be milliseconds, got '{value}'"))
            })?;
        }
        self.reaper.validate()
    }
}
