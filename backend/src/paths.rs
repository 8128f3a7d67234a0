//! Home-directory expansion for user-supplied paths.

use std::env;
use std::path::PathBuf;

use crate::types::ProcError;

/// Expand a leading `~` to the user's home directory.
///
/// Anything else, or a `~` that cannot be resolved, is returned as-is.
pub fn expand_tilde(raw: &str) -> PathBuf {
    if raw == "~" || raw.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            return match raw.strip_prefix("~/") {
                Some(rest) => home.join(rest),
                None => home,
            };
        }
    }
    PathBuf::from(raw)
}

/// Normalize a user-provided path, expanding `~` and making it absolute.
pub fn normalize_user_path(raw: &str) -> Result<PathBuf, ProcError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ProcError::InvalidPath("path is empty".into()));
    }

    let expanded = expand_tilde(trimmed);
    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(expanded))
            .map_err(|e| ProcError::InvalidPath(format!("cannot resolve current directory: {e}")))
    }
}
