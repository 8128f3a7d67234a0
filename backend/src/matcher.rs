//! Pure predicates classifying a process by its name and command line.

use std::path::Path;

use crate::config::MatchPolicy;
use crate::paths::expand_tilde;

/// Whether `args` belong to a benchmark server whose installation lives under `base_path`.
///
/// The process must carry the server bootstrap marker and a path-home option
/// (`-Des.path.home=` or the legacy `-Ees.path.home=`) pointing below
/// `base_path`. Both sides are `~`-expanded; the prefix test is per path
/// component, so `/a/races2` is not under `/a/races`.
pub fn is_benchmark_server_process(
    args: &[String],
    base_path: &Path,
    policy: &MatchPolicy,
) -> bool {
    let marker = policy.server_bootstrap_marker.as_str();
    if marker.is_empty() || !args.iter().any(|arg| arg.contains(marker)) {
        return false;
    }

    let base = expand_tilde(&base_path.to_string_lossy());
    if base.as_os_str().is_empty() {
        return false;
    }
    args.iter()
        .filter_map(|arg| path_home_value(arg, policy))
        .any(|home| expand_tilde(home).starts_with(&base))
}

fn path_home_value<'a>(arg: &'a str, policy: &MatchPolicy) -> Option<&'a str> {
    policy
        .path_home_options
        .iter()
        .find_map(|option| arg.strip_prefix(option.as_str()))
        .filter(|value| !value.is_empty())
}

/// Whether a process is another running instance of the Rally CLI.
///
/// The caller's own pid never matches. A known tool name matches directly;
/// a generic interpreter matches only when its command line names one of the
/// entry points exactly.
pub fn is_tool_process(
    pid: i32,
    name: &str,
    args: &[String],
    own_pid: i32,
    policy: &MatchPolicy,
) -> bool {
    if pid == own_pid {
        return false;
    }
    if policy
        .tool_names
        .iter()
        .any(|tool| tool.eq_ignore_ascii_case(name))
    {
        return true;
    }

    let name = name.to_ascii_lowercase();
    let interpreter = policy
        .interpreter_prefixes
        .iter()
        .any(|prefix| !prefix.is_empty() && name.starts_with(&prefix.to_ascii_lowercase()));
    interpreter && references_entry_point(args, &policy.entry_points)
}

/// Whether `args` run one of `entry_points`, as the script or via `-m <module>`.
///
/// Only the interpreter's own slot counts: the first non-option argument
/// after `args[0]`, or the module named right after `-m`. Arguments passed on
/// to the script or module are never inspected.
fn references_entry_point(args: &[String], entry_points: &[String]) -> bool {
    let is_entry_point = |candidate: &str| entry_points.iter().any(|entry| entry == candidate);

    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "-m" => return rest.next().is_some_and(|module| is_entry_point(module.as_str())),
            "-c" => return false,
            option if option.starts_with('-') => continue,
            script => {
                return script
                    .rsplit(['/', '\\'])
                    .next()
                    .is_some_and(|file_name| is_entry_point(file_name));
            }
        }
    }
    false
}
