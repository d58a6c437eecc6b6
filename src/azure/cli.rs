//! Azure CLI command execution.
//!
//! Runs `az` commands as subprocesses and returns their stdout. All Azure
//! access goes through the CLI so the tool reuses the operator's existing
//! `az login` session.

use crate::config;
use colored::Colorize;
use regex::Regex;
use std::error::Error;
use std::process::Command;
use std::sync::OnceLock;

/// Regex for splitting command strings while preserving quoted substrings.
static COMMAND_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_command_regex() -> &'static Regex {
    COMMAND_REGEX.get_or_init(|| {
        Regex::new(r#"'([^']*)'\s*|\"([^\"]*)\"\s*|([^'\s]*)\s*"#).expect("Invalid Regex")
    })
}

/// Run a shell command and return its stdout.
///
/// The command string is split on spaces, with quoted substrings preserved
/// so KQL queries survive intact.
pub fn run(cmd: &str) -> Result<String, Box<dyn Error>> {
    log::debug!("run({cmd})", cmd = cmd.on_blue());

    let cmds: Vec<&str> = split_and_strip(cmd);
    let program = cmds
        .first()
        .ok_or_else(|| format!("Empty command: '{cmd}'"))?;

    let mut command = Command::new(program);
    for arg in cmds.iter().skip(1) {
        command.arg(arg);
    }

    let output = command
        .output()
        .map_err(|e| format!("Failed to execute '{program}': {e}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::warn!(
            "{failed} to run {cmd}",
            failed = "failed".on_red(),
            cmd = cmd.on_blue()
        );
        return Err(format!("ERROR running az command: {stderr}").into());
    }

    if output.stdout.len() > config::MAX_CLI_OUTPUT_BYTES {
        return Err(format!(
            "Response too large: {} bytes from command: {:?}",
            output.stdout.len(),
            cmds
        )
        .into());
    }

    let stdout = String::from_utf8(output.stdout).map_err(|e| format!("Invalid UTF-8: {e}"))?;
    log::debug!("run() ok, stdout {} bytes", stdout.len());

    Ok(stdout)
}

/// Split a command string on spaces, preserving quoted substrings.
fn split_and_strip(input: &str) -> Vec<&str> {
    get_command_regex()
        .find_iter(input)
        .map(|m| m.as_str().trim().trim_matches('\'').trim_matches('"'))
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_and_strip_plain() {
        let input = "az account show";
        assert_eq!(split_and_strip(input), vec!["az", "account", "show"]);
    }

    #[test]
    fn test_split_and_strip_quoted_query() {
        let input = "az graph query -q 'resources | project id'";
        assert_eq!(
            split_and_strip(input),
            vec!["az", "graph", "query", "-q", "resources | project id"]
        );
    }

    #[test]
    fn test_split_and_strip_double_quotes() {
        let input = "echo \"a b\" c";
        assert_eq!(split_and_strip(input), vec!["echo", "a b", "c"]);
    }

    #[test]
    fn test_run_empty_command_fails() {
        assert!(run("").is_err());
    }
}
