// SPDX-License-Identifier: GPL-3.0-only

//! Command executor
//!
//! Runs each composed command through `sh -c`, in order. Exit statuses are
//! never inspected: a failing command is reported through its captured
//! output and execution moves on to the next one.

use tracing::{debug, warn};

use crate::compose::CommandPlan;
use crate::error::{Result, SysError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub command: String,
    /// Combined stdout and stderr
    pub output: String,
    pub executed: bool,
}

/// Run one shell command with stderr merged into stdout.
///
/// In dry-run mode nothing is spawned and the outcome is marked as not executed.
pub fn run_shell(command: &str, dry_run: bool) -> Result<CommandOutcome> {
    if dry_run {
        return Ok(CommandOutcome {
            command: command.to_string(),
            output: String::new(),
            executed: false,
        });
    }

    debug!("Spawning sh -c {:?}", command);
    let output = duct::cmd("sh", ["-c", command])
        .stderr_to_stdout()
        .stdout_capture()
        .unchecked()
        .run()
        .map_err(|error| SysError::CommandFailed {
            command: command.to_string(),
            stderr: error.to_string(),
        })?;

    // Invalid UTF-8 is replaced, not rejected
    let output = String::from_utf8_lossy(&output.stdout);
    Ok(CommandOutcome {
        command: command.to_string(),
        output: output.trim_end_matches(['\n', '\r']).to_string(),
        executed: true,
    })
}

/// Print and run every step of the plan in order.
pub fn execute_plan(plan: &CommandPlan) -> Vec<CommandOutcome> {
    let mut outcomes = Vec::with_capacity(plan.steps.len());
    for step in &plan.steps {
        println!("Running: {}", step);
        match run_shell(step, plan.dry_run) {
            Ok(outcome) => {
                if outcome.executed {
                    println!("{}", outcome.output);
                }
                outcomes.push(outcome);
            }
            Err(error) => {
                warn!("{}", error);
                outcomes.push(CommandOutcome {
                    command: step.clone(),
                    output: error.to_string(),
                    executed: false,
                });
            }
        }
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_run_spawns_nothing() {
        let outcome = run_shell("exit 1", true).unwrap();
        assert!(!outcome.executed);
        assert!(outcome.output.is_empty());
    }

    #[test]
    fn captures_stderr_and_ignores_exit_status() {
        let outcome = run_shell("echo out; echo err 1>&2; exit 3", false).unwrap();
        assert!(outcome.executed);
        assert!(outcome.output.contains("out"));
        assert!(outcome.output.contains("err"));
    }

    #[test]
    fn non_utf8_output_is_still_reported() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("marker");
        let command = format!("printf 'ok\\377\\n'; touch {}", marker.display());

        let outcome = run_shell(&command, false).unwrap();

        assert!(marker.exists());
        assert!(outcome.executed);
        assert_eq!(outcome.output, "ok\u{FFFD}");
    }

    #[test]
    fn failing_step_does_not_stop_the_plan() {
        let plan = CommandPlan {
            steps: vec!["false".to_string(), "echo second".to_string()],
            dry_run: false,
        };
        let outcomes = execute_plan(&plan);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|outcome| outcome.executed));
        assert_eq!(outcomes[1].output, "second");
    }

    #[test]
    fn dry_run_plan_reports_every_step() {
        let plan = CommandPlan {
            steps: vec!["mdadm --detail --scan".to_string(), "mount /data".to_string()],
            dry_run: true,
        };
        let outcomes = execute_plan(&plan);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|outcome| !outcome.executed));
        assert_eq!(outcomes[1].command, "mount /data");
    }
}
