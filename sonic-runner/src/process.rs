//! Process execution
//!
//! The runner never spawns processes directly; it goes through a
//! `ProcessExecutor` handed to it by the caller. The system implementation
//! runs the argv with no stdin and captures stdout and stderr as text.

use async_trait::async_trait;
use sonic_core::domain::audit::UNKNOWN_REVISION;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::error::{ProcessError, StageError};

/// Captured result of a process that ran to completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `-1` when the process was killed by a signal
    pub exit_code: i32,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Capability to run an argv and capture its output
#[async_trait]
pub trait ProcessExecutor: Send + Sync {
    /// Runs `argv[0]` with the remaining arguments and waits for it to exit
    ///
    /// A non-zero exit is not an error at this level; only failure to start
    /// the process is.
    async fn run(&self, argv: &[String]) -> Result<ProcessOutput, ProcessError>;
}

/// Executor backed by real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessExecutor;

impl SystemProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessExecutor for SystemProcessExecutor {
    async fn run(&self, argv: &[String]) -> Result<ProcessOutput, ProcessError> {
        let (program, args) = argv.split_first().ok_or(ProcessError::EmptyCommand)?;

        debug!("Executing {} {:?}", program, args);

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| ProcessError::Spawn {
                program: program.clone(),
                source,
            })?;

        let result = ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        };

        debug!(
            "{} exited with {}: stdout_len={}, stderr_len={}",
            program,
            result.exit_code,
            result.stdout.len(),
            result.stderr.len()
        );

        Ok(result)
    }
}

/// Looks up the current source revision with `git rev-parse HEAD`
pub async fn git_revision(executor: &dyn ProcessExecutor) -> Result<String, StageError> {
    let argv = ["git", "rev-parse", "HEAD"].map(String::from);
    let output = executor.run(&argv).await?;

    if !output.success() {
        return Err(StageError::CommandFailed {
            exit_code: output.exit_code,
            stderr: output.stderr,
        });
    }

    Ok(output.stdout.trim().to_string())
}

/// Like `git_revision`, but falls back to `"unknown"` on any failure
pub async fn git_revision_or_unknown(executor: &dyn ProcessExecutor) -> String {
    match git_revision(executor).await {
        Ok(revision) => revision,
        Err(e) => {
            debug!("Could not determine git revision: {}", e);
            UNKNOWN_REVISION.to_string()
        }
    }
}
