//! Error types for the runner

use sonic_client::ClientError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to start a process
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The argv was empty
    #[error("empty command line")]
    EmptyCommand,

    /// The program could not be started (e.g., binary not found)
    #[error("failed to execute '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of a stage's container process
#[derive(Debug, Error)]
pub enum StageError {
    /// The process ran and exited with a non-zero status
    #[error("exit status {exit_code}")]
    CommandFailed {
        exit_code: i32,
        /// Captured standard error
        stderr: String,
    },

    /// The process could not be started
    #[error(transparent)]
    Process(#[from] ProcessError),
}

impl StageError {
    /// Exit code of the failed process, if it ran at all
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            StageError::CommandFailed { exit_code, .. } => Some(*exit_code),
            StageError::Process(_) => None,
        }
    }
}

/// Failure of a stage in a sequence
#[derive(Debug, Error)]
pub enum SequenceError {
    #[error("stage {stage:?} failed")]
    StageFailed {
        stage: String,
        #[source]
        source: StageError,
    },
}

/// Audit log persistence errors
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Failed to serialize audit log: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to parse audit log {key}: {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Object storage error: {0}")]
    Storage(#[from] ClientError),
}

impl AuditError {
    pub(crate) fn io(
        action: &'static str,
        path: impl Into<PathBuf>,
    ) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| AuditError::Io {
            action,
            path,
            source,
        }
    }
}
