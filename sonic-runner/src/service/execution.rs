//! Execution service
//!
//! Runs one stage end to end:
//! 1. Capture the start time and look up the git revision (`unknown` on failure)
//! 2. Assemble the container argv
//! 3. Store an audit record with an optimistic `success` status
//! 4. Run the container and surface its stdout/stderr
//! 5. On failure, mark the same record as `error` and store it again
//!
//! Only the container's own failure is returned to the caller. Revision
//! lookup and audit persistence failures are logged and absorbed.

use async_trait::async_trait;
use chrono::Utc;
use sonic_core::domain::audit::AuditLog;
use sonic_core::domain::stage::StageExecution;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::container::{build_run_args, display_command};
use crate::error::StageError;
use crate::process::{ProcessExecutor, git_revision_or_unknown};
use crate::repository::AuditStore;
use crate::service::OutputSink;

/// Service trait for executing stages
#[async_trait]
pub trait ExecutionService: Send + Sync {
    /// Executes a stage and records it in the audit store, if one is given
    ///
    /// # Arguments
    /// * `stage` - The resolved stage to run
    /// * `audit_store` - Where to record the execution; `None` skips auditing
    /// * `project` - Project name recorded in the audit log
    ///
    /// # Returns
    /// `Ok(())` if the container exited successfully, otherwise the container failure
    async fn execute_stage(
        &self,
        stage: &StageExecution,
        audit_store: Option<&dyn AuditStore>,
        project: &str,
    ) -> Result<(), StageError>;
}

/// Standard implementation of ExecutionService
pub struct StandardExecutionService {
    runtime: String,
    executor: Arc<dyn ProcessExecutor>,
    output: Arc<dyn OutputSink>,
}

impl StandardExecutionService {
    /// Creates a new execution service
    ///
    /// # Arguments
    /// * `runtime` - Container runtime binary (e.g., "docker")
    /// * `executor` - Runs the revision lookup and the container
    /// * `output` - Receives the stage header and container output
    pub fn new(
        runtime: impl Into<String>,
        executor: Arc<dyn ProcessExecutor>,
        output: Arc<dyn OutputSink>,
    ) -> Self {
        Self {
            runtime: runtime.into(),
            executor,
            output,
        }
    }

    /// Stores a record, logging instead of failing
    async fn record(&self, audit_store: Option<&dyn AuditStore>, log: &AuditLog) {
        let Some(store) = audit_store else {
            return;
        };

        match store.store(log).await {
            Ok(()) => debug!("Audit log {} stored ({})", log.key(), log.status),
            Err(e) => warn!("Error writing audit log {}: {}", log.key(), e),
        }
    }

    /// Runs the container and maps a non-zero exit to an error
    async fn run_container(&self, args: &[String]) -> Result<(), StageError> {
        let output = self.executor.run(args).await?;

        if !output.stdout.is_empty() {
            self.output.stdout(&output.stdout);
        }
        if !output.stderr.is_empty() {
            self.output.stderr(&output.stderr);
        }

        if output.success() {
            Ok(())
        } else {
            Err(StageError::CommandFailed {
                exit_code: output.exit_code,
                stderr: output.stderr,
            })
        }
    }
}

#[async_trait]
impl ExecutionService for StandardExecutionService {
    async fn execute_stage(
        &self,
        stage: &StageExecution,
        audit_store: Option<&dyn AuditStore>,
        project: &str,
    ) -> Result<(), StageError> {
        let started = Instant::now();
        let start_time = Utc::now();

        let git_revision = git_revision_or_unknown(self.executor.as_ref()).await;

        let args = build_run_args(&self.runtime, stage);
        let command = display_command(&args);

        info!("Starting stage '{}' with runner {}", stage.name, stage.runner);
        self.output.stage_started(&stage.name, &stage.runner, &command);

        let mut audit_log = AuditLog::new(project, git_revision, &stage.name, command, start_time);
        self.record(audit_store, &audit_log).await;

        let result = self.run_container(&args).await;

        match &result {
            Ok(()) => {
                info!(
                    "Stage '{}' completed in {:.2}s",
                    stage.name,
                    started.elapsed().as_secs_f64()
                );
            }
            Err(e) => {
                error!("Stage '{}' failed: {}", stage.name, e);
                audit_log.duration = started.elapsed().as_secs_f64();
                audit_log.set_error(e.to_string());
                self.record(audit_store, &audit_log).await;
            }
        }

        result
    }
}
