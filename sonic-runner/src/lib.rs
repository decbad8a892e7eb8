//! Sonic Runner
//!
//! Executes stages in containers and keeps an audit trail of every run.
//!
//! Architecture:
//! - Configuration: container runtime and default registry
//! - Command assembly: tokenizer and container argv builder
//! - Process execution: injected `ProcessExecutor` capability
//! - Repositories: audit log persistence (filesystem, object storage)
//! - Services: stage execution protocol and fail-fast sequencing
//!
//! Stages run one at a time. The container process is awaited to completion
//! before the next stage starts.

pub mod command;
pub mod config;
pub mod container;
pub mod error;
pub mod process;
pub mod repository;
pub mod service;

#[cfg(test)]
mod testing;

pub use config::RunnerConfig;
pub use error::{AuditError, ProcessError, SequenceError, StageError};
pub use process::{ProcessExecutor, ProcessOutput, SystemProcessExecutor};
pub use repository::{AuditStore, FileAuditStore, ObjectAuditStore};
pub use service::{ExecutionService, OutputSink, StandardExecutionService, run_stages};
