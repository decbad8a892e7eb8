//! Audit log domain types
//!
//! One `AuditLog` is created per stage execution attempt. It is written once
//! before the container runs with an optimistic `success` status, and written
//! again with `error` if the container fails. Both writes share the same
//! storage key, so the second overwrites the first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp layout used in storage keys (second precision)
pub const KEY_TIME_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Revision recorded when the source revision cannot be determined
pub const UNKNOWN_REVISION: &str = "unknown";

/// Outcome of a stage execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Success,
    Error,
}

impl std::fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditStatus::Success => write!(f, "success"),
            AuditStatus::Error => write!(f, "error"),
        }
    }
}

/// Audit record of one stage execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    pub project: String,
    pub git_revision: String,
    pub stage: String,
    /// Full container command line, space joined
    pub command: String,
    pub start_time: DateTime<Utc>,
    /// Elapsed seconds
    pub duration: f64,
    pub status: AuditStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditLog {
    /// Creates a record with an optimistic `success` status
    pub fn new(
        project: impl Into<String>,
        git_revision: impl Into<String>,
        stage: impl Into<String>,
        command: impl Into<String>,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            project: project.into(),
            git_revision: git_revision.into(),
            stage: stage.into(),
            command: command.into(),
            start_time,
            duration: 0.0,
            status: AuditStatus::Success,
            error: None,
        }
    }

    /// Marks the record as failed
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status = AuditStatus::Error;
        self.error = Some(message.into());
    }

    /// Storage key: `{project}-{stage}-{YYYYMMDD-HHMMSS}.json`
    ///
    /// Two records for the same project and stage started within the same
    /// second share a key; the later write replaces the earlier one.
    pub fn key(&self) -> String {
        format!(
            "{}-{}-{}.json",
            self.project,
            self.stage,
            self.start_time.format(KEY_TIME_FORMAT)
        )
    }

    /// Prefix shared by every key of a project
    pub fn project_prefix(project: &str) -> String {
        format!("{}-", project)
    }

    /// Pretty-printed JSON, stable for diffing
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
    }

    pub fn from_json(data: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(data)
    }
}
