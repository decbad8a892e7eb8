//! Repository layer
//!
//! Audit log persistence. Every backend derives the storage key from
//! `AuditLog::key()`, so storing a record twice for the same execution
//! replaces the first copy instead of adding a second one.
//!
//! All repositories are trait-based to enable testing and mocking.

mod file;
mod object;

pub use file::FileAuditStore;
pub use object::ObjectAuditStore;

use async_trait::async_trait;
use sonic_core::domain::audit::AuditLog;

use crate::error::AuditError;

/// Persistence contract for audit logs
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Writes a record under its key, replacing any record with the same key
    async fn store(&self, log: &AuditLog) -> Result<(), AuditError>;

    /// Loads every record of a project for the given revision, oldest first
    async fn load_logs(&self, project: &str, git_revision: &str)
    -> Result<Vec<AuditLog>, AuditError>;
}

/// Returns true if a storage name belongs to the project's records
pub(crate) fn is_project_record(name: &str, project: &str) -> bool {
    name.starts_with(&AuditLog::project_prefix(project)) && name.ends_with(".json")
}
