//! Filesystem audit store
//!
//! One pretty-printed JSON file per record at `{directory}/{key}`. Files are
//! written to a temporary sibling and renamed into place, so a reader never
//! sees a partially written record.

use async_trait::async_trait;
use sonic_core::domain::audit::AuditLog;
use std::path::PathBuf;
use tracing::debug;

use super::{AuditStore, is_project_record};
use crate::error::AuditError;

/// AuditStore backed by a local directory
#[derive(Debug, Clone)]
pub struct FileAuditStore {
    directory: PathBuf,
}

impl FileAuditStore {
    /// Creates a store rooted at `directory`; the directory is created on first write
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Path of the file holding a record
    pub fn path_for(&self, log: &AuditLog) -> PathBuf {
        self.directory.join(log.key())
    }
}

#[async_trait]
impl AuditStore for FileAuditStore {
    async fn store(&self, log: &AuditLog) -> Result<(), AuditError> {
        let data = log.to_json()?;

        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(AuditError::io("create logs directory", &self.directory))?;

        let path = self.path_for(log);
        let tmp = path.with_extension("json.tmp");

        tokio::fs::write(&tmp, data)
            .await
            .map_err(AuditError::io("write audit log", &tmp))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(AuditError::io("write audit log", &path))?;

        debug!("Audit log written to {}", path.display());
        Ok(())
    }

    async fn load_logs(
        &self,
        project: &str,
        git_revision: &str,
    ) -> Result<Vec<AuditLog>, AuditError> {
        let mut entries = match tokio::fs::read_dir(&self.directory).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AuditError::io("read logs directory", &self.directory)(e)),
        };

        let mut logs = Vec::new();

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(AuditError::io("read logs directory", &self.directory))?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            if !is_project_record(&name, project) {
                continue;
            }

            let path = entry.path();
            let data = tokio::fs::read(&path)
                .await
                .map_err(AuditError::io("read log file", &path))?;

            let log = AuditLog::from_json(&data)
                .map_err(|source| AuditError::Parse { key: name, source })?;

            if log.git_revision == git_revision {
                logs.push(log);
            }
        }

        logs.sort_by_key(|log| log.start_time);
        Ok(logs)
    }
}
