//! Object storage audit store
//!
//! Records are uploaded as `{prefix}/{key}` (or just `{key}` without a
//! prefix). Uploading the same key again replaces the object, which gives the
//! same overwrite behaviour as the filesystem store.

use async_trait::async_trait;
use sonic_client::ObjectStorage;
use sonic_core::domain::audit::AuditLog;
use std::sync::Arc;
use tracing::debug;

use super::{AuditStore, is_project_record};
use crate::error::AuditError;

/// AuditStore backed by an object storage bucket
pub struct ObjectAuditStore {
    client: Arc<dyn ObjectStorage>,
    bucket: String,
    prefix: String,
}

impl ObjectAuditStore {
    /// Creates a store writing to `bucket` under an optional key prefix
    pub fn new(
        client: Arc<dyn ObjectStorage>,
        bucket: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    /// Full object key for a storage name
    pub fn object_key(&self, name: &str) -> String {
        let prefix = self.prefix.trim_matches('/');
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", prefix, name)
        }
    }
}

#[async_trait]
impl AuditStore for ObjectAuditStore {
    async fn store(&self, log: &AuditLog) -> Result<(), AuditError> {
        let data = log.to_json()?;
        let key = self.object_key(&log.key());

        self.client.put_object(&self.bucket, &key, data).await?;

        debug!("Audit log uploaded to {}/{}", self.bucket, key);
        Ok(())
    }

    async fn load_logs(
        &self,
        project: &str,
        git_revision: &str,
    ) -> Result<Vec<AuditLog>, AuditError> {
        let list_prefix = self.object_key(&AuditLog::project_prefix(project));
        let keys = self.client.list_objects(&self.bucket, &list_prefix).await?;

        let mut logs = Vec::new();
        for key in keys {
            let name = key.rsplit('/').next().unwrap_or(&key);
            if !is_project_record(name, project) {
                continue;
            }

            let data = self.client.get_object(&self.bucket, &key).await?;
            let log = AuditLog::from_json(&data).map_err(|source| AuditError::Parse {
                key: key.clone(),
                source,
            })?;

            if log.git_revision == git_revision {
                logs.push(log);
            }
        }

        logs.sort_by_key(|log| log.start_time);
        Ok(logs)
    }
}
