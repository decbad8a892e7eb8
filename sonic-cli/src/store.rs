//! Audit store selection
//!
//! Picks the store kind and its settings from command-line flags, then the
//! configuration file, then built-in defaults. Empty values count as unset.

use anyhow::{Result, bail};
use sonic_client::{DEFAULT_ENDPOINT, HttpObjectStorage};
use sonic_runner::{AuditStore, FileAuditStore, ObjectAuditStore};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AuditOverrides;
use crate::project::AuditConfig;

/// Store kind used when neither flags nor the file name one
pub const DEFAULT_AUDIT_STORE: &str = "file";

/// Directory of the file store when no path is given
pub const DEFAULT_AUDIT_PATH: &str = ".logs";

/// Fully resolved audit store settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditStoreSettings {
    File {
        directory: PathBuf,
    },
    S3 {
        bucket: String,
        prefix: String,
        endpoint: String,
    },
}

impl AuditStoreSettings {
    /// Applies flag > file > default precedence
    pub fn resolve(flags: &AuditOverrides, file: &AuditConfig) -> Result<Self> {
        let kind = first_set(&flags.store, &file.store).unwrap_or(DEFAULT_AUDIT_STORE);
        let path = first_set(&flags.path, &file.path);

        match kind {
            "file" => Ok(Self::File {
                directory: PathBuf::from(path.unwrap_or(DEFAULT_AUDIT_PATH)),
            }),
            "s3" => {
                let Some(bucket) = first_set(&flags.s3_bucket, &file.s3_bucket) else {
                    bail!("s3 bucket must be specified for s3 audit store");
                };

                Ok(Self::S3 {
                    bucket: bucket.to_string(),
                    prefix: path.unwrap_or_default().to_string(),
                    endpoint: first_set(&flags.s3_endpoint, &file.endpoint)
                        .unwrap_or(DEFAULT_ENDPOINT)
                        .to_string(),
                })
            }
            other => bail!("unknown audit store type: {}", other),
        }
    }

    /// Builds the store these settings describe
    pub fn build(&self) -> Arc<dyn AuditStore> {
        match self {
            Self::File { directory } => Arc::new(FileAuditStore::new(directory.clone())),
            Self::S3 {
                bucket,
                prefix,
                endpoint,
            } => Arc::new(ObjectAuditStore::new(
                Arc::new(HttpObjectStorage::new(endpoint.clone())),
                bucket.clone(),
                prefix.clone(),
            )),
        }
    }
}

/// Resolves settings and builds the audit store
pub fn create_audit_store(flags: &AuditOverrides, file: &AuditConfig) -> Result<Arc<dyn AuditStore>> {
    Ok(AuditStoreSettings::resolve(flags, file)?.build())
}

fn first_set<'a>(flag: &'a Option<String>, file: &'a Option<String>) -> Option<&'a str> {
    [flag, file]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .find(|value| !value.is_empty())
}
