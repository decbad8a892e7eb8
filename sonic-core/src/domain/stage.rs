//! Stage domain types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Container path every stage runs in
pub const WORKSPACE_DIR: &str = "/workspace";

/// Kind of volume mount
///
/// Advisory label only. Every kind is mounted the same way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeType {
    #[default]
    Bind,
    Cache,
    Tmp,
    #[serde(other)]
    Other,
}

/// A volume mounted into the stage container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    #[serde(rename = "type", default)]
    pub kind: VolumeType,
    /// Host path or named volume
    pub source: String,
    /// Path inside the container
    pub target: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub readonly: bool,
}

impl Volume {
    /// Bind mount of the current directory onto the workspace
    pub fn workspace() -> Self {
        Self {
            kind: VolumeType::Bind,
            source: ".".to_string(),
            target: WORKSPACE_DIR.to_string(),
            readonly: false,
        }
    }

    /// Formats the mount as a `-v` argument: `SRC:TARGET[:ro]`
    pub fn mount_arg(&self) -> String {
        if self.readonly {
            format!("{}:{}:ro", self.source, self.target)
        } else {
            format!("{}:{}", self.source, self.target)
        }
    }
}

/// A normalized, ready-to-run stage
///
/// Built by the caller from stage configuration once variables are substituted
/// and the runner is resolved. Consumed by a single execution; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageExecution {
    pub name: String,
    /// Fully qualified image reference
    pub runner: String,
    pub commands: Vec<String>,
    /// Sorted by key so the assembled command line is reproducible
    pub environment: BTreeMap<String, String>,
    pub volumes: Vec<Volume>,
}

impl StageExecution {
    /// Creates a stage with no commands, environment or volumes
    pub fn new(name: impl Into<String>, runner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            runner: runner.into(),
            commands: Vec::new(),
            environment: BTreeMap::new(),
            volumes: Vec::new(),
        }
    }

    pub fn with_commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands = commands.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }

    pub fn with_volume(mut self, volume: Volume) -> Self {
        self.volumes.push(volume);
        self
    }

    /// Appends a bind mount of `.` onto `/workspace` unless a volume already targets it
    pub fn ensure_workspace_mount(&mut self) {
        if !self.volumes.iter().any(|v| v.target == WORKSPACE_DIR) {
            self.volumes.push(Volume::workspace());
        }
    }
}
