//! Project configuration
//!
//! Schema of the `.sonic.yml` file. Stage order follows the file.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use sonic_core::domain::stage::{StageExecution, Volume};
use sonic_runner::RunnerConfig;
use std::path::Path;

use crate::vars::ExecVars;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".sonic.yml";

/// Top-level configuration document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub project: ProjectInfo,

    #[serde(default)]
    pub audit: AuditConfig,

    #[serde(default)]
    pub stages: IndexMap<String, StageConfig>,
}

/// Project metadata
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectInfo {
    /// Recorded in every audit log and used in storage keys
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub language: String,

    #[serde(default)]
    pub root: String,
}

/// Audit store settings from the configuration file
///
/// Command-line flags take precedence over every field here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// "file" or "s3"
    pub store: Option<String>,

    /// Directory for the file store, key prefix for s3
    pub path: Option<String>,

    #[serde(rename = "s3bucket")]
    pub s3_bucket: Option<String>,

    /// Object storage endpoint for s3
    pub endpoint: Option<String>,
}

/// A stage as written in the configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageConfig {
    /// Runner image; empty means the default runner
    #[serde(default)]
    pub runner: String,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub commands: Vec<String>,

    /// Names of stages this one depends on (informational)
    #[serde(default)]
    pub requires: Vec<String>,

    #[serde(default)]
    pub environment: IndexMap<String, String>,

    #[serde(default)]
    pub volumes: Vec<Volume>,

    #[serde(default)]
    pub artifacts: Vec<String>,

    #[serde(default)]
    pub coverage: Option<Coverage>,

    /// Stage timeout (informational)
    #[serde(default)]
    pub timeout: Option<String>,
}

/// Coverage settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Coverage {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub threshold: f64,
}

impl ProjectConfig {
    /// Reads and parses a configuration file, then substitutes variables
    pub fn load(path: &Path, vars: &ExecVars) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config = Self::from_yaml(&data)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.resolve_vars(vars);
        Ok(config)
    }

    pub fn from_yaml(data: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(data)
    }

    /// Substitutes `${KEY}` in environment values and volume paths
    pub fn resolve_vars(&mut self, vars: &ExecVars) {
        if vars.is_empty() {
            return;
        }

        for stage in self.stages.values_mut() {
            for value in stage.environment.values_mut() {
                *value = vars.resolve(value);
            }
            for volume in &mut stage.volumes {
                volume.source = vars.resolve(&volume.source);
                volume.target = vars.resolve(&volume.target);
            }
        }
    }

    /// Names from `requested` that no stage matches, in request order
    pub fn unknown_stages<'a>(&self, requested: &'a [String]) -> Vec<&'a str> {
        requested
            .iter()
            .filter(|name| !self.stages.contains_key(name.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Builds the ready-to-run form of a stage
    ///
    /// Resolves the runner against the default registry and adds the
    /// workspace mount when no volume targets it.
    pub fn stage_execution(&self, name: &str, runner: &RunnerConfig) -> Result<StageExecution> {
        let stage = self
            .stages
            .get(name)
            .with_context(|| format!("Unknown stage: {}", name))?;

        let mut execution = StageExecution {
            name: name.to_string(),
            runner: runner.resolve_runner(&stage.runner),
            commands: stage.commands.clone(),
            environment: stage
                .environment
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            volumes: stage.volumes.clone(),
        };
        execution.ensure_workspace_mount();

        Ok(execution)
    }
}
