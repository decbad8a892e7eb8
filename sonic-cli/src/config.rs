//! Configuration module
//!
//! Settings gathered from command-line flags and their environment variables.

use anyhow::Result;
use sonic_runner::RunnerConfig;
use std::path::PathBuf;

use crate::project::ProjectConfig;
use crate::vars::ExecVars;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the project configuration file
    pub config_file: PathBuf,

    /// Variables substituted into stage configuration
    pub vars: ExecVars,

    /// Audit store flags; these win over the configuration file
    pub audit: AuditOverrides,

    /// Container runtime override
    pub runtime: Option<String>,

    /// Default registry override
    pub registry: Option<String>,
}

/// Audit store settings given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditOverrides {
    pub store: Option<String>,
    pub path: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_endpoint: Option<String>,
}

impl Config {
    /// Loads the project configuration with variables applied
    pub fn load_project(&self) -> Result<ProjectConfig> {
        ProjectConfig::load(&self.config_file, &self.vars)
    }

    /// Runner settings: environment first, then flags on top
    pub fn runner_config(&self) -> Result<RunnerConfig> {
        let mut config = RunnerConfig::from_env();

        if let Some(runtime) = &self.runtime {
            config = config.with_runtime(runtime);
        }
        if let Some(registry) = &self.registry {
            config = config.with_registry(registry);
        }

        config.validate()?;
        Ok(config)
    }
}
