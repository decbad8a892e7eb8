//! Runner configuration
//!
//! Defines which container runtime runs stages and which registry fills in
//! runner images that do not name one.

use sonic_core::domain::image::resolve_runner_image;

/// Default container runtime binary
pub const DEFAULT_RUNTIME: &str = "docker";

/// Default registry for runner images without a domain (AWS ECR public)
pub const DEFAULT_REGISTRY: &str = "public.ecr.aws";

/// Runner configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Container runtime binary (e.g., "docker", "podman")
    pub runtime: String,

    /// Registry prepended to runner images without a domain
    pub default_registry: String,
}

impl RunnerConfig {
    /// Creates a new configuration
    pub fn new(runtime: impl Into<String>, default_registry: impl Into<String>) -> Self {
        Self {
            runtime: runtime.into(),
            default_registry: default_registry.into(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Environment variables (all optional):
    /// - SONIC_RUNTIME (default: docker)
    /// - SONIC_DEFAULT_REGISTRY (default: public.ecr.aws)
    pub fn from_env() -> Self {
        let runtime = std::env::var("SONIC_RUNTIME")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_RUNTIME.to_string());

        let default_registry = std::env::var("SONIC_DEFAULT_REGISTRY")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_REGISTRY.to_string());

        Self::new(runtime, default_registry)
    }

    /// Overrides the runtime
    pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = runtime.into();
        self
    }

    /// Overrides the default registry
    pub fn with_registry(mut self, registry: impl Into<String>) -> Self {
        self.default_registry = registry.into();
        self
    }

    /// Resolves a runner string against the default registry
    pub fn resolve_runner(&self, runner: &str) -> String {
        resolve_runner_image(runner, &self.default_registry)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.runtime.trim().is_empty() {
            anyhow::bail!("runtime cannot be empty");
        }

        if self.default_registry.trim().is_empty() {
            anyhow::bail!("default_registry cannot be empty");
        }

        if self.default_registry.contains("://") {
            anyhow::bail!("default_registry must be a host, not a URL");
        }

        if self.default_registry.contains('/') {
            anyhow::bail!("default_registry must not contain a path");
        }

        Ok(())
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_RUNTIME, DEFAULT_REGISTRY)
    }
}
