//! Sonic CLI
//!
//! Runs the build stages declared in `.sonic.yml` inside containers and
//! records an audit log for every run.

mod commands;
mod config;
mod output;
mod project;
mod store;
mod vars;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::{AuditOverrides, Config};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::project::DEFAULT_CONFIG_FILE;
use crate::vars::ExecVars;

#[derive(Parser)]
#[command(name = "sonic")]
#[command(about = "A build tool for CI/CD pipelines", long_about = None)]
struct Cli {
    /// Path to sonic configuration file
    #[arg(
        short = 'f',
        long = "sonic-file",
        env = "SONIC_CONFIG_FILE",
        default_value = DEFAULT_CONFIG_FILE,
        global = true
    )]
    sonic_file: PathBuf,

    /// Execution variables in key=value format (can be specified multiple times)
    #[arg(
        short = 'v',
        long = "var",
        env = "SONIC_VARS",
        value_delimiter = ',',
        global = true
    )]
    vars: Vec<String>,

    /// Audit log storage type (file or s3)
    #[arg(long, env = "SONIC_AUDIT_STORE", global = true)]
    audit_store: Option<String>,

    /// Path for audit logs (directory for file store, prefix for s3)
    #[arg(long, env = "SONIC_AUDIT_PATH", global = true)]
    audit_path: Option<String>,

    /// Bucket name for audit logs when using the s3 store
    #[arg(long = "audit-s3-bucket", env = "SONIC_AUDIT_S3_BUCKET", global = true)]
    audit_s3_bucket: Option<String>,

    /// Object storage endpoint for the s3 store
    #[arg(
        long = "audit-s3-endpoint",
        env = "SONIC_AUDIT_S3_ENDPOINT",
        global = true
    )]
    audit_s3_endpoint: Option<String>,

    /// Container runtime binary (default: $SONIC_RUNTIME or docker)
    #[arg(long, global = true)]
    runtime: Option<String>,

    /// Registry for runner images without one (default: $SONIC_DEFAULT_REGISTRY or public.ecr.aws)
    #[arg(long, global = true)]
    registry: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sonic=warn,sonic_runner=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        config_file: cli.sonic_file,
        vars: ExecVars::parse(&cli.vars),
        audit: AuditOverrides {
            store: cli.audit_store,
            path: cli.audit_path,
            s3_bucket: cli.audit_s3_bucket,
            s3_endpoint: cli.audit_s3_endpoint,
        },
        runtime: cli.runtime,
        registry: cli.registry,
    };

    handle_command(cli.command, &config).await
}
