//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod list;
mod logs;
mod run;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run one or more stages in sequence
    Run {
        /// Stage names, in execution order
        #[arg(required = true)]
        stages: Vec<String>,
    },
    /// List the stages in the configuration file
    List,
    /// Show audit logs recorded for a git revision
    Logs {
        /// Revision to show (default: current HEAD)
        #[arg(short, long)]
        revision: Option<String>,
    },
    /// Any other word is run as a stage name
    #[command(external_subcommand)]
    Stage(Vec<String>),
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
///
/// # Returns
/// Result indicating success or failure
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Run { stages } => run::handle_run_command(&stages, config).await,
        Commands::List => list::handle_list_command(config),
        Commands::Logs { revision } => logs::handle_logs_command(revision, config).await,
        Commands::Stage(stages) => run::handle_run_command(&stages, config).await,
    }
}
