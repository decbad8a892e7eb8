//! Logs command handler
//!
//! Shows the audit records stored for the project at one git revision.

use anyhow::{Context, Result};
use colored::*;
use sonic_core::domain::audit::{AuditLog, AuditStatus};
use sonic_runner::SystemProcessExecutor;
use sonic_runner::process::git_revision;

use crate::config::Config;
use crate::store::create_audit_store;

/// Handle `logs`
pub async fn handle_logs_command(revision: Option<String>, config: &Config) -> Result<()> {
    let project = config.load_project()?;
    let store = create_audit_store(&config.audit, &project.audit)?;

    let revision = match revision {
        Some(revision) => revision,
        None => git_revision(&SystemProcessExecutor::new())
            .await
            .context("Failed to read current git revision; pass --revision")?,
    };

    let logs = store
        .load_logs(&project.project.name, &revision)
        .await
        .context("Failed to load audit logs")?;

    if logs.is_empty() {
        println!(
            "{}",
            format!("No audit logs found for revision {}.", revision).yellow()
        );
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} audit log(s) for revision {}:", logs.len(), revision).bold()
    );
    println!();
    for log in &logs {
        print_audit_log(log);
    }

    Ok(())
}

fn print_audit_log(log: &AuditLog) {
    let status = match log.status {
        AuditStatus::Success => log.status.to_string().green(),
        AuditStatus::Error => log.status.to_string().red(),
    };

    println!("  {} {} [{}]", "▸".cyan(), log.stage.bold(), status);
    println!(
        "    Started:  {}",
        log.start_time
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    if log.duration > 0.0 {
        println!("    Duration: {:.2}s", log.duration);
    }
    println!("    Command:  {}", log.command.dimmed());
    if let Some(error) = &log.error {
        println!("    Error:    {}", error.red());
    }
}
