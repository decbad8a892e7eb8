//! Run command handler
//!
//! Validates every requested stage name before anything runs, then executes
//! the stages in order and stops at the first failure.

use anyhow::{Result, bail};
use colored::*;
use sonic_runner::{StandardExecutionService, SystemProcessExecutor, run_stages};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use super::list::print_available_stages;
use crate::config::Config;
use crate::output::ConsoleOutput;
use crate::store::create_audit_store;

/// Handle `run` and bare stage names
pub async fn handle_run_command(names: &[String], config: &Config) -> Result<()> {
    let project = config.load_project()?;

    let unknown = project.unknown_stages(names);
    if !unknown.is_empty() {
        eprintln!(
            "{}",
            format!("✗ Unknown stage(s): {}", unknown.join(", "))
                .red()
                .bold()
        );
        print_available_stages(&project);
        bail!("invalid stage names: {}", unknown.join(", "));
    }

    let runner = config.runner_config()?;
    let store = create_audit_store(&config.audit, &project.audit)?;

    let stages = names
        .iter()
        .map(|name| project.stage_execution(name, &runner))
        .collect::<Result<Vec<_>>>()?;

    let service = StandardExecutionService::new(
        runner.runtime.clone(),
        Arc::new(SystemProcessExecutor::new()),
        Arc::new(ConsoleOutput),
    );

    info!(
        "Running {} stage(s) for project '{}'",
        stages.len(),
        project.project.name
    );
    let started = Instant::now();

    run_stages(&service, &stages, Some(store.as_ref()), &project.project.name).await?;

    println!();
    println!(
        "{}",
        format!(
            "✓ {} stage(s) completed in {:.2}s",
            stages.len(),
            started.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );

    Ok(())
}
