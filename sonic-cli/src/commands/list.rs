//! List command handler

use anyhow::Result;
use colored::*;

use crate::config::Config;
use crate::project::ProjectConfig;

/// Print the stages declared in the configuration file
pub fn handle_list_command(config: &Config) -> Result<()> {
    let project = config.load_project()?;

    if project.stages.is_empty() {
        println!("{}", "No stages found.".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} stage(s):", project.stages.len()).bold()
    );
    println!();

    for (name, stage) in &project.stages {
        println!("  {} {}", "▸".cyan(), name.bold());
        println!("    Runner:   {}", runner_label(&stage.runner).dimmed());
        println!(
            "    Commands: {}",
            stage.commands.len().to_string().dimmed()
        );
        if !stage.requires.is_empty() {
            println!("    Requires: {}", stage.requires.join(", ").dimmed());
        }
        if let Some(timeout) = &stage.timeout {
            println!("    Timeout:  {}", timeout.dimmed());
        }
    }

    Ok(())
}

/// Print stage names to stderr, used when a requested stage does not exist
pub fn print_available_stages(project: &ProjectConfig) {
    eprintln!();
    eprintln!("{}", "Available stages:".bold());
    for (name, stage) in &project.stages {
        eprintln!("  - {} ({})", name, runner_label(&stage.runner));
    }
}

fn runner_label(runner: &str) -> &str {
    if runner.is_empty() {
        "default runner"
    } else {
        runner
    }
}
