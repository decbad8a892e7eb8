//! Terminal output for stage runs

use colored::*;
use sonic_runner::OutputSink;
use std::io::Write;

/// Prints a colored stage header and passes container output through
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOutput;

impl OutputSink for ConsoleOutput {
    fn stage_started(&self, stage: &str, runner: &str, command: &str) {
        println!();
        println!("{} {}", "▸ Stage:".cyan().bold(), stage.bold());
        println!("  Runner:  {}", runner.dimmed());
        println!("  Command: {}", command.dimmed());
        println!();
    }

    fn stdout(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }

    fn stderr(&self, text: &str) {
        let mut err = std::io::stderr().lock();
        let _ = err.write_all(text.as_bytes());
        let _ = err.flush();
    }
}
