//! Container command assembly
//!
//! Turns a stage into the argv passed to the container runtime:
//!
//! ```text
//! <runtime> run --rm --init --workdir /workspace
//!     [-e KEY=VALUE]... [-v SRC:TARGET[:ro]]... <image> [command...]
//! ```
//!
//! - One command is tokenized and passed directly, without a shell
//! - Several commands are joined with ` && ` and run through `sh -c`
//! - No commands leaves the image's default entrypoint in charge

use sonic_core::domain::stage::{StageExecution, WORKSPACE_DIR};

use crate::command::tokenize;

/// Builds the full container runtime argv for a stage
///
/// Environment variables are emitted in key order so the command line is
/// identical across runs.
pub fn build_run_args(runtime: &str, stage: &StageExecution) -> Vec<String> {
    let mut args: Vec<String> = [runtime, "run", "--rm", "--init", "--workdir", WORKSPACE_DIR]
        .into_iter()
        .map(String::from)
        .collect();

    for (key, value) in &stage.environment {
        args.push("-e".to_string());
        args.push(format!("{}={}", key, value));
    }

    for volume in &stage.volumes {
        args.push("-v".to_string());
        args.push(volume.mount_arg());
    }

    args.push(stage.runner.clone());

    match stage.commands.as_slice() {
        [] => {}
        [single] => args.extend(tokenize(single)),
        many => {
            args.push("sh".to_string());
            args.push("-c".to_string());
            args.push(many.join(" && "));
        }
    }

    args
}

/// Formats an argv for display and audit records
pub fn display_command(args: &[String]) -> String {
    args.join(" ")
}
