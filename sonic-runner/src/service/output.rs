//! Output sink service
//!
//! Receives the stage header and the captured output of the container so the
//! caller decides where it goes (terminal, buffer, log file).

/// Destination for stage output
pub trait OutputSink: Send + Sync {
    /// Called once per stage before the container starts
    fn stage_started(&self, stage: &str, runner: &str, command: &str);

    /// Captured standard output of the container, verbatim
    fn stdout(&self, text: &str);

    /// Captured standard error of the container, verbatim
    fn stderr(&self, text: &str);
}
