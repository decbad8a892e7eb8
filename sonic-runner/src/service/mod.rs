//! Service layer
//!
//! Services contain the runner's business logic. They orchestrate stage
//! execution using the injected process executor, audit store and output sink.
//!
//! All services are trait-based to enable testing and dependency injection.

mod execution;
mod output;
mod sequence;

// Re-export traits
pub use execution::ExecutionService;
pub use output::OutputSink;

// Re-export implementations
pub use execution::StandardExecutionService;
pub use sequence::run_stages;
