//! Fail-fast stage sequencing

use sonic_core::domain::stage::StageExecution;
use tracing::info;

use crate::error::SequenceError;
use crate::repository::AuditStore;
use crate::service::ExecutionService;

/// Runs stages strictly in order, stopping at the first failure
///
/// Stages after a failed one are never started.
pub async fn run_stages(
    service: &dyn ExecutionService,
    stages: &[StageExecution],
    audit_store: Option<&dyn AuditStore>,
    project: &str,
) -> Result<(), SequenceError> {
    for (idx, stage) in stages.iter().enumerate() {
        info!("Running stage {}/{}: {}", idx + 1, stages.len(), stage.name);

        service
            .execute_stage(stage, audit_store, project)
            .await
            .map_err(|source| SequenceError::StageFailed {
                stage: stage.name.clone(),
                source,
            })?;
    }

    Ok(())
}
