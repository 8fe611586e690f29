//! Shared run-to-completion execution, used by both the `run` subcommand
//! and the `/api/v1/workflows/run` handler (§10.5).

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use flowmind_checkpoint::{AutoCheckpoint, CheckpointStore};
use flowmind_engine::{Engine, EngineOptions, EngineStatus};
use flowmind_error::{FlowmindError, Result};
use flowmind_token::Token;
use flowmind_workflow::Workflow;
use tokio::sync::Mutex;

use crate::collaborators::DefaultCollaborators;

/// Interval for the background auto-checkpoint tick (§4.7).
const AUTO_CHECKPOINT_INTERVAL: Duration = Duration::from_secs(30);

/// Outcome of one run-to-completion pass (§6 `/workflows/run` response shape).
pub struct RunOutcome {
    pub run_id: flowmind_core::WorkflowId,
    pub status: EngineStatus,
    pub message: String,
    pub tokens: Vec<Token>,
}

pub async fn run_workflow_file(
    path: &Path,
    api_key: Option<String>,
    collaborators: &DefaultCollaborators,
) -> Result<RunOutcome> {
    let source = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| FlowmindError::validation(format!("failed to read workflow file {}: {e}", path.display())))?;
    let workflow = flowmind_workflow::load(&source)?;
    run_workflow(workflow, api_key, collaborators).await
}

/// Drive one workflow definition to completion.
///
/// The control plane always runs with `wait_for_human_tasks = false`:
/// §6 names no HTTP endpoint to resume a kernel-parked token, so human
/// activities block inline on [`flowmind_tasks::HumanTaskQueue::wait_for_completion`]
/// instead, resolved by a concurrent `/api/v1/tasks/:id/complete` (or
/// `/reject`) request against the same shared queue. Kernel-managed
/// deferral (`wait_for_human_tasks = true` plus `Engine::resume_token`)
/// stays available to embedders driving the engine API directly.
pub async fn run_workflow(
    workflow: Workflow,
    api_key: Option<String>,
    collaborators: &DefaultCollaborators,
) -> Result<RunOutcome> {
    let mut options = EngineOptions::from_env();
    options.wait_for_human_tasks = false;
    if api_key.is_some() {
        options.gemini_api_key = api_key;
    }

    let max_steps = options.max_steps;
    let mut engine = Engine::new(workflow, options)?
        .with_task_queue(collaborators.task_queue.clone())
        .with_dead_letter(collaborators.dead_letter.clone());

    let run_id = engine.workflow().id;
    engine.start(HashMap::new())?;

    let engine = Arc::new(Mutex::new(engine));

    let auto_checkpoint = {
        let engine = engine.clone();
        let store = collaborators.checkpoint_store.clone();
        AutoCheckpoint::start(store, run_id, AUTO_CHECKPOINT_INTERVAL, move || {
            let engine = engine.clone();
            async move {
                let engine = engine.lock().await;
                matches!(engine.status(), EngineStatus::Running | EngineStatus::WaitingHuman)
                    .then(|| engine.checkpoint())
            }
        })
    };

    let mut steps = 0;
    loop {
        let status = engine.lock().await.status();
        if status != EngineStatus::Running || steps >= max_steps {
            break;
        }
        engine.lock().await.run_step().await?;
        steps += 1;
    }

    auto_checkpoint.stop().await;

    let engine = engine.lock().await;
    collaborators.checkpoint_store.save(run_id, &engine.checkpoint()).await?;

    let status = engine.status();
    let message = match status {
        EngineStatus::Completed => "workflow completed".to_string(),
        EngineStatus::Failed => "workflow failed".to_string(),
        other => format!("workflow ended in state {other}"),
    };

    Ok(RunOutcome {
        run_id,
        status,
        message,
        tokens: engine.tokens().to_vec(),
    })
}
