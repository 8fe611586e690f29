//! The human actor adapter (§4.3, §4.5): enqueues a [`HumanTask`] and either
//! blocks the caller until it resolves or returns a "waiting" marker for
//! the engine to pick back up later.

use async_trait::async_trait;
use flowmind_error::{FlowmindError, Result};
use flowmind_tasks::{HumanTaskQueue, NewTask, Priority, TaskStatus};
use serde_json::{json, Value};

use crate::adapter::ActorAdapter;
use crate::request::ActorRequest;

/// Enqueues activities with `actor_type: human` onto a [`HumanTaskQueue`].
pub struct HumanActor<'q> {
    queue: &'q HumanTaskQueue,
    wait_for_completion: bool,
}

impl<'q> HumanActor<'q> {
    #[must_use]
    pub fn new(queue: &'q HumanTaskQueue) -> Self {
        Self {
            queue,
            wait_for_completion: true,
        }
    }

    /// When `false`, `execute` returns as soon as the task is enqueued
    /// instead of blocking until it is resolved (§5 — the engine drives
    /// resumption itself via `resume_token`).
    #[must_use]
    pub fn wait_for_completion(mut self, wait: bool) -> Self {
        self.wait_for_completion = wait;
        self
    }
}

fn priority_for(request: &ActorRequest<'_>) -> Priority {
    if request.activity.has_escalation() {
        Priority::High
    } else {
        Priority::Normal
    }
}

#[async_trait]
impl<'q> ActorAdapter for HumanActor<'q> {
    async fn execute(&self, request: ActorRequest<'_>) -> Result<Value> {
        let due_at = request
            .activity
            .sla
            .as_ref()
            .and_then(|sla| sla.max.as_deref())
            .and_then(flowmind_core::parse_iso8601)
            .and_then(|duration| chrono::Duration::from_std(duration).ok())
            .map(|duration| chrono::Utc::now() + duration);

        let task = self
            .queue
            .enqueue(NewTask {
                activity_id: request.activity.id,
                token_id: request.token_id,
                role_id: request.activity.role_id,
                priority: priority_for(&request),
                inputs: request.inputs.clone(),
                due_at,
            })
            .await;

        if !self.wait_for_completion {
            return Ok(json!({
                "_human_task_id": task.id.to_string(),
                "_human_task_status": "pending",
                "_requires_human_action": true,
            }));
        }

        let resolved = self.queue.wait_for_completion(task.id).await?;
        match resolved.status {
            TaskStatus::Completed => {
                let mut outputs = crate::request::base_outputs(&request.inputs);
                if let Some(task_outputs) = resolved.outputs.as_ref().and_then(Value::as_object) {
                    outputs.extend(task_outputs.clone());
                }
                outputs.insert("_human_task_id".to_string(), json!(task.id.to_string()));
                outputs.insert("_human_task_status".to_string(), json!("completed"));
                Ok(Value::Object(outputs))
            }
            TaskStatus::Rejected => {
                let reason = resolved
                    .outputs
                    .as_ref()
                    .and_then(|outputs| outputs.get("reason"))
                    .and_then(Value::as_str)
                    .unwrap_or("no reason given")
                    .to_string();
                Err(FlowmindError::rejected_by_human(reason))
            }
            other => Err(FlowmindError::integration(format!(
                "human task resolved in unexpected state {other:?}"
            ))),
        }
    }
}
