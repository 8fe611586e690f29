//! Tag-dispatch on `activity.actor_type` (§4.3, §9 "Actor polymorphism"):
//! selects one of the four adapter variants and runs it.

use flowmind_error::Result;
use flowmind_tasks::HumanTaskQueue;
use flowmind_workflow::model::ActorType;
use serde_json::Value;

use crate::adapter::ActorAdapter;
use crate::ai::AiActor;
use crate::human::HumanActor;
use crate::request::ActorRequest;
use crate::robot::RobotActor;
use crate::software::SoftwareActor;

/// Credentials and toggles the dispatcher needs to construct adapters.
/// None of this is workflow data — it is process configuration read once
/// at startup (§6 environment variables).
#[derive(Debug, Clone, Default)]
pub struct ActorConfig {
    /// `GEMINI_API_KEY` — absence fails AI activities with a config-error.
    pub gemini_api_key: Option<String>,
    /// Whether the robot actor runs in simulation mode or fails not-implemented.
    pub robot_simulation: bool,
    /// Whether human tasks are kernel-managed: when `true`, the human actor
    /// returns a `_requires_human_action` marker immediately and the engine
    /// parks the token in `waiting` until it is resumed; when `false`, the
    /// actor blocks inline on the task's completion future.
    pub wait_for_human_tasks: bool,
}

impl ActorConfig {
    /// Read configuration from the process environment (§6):
    /// `GEMINI_API_KEY`, `ROBOT_SIMULATION` (`true`/`1` enables), and
    /// `WAIT_FOR_HUMAN_TASKS` (defaults enabled).
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: std::env::var("GEMINI_API_KEY").ok(),
            robot_simulation: std::env::var("ROBOT_SIMULATION")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            wait_for_human_tasks: std::env::var("WAIT_FOR_HUMAN_TASKS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        }
    }
}

/// Runs the adapter matching `request.activity.actor_type` against `config`,
/// enqueuing human tasks on `queue`.
pub async fn dispatch(request: ActorRequest<'_>, config: &ActorConfig, queue: &HumanTaskQueue) -> Result<Value> {
    match request.activity.actor_type {
        ActorType::Application => SoftwareActor::new().execute(request).await,
        ActorType::AiAgent => AiActor::new(config.gemini_api_key.clone()).execute(request).await,
        ActorType::Robot => RobotActor::new(config.robot_simulation).execute(request).await,
        ActorType::Human => {
            HumanActor::new(queue)
                .wait_for_completion(!config.wait_for_human_tasks)
                .execute(request)
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use flowmind_core::{TokenId, WorkflowId};
    use flowmind_workflow::model::Activity;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn activity(actor_type: ActorType) -> Activity {
        Activity {
            id: flowmind_core::ActivityId::v4(),
            name: "Step".to_string(),
            role_id: None,
            actor_type,
            description: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
            context_bindings: Vec::new(),
            access_rights: Vec::new(),
            programs: Vec::new(),
            controls: Vec::new(),
            sla: None,
            analytics: None,
            is_expandable: None,
            expansion_workflow_id: None,
        }
    }

    #[tokio::test]
    async fn dispatches_software_activity_to_pass_through() {
        let queue = HumanTaskQueue::new();
        let config = ActorConfig::default();
        let a = activity(ActorType::Application);
        let request = ActorRequest {
            activity: &a,
            role: None,
            token_id: TokenId::v4(),
            workflow_id: WorkflowId::v4(),
            inputs: json!({}),
        };
        let outputs = dispatch(request, &config, &queue).await.unwrap();
        assert_eq!(outputs["status"], json!("success"));
    }

    #[tokio::test]
    async fn dispatches_human_activity_to_queue() {
        let queue = HumanTaskQueue::new();
        let config = ActorConfig {
            wait_for_human_tasks: true,
            ..Default::default()
        };
        let a = activity(ActorType::Human);
        let request = ActorRequest {
            activity: &a,
            role: None,
            token_id: TokenId::v4(),
            workflow_id: WorkflowId::v4(),
            inputs: json!({}),
        };
        let outputs = dispatch(request, &config, &queue).await.unwrap();
        assert_eq!(outputs["_requires_human_action"], json!(true));
        assert_eq!(queue.stats().await.total, 1);
    }

    #[tokio::test]
    async fn dispatches_ai_activity_with_no_credential_as_config_error() {
        let queue = HumanTaskQueue::new();
        let config = ActorConfig::default();
        let a = activity(ActorType::AiAgent);
        let request = ActorRequest {
            activity: &a,
            role: None,
            token_id: TokenId::v4(),
            workflow_id: WorkflowId::v4(),
            inputs: json!({}),
        };
        let err = dispatch(request, &config, &queue).await.unwrap_err();
        assert_eq!(err.kind(), &flowmind_error::FlowmindErrorKind::Config);
    }

    #[tokio::test]
    async fn dispatches_robot_activity_in_simulation_mode() {
        let queue = HumanTaskQueue::new();
        let config = ActorConfig {
            robot_simulation: true,
            ..Default::default()
        };
        let a = activity(ActorType::Robot);
        let request = ActorRequest {
            activity: &a,
            role: None,
            token_id: TokenId::v4(),
            workflow_id: WorkflowId::v4(),
            inputs: json!({}),
        };
        let outputs = dispatch(request, &config, &queue).await.unwrap();
        assert_eq!(outputs["status"], json!("completed"));
    }
}
