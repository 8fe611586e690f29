//! The robot actor adapter (§4.3): in simulation mode, classifies the
//! activity name/description against a small keyword table and fabricates
//! a plausible result; outside simulation mode there is no real robot
//! integration to dispatch to, so it fails not-implemented.

use async_trait::async_trait;
use flowmind_error::{FlowmindError, Result};
use serde_json::{json, Value};

use crate::adapter::ActorAdapter;
use crate::request::{base_outputs, ActorRequest};

const KEYWORD_TABLE: &[(&str, &str)] = &[
    ("pick", "pick_and_place"),
    ("place", "pick_and_place"),
    ("move", "move_to_position"),
    ("assemble", "assembly"),
    ("weld", "weld_seam"),
    ("inspect", "visual_inspection"),
    ("scan", "visual_inspection"),
    ("pack", "pack_item"),
    ("sort", "sort_item"),
];

const DEFAULT_ACTION: &str = "generic_task";
const SIMULATED_EXECUTION_TIME_MS: u64 = 250;

/// Dispatches to a physical robot fleet; only simulation mode is implemented.
pub struct RobotActor {
    simulation: bool,
}

impl RobotActor {
    #[must_use]
    pub fn new(simulation: bool) -> Self {
        Self { simulation }
    }

    fn classify(&self, request: &ActorRequest<'_>) -> &'static str {
        let haystack = format!(
            "{} {}",
            request.activity.name,
            request.activity.description.as_deref().unwrap_or_default()
        )
        .to_lowercase();

        KEYWORD_TABLE
            .iter()
            .find(|(keyword, _)| haystack.contains(keyword))
            .map(|(_, action)| *action)
            .unwrap_or(DEFAULT_ACTION)
    }
}

#[async_trait]
impl ActorAdapter for RobotActor {
    async fn execute(&self, request: ActorRequest<'_>) -> Result<Value> {
        if !self.simulation {
            return Err(FlowmindError::not_implemented(
                "robot actor has no live fleet integration; enable simulation mode",
            ));
        }

        let action = self.classify(&request);
        let mut outputs = base_outputs(&request.inputs);
        outputs.insert("status".to_string(), json!("completed"));
        outputs.insert("action".to_string(), json!(action));
        outputs.insert("execution_time_ms".to_string(), json!(SIMULATED_EXECUTION_TIME_MS));
        outputs.insert(
            "result".to_string(),
            json!(format!("simulated {action} for {}", request.activity.name)),
        );
        Ok(Value::Object(outputs))
    }
}

#[cfg(test)]
mod tests {
    use flowmind_core::{TokenId, WorkflowId};
    use flowmind_workflow::model::{Activity, ActorType};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn activity(name: &str, description: Option<&str>) -> Activity {
        Activity {
            id: flowmind_core::ActivityId::v4(),
            name: name.to_string(),
            role_id: None,
            actor_type: ActorType::Robot,
            description: description.map(str::to_string),
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

    #[rstest]
    #[case("Pick up the part", "pick_and_place")]
    #[case("Place it on the conveyor", "pick_and_place")]
    #[case("Move arm to station 3", "move_to_position")]
    #[case("Assemble the bracket", "assembly")]
    #[case("Weld the seam", "weld_seam")]
    #[case("Visual inspection of welds", "visual_inspection")]
    #[case("Pack the box", "pack_item")]
    #[case("Do the thing", "generic_task")]
    #[tokio::test]
    async fn classifies_by_keyword(#[case] name: &str, #[case] expected_action: &str) {
        let actor = RobotActor::new(true);
        let a = activity(name, None);
        let request = ActorRequest {
            activity: &a,
            role: None,
            token_id: TokenId::v4(),
            workflow_id: WorkflowId::v4(),
            inputs: json!({}),
        };
        let outputs = actor.execute(request).await.unwrap();
        assert_eq!(outputs["status"], json!("completed"));
        assert_eq!(outputs["action"], json!(expected_action));
    }

    #[tokio::test]
    async fn non_simulation_mode_is_not_implemented() {
        let actor = RobotActor::new(false);
        let a = activity("Pick up the part", None);
        let request = ActorRequest {
            activity: &a,
            role: None,
            token_id: TokenId::v4(),
            workflow_id: WorkflowId::v4(),
            inputs: json!({}),
        };
        let err = actor.execute(request).await.unwrap_err();
        assert_eq!(err.kind(), &flowmind_error::FlowmindErrorKind::NotImplemented);
    }
}
