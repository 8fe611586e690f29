//! The shared request/response shape every actor adapter speaks (§4.3).

use flowmind_core::{TokenId, WorkflowId};
use flowmind_workflow::model::{Activity, Role};
use serde_json::Value;

/// Everything an adapter needs to execute one activity invocation.
pub struct ActorRequest<'a> {
    pub activity: &'a Activity,
    pub role: Option<&'a Role>,
    pub token_id: TokenId,
    pub workflow_id: WorkflowId,
    pub inputs: Value,
}

/// Merge `inputs` as the base object for an actor's output map, falling
/// back to an empty object if `inputs` was not itself an object.
pub(crate) fn base_outputs(inputs: &Value) -> serde_json::Map<String, Value> {
    inputs.as_object().cloned().unwrap_or_default()
}
