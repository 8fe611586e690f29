//! The versioned checkpoint envelope (§4.7, §3 "Checkpoint").

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use flowmind_core::WorkflowId;
use flowmind_token::Token;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The current envelope schema version (§6 persisted state layout).
pub const ENVELOPE_VERSION: &str = "1.0";

/// A snapshot of one workflow run: engine status, the full token set, and
/// the context store, tagged with the workflow definition it was taken
/// against (§4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointEnvelope {
    pub version: String,
    pub workflow_id: WorkflowId,
    pub workflow_name: String,
    pub workflow_version: String,
    pub engine_status: String,
    pub tokens: Vec<Token>,
    pub contexts: HashMap<String, Value>,
    pub checkpoint_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl CheckpointEnvelope {
    #[must_use]
    pub fn new(
        workflow_id: WorkflowId,
        workflow_name: impl Into<String>,
        workflow_version: impl Into<String>,
        engine_status: impl Into<String>,
        tokens: Vec<Token>,
        contexts: HashMap<String, Value>,
    ) -> Self {
        Self {
            version: ENVELOPE_VERSION.to_string(),
            workflow_id,
            workflow_name: workflow_name.into(),
            workflow_version: workflow_version.into(),
            engine_status: engine_status.into(),
            tokens,
            contexts,
            checkpoint_at: Utc::now(),
            metadata: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn new_stamps_current_envelope_version() {
        let envelope = CheckpointEnvelope::new(
            WorkflowId::v4(),
            "approval-flow",
            "1.0.0",
            "running",
            Vec::new(),
            HashMap::new(),
        );
        assert_eq!(envelope.version, ENVELOPE_VERSION);
    }

    #[test]
    fn round_trips_through_json() {
        let envelope = CheckpointEnvelope::new(
            WorkflowId::v4(),
            "approval-flow",
            "1.0.0",
            "waiting_human",
            Vec::new(),
            HashMap::new(),
        );
        let json = serde_json::to_string(&envelope).unwrap();
        let restored: CheckpointEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.workflow_id, envelope.workflow_id);
        assert_eq!(restored.engine_status, "waiting_human");
    }
}
