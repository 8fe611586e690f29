//! Fixtures shared across this crate's test modules. Not part of the public API.

use flowmind_core::{ActivityId, EdgeId, WorkflowId};

use crate::decision_table::{Column, DecisionTable, HitPolicy, Rule};
use crate::model::{Activity, ActorType, DecisionNode, Edge, Workflow};

/// A two-activity linear workflow `A -> B`, no roles, no decisions.
pub fn minimal_workflow() -> Workflow {
    let activity_a = ActivityId::v4();
    let activity_b = ActivityId::v4();

    Workflow {
        id: WorkflowId::v4(),
        name: "minimal".to_string(),
        version: semver::Version::new(1, 0, 0),
        description: None,
        owner_id: None,
        organization_id: None,
        activities: vec![
            Activity {
                id: activity_a,
                name: "A".to_string(),
                role_id: None,
                actor_type: ActorType::Application,
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
            },
            Activity {
                id: activity_b,
                name: "B".to_string(),
                role_id: None,
                actor_type: ActorType::Application,
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
            },
        ],
        edges: vec![Edge {
            id: EdgeId::v4(),
            source_id: activity_a.to_string(),
            target_id: activity_b.to_string(),
            source_type: None,
            target_type: None,
            condition: None,
            label: None,
            is_default: true,
        }],
        events: Vec::new(),
        decision_nodes: Vec::new(),
        contexts: Vec::new(),
        roles: Vec::new(),
        sla: None,
        analytics: None,
        metadata: None,
        created_at: None,
        updated_at: None,
    }
}

/// JSON source for a workflow with a single decision node, used to exercise
/// the malformed-id check which only fires during deserialization-adjacent
/// validation (not achievable by constructing a [`Workflow`] directly, since
/// [`DecisionNode::id`] is a plain `String`).
pub fn workflow_json() -> String {
    let decision_table = DecisionTable {
        hit_policy: HitPolicy::First,
        inputs: vec![Column {
            name: "score".to_string(),
            r#type: Some("number".to_string()),
        }],
        outputs: vec![Column {
            name: "result".to_string(),
            r#type: Some("string".to_string()),
        }],
        rules: vec![Rule {
            input_entries: vec!["-".to_string()],
            output_entries: vec![serde_json::json!("ok")],
            output_edge_id: None,
        }],
    };

    let mut workflow = minimal_workflow();
    workflow.decision_nodes.push(DecisionNode {
        id: "11111111-1111-1111-1111-111111111111".to_string(),
        name: "Classify".to_string(),
        decision_table,
        default_output_edge_id: None,
    });

    serde_json::to_string(&workflow).expect("fixture serializes")
}
