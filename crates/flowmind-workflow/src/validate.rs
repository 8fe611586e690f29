//! Structural validation performed once at construction time (§4.8
//! "Construction"). A workflow that fails validation never reaches the
//! engine; validation errors are never retried (§7).

use std::collections::HashSet;

use flowmind_error::{FlowmindError, Result};

use crate::model::Workflow;

/// Validate a workflow's structural integrity: dangling edge endpoints,
/// missing role references, and malformed node ids. Returns the first
/// violation found.
pub fn validate(workflow: &Workflow) -> Result<()> {
    validate_ids(workflow)?;
    validate_roles(workflow)?;
    validate_edges(workflow)?;
    Ok(())
}

fn validate_ids(workflow: &Workflow) -> Result<()> {
    for node in &workflow.decision_nodes {
        if uuid::Uuid::parse_str(&node.id).is_err() {
            return Err(FlowmindError::validation(format!(
                "decision node id {:?} is not a valid UUID",
                node.id
            )));
        }
    }
    Ok(())
}

fn validate_roles(workflow: &Workflow) -> Result<()> {
    let known_roles: HashSet<_> = workflow.roles.iter().map(|r| r.id).collect();
    for activity in &workflow.activities {
        if let Some(role_id) = activity.role_id {
            if !known_roles.contains(&role_id) {
                return Err(FlowmindError::validation(format!(
                    "activity {:?} references unknown role {role_id}",
                    activity.name
                )));
            }
        }
    }
    Ok(())
}

fn validate_edges(workflow: &Workflow) -> Result<()> {
    let known_nodes: HashSet<String> = workflow
        .activities
        .iter()
        .map(|a| a.id.to_string())
        .chain(workflow.decision_nodes.iter().map(|d| d.id.clone()))
        .chain(workflow.events.iter().map(|e| e.id.clone()))
        .collect();

    for edge in &workflow.edges {
        if !known_nodes.contains(&edge.source_id) {
            return Err(FlowmindError::validation(format!(
                "edge {:?} has dangling source {:?}",
                edge.id, edge.source_id
            )));
        }
        if !known_nodes.contains(&edge.target_id) {
            return Err(FlowmindError::validation(format!(
                "edge {:?} has dangling target {:?}",
                edge.id, edge.target_id
            )));
        }
    }

    let known_edges: HashSet<_> = workflow.edges.iter().map(|e| e.id.to_string()).collect();
    for node in &workflow.decision_nodes {
        if let Some(default_edge) = &node.default_output_edge_id {
            if !known_edges.contains(default_edge) {
                return Err(FlowmindError::validation(format!(
                    "decision node {:?} default_output_edge_id {:?} does not reference a known edge",
                    node.id, default_edge
                )));
            }
        }
        for rule in &node.decision_table.rules {
            if let Some(edge_id) = &rule.output_edge_id {
                if !known_edges.contains(edge_id) {
                    return Err(FlowmindError::validation(format!(
                        "decision node {:?} rule references unknown edge {:?}",
                        node.id, edge_id
                    )));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::{minimal_workflow, workflow_json};

    #[test]
    fn accepts_minimal_workflow() {
        let workflow = minimal_workflow();
        assert!(validate(&workflow).is_ok());
    }

    #[test]
    fn rejects_dangling_edge_target() {
        let mut workflow = minimal_workflow();
        workflow.edges[0].target_id = "not-a-real-node".to_string();
        let err = validate(&workflow).unwrap_err();
        assert_eq!(err.kind(), &flowmind_error::FlowmindErrorKind::Validation);
    }

    #[test]
    fn rejects_unknown_role() {
        let mut workflow = minimal_workflow();
        workflow.activities[0].role_id = Some(flowmind_core::RoleId::v4());
        let err = validate(&workflow).unwrap_err();
        assert_eq!(err.kind(), &flowmind_error::FlowmindErrorKind::Validation);
    }

    #[test]
    fn rejects_malformed_decision_node_id() {
        let json = workflow_json().replace(
            "11111111-1111-1111-1111-111111111111",
            "not-a-uuid",
        );
        let workflow: Workflow = serde_json::from_str(&json).unwrap();
        let err = validate(&workflow).unwrap_err();
        assert_eq!(err.kind(), &flowmind_error::FlowmindErrorKind::Validation);
    }
}
