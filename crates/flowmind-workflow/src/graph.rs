//! Indices built once over a validated [`Workflow`] (§4.8 "Construction").
//!
//! The engine never walks `workflow.activities`/`workflow.edges` linearly at
//! run time; it looks nodes up through a [`WorkflowIndex`] built here.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::model::{Activity, DecisionNode, Edge, Role, Workflow};

/// O(1) lookup tables over a workflow's nodes, plus the petgraph view used
/// for entry-point selection and (optional) cycle diagnostics.
pub struct WorkflowIndex<'w> {
    pub activities_by_id: HashMap<String, &'w Activity>,
    pub decisions_by_id: HashMap<String, &'w DecisionNode>,
    pub outgoing_edges: HashMap<String, Vec<&'w Edge>>,
    pub roles_by_id: HashMap<String, &'w Role>,
    graph: DiGraph<String, ()>,
    node_indices: HashMap<String, NodeIndex>,
}

impl<'w> WorkflowIndex<'w> {
    /// Build indices over `workflow`. Assumes the workflow already passed
    /// [`crate::validate::validate`] — dangling references are not
    /// re-checked here.
    #[must_use]
    pub fn build(workflow: &'w Workflow) -> Self {
        let mut activities_by_id = HashMap::new();
        let mut decisions_by_id = HashMap::new();
        let mut roles_by_id = HashMap::new();
        let mut outgoing_edges: HashMap<String, Vec<&Edge>> = HashMap::new();

        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();

        for activity in &workflow.activities {
            let key = activity.id.to_string();
            let idx = graph.add_node(key.clone());
            node_indices.insert(key.clone(), idx);
            activities_by_id.insert(key, activity);
        }
        for decision in &workflow.decision_nodes {
            let idx = graph.add_node(decision.id.clone());
            node_indices.insert(decision.id.clone(), idx);
            decisions_by_id.insert(decision.id.clone(), decision);
        }
        for role in &workflow.roles {
            roles_by_id.insert(role.id.to_string(), role);
        }

        for edge in &workflow.edges {
            outgoing_edges
                .entry(edge.source_id.clone())
                .or_default()
                .push(edge);
            if let (Some(&from), Some(&to)) = (
                node_indices.get(&edge.source_id),
                node_indices.get(&edge.target_id),
            ) {
                graph.add_edge(from, to, ());
            }
        }

        Self {
            activities_by_id,
            decisions_by_id,
            outgoing_edges,
            roles_by_id,
            graph,
            node_indices,
        }
    }

    /// Outgoing edges for `node_id`, in declaration order. Empty if the node
    /// has none.
    #[must_use]
    pub fn outgoing(&self, node_id: &str) -> &[&'w Edge] {
        self.outgoing_edges
            .get(node_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Select the entry point per §4.8: the first activity with no incoming
    /// edges; if none exists (every activity has an incoming edge — a pure
    /// cycle), fall back to the first activity declared.
    #[must_use]
    pub fn entry_point(&self, workflow: &'w Workflow) -> Option<&'w Activity> {
        for activity in &workflow.activities {
            let key = activity.id.to_string();
            let Some(&idx) = self.node_indices.get(&key) else {
                continue;
            };
            let has_incoming = self
                .graph
                .edges_directed(idx, petgraph::Direction::Incoming)
                .next()
                .is_some();
            if !has_incoming {
                return Some(activity);
            }
        }
        workflow.activities.first()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::minimal_workflow;

    #[test]
    fn entry_point_is_node_with_no_incoming_edges() {
        let workflow = minimal_workflow();
        let index = WorkflowIndex::build(&workflow);
        let entry = index.entry_point(&workflow).unwrap();
        assert_eq!(entry.name, "A");
    }

    #[test]
    fn entry_point_falls_back_to_first_declared_on_pure_cycle() {
        let mut workflow = minimal_workflow();
        let a_id = workflow.activities[0].id.to_string();
        let b_id = workflow.activities[1].id.to_string();
        workflow.edges.push(crate::model::Edge {
            id: flowmind_core::EdgeId::v4(),
            source_id: b_id,
            target_id: a_id,
            source_type: None,
            target_type: None,
            condition: None,
            label: None,
            is_default: false,
        });
        let index = WorkflowIndex::build(&workflow);
        let entry = index.entry_point(&workflow).unwrap();
        assert_eq!(entry.name, "A");
    }

    #[test]
    fn outgoing_returns_edges_in_declaration_order() {
        let workflow = minimal_workflow();
        let index = WorkflowIndex::build(&workflow);
        let a_id = workflow.activities[0].id.to_string();
        let outgoing = index.outgoing(&a_id);
        assert_eq!(outgoing.len(), 1);
        assert_eq!(outgoing[0].target_id, workflow.activities[1].id.to_string());
    }

    #[test]
    fn outgoing_is_empty_for_unknown_node() {
        let workflow = minimal_workflow();
        let index = WorkflowIndex::build(&workflow);
        assert!(index.outgoing("does-not-exist").is_empty());
    }
}
