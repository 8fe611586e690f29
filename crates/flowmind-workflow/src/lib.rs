//! # Flowmind Workflow
//!
//! Workflow definition, graph indices, and the decision-table data model
//! (§3, §4.4 data shapes, §4.8 construction/validation, §6 file format).
//! Decision table *evaluation* lives in `flowmind-expression`; token state
//! lives in `flowmind-token`; this crate only owns the immutable, shared
//! definition and the read-only indices built over it.

pub mod decision_table;
pub mod graph;
pub mod model;
pub mod validate;

#[cfg(test)]
mod test_support;

pub use decision_table::{Column, DecisionTable, HitPolicy, Rule};
pub use graph::WorkflowIndex;
pub use model::{
    AccessMode, Activity, ActorType, AnalyticsHint, Control, DataSlot, Event, Lifecycle, Program,
    Role, Sla, Workflow,
};
pub use validate::validate;

/// Parse and validate a workflow from its JSON file format (§6).
pub fn load(source: &str) -> flowmind_error::Result<model::Workflow> {
    use flowmind_error::ErrorContext;

    let workflow: model::Workflow =
        serde_json::from_str(source).map_err(|e| flowmind_error::FlowmindError::validation(e.to_string()))?;
    validate::validate(&workflow).context("workflow failed structural validation")?;
    Ok(workflow)
}
