//! Workflow definition data model (§3, §6).
//!
//! A [`Workflow`] is an immutable, shared, deserialized description of a
//! directed graph of activity nodes, decision nodes, and edges. The kernel
//! never mutates a workflow definition after load; the engine builds its own
//! indices over it (see [`crate::graph`]).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use flowmind_core::{ActivityId, EdgeId, RoleId, WorkflowId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decision_table::DecisionTable;

/// Actor kind an activity is routed to (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorType {
    Human,
    AiAgent,
    Robot,
    Application,
}

/// How an activity binds a declared context (§3 "Context slot").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    Read,
    Write,
    ReadWrite,
    Subscribe,
    Publish,
}

/// Lifecycle of a declared context value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Transient,
    Persistent,
    Cached,
}

/// A declared input or output slot on an activity. The source's dynamic
/// bags become opaque descriptors at the kernel boundary; shape beyond
/// `name` is not interpreted by the kernel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSlot {
    pub name: String,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// SLA hints: target/max duration strings (ISO-8601, parsed lazily by
/// callers via [`flowmind_core::parse_iso8601`]) and an escalation policy tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sla {
    pub target: Option<String>,
    pub max: Option<String>,
    pub escalation: Option<String>,
}

/// Analytics hints attached to an activity (§4.1 `value_added`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsHint {
    #[serde(default)]
    pub value_added: Option<bool>,
}

/// A policy annotation surfaced to the actor at invocation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Control {
    pub name: String,
    #[serde(default)]
    pub enforcement: Option<String>,
}

/// A declarative program descriptor (e.g. a REST-endpoint call) attached to
/// a software activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub kind: String,
    #[serde(flatten)]
    pub config: HashMap<String, Value>,
}

/// An activity-scoped binding to a declared context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextBinding {
    pub context_id: String,
    pub access_mode: AccessMode,
}

/// One node of the workflow graph that routes to an actor adapter (§4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
    pub role_id: Option<RoleId>,
    pub actor_type: ActorType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub inputs: Vec<DataSlot>,
    #[serde(default)]
    pub outputs: Vec<DataSlot>,
    #[serde(default)]
    pub context_bindings: Vec<ContextBinding>,
    #[serde(default)]
    pub access_rights: Vec<String>,
    #[serde(default)]
    pub programs: Vec<Program>,
    #[serde(default)]
    pub controls: Vec<Control>,
    #[serde(default)]
    pub sla: Option<Sla>,
    #[serde(default)]
    pub analytics: Option<AnalyticsHint>,
    #[serde(default)]
    pub is_expandable: Option<bool>,
    #[serde(default)]
    pub expansion_workflow_id: Option<WorkflowId>,
}

impl Activity {
    /// Whether this activity's SLA declares an escalation policy — the
    /// human actor defaults new tasks to `high` priority when this is set.
    #[must_use]
    pub fn has_escalation(&self) -> bool {
        self.sla
            .as_ref()
            .is_some_and(|sla| sla.escalation.is_some())
    }

    /// Whether the activity's declared analytics hint says the work adds
    /// value; defaults to `true` when unspecified (§4.8).
    #[must_use]
    pub fn value_added(&self) -> bool {
        self.analytics
            .as_ref()
            .and_then(|a| a.value_added)
            .unwrap_or(true)
    }
}

/// A directed connection between two nodes (activity or decision).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source_id: String,
    pub target_id: String,
    #[serde(default)]
    pub source_type: Option<String>,
    #[serde(default)]
    pub target_type: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

/// A decision node wrapping a [`DecisionTable`] (§4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionNode {
    pub id: String,
    pub name: String,
    pub decision_table: DecisionTable,
    #[serde(default)]
    pub default_output_edge_id: Option<String>,
}

/// An event node. The kernel treats these as opaque pass-through markers;
/// no dedicated behavior is defined beyond graph membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: Option<String>,
}

/// A declared shared context slot (§3 "Context slot").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextDecl {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub sync_pattern: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    pub lifecycle: Lifecycle,
    #[serde(default)]
    pub initial_value: Option<Value>,
}

/// A role referenced by activities; carries the descriptive fields the AI
/// actor composes into its system prompt (§4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub system_prompt: Option<String>,
}

/// Top-level immutable workflow definition (§6 "Workflow file format").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub id: WorkflowId,
    pub name: String,
    pub version: semver::Version,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner_id: Option<uuid::Uuid>,
    #[serde(default)]
    pub organization_id: Option<uuid::Uuid>,
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub decision_nodes: Vec<DecisionNode>,
    #[serde(default)]
    pub contexts: Vec<ContextDecl>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub sla: Option<Sla>,
    #[serde(default)]
    pub analytics: Option<AnalyticsHint>,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
