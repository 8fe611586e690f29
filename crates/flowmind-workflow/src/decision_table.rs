//! Decision table data model (§4.4). Evaluation semantics — the FEEL-subset
//! expression grammar and hit-policy reduction — live in `flowmind-expression`,
//! which depends on these types rather than the other way around.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A typed input or output column declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(default)]
    pub r#type: Option<String>,
}

/// Hit policy governing how matched rules reduce to a result (§4.4 table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitPolicy {
    Unique,
    First,
    Priority,
    Any,
    Collect,
    RuleOrder,
}

/// One row of a decision table: one input-entry expression per input
/// column, one output-entry value per output column, and an optional edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub input_entries: Vec<String>,
    pub output_entries: Vec<Value>,
    #[serde(default)]
    pub output_edge_id: Option<String>,
}

/// A decision table: ordered input/output columns, a hit policy, and
/// ordered rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTable {
    pub hit_policy: HitPolicy,
    #[serde(default)]
    pub inputs: Vec<Column>,
    #[serde(default)]
    pub outputs: Vec<Column>,
    #[serde(default)]
    pub rules: Vec<Rule>,
}
