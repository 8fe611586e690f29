//! Decision table evaluation and hit-policy reduction (§4.4).

use std::collections::HashMap;

use flowmind_error::{FlowmindError, Result};
use flowmind_workflow::decision_table::{DecisionTable, HitPolicy, Rule};
use flowmind_workflow::model::DecisionNode;
use serde_json::Value;

use crate::feel;

/// The outcome of evaluating a decision table (or a node wrapping one)
/// against a context map.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionResult {
    pub matched: bool,
    pub output_edge_id: Option<String>,
    pub outputs: HashMap<String, Value>,
}

impl DecisionResult {
    fn no_match() -> Self {
        Self {
            matched: false,
            output_edge_id: None,
            outputs: HashMap::new(),
        }
    }
}

fn rule_matches(rule: &Rule, table: &DecisionTable, context: &HashMap<String, Value>) -> bool {
    rule.input_entries
        .iter()
        .zip(&table.inputs)
        .all(|(entry, column)| {
            let value = context.get(&column.name).unwrap_or(&Value::Null);
            feel::evaluate(entry, value)
        })
}

fn rule_outputs(rule: &Rule, table: &DecisionTable) -> HashMap<String, Value> {
    table
        .outputs
        .iter()
        .zip(&rule.output_entries)
        .map(|(column, value)| (column.name.clone(), value.clone()))
        .collect()
}

/// Evaluate a decision table against `context`, reducing the matching
/// rules per the table's hit policy (§4.4).
pub fn evaluate_table(table: &DecisionTable, context: &HashMap<String, Value>) -> Result<DecisionResult> {
    let matches: Vec<&Rule> = table
        .rules
        .iter()
        .filter(|rule| rule_matches(rule, table, context))
        .collect();

    if matches.is_empty() {
        return Ok(DecisionResult::no_match());
    }

    match table.hit_policy {
        HitPolicy::Unique | HitPolicy::First | HitPolicy::Priority => {
            let rule = matches[0];
            Ok(DecisionResult {
                matched: true,
                output_edge_id: rule.output_edge_id.clone(),
                outputs: rule_outputs(rule, table),
            })
        }
        HitPolicy::Any => {
            let first_outputs = rule_outputs(matches[0], table);
            for rule in &matches[1..] {
                if rule_outputs(rule, table) != first_outputs {
                    return Err(FlowmindError::validation(
                        "hit policy `any` requires all matched rules to produce equal outputs",
                    ));
                }
            }
            Ok(DecisionResult {
                matched: true,
                output_edge_id: matches[0].output_edge_id.clone(),
                outputs: first_outputs,
            })
        }
        HitPolicy::Collect | HitPolicy::RuleOrder => {
            let mut outputs: HashMap<String, Value> = HashMap::new();
            for column in &table.outputs {
                let values: Vec<Value> = matches
                    .iter()
                    .map(|rule| rule_outputs(rule, table).remove(&column.name).unwrap_or(Value::Null))
                    .collect();
                outputs.insert(column.name.clone(), Value::Array(values));
            }
            Ok(DecisionResult {
                matched: true,
                output_edge_id: matches[0].output_edge_id.clone(),
                outputs,
            })
        }
    }
}

/// Evaluate a decision node: evaluate its table, then fall back to the
/// node's `default_output_edge_id` when zero rules matched (§4.4, §4.8).
pub fn evaluate_node(node: &DecisionNode, context: &HashMap<String, Value>) -> Result<DecisionResult> {
    let mut result = evaluate_table(&node.decision_table, context)?;
    if !result.matched {
        result.output_edge_id = node.default_output_edge_id.clone();
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use flowmind_workflow::decision_table::Column;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn score_table(hit_policy: HitPolicy) -> DecisionTable {
        DecisionTable {
            hit_policy,
            inputs: vec![Column {
                name: "score".to_string(),
                r#type: Some("number".to_string()),
            }],
            outputs: vec![Column {
                name: "result".to_string(),
                r#type: Some("string".to_string()),
            }],
            rules: vec![
                Rule {
                    input_entries: vec![">=80".to_string()],
                    output_entries: vec![json!("A")],
                    output_edge_id: Some("edge-a".to_string()),
                },
                Rule {
                    input_entries: vec!["[50..79]".to_string()],
                    output_entries: vec![json!("B")],
                    output_edge_id: Some("edge-b".to_string()),
                },
                Rule {
                    input_entries: vec!["-".to_string()],
                    output_entries: vec![json!("C")],
                    output_edge_id: Some("edge-c".to_string()),
                },
            ],
        }
    }

    fn ctx(score: f64) -> HashMap<String, Value> {
        HashMap::from([("score".to_string(), json!(score))])
    }

    #[test]
    fn first_hit_policy_takes_first_match() {
        let table = score_table(HitPolicy::First);
        let result = evaluate_table(&table, &ctx(75.0)).unwrap();
        assert!(result.matched);
        assert_eq!(result.output_edge_id.as_deref(), Some("edge-b"));
        assert_eq!(result.outputs.get("result"), Some(&json!("B")));
    }

    #[test]
    fn falls_through_to_catch_all_rule() {
        let table = score_table(HitPolicy::First);
        let result = evaluate_table(&table, &ctx(10.0)).unwrap();
        assert_eq!(result.outputs.get("result"), Some(&json!("C")));
    }

    #[test]
    fn no_match_reports_unmatched_with_empty_outputs() {
        let table = DecisionTable {
            hit_policy: HitPolicy::First,
            inputs: vec![Column {
                name: "score".to_string(),
                r#type: None,
            }],
            outputs: vec![],
            rules: vec![Rule {
                input_entries: vec!["999".to_string()],
                output_entries: vec![],
                output_edge_id: None,
            }],
        };
        let result = evaluate_table(&table, &ctx(1.0)).unwrap();
        assert!(!result.matched);
        assert!(result.outputs.is_empty());
        assert_eq!(result.output_edge_id, None);
    }

    #[test]
    fn collect_gathers_all_matches_per_column_in_rule_order() {
        let table = DecisionTable {
            hit_policy: HitPolicy::Collect,
            inputs: vec![Column {
                name: "score".to_string(),
                r#type: None,
            }],
            outputs: vec![Column {
                name: "result".to_string(),
                r#type: None,
            }],
            rules: vec![
                Rule {
                    input_entries: vec!["-".to_string()],
                    output_entries: vec![json!("always-1")],
                    output_edge_id: Some("e1".to_string()),
                },
                Rule {
                    input_entries: vec!["-".to_string()],
                    output_entries: vec![json!("always-2")],
                    output_edge_id: Some("e2".to_string()),
                },
            ],
        };
        let result = evaluate_table(&table, &ctx(1.0)).unwrap();
        assert_eq!(
            result.outputs.get("result"),
            Some(&json!(["always-1", "always-2"]))
        );
        assert_eq!(result.output_edge_id.as_deref(), Some("e1"));
    }

    #[test]
    fn any_errors_when_matched_outputs_disagree() {
        let table = DecisionTable {
            hit_policy: HitPolicy::Any,
            inputs: vec![Column {
                name: "score".to_string(),
                r#type: None,
            }],
            outputs: vec![Column {
                name: "result".to_string(),
                r#type: None,
            }],
            rules: vec![
                Rule {
                    input_entries: vec!["-".to_string()],
                    output_entries: vec![json!("X")],
                    output_edge_id: None,
                },
                Rule {
                    input_entries: vec!["-".to_string()],
                    output_entries: vec![json!("Y")],
                    output_edge_id: None,
                },
            ],
        };
        let err = evaluate_table(&table, &ctx(1.0)).unwrap_err();
        assert_eq!(err.kind(), &flowmind_error::FlowmindErrorKind::Validation);
    }

    #[test]
    fn node_falls_back_to_default_edge_on_no_match() {
        let table = DecisionTable {
            hit_policy: HitPolicy::First,
            inputs: vec![Column {
                name: "score".to_string(),
                r#type: None,
            }],
            outputs: vec![],
            rules: vec![Rule {
                input_entries: vec!["999".to_string()],
                output_entries: vec![],
                output_edge_id: None,
            }],
        };
        let node = DecisionNode {
            id: "dn".to_string(),
            name: "Classify".to_string(),
            decision_table: table,
            default_output_edge_id: Some("fallback".to_string()),
        };
        let result = evaluate_node(&node, &ctx(1.0)).unwrap();
        assert!(!result.matched);
        assert_eq!(result.output_edge_id.as_deref(), Some("fallback"));
    }
}
