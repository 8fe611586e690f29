//! The edge guard grammar (§4.8): minimal, and deliberately distinct from
//! the FEEL subset used by decision tables (§9 design notes).

use std::collections::HashMap;

use serde_json::Value;

/// Evaluate an edge's `condition` against a token's context data. Returns
/// `true` if the guard is satisfied (the edge is a candidate).
#[must_use]
pub fn evaluate(condition: &str, context: &HashMap<String, Value>) -> bool {
    let condition = condition.trim();

    for (op, cmp) in [
        ("==", Cmp::Eq),
        ("!=", Cmp::Ne),
        (">", Cmp::Gt),
        ("<", Cmp::Lt),
    ] {
        if let Some((name, literal)) = condition.split_once(op) {
            let name = name.trim();
            let literal = literal.trim();
            let value = context.get(name).unwrap_or(&Value::Null);
            return compare(value, literal, cmp);
        }
    }

    is_truthy(context.get(condition.trim()).unwrap_or(&Value::Null))
}

#[derive(Clone, Copy)]
enum Cmp {
    Eq,
    Ne,
    Gt,
    Lt,
}

fn compare(value: &Value, literal: &str, cmp: Cmp) -> bool {
    match cmp {
        Cmp::Eq | Cmp::Ne => {
            let equal = stringify(value) == unquote(literal);
            if matches!(cmp, Cmp::Eq) {
                equal
            } else {
                !equal
            }
        }
        Cmp::Gt | Cmp::Lt => {
            let (Some(lhs), Ok(rhs)) = (value.as_f64(), literal.parse::<f64>()) else {
                return false;
            };
            if matches!(cmp, Cmp::Gt) {
                lhs > rhs
            } else {
                lhs < rhs
            }
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
