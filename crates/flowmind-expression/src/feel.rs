//! The decision-table input-entry grammar: a small FEEL subset (§4.4).
//!
//! `evaluate(expression, value)` never fails — an expression this grammar
//! cannot parse is treated as a literal bare string and compared for
//! equality, matching the source's permissive "whatever you typed didn't
//! match a special form, so it's a literal" fallback.

use regex::Regex;
use serde_json::Value;

/// Cap on user-supplied regex pattern length, mirroring the precedent set
/// for `matches(...)` to bound compile cost against adversarial rules.
const MAX_PATTERN_LEN: usize = 512;

/// Evaluate one input-entry expression against a context value.
#[must_use]
pub fn evaluate(expression: &str, value: &Value) -> bool {
    let expr = expression.trim();

    if expr.is_empty() || expr == "-" || expr == "*" {
        return true;
    }
    if expr == "true" || expr == "false" {
        return value.as_bool().is_some_and(|b| b.to_string() == expr);
    }
    if expr == "null" {
        return value.is_null();
    }
    if expr == "not null" {
        return !value.is_null();
    }
    if let Some(literal) = quoted_string(expr) {
        return stringify(value) == literal;
    }
    if let Some(result) = comparator(expr, value) {
        return result;
    }
    if let Some(result) = range(expr, value) {
        return result;
    }
    if let Some(items) = strip_call(expr, "not in(") {
        return !membership(items, value);
    }
    if let Some(items) = strip_call(expr, "in(") {
        return membership(items, value);
    }
    if let Some(needle) = strip_call(expr, "contains(") {
        return stringify(value).contains(unquote(needle).as_ref());
    }
    if let Some(rest) = expr.strip_prefix("starts with ") {
        return stringify(value).starts_with(unquote(rest.trim()).as_ref());
    }
    if let Some(rest) = expr.strip_prefix("ends with ") {
        return stringify(value).ends_with(unquote(rest.trim()).as_ref());
    }
    if let Some(pattern) = strip_call(expr, "matches(") {
        return matches_pattern(unquote(pattern).as_ref(), &stringify(value));
    }
    if let Ok(n) = expr.parse::<f64>() {
        return as_number(value) == Some(n);
    }

    stringify(value) == expr
}

fn quoted_string(expr: &str) -> Option<&str> {
    expr.strip_prefix('"')?.strip_suffix('"')
}

fn unquote(s: &str) -> &str {
    quoted_string(s).unwrap_or(s)
}

fn strip_call<'a>(expr: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = expr.strip_prefix(prefix)?;
    rest.strip_suffix(')')
}

fn comparator(expr: &str, value: &Value) -> Option<bool> {
    const OPS: [(&str, fn(std::cmp::Ordering) -> bool); 8] = [
        (">=", |o| o != std::cmp::Ordering::Less),
        ("<=", |o| o != std::cmp::Ordering::Greater),
        ("==", |o| o == std::cmp::Ordering::Equal),
        ("!=", |o| o != std::cmp::Ordering::Equal),
        ("<>", |o| o != std::cmp::Ordering::Equal),
        ("=", |o| o == std::cmp::Ordering::Equal),
        (">", |o| o == std::cmp::Ordering::Greater),
        ("<", |o| o == std::cmp::Ordering::Less),
    ];

    for (op, matches_ordering) in OPS {
        if let Some(rest) = expr.strip_prefix(op) {
            let rest = rest.trim();
            let ordering = if let (Ok(lhs), Some(rhs)) = (rest.parse::<f64>(), as_number(value)) {
                rhs.partial_cmp(&lhs)?
            } else {
                stringify(value).cmp(&unquote(rest).to_string())
            };
            return Some(matches_ordering(ordering));
        }
    }
    None
}

fn range(expr: &str, value: &Value) -> Option<bool> {
    let lower_inclusive = expr.starts_with('[');
    let upper_inclusive = expr.ends_with(']');
    if !(expr.starts_with('[') || expr.starts_with('(')) || !(expr.ends_with(']') || expr.ends_with(')')) {
        return None;
    }
    let inner = &expr[1..expr.len() - 1];
    let (lower, upper) = inner.split_once("..")?;
    let lower: f64 = lower.trim().parse().ok()?;
    let upper: f64 = upper.trim().parse().ok()?;
    let n = as_number(value)?;

    let above_lower = if lower_inclusive { n >= lower } else { n > lower };
    let below_upper = if upper_inclusive { n <= upper } else { n < upper };
    Some(above_lower && below_upper)
}

fn membership(items: &str, value: &Value) -> bool {
    let needle = stringify(value);
    items
        .split(',')
        .map(|item| unquote(item.trim()).to_string())
        .any(|item| item == needle)
}

fn matches_pattern(pattern: &str, haystack: &str) -> bool {
    if pattern.len() > MAX_PATTERN_LEN {
        return false;
    }
    Regex::new(pattern)
        .ok()
        .is_some_and(|re| re.is_match(haystack))
}

fn as_number(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
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

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case("-", json!(42), true)]
    #[case("*", json!("anything"), true)]
    #[case("", json!(null), true)]
    #[case("true", json!(true), true)]
    #[case("true", json!(false), false)]
    #[case("null", json!(null), true)]
    #[case("null", json!(1), false)]
    #[case("not null", json!(1), true)]
    #[case(r#""open""#, json!("open"), true)]
    #[case(r#""open""#, json!("closed"), false)]
    #[case(">=80", json!(80), true)]
    #[case(">=80", json!(79.9), false)]
    #[case("<=10", json!(10), true)]
    #[case(">10", json!(10), false)]
    #[case("<10", json!(9), true)]
    #[case("==5", json!(5), true)]
    #[case("!=5", json!(5), false)]
    #[case("<>5", json!(6), true)]
    #[case("=5", json!(5), true)]
    #[case("[50..79]", json!(50), true)]
    #[case("[50..79]", json!(79), true)]
    #[case("(50..79)", json!(50), false)]
    #[case("[50..79)", json!(79), false)]
    #[case("(50..79]", json!(79), true)]
    #[case("in(1, 2, 3)", json!(2), true)]
    #[case("in(1, 2, 3)", json!(4), false)]
    #[case("not in(1, 2, 3)", json!(4), true)]
    #[case(r#"contains("sub")"#, json!("has substring"), true)]
    #[case(r#"starts with "pre""#, json!("prefix"), true)]
    #[case(r#"ends with "fix""#, json!("prefix"), true)]
    #[case(r#"matches("^[a-z]+$")"#, json!("lowercase"), true)]
    #[case(r#"matches("^[a-z]+$")"#, json!("Mixed"), false)]
    #[case("42", json!(42), true)]
    #[case("42", json!(43), false)]
    #[case("pending", json!("pending"), true)]
    fn grammar_cases(#[case] expression: &str, #[case] value: Value, #[case] expected: bool) {
        assert_eq!(evaluate(expression, &value), expected);
    }

    #[test]
    fn dash_always_matches_for_any_value() {
        for value in [json!(1), json!("x"), json!(null), json!(true), json!([1, 2])] {
            assert!(evaluate("-", &value));
        }
    }

    #[test]
    fn oversized_regex_pattern_does_not_match() {
        let pattern = "a".repeat(MAX_PATTERN_LEN + 1);
        let expr = format!(r#"matches("{pattern}")"#);
        assert!(!evaluate(&expr, &json!("aaa")));
    }
}
