use serde_json::Value;

use crate::models::{domain::is_standard_key, FormAnswers, ScoringRules};

/// Compatibility score (0-100) from overlapping custom answers
///
/// Scoring formula:
/// score = base + matching_keys * overlap_weight / common_keys
///
/// Only keys answered by both participants count, minus the standard
/// registration keys. The overlap term uses integer division, so partial
/// agreement truncates. No common keys leaves the base score.
pub fn compatibility_score(a: &FormAnswers, b: &FormAnswers, rules: &ScoringRules) -> u8 {
    let base = u32::from(rules.base_score);

    let common: Vec<&str> = a
        .keys()
        .filter(|key| !is_standard_key(key) && b.contains_key(key))
        .collect();

    if common.is_empty() {
        return base.min(100) as u8;
    }

    let matching = common
        .iter()
        .filter(|key| match (a.get(key), b.get(key)) {
            (Some(x), Some(y)) => answers_agree(x, y),
            _ => false,
        })
        .count() as u32;

    let overlap = matching * u32::from(rules.overlap_weight) / common.len() as u32;

    (base + overlap).min(100) as u8
}

/// Two answers agree when both are set and equal, or both are lists sharing an element
#[inline]
fn answers_agree(x: &Value, y: &Value) -> bool {
    if !is_set(x) || !is_set(y) {
        return false;
    }
    match (x, y) {
        (Value::Array(xs), Value::Array(ys)) => xs.iter().any(|v| ys.contains(v)),
        _ => x == y,
    }
}

/// Empty, zero, false and null answers count as unanswered
#[inline]
fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}
