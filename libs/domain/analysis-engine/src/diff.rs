// [libs/domain/analysis-engine/src/diff.rs]
//! Structural diff between two JSON trees, used to compare a verified
//! artifact against its AI draft. Produces dotted-path change records
//! (`"recommendations.1.severity"`) rather than a generic JSON patch,
//! since the caller only needs to group and count, not replay.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub path: String,
}

pub fn diff_values(draft: &Value, verified: &Value) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    walk("", draft, verified, &mut changes);
    changes
}

fn walk(path: &str, a: &Value, b: &Value, changes: &mut Vec<FieldChange>) {
    if a == b {
        return;
    }
    match (a, b) {
        (Value::Object(map_a), Value::Object(map_b)) => {
            let mut keys: Vec<&String> = map_a.keys().chain(map_b.keys()).collect();
            keys.sort();
            keys.dedup();
            for key in keys {
                let child_path = if path.is_empty() { key.clone() } else { format!("{path}.{key}") };
                match (map_a.get(key), map_b.get(key)) {
                    (Some(va), Some(vb)) => walk(&child_path, va, vb, changes),
                    _ => changes.push(FieldChange { path: child_path }),
                }
            }
        }
        (Value::Array(arr_a), Value::Array(arr_b)) => {
            let max_len = arr_a.len().max(arr_b.len());
            for idx in 0..max_len {
                let child_path = format!("{path}.{idx}");
                match (arr_a.get(idx), arr_b.get(idx)) {
                    (Some(va), Some(vb)) => walk(&child_path, va, vb, changes),
                    _ => changes.push(FieldChange { path: child_path }),
                }
            }
        }
        _ => changes.push(FieldChange { path: path.to_string() }),
    }
}

/// Counts scalar leaves in a JSON tree, used as the denominator for the
/// accuracy score's change ratio.
pub fn count_leaves(value: &Value) -> u32 {
    match value {
        Value::Object(map) => map.values().map(count_leaves).sum::<u32>().max(if map.is_empty() { 1 } else { 0 }),
        Value::Array(arr) => arr.iter().map(count_leaves).sum::<u32>().max(if arr.is_empty() { 1 } else { 0 }),
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identical_trees_yield_no_changes() {
        let a = json!({"x": 1, "y": [1,2,3]});
        assert!(diff_values(&a, &a).is_empty());
    }

    #[test]
    fn detects_nested_scalar_change() {
        let a = json!({"recommendations": [{"severity": "medium", "text": "t1"}]});
        let b = json!({"recommendations": [{"severity": "high", "text": "t1"}]});
        let changes = diff_values(&a, &b);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, "recommendations.0.severity");
    }

    #[test]
    fn detects_array_length_change() {
        let a = json!({"items": [1,2]});
        let b = json!({"items": [1,2,3]});
        let changes = diff_values(&a, &b);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, "items.2");
    }
}
