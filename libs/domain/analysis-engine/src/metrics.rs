// [libs/domain/analysis-engine/src/metrics.rs]
//! Turns a raw [`FieldChange`] list into the [`AccuracyMetrics`] the
//! verification endpoint persists: a total count, a by-top-level-field
//! breakdown, a handful of human-readable highlights, and a 0-100 score.

use crate::diff::{count_leaves, diff_values};
use meridian_domain_models::AccuracyMetrics;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

const KEY_CHANGES_LIMIT: usize = 10;

pub fn compute_accuracy_metrics(ai_draft: &Value, verified: &Value) -> AccuracyMetrics {
    let changes = diff_values(ai_draft, verified);
    let total_changes = changes.len() as u32;
    debug!(total_changes, "computed verification diff");

    let mut changes_by_type: BTreeMap<String, u32> = BTreeMap::new();
    for change in &changes {
        let top_level = top_level_field(&change.path);
        *changes_by_type.entry(top_level).or_insert(0) += 1;
    }

    let key_changes: Vec<String> = changes.iter().take(KEY_CHANGES_LIMIT).map(|c| c.path.clone()).collect();

    let accuracy_score = if total_changes == 0 {
        100.0
    } else {
        let total_leaves = count_leaves(ai_draft).max(1) as f64;
        let ratio = (total_changes as f64 / total_leaves) * 100.0;
        (100.0 - ratio).max(0.0)
    };

    AccuracyMetrics {
        total_changes,
        changes_by_type,
        key_changes,
        accuracy_score,
    }
}

fn top_level_field(path: &str) -> String {
    path.split('.').next().unwrap_or(path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identical_drafts_score_100_with_zero_changes() {
        let draft = json!({"recommendations": [{"severity": "high"}]});
        let metrics = compute_accuracy_metrics(&draft, &draft);
        assert_eq!(metrics.total_changes, 0);
        assert_eq!(metrics.accuracy_score, 100.0);
    }

    #[test]
    fn single_field_edit_reduces_score_and_groups_by_top_level() {
        let draft = json!({
            "recommendations": [
                {"severity": "high", "text": "a"},
                {"severity": "medium", "text": "b"},
                {"severity": "low", "text": "c"}
            ]
        });
        let mut verified = draft.clone();
        verified["recommendations"][1]["text"] = json!("edited");

        let metrics = compute_accuracy_metrics(&draft, &verified);
        assert_eq!(metrics.total_changes, 1);
        assert!(metrics.accuracy_score < 100.0);
        assert_eq!(metrics.changes_by_type.get("recommendations"), Some(&1));
        assert_eq!(metrics.key_changes.len(), 1);
    }
}
