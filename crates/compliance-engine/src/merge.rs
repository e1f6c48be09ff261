//! Combining heuristic and model-sourced issues

use serde::{Deserialize, Serialize};
use shared_types::Issue;

/// How model issues are folded into the heuristic list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Keep everything; heuristic issues first
    #[default]
    Concatenate,
    /// Drop a model issue when a heuristic issue of the same category
    /// already covers the same span
    DedupOverlapping,
}

/// Plain concatenation, heuristic issues first
pub fn merge(heuristic: Vec<Issue>, ai: Vec<Issue>) -> Vec<Issue> {
    merge_with_policy(heuristic, ai, MergePolicy::Concatenate)
}

pub fn merge_with_policy(heuristic: Vec<Issue>, ai: Vec<Issue>, policy: MergePolicy) -> Vec<Issue> {
    let mut merged = heuristic;
    match policy {
        MergePolicy::Concatenate => merged.extend(ai),
        MergePolicy::DedupOverlapping => {
            let kept: Vec<Issue> = ai
                .into_iter()
                .filter(|candidate| !merged.iter().any(|h| covers(h, candidate)))
                .collect();
            merged.extend(kept);
        }
    }
    merged
}

fn covers(heuristic: &Issue, candidate: &Issue) -> bool {
    if heuristic.category != candidate.category {
        return false;
    }
    if let (Some(a), Some(b)) = (&heuristic.text, &candidate.text) {
        if a == b {
            return true;
        }
    }
    match (&heuristic.location, &candidate.location) {
        (Some(a), Some(b)) => a.overlaps(b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::{IssueCategory, Severity};

    fn issue(id: &str, category: IssueCategory, text: &str) -> Issue {
        Issue::new(id, id, Severity::Minor, category).with_text(text)
    }

    #[test]
    fn test_concatenation_keeps_duplicates() {
        let h = vec![issue("h1", IssueCategory::Tone, "really")];
        let a = vec![issue("a1", IssueCategory::Tone, "really")];
        let merged = merge(h, a);
        let ids: Vec<_> = merged.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["h1", "a1"]);
    }

    #[test]
    fn test_dedup_drops_same_anchor_same_category() {
        let h = vec![issue("h1", IssueCategory::Tone, "really")];
        let a = vec![
            issue("a1", IssueCategory::Tone, "really"),
            issue("a2", IssueCategory::Clarity, "really"),
        ];
        let merged = merge_with_policy(h, a, MergePolicy::DedupOverlapping);
        let ids: Vec<_> = merged.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["h1", "a2"]);
    }

    #[test]
    fn test_dedup_uses_overlapping_locations() {
        let text = "one two three";
        let h = vec![
            Issue::new("h1", "h", Severity::Minor, IssueCategory::Clarity).anchored(text, 4, 13),
        ];
        let a = vec![
            Issue::new("a1", "a", Severity::Minor, IssueCategory::Clarity).anchored(text, 0, 7),
        ];
        assert_eq!(merge_with_policy(h, a, MergePolicy::DedupOverlapping).len(), 1);
    }
}
