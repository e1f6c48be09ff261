//! Statistical reporting (APA Sections 6.36 and 6.44)

use super::RuleFamily;
use crate::patterns::{body_text, issue_id};
use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{DocumentStructure, FixAction, Issue, IssueCategory, Severity};

lazy_static! {
    /// p value written with a leading zero: `p = 0.03`
    static ref P_LEADING_ZERO: Regex = Regex::new(r"\bp\s*[<=>]\s*0\.(\d+)").unwrap();

    /// Exact p value of zero: `p = .000`
    static ref P_ZERO: Regex = Regex::new(r"\bp\s*=\s*0?\.0+\b").unwrap();

    /// Statistic symbol jammed against its operator: `p<.05`, `t(38)=2.1`
    static ref MISSING_OPERATOR_SPACE: Regex =
        Regex::new(r"\b(?:p|t|F|r|M|SD|N|n)(?:\(\d+(?:,\s*\d+)?\))?(?:[<=>]\s*\.?\d|\s+[<=>]\.?\d)").unwrap();
}

pub struct StatisticsRules;

impl RuleFamily for StatisticsRules {
    fn name(&self) -> &'static str {
        "statistics"
    }

    fn validate(&self, text: &str, _structure: &DocumentStructure) -> Vec<Issue> {
        check_statistics(text)
    }
}

pub fn check_statistics(text: &str) -> Vec<Issue> {
    let mut issues = Vec::new();
    let body = body_text(text);

    for m in P_ZERO.find_iter(body) {
        issues.push(
            Issue::new(
                issue_id("stat-p-zero", m.start()),
                "p value reported as zero",
                Severity::Major,
                IssueCategory::Statistics,
            )
            .anchored(text, m.start(), m.end())
            .with_description(format!("\"{}\" reports an impossible p value.", m.as_str()))
            .with_explanation("Report very small p values as p < .001.")
            .with_fix(FixAction::ReportPLessThan),
        );
    }

    for caps in P_LEADING_ZERO.captures_iter(body) {
        let (Some(m), Some(digits)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        // All-zero values are covered by the p = .000 rule
        if digits.as_str().chars().all(|c| c == '0') {
            continue;
        }
        issues.push(
            Issue::new(
                issue_id("stat-leading-zero", m.start()),
                "Leading zero in p value",
                Severity::Minor,
                IssueCategory::Statistics,
            )
            .anchored(text, m.start(), m.end())
            .with_description(format!("\"{}\" includes a leading zero.", m.as_str()))
            .with_explanation(
                "Statistics that cannot exceed 1, such as p values and correlations, are \
                 written without a leading zero.",
            )
            .with_fix(FixAction::RemoveLeadingZero),
        );
    }

    for m in MISSING_OPERATOR_SPACE.find_iter(body) {
        issues.push(
            Issue::new(
                issue_id("stat-operator-space", m.start()),
                "Missing space around operator",
                Severity::Minor,
                IssueCategory::Statistics,
            )
            .anchored(text, m.start(), m.end())
            .with_description(format!("\"{}\" needs spaces around the operator.", m.as_str()))
            .with_explanation("Put a space on both sides of =, <, and > in statistics.")
            .with_fix(FixAction::SpaceStatisticOperator),
        );
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_zero() {
        let issues = check_statistics("The effect was significant, p = 0.03.");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].text.as_deref(), Some("p = 0.03"));
        assert_eq!(issues[0].fix_action(), Some(&FixAction::RemoveLeadingZero));
    }

    #[test]
    fn test_p_zero_is_major_and_not_double_counted() {
        let issues = check_statistics("Results were robust, p = 0.000.");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Major);
    }

    #[test]
    fn test_missing_operator_space() {
        let issues = check_statistics("We found t(38)=2.10 and p<.05 overall.");
        let spacing: Vec<_> = issues
            .iter()
            .filter(|i| i.fix_action() == Some(&FixAction::SpaceStatisticOperator))
            .collect();
        assert_eq!(spacing.len(), 2);
    }

    #[test]
    fn test_well_formatted_statistics() {
        let text = "The difference was significant, t(38) = 2.10, p = .04, d = 0.66.";
        assert!(check_statistics(text).is_empty());
    }

    #[test]
    fn test_reference_list_ignored() {
        let text = "Body.\nReferences\nSmith, J. (2020). Why p=0.05 fails. Journal, 1(2), 3-4.";
        assert!(check_statistics(text).is_empty());
    }
}
