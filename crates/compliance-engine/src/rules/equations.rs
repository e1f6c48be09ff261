//! Displayed equations (APA Section 6.46)

use super::RuleFamily;
use crate::patterns::{body_text, issue_id, ReportedTypes};
use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{DocumentStructure, FixAction, Issue, IssueCategory, Severity};

lazy_static! {
    /// Equation number at the right margin: `(3)`
    static ref EQUATION_NUMBER: Regex = Regex::new(r"\(\d+\)\s*$").unwrap();

    /// Lowercase in-text equation reference: "in equation 3"
    static ref LOWERCASE_REFERENCE: Regex = Regex::new(r"\bequation\s+\(?\d+\)?").unwrap();

    /// Prose word (four letters or more)
    static ref PROSE_WORD: Regex = Regex::new(r"\b[A-Za-z]{4,}\b").unwrap();
}

pub struct EquationRules;

impl RuleFamily for EquationRules {
    fn name(&self) -> &'static str {
        "equations"
    }

    fn validate(&self, text: &str, _structure: &DocumentStructure) -> Vec<Issue> {
        check_equations(text)
    }
}

pub fn check_equations(text: &str) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut reported = ReportedTypes::new();
    let body = body_text(text);

    let mut numbered = 0;
    let mut unnumbered = Vec::new();
    let mut offset = 0;
    for line in body.split('\n') {
        if is_display_equation(line) {
            if EQUATION_NUMBER.is_match(line) {
                numbered += 1;
            } else {
                let lead = line.len() - line.trim_start().len();
                unnumbered.push((offset + lead, offset + line.trim_end().len()));
            }
        }
        offset += line.len() + 1;
    }

    // Only inconsistent numbering is flagged; unnumbered-only papers are fine
    if numbered > 0 {
        if let Some(&(start, end)) = unnumbered.first() {
            if reported.first("numbering") {
                issues.push(
                    Issue::new(
                        issue_id("equation-unnumbered", start),
                        "Displayed equation without a number",
                        Severity::Minor,
                        IssueCategory::Formatting,
                    )
                    .anchored(text, start, end)
                    .with_description(format!(
                        "{} displayed equation(s) are unnumbered while others are numbered.",
                        unnumbered.len()
                    ))
                    .with_explanation(
                        "When equations are numbered, number every displayed equation \
                         consecutively in parentheses at the right margin.",
                    ),
                );
            }
        }
    }

    for m in LOWERCASE_REFERENCE.find_iter(body) {
        issues.push(
            Issue::new(
                issue_id("equation-reference-case", m.start()),
                "Lowercase equation reference",
                Severity::Minor,
                IssueCategory::Formatting,
            )
            .anchored(text, m.start(), m.end())
            .with_description(format!("\"{}\" should be capitalized.", m.as_str()))
            .with_explanation("Refer to numbered equations as \"Equation 1\".")
            .with_fix(FixAction::CapitalizeEquationReference),
        );
    }

    issues
}

/// A line that is mostly math: has an `=` and at most two prose words
fn is_display_equation(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.len() > 120 || !trimmed.contains('=') {
        return false;
    }
    PROSE_WORD.find_iter(trimmed).count() <= 2
}
