//! Legal references (APA Chapter 11)

use super::RuleFamily;
use crate::patterns::{body_text, context_window, issue_id, reference_entries, ReportedTypes};
use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{DocumentStructure, FixAction, Issue, IssueCategory, Severity};

lazy_static! {
    /// Case name using "vs." instead of "v."
    static ref VERSUS: Regex =
        Regex::new(r"\b[A-Z][A-Za-z.'&]*(?:\s+[A-Z][A-Za-z.'&]*)*\s+vs\.?\s+[A-Z][A-Za-z.'&]*(?:\s+[A-Z][A-Za-z.'&]*)*").unwrap();

    /// Federal statute cited without a section symbol: `42 U.S.C. 1983`
    static ref STATUTE_NO_SECTION: Regex = Regex::new(r"\b\d+\s+U\.S\.C\.\s+\d+[a-z]?\b").unwrap();

    /// Case name in APA form
    static ref CASE_NAME: Regex =
        Regex::new(r"\b[A-Z][A-Za-z.'&]*(?:\s+[A-Z][A-Za-z.'&]*)*\s+v\.\s+[A-Z][A-Za-z.'&]*(?:\s+[A-Z][A-Za-z.'&]*)*").unwrap();

    /// Reporter volume and page: `347 U.S. 483`, `123 F.3d 456`
    static ref REPORTER: Regex =
        Regex::new(r"\b\d+\s+(?:U\.S\.|S\.\s?Ct\.|F\.(?:\s?Supp\.)?(?:\s?\dd)?|L\.\s?Ed\.)\s+\d+").unwrap();

    /// Parenthesized year, possibly preceded by a court name
    static ref PAREN_YEAR: Regex = Regex::new(r"\([^()]*\b\d{4}\)").unwrap();
}

pub struct LegalRules;

impl RuleFamily for LegalRules {
    fn name(&self) -> &'static str {
        "legal"
    }

    fn validate(&self, text: &str, _structure: &DocumentStructure) -> Vec<Issue> {
        check_legal_references(text)
    }
}

pub fn check_legal_references(text: &str) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut reported = ReportedTypes::new();

    for m in VERSUS.find_iter(text) {
        issues.push(
            Issue::new(
                issue_id("legal-versus", m.start()),
                "Case name uses \"vs.\"",
                Severity::Minor,
                IssueCategory::Legal,
            )
            .anchored(text, m.start(), m.end())
            .with_description(format!("\"{}\" should use \"v.\"", m.as_str()))
            .with_explanation("Legal case names are written with \"v.\" between the parties.")
            .with_fix(FixAction::LegalVersusAbbreviation),
        );
    }

    for m in STATUTE_NO_SECTION.find_iter(text) {
        issues.push(
            Issue::new(
                issue_id("legal-section-symbol", m.start()),
                "Statute citation missing section symbol",
                Severity::Minor,
                IssueCategory::Legal,
            )
            .anchored(text, m.start(), m.end())
            .with_description(format!("\"{}\" is missing the § symbol.", m.as_str()))
            .with_explanation("Federal statutes are cited as Title U.S.C. § Section (Year).")
            .with_fix(FixAction::AddSectionSymbol),
        );
    }

    // Reference entries: a case with a reporter must close with a year
    for (offset, entry) in reference_entries(text) {
        if !REPORTER.is_match(entry) || PAREN_YEAR.is_match(entry) {
            continue;
        }
        if reported.first("case-year") {
            issues.push(missing_year(text, offset, offset + entry.trim_end().len()));
        }
    }

    // Running text: a case name with no year nearby
    let body = body_text(text);
    for m in CASE_NAME.find_iter(body) {
        let window = context_window(body, m.start(), m.end(), 60);
        if PAREN_YEAR.is_match(window) || window.contains(&format!("{} (", m.as_str())) {
            continue;
        }
        if reported.first("case-year") {
            issues.push(missing_year(text, m.start(), m.end()));
        }
    }

    issues
}

fn missing_year(text: &str, start: usize, end: usize) -> Issue {
    Issue::new(
        issue_id("legal-case-year", start),
        "Legal citation missing year",
        Severity::Major,
        IssueCategory::Legal,
    )
    .anchored(text, start, end)
    .with_description("A court case is cited without its decision year.")
    .with_explanation(
        "Court decisions are cited with the year in parentheses, e.g., \
         Brown v. Board of Education (1954).",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versus_is_flagged() {
        let issues = check_legal_references("As held in Roe vs. Wade (1973), the court found...");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].text.as_deref(), Some("Roe vs. Wade"));
        assert!(issues[0].has_fix());
    }

    #[test]
    fn test_statute_without_section_symbol() {
        let issues = check_legal_references("Claims arise under 42 U.S.C. 1983 (2018).");
        assert!(issues
            .iter()
            .any(|i| i.fix_action() == Some(&FixAction::AddSectionSymbol)));

        let clean = check_legal_references("Claims arise under 42 U.S.C. § 1983 (2018).");
        assert!(clean.is_empty());
    }

    #[test]
    fn test_reference_entry_missing_year() {
        let text = "Body.\nReferences\nBrown v. Board of Education, 347 U.S. 483.\nMiranda v. Arizona, 384 U.S. 436.";
        let issues = check_legal_references(text);
        let missing: Vec<_> = issues
            .iter()
            .filter(|i| i.title == "Legal citation missing year")
            .collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].severity, Severity::Major);
    }

    #[test]
    fn test_case_with_year_is_clean() {
        let text = "In Brown v. Board of Education (1954), segregation was ruled unconstitutional.\nReferences\nBrown v. Board of Education, 347 U.S. 483 (1954).";
        assert!(check_legal_references(text).is_empty());
    }
}
