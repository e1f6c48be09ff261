//! Footnotes (APA Section 2.13)
//!
//! - No footnote markers in headings
//! - Markers follow punctuation (except dashes)
//! - Footnotes carry content or copyright notes, not citations

use super::RuleFamily;
use crate::patterns::{body_text, issue_id, ReportedTypes};
use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{DocumentStructure, FixAction, Issue, IssueCategory, Severity};

lazy_static! {
    /// Superscript digits or a Markdown footnote reference
    static ref FOOTNOTE_MARKER: Regex = Regex::new(r"(?:[¹²³⁴⁵⁶⁷⁸⁹⁰]+|\[\^\d+\])").unwrap();

    /// Marker placed before sentence punctuation: `word¹.` or `word[^1],`
    static ref MARKER_BEFORE_PUNCTUATION: Regex =
        Regex::new(r"\w(?:[¹²³⁴⁵⁶⁷⁸⁹⁰]+|\[\^\d+\])[.,;:?!]").unwrap();

    /// Markdown footnote definition line
    static ref FOOTNOTE_DEFINITION: Regex = Regex::new(r"(?m)^[ \t]*\[\^\d+\]:(.*)$").unwrap();

    /// Author-date citation inside a footnote
    static ref CITATION_IN_NOTE: Regex =
        Regex::new(r"(?:\b[A-Z][A-Za-z'\-]+(?:\s+et\s+al\.)?,?\s+\(?\d{4}[a-z]?\)?|\bSee\s+[A-Z][A-Za-z'\-]+)").unwrap();
}

pub struct FootnoteRules;

impl RuleFamily for FootnoteRules {
    fn name(&self) -> &'static str {
        "footnotes"
    }

    fn validate(&self, text: &str, structure: &DocumentStructure) -> Vec<Issue> {
        check_footnotes(text, structure)
    }
}

pub fn check_footnotes(text: &str, structure: &DocumentStructure) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut reported = ReportedTypes::new();

    for heading in &structure.headings {
        if FOOTNOTE_MARKER.is_match(&heading.text) && reported.first("heading-marker") {
            let issue = Issue::new(
                "footnote-in-heading",
                "Footnote marker in heading",
                Severity::Minor,
                IssueCategory::Formatting,
            )
            .with_description(format!(
                "Heading \"{}\" carries a footnote marker.",
                heading.text
            ))
            .with_explanation("APA style does not place footnote callouts in headings.");

            issues.push(match text.find(heading.text.as_str()) {
                Some(start) => issue.anchored(text, start, start + heading.text.len()),
                None => issue.with_text(heading.text.clone()),
            });
        }
    }

    // Per occurrence: each misplaced marker needs its own fix
    let body = body_text(text);
    for m in MARKER_BEFORE_PUNCTUATION.find_iter(body) {
        // Skip the leading word character
        let start = m.start() + body[m.start()..].chars().next().map_or(0, char::len_utf8);
        issues.push(
            Issue::new(
                issue_id("footnote-before-punctuation", start),
                "Footnote marker before punctuation",
                Severity::Minor,
                IssueCategory::Formatting,
            )
            .anchored(text, start, m.end())
            .with_description("Footnote marker appears before the punctuation mark.")
            .with_explanation(
                "Footnote numbers follow any punctuation mark except a dash.",
            )
            .with_fix(FixAction::MoveFootnoteMarker),
        );
    }

    for caps in FOOTNOTE_DEFINITION.captures_iter(text) {
        let Some(note) = caps.get(1) else { continue };
        if let Some(citation) = CITATION_IN_NOTE.find(note.as_str()) {
            if reported.first("citation-in-note") {
                let start = note.start() + citation.start();
                issues.push(
                    Issue::new(
                        issue_id("footnote-citation", start),
                        "Citation placed in a footnote",
                        Severity::Minor,
                        IssueCategory::Citations,
                    )
                    .anchored(text, start, note.start() + citation.end())
                    .with_description("A footnote is being used to cite a source.")
                    .with_explanation(
                        "APA uses author-date citations in the running text; footnotes are \
                         reserved for content and copyright permission notes.",
                    ),
                );
            }
        }
    }

    issues
}
