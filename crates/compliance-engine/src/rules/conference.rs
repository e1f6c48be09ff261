//! Conference presentations and proceedings (APA Section 10.5)

use super::RuleFamily;
use crate::patterns::{issue_id, reference_entries, ReportedTypes};
use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{DocumentStructure, Issue, IssueCategory, Severity};

lazy_static! {
    static ref CONFERENCE_WORDS: Regex =
        Regex::new(r"(?i)\b(?:conference|symposium|annual meeting|convention|congress|workshop)\b").unwrap();

    static ref PROCEEDINGS: Regex = Regex::new(r"(?i)\bproceedings\b").unwrap();

    static ref PRESENTATION_DESCRIPTOR: Regex = Regex::new(
        r"\[(?:Paper presentation|Poster session|Conference session|Symposium|Keynote address|Roundtable discussion|Workshop)\]"
    )
    .unwrap();

    static ref DOI_OR_URL: Regex = Regex::new(r"(?i)(?:https?://|\bdoi:\s*10\.|\b10\.\d{4,}/)").unwrap();
}

pub struct ConferenceRules;

impl RuleFamily for ConferenceRules {
    fn name(&self) -> &'static str {
        "conference"
    }

    fn validate(&self, text: &str, _structure: &DocumentStructure) -> Vec<Issue> {
        check_conference_references(text)
    }
}

pub fn check_conference_references(text: &str) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut reported = ReportedTypes::new();

    for (offset, entry) in reference_entries(text) {
        let end = offset + entry.trim_end().len();

        if PROCEEDINGS.is_match(entry) {
            if !DOI_OR_URL.is_match(entry) && reported.first("proceedings-doi") {
                issues.push(
                    Issue::new(
                        issue_id("conference-proceedings-doi", offset),
                        "Proceedings reference missing DOI",
                        Severity::Minor,
                        IssueCategory::References,
                    )
                    .anchored(text, offset, end)
                    .with_description("A published proceedings entry has no DOI or URL.")
                    .with_explanation(
                        "Published proceedings are referenced like journal articles or edited \
                         book chapters and include a DOI when one is available.",
                    ),
                );
            }
            continue;
        }

        if CONFERENCE_WORDS.is_match(entry)
            && !PRESENTATION_DESCRIPTOR.is_match(entry)
            && reported.first("descriptor")
        {
            issues.push(
                Issue::new(
                    issue_id("conference-descriptor", offset),
                    "Conference reference missing presentation type",
                    Severity::Minor,
                    IssueCategory::References,
                )
                .anchored(text, offset, end)
                .with_description("The entry does not state the presentation type in brackets.")
                .with_explanation(
                    "Unpublished conference presentations include a description such as \
                     [Paper presentation] or [Poster session] after the title.",
                ),
            );
        }
    }

    issues
}
