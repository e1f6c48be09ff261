//! Data availability statements (APA Section 1.14 / JARS transparency)

use super::RuleFamily;
use crate::patterns::{body_text, issue_id, sentence_bounds, ReportedTypes};
use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{DocumentStructure, FixAction, Issue, IssueCategory, Severity};

lazy_static! {
    /// Inferential statistics that mark a paper as empirical
    static ref INFERENTIAL_STATISTIC: Regex =
        Regex::new(r"(?:\b[tF]\s*\(\d+(?:,\s*\d+)?\)\s*=|\bp\s*[<=>]\s*0?\.\d|\bχ2|\bchi-square)").unwrap();

    static ref AVAILABILITY_STATEMENT: Regex = Regex::new(
        r"(?i)(?:data availability|availability of data|data (?:are|is) (?:openly |publicly |freely )?available|data that support|openly available|osf\.io|available (?:up)?on (?:reasonable )?request|available from the corresponding author)"
    )
    .unwrap();

    static ref ON_REQUEST: Regex =
        Regex::new(r"(?i)available (?:up)?on (?:reasonable )?request|available from the corresponding author").unwrap();

    static ref RESTRICTION_REASON: Regex = Regex::new(
        r"(?i)\b(?:because|due to|owing to|restrict|privacy|confidential|ethic|consent|proprietary|legal)"
    )
    .unwrap();
}

pub struct DataAvailabilityRules;

impl RuleFamily for DataAvailabilityRules {
    fn name(&self) -> &'static str {
        "data_availability"
    }

    fn validate(&self, text: &str, structure: &DocumentStructure) -> Vec<Issue> {
        check_data_availability(text, structure)
    }
}

pub fn check_data_availability(text: &str, structure: &DocumentStructure) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut reported = ReportedTypes::new();

    if !is_empirical(text, structure) {
        return issues;
    }

    let has_statement =
        structure.has_heading("data availability") || AVAILABILITY_STATEMENT.is_match(text);

    if !has_statement {
        // Document-level: there is no span to point at
        issues.push(
            Issue::new(
                "data-availability-missing",
                "Missing data availability statement",
                Severity::Major,
                IssueCategory::Structure,
            )
            .with_description("Empirical paper without a data availability statement.")
            .with_explanation(
                "State where the data, analysis code, and materials can be accessed, or why \
                 they cannot be shared.",
            )
            .with_fix(FixAction::InsertDataAvailabilityStatement),
        );
        return issues;
    }

    for m in ON_REQUEST.find_iter(text) {
        let (start, end) = sentence_bounds(text, m.start());
        if RESTRICTION_REASON.is_match(&text[start..end]) {
            continue;
        }
        if reported.first("unjustified-request") {
            issues.push(
                Issue::new(
                    issue_id("data-availability-request", start),
                    "Data available only on request without reason",
                    Severity::Minor,
                    IssueCategory::Content,
                )
                .anchored(text, start, end)
                .with_description("Data are offered on request with no stated restriction.")
                .with_explanation(
                    "Share data in a repository where possible; when access must be limited, \
                     explain the legal or ethical reason.",
                ),
            );
        }
    }

    issues
}

fn is_empirical(text: &str, structure: &DocumentStructure) -> bool {
    structure.has_heading("method")
        || structure.has_heading("results")
        || INFERENTIAL_STATISTIC.is_match(body_text(text))
}
