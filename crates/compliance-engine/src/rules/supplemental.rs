//! Appendices and supplemental materials (APA Sections 2.14-2.15)

use super::RuleFamily;
use crate::patterns::{body_text, context_window, issue_id, line_bounds, ReportedTypes};
use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{DocumentStructure, FixAction, Issue, IssueCategory, Severity};

lazy_static! {
    /// Capitalized appendix callout: "Appendix B"
    static ref APPENDIX_REFERENCE: Regex = Regex::new(r"\bAppendix\s+([A-Z])\b").unwrap();

    /// Lowercase appendix callout mid-sentence: "see appendix B"
    static ref LOWERCASE_APPENDIX: Regex = Regex::new(r"\bappendix\s+[A-Z]\b").unwrap();

    static ref SUPPLEMENTAL_MENTION: Regex =
        Regex::new(r"(?i)\b(?:supplement(?:al|ary) (?:materials?|files?|tables?|figures?)|online supplement)").unwrap();

    static ref LINK: Regex = Regex::new(r"(?i)(?:https?://|\bdoi:|\b10\.\d{4,}/|osf\.io)").unwrap();
}

pub struct SupplementalRules;

impl RuleFamily for SupplementalRules {
    fn name(&self) -> &'static str {
        "supplemental"
    }

    fn validate(&self, text: &str, structure: &DocumentStructure) -> Vec<Issue> {
        check_supplemental_materials(text, structure)
    }
}

pub fn check_supplemental_materials(text: &str, structure: &DocumentStructure) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut reported = ReportedTypes::new();
    let body = body_text(text);
    let has_appendix_heading = structure.has_heading("appendix");

    for caps in APPENDIX_REFERENCE.captures_iter(body) {
        let (Some(m), Some(letter)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let label = format!("appendix {}", letter.as_str());
        if structure.has_heading(&label) || is_heading_line(body, m.start()) {
            continue;
        }
        // A lone "Appendix" heading covers Appendix A
        if letter.as_str() == "A" && has_appendix_heading {
            continue;
        }
        if reported.first(label.clone()) {
            issues.push(
                Issue::new(
                    issue_id("supplemental-appendix-missing", m.start()),
                    "Referenced appendix not found",
                    Severity::Minor,
                    IssueCategory::Structure,
                )
                .anchored(text, m.start(), m.end())
                .with_description(format!(
                    "The text refers to {} but the document has no matching heading.",
                    m.as_str()
                ))
                .with_explanation(
                    "Each appendix called out in the text needs its own labeled section \
                     after the reference list.",
                ),
            );
        }
    }

    for m in LOWERCASE_APPENDIX.find_iter(body) {
        issues.push(
            Issue::new(
                issue_id("supplemental-appendix-case", m.start()),
                "Lowercase appendix reference",
                Severity::Minor,
                IssueCategory::Formatting,
            )
            .anchored(text, m.start(), m.end())
            .with_description(format!("\"{}\" should be capitalized.", m.as_str()))
            .with_explanation("Appendix labels are proper nouns: \"see Appendix B\".")
            .with_fix(FixAction::CapitalizeAppendixReference),
        );
    }

    let has_supplemental_section =
        structure.has_heading("supplement") || structure.has_heading("supplementary");
    for m in SUPPLEMENTAL_MENTION.find_iter(body) {
        if has_supplemental_section || LINK.is_match(context_window(body, m.start(), m.end(), 150))
        {
            continue;
        }
        if reported.first("supplemental-location") {
            issues.push(
                Issue::new(
                    issue_id("supplemental-location", m.start()),
                    "Supplemental material without location",
                    Severity::Minor,
                    IssueCategory::Content,
                )
                .anchored(text, m.start(), m.end())
                .with_description(
                    "Supplemental materials are mentioned without a link or section.",
                )
                .with_explanation(
                    "Tell readers where supplemental materials are hosted, with a persistent \
                     link or DOI.",
                ),
            );
        }
    }

    issues
}

/// Whether the appendix mention is itself a heading line ("Appendix A")
fn is_heading_line(body: &str, offset: usize) -> bool {
    let (start, end) = line_bounds(body, offset);
    let line = body[start..end].trim().trim_start_matches('#').trim();
    APPENDIX_REFERENCE
        .find(line)
        .is_some_and(|m| m.start() == 0 && line.len() <= m.end() + 60 && !line.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Heading;

    #[test]
    fn test_missing_appendix_reported_once_per_label() {
        let text = "Items are listed in Appendix B. Scoring is in Appendix B as well.";
        let issues = check_supplemental_materials(text, &DocumentStructure::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].text.as_deref(), Some("Appendix B"));
    }

    #[test]
    fn test_appendix_with_heading_is_fine() {
        let structure = DocumentStructure {
            headings: vec![Heading {
                level: 1,
                text: "Appendix B".to_string(),
            }],
            paragraphs: Vec::new(),
        };
        let text = "Items are listed in Appendix B.\nAppendix B\nItem list.";
        assert!(check_supplemental_materials(text, &structure).is_empty());
    }

    #[test]
    fn test_lowercase_appendix_is_fixable() {
        let structure = DocumentStructure {
            headings: vec![Heading {
                level: 1,
                text: "Appendix C".to_string(),
            }],
            paragraphs: Vec::new(),
        };
        let issues = check_supplemental_materials("Details are in appendix C.", &structure);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].fix_action(), Some(&FixAction::CapitalizeAppendixReference));
    }

    #[test]
    fn test_supplemental_without_link() {
        let text = "Additional analyses appear in the supplemental materials.";
        let issues = check_supplemental_materials(text, &DocumentStructure::default());
        assert_eq!(issues.len(), 1);

        let linked = "Additional analyses appear in the supplemental materials (https://osf.io/xyz).";
        assert!(check_supplemental_materials(linked, &DocumentStructure::default()).is_empty());
    }
}
