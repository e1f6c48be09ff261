//! Social media references (APA Section 10.15)

use super::RuleFamily;
use crate::patterns::{body_text, issue_id, reference_entries, ReportedTypes};
use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{DocumentStructure, Issue, IssueCategory, Severity};

lazy_static! {
    /// In-text citation by handle: `(@nasa, 2020)`
    static ref HANDLE_CITATION: Regex = Regex::new(r"\(@\w{2,}(?:,\s*\d{4}[a-z]?)?\)").unwrap();

    /// Social platform URL in a reference entry
    static ref SOCIAL_URL: Regex = Regex::new(
        r"(?i)https?://(?:www\.)?(?:twitter\.com|x\.com|facebook\.com|instagram\.com|tiktok\.com|linkedin\.com|reddit\.com)/"
    )
    .unwrap();

    /// Platforms where the handle is expected in brackets after the name
    static ref HANDLE_PLATFORM: Regex =
        Regex::new(r"(?i)https?://(?:www\.)?(?:twitter\.com|x\.com|instagram\.com|tiktok\.com)/").unwrap();

    /// Bracketed handle after the author name: `[@nasa]`
    static ref BRACKETED_HANDLE: Regex = Regex::new(r"\[@\w+\]").unwrap();

    /// Format description in square brackets
    static ref FORMAT_DESCRIPTOR: Regex = Regex::new(
        r"\[(?:Tweet|Status update|Post|Photograph|Image|Video|Infographic|Thread|Reel|Story)\b[^\]]*\]"
    )
    .unwrap();
}

pub struct SocialMediaRules;

impl RuleFamily for SocialMediaRules {
    fn name(&self) -> &'static str {
        "social_media"
    }

    fn validate(&self, text: &str, _structure: &DocumentStructure) -> Vec<Issue> {
        check_social_media(text)
    }
}

pub fn check_social_media(text: &str) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut reported = ReportedTypes::new();

    for m in HANDLE_CITATION.find_iter(body_text(text)) {
        issues.push(
            Issue::new(
                issue_id("social-handle-citation", m.start()),
                "Citation by social media handle",
                Severity::Minor,
                IssueCategory::Citations,
            )
            .anchored(text, m.start(), m.end())
            .with_description(format!("{} cites the account handle instead of the author.", m.as_str()))
            .with_explanation(
                "In-text citations use the author's name (individual or group); the handle \
                 appears only in the reference entry.",
            ),
        );
    }

    for (offset, entry) in reference_entries(text) {
        if !SOCIAL_URL.is_match(entry) {
            continue;
        }
        let end = offset + entry.trim_end().len();

        if !FORMAT_DESCRIPTOR.is_match(entry) && reported.first("descriptor") {
            issues.push(
                Issue::new(
                    issue_id("social-descriptor", offset),
                    "Social media reference missing format description",
                    Severity::Minor,
                    IssueCategory::References,
                )
                .anchored(text, offset, end)
                .with_description("The entry does not describe the post type in square brackets.")
                .with_explanation(
                    "Describe the content after the title, e.g., [Tweet], [Status update], \
                     or [Video].",
                ),
            );
        }

        if HANDLE_PLATFORM.is_match(entry)
            && !BRACKETED_HANDLE.is_match(entry)
            && reported.first("handle")
        {
            issues.push(
                Issue::new(
                    issue_id("social-handle", offset),
                    "Social media reference missing handle",
                    Severity::Minor,
                    IssueCategory::References,
                )
                .anchored(text, offset, end)
                .with_description("The author's handle is not given in square brackets.")
                .with_explanation(
                    "Give the real name followed by the handle in brackets, e.g., \
                     NASA [@NASA]. (2020).",
                ),
            );
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_citation_per_occurrence() {
        let text = "Launch updates were frequent (@nasa, 2020). Fans replied (@spacefan).";
        let issues = check_social_media(text);
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_reference_entry_missing_descriptor_and_handle() {
        let text = "Body text.\nReferences\nNASA. (2020, May 1). Liftoff! https://twitter.com/NASA/status/1\nNASA. (2020, May 2). Docking. https://twitter.com/NASA/status/2";
        let issues = check_social_media(text);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| i.id.starts_with("social-descriptor")));
        assert!(issues.iter().any(|i| i.id.starts_with("social-handle-")));
    }

    #[test]
    fn test_complete_entry_is_clean() {
        let text = "Body text.\nReferences\nNASA [@NASA]. (2020, May 1). Liftoff! [Tweet]. Twitter. https://twitter.com/NASA/status/1";
        assert!(check_social_media(text).is_empty());
    }
}
