//! APA heading levels (Section 2.27)
//!
//! Works from the structure summary rather than raw patterns: levels must
//! not skip, the paper does not open with an "Introduction" heading, and
//! levels 1-3 are not terminated with a period.

use super::RuleFamily;
use crate::patterns::issue_id;
use shared_types::{DocumentStructure, FixAction, Heading, Issue, IssueCategory, Severity};

pub struct HeadingRules;

impl RuleFamily for HeadingRules {
    fn name(&self) -> &'static str {
        "headings"
    }

    fn validate(&self, text: &str, structure: &DocumentStructure) -> Vec<Issue> {
        check_headings(text, structure)
    }
}

pub fn check_headings(text: &str, structure: &DocumentStructure) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut previous_level = 0u8;
    let spans = locate_headings(text, &structure.headings);

    for (index, (heading, span)) in structure.headings.iter().zip(spans).enumerate() {
        if heading.level > previous_level.saturating_add(1) {
            issues.push(
                anchor(
                    Issue::new(
                        heading_id("heading-level-skip", span, index),
                        "Skipped heading level",
                        Severity::Major,
                        IssueCategory::Structure,
                    ),
                    text,
                    heading,
                    span,
                )
                .with_description(format!(
                    "Heading \"{}\" is level {} but follows a level {} heading.",
                    heading.text, heading.level, previous_level
                ))
                .with_explanation(
                    "APA headings descend one level at a time; a level-3 heading must sit \
                     under a level-2 heading.",
                ),
            );
        }
        previous_level = heading.level;

        if heading.level == 1 && heading.text.trim().eq_ignore_ascii_case("introduction") {
            issues.push(
                anchor(
                    Issue::new(
                        heading_id("heading-introduction", span, index),
                        "Unneeded \"Introduction\" heading",
                        Severity::Minor,
                        IssueCategory::Structure,
                    ),
                    text,
                    heading,
                    span,
                )
                .with_description("The introduction should not carry an \"Introduction\" heading.")
                .with_explanation(
                    "In APA papers the paper title at the top of the first page acts as the \
                     de facto level-1 heading for the introduction.",
                )
                .with_fix(FixAction::RemoveIntroductionHeading),
            );
        }

        if heading.level <= 3 && heading.text.trim_end().ends_with('.') {
            issues.push(
                anchor(
                    Issue::new(
                        heading_id("heading-period", span, index),
                        "Heading ends with a period",
                        Severity::Minor,
                        IssueCategory::Formatting,
                    ),
                    text,
                    heading,
                    span,
                )
                .with_description(format!(
                    "Level {} heading \"{}\" ends with a period.",
                    heading.level, heading.text
                ))
                .with_explanation(
                    "Only level 4 and 5 headings are inline and end with a period.",
                )
                .with_fix(FixAction::RemoveHeadingPeriod),
            );
        }
    }

    issues
}

/// Byte span of each heading on its own line.
///
/// Lines are matched whole (Markdown `#` prefix ignored) and in order, so
/// repeated headings land on successive lines and a heading word in prose
/// never counts.
fn locate_headings(text: &str, headings: &[Heading]) -> Vec<Option<(usize, usize)>> {
    let mut lines = Vec::new();
    let mut offset = 0;
    for line in text.split('\n') {
        lines.push((offset, line));
        offset += line.len() + 1;
    }

    let mut cursor = 0;
    headings
        .iter()
        .map(|heading| {
            let wanted = heading.text.trim();
            if wanted.is_empty() {
                return None;
            }
            let found = lines[cursor..]
                .iter()
                .position(|(_, line)| line.trim().trim_start_matches('#').trim() == wanted)?;
            let (line_start, line) = lines[cursor + found];
            cursor += found + 1;
            let start = line_start + line.find(wanted)?;
            Some((start, start + wanted.len()))
        })
        .collect()
}

fn anchor(issue: Issue, text: &str, heading: &Heading, span: Option<(usize, usize)>) -> Issue {
    match span {
        Some((start, end)) => issue.anchored(text, start, end),
        None => issue.with_text(heading.text.clone()),
    }
}

fn heading_id(code: &str, span: Option<(usize, usize)>, index: usize) -> String {
    match span {
        Some((start, _)) => issue_id(code, start),
        None => format!("{}-h{}", code, index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structure(headings: &[(u8, &str)]) -> DocumentStructure {
        DocumentStructure {
            headings: headings
                .iter()
                .map(|(level, text)| Heading {
                    level: *level,
                    text: text.to_string(),
                })
                .collect(),
            paragraphs: Vec::new(),
        }
    }

    #[test]
    fn test_detects_skipped_level() {
        let text = "Method\nParticipants\n";
        let issues = check_headings(text, &structure(&[(1, "Method"), (3, "Participants")]));
        let skip: Vec<_> = issues
            .iter()
            .filter(|i| i.id.starts_with("heading-level-skip"))
            .collect();
        assert_eq!(skip.len(), 1);
        assert_eq!(skip[0].severity, Severity::Major);
        assert_eq!(skip[0].text.as_deref(), Some("Participants"));
    }

    #[test]
    fn test_repeated_headings_get_their_own_lines() {
        let text = "Study 1\nThe first study looked at Participants in general.\n\
                    Participants\nThirty adults took part.\n\
                    Study 2\nA replication.\n\
                    Participants\nForty adults took part.";
        let s = structure(&[
            (1, "Study 1"),
            (3, "Participants"),
            (1, "Study 2"),
            (3, "Participants"),
        ]);
        let skips: Vec<_> = check_headings(text, &s)
            .into_iter()
            .filter(|i| i.id.starts_with("heading-level-skip"))
            .collect();
        assert_eq!(skips.len(), 2);
        assert_ne!(skips[0].id, skips[1].id);

        let first_line = text.find("\nParticipants\n").unwrap() + 1;
        assert_eq!(skips[0].id, format!("heading-level-skip-{}", first_line));
        let paragraphs: Vec<usize> = skips
            .iter()
            .map(|i| i.location.unwrap().paragraph_index)
            .collect();
        assert_eq!(paragraphs, vec![2, 6]);
    }

    #[test]
    fn test_markdown_heading_anchors_on_title() {
        let text = "# Method\n### Participants\nAdults.";
        let issues = check_headings(text, &structure(&[(1, "Method"), (3, "Participants")]));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].text.as_deref(), Some("Participants"));
        let offset = text.find("Participants").unwrap();
        assert_eq!(issues[0].id, format!("heading-level-skip-{}", offset));
    }

    #[test]
    fn test_unmatched_heading_falls_back_to_index_id() {
        let issues = check_headings("", &structure(&[(1, "Method"), (3, "Participants")]));
        assert_eq!(issues[0].id, "heading-level-skip-h1");
        assert_eq!(issues[0].location, None);
        assert_eq!(issues[0].text.as_deref(), Some("Participants"));
    }

    #[test]
    fn test_detects_introduction_heading() {
        let issues = check_headings("Introduction\n", &structure(&[(1, "Introduction")]));
        assert!(issues
            .iter()
            .any(|i| i.fix_action() == Some(&FixAction::RemoveIntroductionHeading)));
    }

    #[test]
    fn test_period_allowed_on_inline_levels() {
        let s = structure(&[(1, "Method"), (2, "Design"), (3, "Tasks"), (4, "Stroop task.")]);
        assert!(check_headings("", &s).is_empty());

        let s = structure(&[(1, "Method.")]);
        assert_eq!(check_headings("", &s).len(), 1);
    }

    #[test]
    fn test_well_formed_outline_is_clean() {
        let s = structure(&[(1, "Method"), (2, "Participants"), (2, "Measures"), (1, "Results")]);
        assert!(check_headings("", &s).is_empty());
    }
}
