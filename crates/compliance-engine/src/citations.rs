//! In-text citation cross-reference checks (APA Sections 8.10-8.36)
//!
//! Unlike the pattern families this validator keeps document-wide
//! bookkeeping: every narrative and parenthetical citation is indexed by an
//! [`AuthorYearKey`] so later citations can be compared with earlier ones.
//! All of that state lives inside one `check_citations` call.

use crate::patterns::{
    body_text, issue_id, reference_entries, ReportedTypes, FULL_DATE, REFERENCE_AUTHOR, YEAR,
};
use crate::rules::RuleFamily;
use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{DocumentStructure, FixAction, Issue, IssueCategory, Severity};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Narrative:parenthetical ratio bounds; outside them the paper leans too
/// heavily on one citation style
pub const MIN_STYLE_RATIO: f64 = 0.2;
pub const MAX_STYLE_RATIO: f64 = 5.0;

/// Below this many citations the style ratio is not meaningful
pub const MIN_CITATIONS_FOR_BALANCE: usize = 5;

/// Author count from which APA requires the "first 19 ... last" elision
pub const ELISION_AUTHOR_COUNT: usize = 21;

lazy_static! {
    /// Narrative citation: `Smith and Jones (2020)`, `Lee et al. (2019a, p. 4)`
    static ref NARRATIVE: Regex = Regex::new(
        r"\b(?P<authors>[A-Z][A-Za-z'’\-]+(?:(?:,\s+(?:and\s+|&\s+)?|\s+(?:and|&)\s+)[A-Z][A-Za-z'’\-]+)*(?:,?\s+et\s+al\.)?)\s+\((?P<year>\d{4})(?P<suffix>[a-z])?(?:,\s*(?:pp?\.|para\.)[^()]*)?\)"
    )
    .unwrap();

    /// Parenthetical group containing at least one year
    static ref PAREN_GROUP: Regex = Regex::new(r"\(([^()]*\b\d{4}[a-z]?\b[^()]*)\)").unwrap();

    /// One citation inside a parenthetical group
    static ref SEGMENT: Regex = Regex::new(
        r"^(?P<authors>[^\d].*?),\s*(?P<year>\d{4})(?P<suffix>[a-z])?(?:,\s*(?:pp?\.|para\.|Chapter|Table|Figure)\s*.*)?$"
    )
    .unwrap();

    /// Signal words that may open a parenthetical segment
    static ref SEGMENT_PREFIX: Regex =
        Regex::new(r"(?i)^(?:see also|see|e\.g\.,?|i\.e\.,?|cf\.)\s+").unwrap();

    /// Separators between author names, after `&` has become `and`
    static ref AUTHOR_SEPARATOR: Regex = Regex::new(r"\s*,\s*(?:and\s+)?|\s+and\s+").unwrap();

    /// A single surname or group author
    static ref SURNAME: Regex = Regex::new(
        r"^(?:(?:van|von|de|der|den|da|di|du|le|la)\s+)*[A-Z][A-Za-z'’\-]+(?:\s+(?:[A-Z][A-Za-z'’\-]+|of|for|the|on|in))*$"
    )
    .unwrap();

    /// Secondary source: `(Smith, 1990, as cited in Jones, 2010)`
    static ref AS_CITED: Regex =
        Regex::new(r"\(([^()]*?)\bas cited in\b([^()]*)\)").unwrap();

    /// Personal communication: `(J. Smith, personal communication, March 3, 2020)`
    static ref PERSONAL_COMMUNICATION: Regex =
        Regex::new(r"\(([^()]*?)\bpersonal communication\b([^()]*)\)").unwrap();

    /// Trailing surname in a text fragment
    static ref TRAILING_SURNAME: Regex = Regex::new(r"([A-Z][A-Za-z'’\-]+)\W*$").unwrap();
}

/// Sentence adverbs that the narrative pattern would otherwise take as authors
const SENTENCE_OPENERS: &[&str] = &[
    "However",
    "Recently",
    "Similarly",
    "Moreover",
    "Further",
    "Furthermore",
    "Additionally",
    "Notably",
    "Indeed",
    "Thus",
    "Therefore",
    "Also",
    "Finally",
    "First",
    "Second",
    "Specifically",
    "Consequently",
    "Conversely",
    "Likewise",
    "Nevertheless",
    "Instead",
    "Here",
    "Accordingly",
    "Importantly",
    "Previously",
    "Later",
    "Earlier",
    "Subsequently",
    "In",
    "As",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CitationStyle {
    Narrative,
    Parenthetical,
}

/// One in-text citation found in the body
#[derive(Debug, Clone)]
pub struct Citation {
    pub style: CitationStyle,
    pub authors: Vec<String>,
    pub et_al: bool,
    /// Author list contains an ellipsis
    pub elided: bool,
    pub year: String,
    pub suffix: Option<char>,
    pub start: usize,
    pub end: usize,
}

impl Citation {
    pub fn lead_author(&self) -> &str {
        self.authors.first().map(String::as_str).unwrap_or("")
    }
}

/// Surname(s) + year [+ suffix]; lives only for one validation call
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AuthorYearKey {
    pub surnames: Vec<String>,
    pub year: String,
    pub suffix: Option<char>,
}

impl AuthorYearKey {
    pub fn from_citation(citation: &Citation) -> Self {
        let mut surnames = citation.authors.clone();
        if citation.et_al {
            surnames.truncate(1);
            surnames.push("et al.".to_string());
        }
        Self {
            surnames,
            year: citation.year.clone(),
            suffix: citation.suffix,
        }
    }

    /// Same key without the letter suffix
    pub fn work_group(&self) -> (Vec<String>, String) {
        (self.surnames.clone(), self.year.clone())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StyleCounts {
    pub narrative: usize,
    pub parenthetical: usize,
}

/// Citation bookkeeping for one document
#[derive(Debug, Default)]
pub struct CitationIndex {
    counts: HashMap<AuthorYearKey, StyleCounts>,
}

impl CitationIndex {
    pub fn build(citations: &[Citation]) -> Self {
        let mut counts: HashMap<AuthorYearKey, StyleCounts> = HashMap::new();
        for citation in citations {
            let entry = counts
                .entry(AuthorYearKey::from_citation(citation))
                .or_default();
            match citation.style {
                CitationStyle::Narrative => entry.narrative += 1,
                CitationStyle::Parenthetical => entry.parenthetical += 1,
            }
        }
        Self { counts }
    }

    pub fn counts(&self, key: &AuthorYearKey) -> StyleCounts {
        self.counts.get(key).copied().unwrap_or_default()
    }

    pub fn totals(&self) -> StyleCounts {
        self.counts
            .values()
            .fold(StyleCounts::default(), |acc, c| StyleCounts {
                narrative: acc.narrative + c.narrative,
                parenthetical: acc.parenthetical + c.parenthetical,
            })
    }

    /// Letter suffixes used per (surnames, year) group
    pub fn suffix_groups(&self) -> BTreeMap<(Vec<String>, String), BTreeSet<char>> {
        let mut groups: BTreeMap<(Vec<String>, String), BTreeSet<char>> = BTreeMap::new();
        for key in self.counts.keys() {
            if let Some(suffix) = key.suffix {
                groups.entry(key.work_group()).or_default().insert(suffix);
            }
        }
        groups
    }
}

pub struct CitationRules;

impl RuleFamily for CitationRules {
    fn name(&self) -> &'static str {
        "citations"
    }

    fn validate(&self, text: &str, _structure: &DocumentStructure) -> Vec<Issue> {
        check_citations(text)
    }
}

/// Run every cross-reference check over the document
pub fn check_citations(text: &str) -> Vec<Issue> {
    let body = body_text(text);
    let citations = extract_citations(body);
    let index = CitationIndex::build(&citations);
    let mut reported = ReportedTypes::new();

    let mut issues = Vec::new();
    issues.extend(check_missing_et_al(text, &citations, &mut reported));
    issues.extend(check_et_al_form(text, &citations));
    issues.extend(check_author_count(text, &citations));
    issues.extend(check_secondary_sources(text, body));
    issues.extend(check_personal_communications(text, body, &mut reported));
    issues.extend(check_suffix_sequence(text, &citations, &index));
    issues.extend(check_style_balance(&index));
    issues
}

/// Extract narrative and parenthetical citations in document order
pub fn extract_citations(body: &str) -> Vec<Citation> {
    let mut citations = Vec::new();

    for caps in NARRATIVE.captures_iter(body) {
        let (Some(m), Some(authors), Some(year)) =
            (caps.get(0), caps.name("authors"), caps.name("year"))
        else {
            continue;
        };
        let Some(list) = parse_narrative_authors(authors.as_str()) else {
            continue;
        };
        citations.push(Citation {
            style: CitationStyle::Narrative,
            authors: list.names,
            et_al: list.et_al,
            elided: list.elided,
            year: year.as_str().to_string(),
            suffix: suffix_char(caps.name("suffix")),
            start: m.start(),
            end: m.end(),
        });
    }

    for group in PAREN_GROUP.captures_iter(body) {
        let Some(content) = group.get(1) else { continue };
        let mut offset = content.start();
        for raw in content.as_str().split(';') {
            let segment_start = offset + (raw.len() - raw.trim_start().len());
            offset += raw.len() + 1;

            let segment = raw.trim();
            if segment.contains("as cited in") || segment.contains("personal communication") {
                continue;
            }
            let unprefixed = SEGMENT_PREFIX.replace(segment, "");
            let prefix_len = segment.len() - unprefixed.len();
            let Some(caps) = SEGMENT.captures(&unprefixed) else {
                continue;
            };
            let (Some(authors), Some(year)) = (caps.name("authors"), caps.name("year")) else {
                continue;
            };
            let Some(list) = parse_authors(authors.as_str()) else {
                continue;
            };
            citations.push(Citation {
                style: CitationStyle::Parenthetical,
                authors: list.names,
                et_al: list.et_al,
                elided: list.elided,
                year: year.as_str().to_string(),
                suffix: suffix_char(caps.name("suffix")),
                start: segment_start + prefix_len,
                end: segment_start + segment.len(),
            });
        }
    }

    citations.sort_by_key(|c| c.start);
    citations
}

struct AuthorList {
    names: Vec<String>,
    et_al: bool,
    elided: bool,
}

/// Split an author list, normalizing `&` to `and` first
fn parse_authors(raw: &str) -> Option<AuthorList> {
    let normalized = raw.replace('&', " and ");
    let elided = raw.contains("...") || raw.contains('…');
    let mut names = Vec::new();
    let mut et_al = false;

    for token in AUTHOR_SEPARATOR.split(normalized.trim()) {
        let mut token = token.trim();
        if token.is_empty() || token.chars().all(|c| c == '.' || c == '…') {
            continue;
        }
        if let Some(rest) = token.strip_suffix("et al.") {
            et_al = true;
            token = rest.trim();
            if token.is_empty() {
                continue;
            }
        }
        let token = token.trim_start_matches(['.', '…', ' ']);
        if !SURNAME.is_match(token) {
            return None;
        }
        names.push(token.to_string());
    }

    if names.is_empty() {
        return None;
    }
    Some(AuthorList {
        names,
        et_al,
        elided,
    })
}

/// Narrative lists pick up sentence words; drop leading openers and
/// require a conjunction before trusting a comma-separated list
fn parse_narrative_authors(raw: &str) -> Option<AuthorList> {
    let mut list = parse_authors(raw)?;
    while list.names.len() > 1 && SENTENCE_OPENERS.contains(&list.names[0].as_str()) {
        list.names.remove(0);
    }
    let has_conjunction = raw.contains(" and ") || raw.contains('&');
    if list.names.len() > 1 && !has_conjunction && !list.et_al {
        let last = list.names.pop()?;
        list.names = vec![last];
    }
    if list.names.len() == 1 && SENTENCE_OPENERS.contains(&list.names[0].as_str()) {
        return None;
    }
    Some(list)
}

fn suffix_char(m: Option<regex::Match<'_>>) -> Option<char> {
    m.and_then(|m| m.as_str().chars().next())
}

/// Works with three or more authors are cited as "Lead et al." from the
/// first citation; flag full lists never followed by the shorthand
fn check_missing_et_al(
    text: &str,
    citations: &[Citation],
    reported: &mut ReportedTypes,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (i, citation) in citations.iter().enumerate() {
        if citation.style != CitationStyle::Parenthetical
            || citation.et_al
            || citation.authors.len() < 3
        {
            continue;
        }
        let shorthand_later = citations[i + 1..].iter().any(|later| {
            later.et_al
                && later.lead_author() == citation.lead_author()
                && later.year == citation.year
        });
        if shorthand_later {
            continue;
        }
        if !reported.first(format!("missing-et-al:{}:{}", citation.lead_author(), citation.year)) {
            continue;
        }
        issues.push(
            Issue::new(
                issue_id("citation-missing-et-al", citation.start),
                "Use \"et al.\" for three or more authors",
                Severity::Minor,
                IssueCategory::Citations,
            )
            .anchored(text, citation.start, citation.end)
            .with_description(format!(
                "This citation lists all {} authors; cite it as ({} et al., {}).",
                citation.authors.len(),
                citation.lead_author(),
                citation.year
            ))
            .with_explanation(
                "APA 7 shortens works with three or more authors to the first author's \
                 surname plus \"et al.\" in every citation, including the first.",
            ),
        );
    }

    issues
}

/// "et al." replaces every author after the first
fn check_et_al_form(text: &str, citations: &[Citation]) -> Vec<Issue> {
    citations
        .iter()
        .filter(|c| c.et_al && c.authors.len() > 1)
        .map(|c| {
            Issue::new(
                issue_id("citation-et-al-form", c.start),
                "Too many names before \"et al.\"",
                Severity::Minor,
                IssueCategory::Citations,
            )
            .anchored(text, c.start, c.end)
            .with_description(format!(
                "{} names precede \"et al.\"; only the first author should be named.",
                c.authors.len()
            ))
            .with_explanation("Write the first author's surname followed by \"et al.\"")
            .with_fix(FixAction::CollapseEtAl)
        })
        .collect()
}

/// 21 or more authors need the "first 19 ... last" form. Needs manual
/// editing, so no fix action
fn check_author_count(text: &str, citations: &[Citation]) -> Vec<Issue> {
    let mut issues = Vec::new();

    for c in citations {
        if c.authors.len() >= ELISION_AUTHOR_COUNT && !c.elided {
            issues.push(author_count_issue(text, c.start, c.end, c.authors.len()));
        }
    }

    for (offset, entry) in reference_entries(text) {
        let count = REFERENCE_AUTHOR.find_iter(entry).count();
        let elided = entry.contains("...") || entry.contains('…');
        if count >= ELISION_AUTHOR_COUNT && !elided {
            issues.push(author_count_issue(
                text,
                offset,
                offset + entry.trim_end().len(),
                count,
            ));
        }
    }

    issues
}

fn author_count_issue(text: &str, start: usize, end: usize, count: usize) -> Issue {
    Issue::new(
        issue_id("citation-author-count", start),
        "Author list needs elision",
        Severity::Major,
        IssueCategory::References,
    )
    .anchored(text, start, end)
    .with_description(format!(
        "{} authors are listed in full; list the first 19, an ellipsis, then the final author.",
        count
    ))
    .with_explanation(
        "For works with 21 or more authors APA lists the first 19 names, inserts an \
         ellipsis, and ends with the last author's name.",
    )
}

/// "as cited in" needs both years, original first
fn check_secondary_sources(text: &str, body: &str) -> Vec<Issue> {
    let mut issues = Vec::new();

    for caps in AS_CITED.captures_iter(body) {
        let (Some(m), Some(original), Some(secondary)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        let original_year = first_year(original.as_str());
        let secondary_year = first_year(secondary.as_str());

        let problem = match (original_year, secondary_year) {
            (Some(o), Some(s)) if o > s => Some(format!(
                "The original work ({}) is dated after the secondary source ({}).",
                o, s
            )),
            (Some(_), Some(_)) => None,
            (None, _) => Some("The original work's year is missing.".to_string()),
            (_, None) => Some("The secondary source's year is missing.".to_string()),
        };

        if let Some(description) = problem {
            issues.push(
                Issue::new(
                    issue_id("citation-secondary", m.start()),
                    "Incomplete secondary citation",
                    Severity::Major,
                    IssueCategory::Citations,
                )
                .anchored(text, m.start(), m.end())
                .with_description(description)
                .with_explanation(
                    "Secondary citations name the original work with its year, then \"as \
                     cited in\" the secondary source with its year: (Smith, 1990, as cited in \
                     Jones, 2010).",
                ),
            );
        }
    }

    issues
}

fn first_year(text: &str) -> Option<u32> {
    YEAR.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Personal communications carry a full date and stay out of the reference list
fn check_personal_communications(
    text: &str,
    body: &str,
    reported: &mut ReportedTypes,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    let references = reference_entries(text);

    for caps in PERSONAL_COMMUNICATION.captures_iter(body) {
        let (Some(m), Some(before), Some(after)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };

        if !FULL_DATE.is_match(after.as_str()) {
            issues.push(
                Issue::new(
                    issue_id("citation-personal-date", m.start()),
                    "Personal communication missing full date",
                    Severity::Major,
                    IssueCategory::Citations,
                )
                .anchored(text, m.start(), m.end())
                .with_description("Give the exact date of the communication.")
                .with_explanation(
                    "Personal communications are cited with initials, surname, and the exact \
                     date: (T. Nguyen, personal communication, February 24, 2020).",
                ),
            );
        }

        let Some(surname) = communicator_surname(body, m.start(), before.as_str()) else {
            continue;
        };
        let prefix = format!("{},", surname);
        let listed = references
            .iter()
            .any(|(_, entry)| entry.trim_start().starts_with(&prefix));
        if listed && reported.first(format!("personal-reference:{}", surname)) {
            issues.push(
                Issue::new(
                    issue_id("citation-personal-reference", m.start()),
                    "Personal communication in reference list",
                    Severity::Major,
                    IssueCategory::References,
                )
                .anchored(text, m.start(), m.end())
                .with_description(format!(
                    "{} is cited as a personal communication but also appears in the references.",
                    surname
                ))
                .with_explanation(
                    "Personal communications are not recoverable, so they are cited in the \
                     text only and never listed in the reference list.",
                ),
            );
        }
    }

    issues
}

/// Surname inside the parentheses, or just before them in narrative form
fn communicator_surname<'a>(body: &'a str, paren_start: usize, inside: &'a str) -> Option<&'a str> {
    if let Some(caps) = TRAILING_SURNAME.captures(inside) {
        return caps.get(1).map(|m| m.as_str());
    }
    let mut from = paren_start.saturating_sub(40);
    while from > 0 && !body.is_char_boundary(from) {
        from -= 1;
    }
    TRAILING_SURNAME
        .captures(&body[from..paren_start])
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Same-author same-year suffixes start at "a" and run without gaps
fn check_suffix_sequence(text: &str, citations: &[Citation], index: &CitationIndex) -> Vec<Issue> {
    let mut issues = Vec::new();

    let first_with = |group: &(Vec<String>, String), suffix: char| {
        citations.iter().find(|c| {
            c.suffix == Some(suffix) && AuthorYearKey::from_citation(c).work_group() == *group
        })
    };

    for (group, suffixes) in index.suffix_groups() {
        let letters: Vec<char> = suffixes.into_iter().collect();
        let who = group.0.join(" & ");

        if let Some(&first) = letters.first() {
            if first != 'a' {
                if let Some(c) = first_with(&group, first) {
                    issues.push(suffix_issue(
                        text,
                        c,
                        "Letter suffixes do not start at \"a\"",
                        format!("{} ({}) starts at \"{}\" instead of \"a\".", who, group.1, first),
                    ));
                }
            }
        }

        for pair in letters.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if next as u32 != prev as u32 + 1 {
                if let Some(c) = first_with(&group, next) {
                    issues.push(suffix_issue(
                        text,
                        c,
                        "Gap in letter suffix",
                        format!(
                            "{} ({}) uses \"{}\" and \"{}\" with no work in between.",
                            who, group.1, prev, next
                        ),
                    ));
                }
            }
        }
    }

    issues
}

fn suffix_issue(text: &str, citation: &Citation, title: &str, description: String) -> Issue {
    Issue::new(
        issue_id("citation-suffix", citation.start),
        title,
        Severity::Minor,
        IssueCategory::Citations,
    )
    .anchored(text, citation.start, citation.end)
    .with_description(description)
    .with_explanation(
        "Works by the same author in the same year get consecutive suffixes a, b, c, \
         ordered by title in the reference list.",
    )
}

/// Document-level balance between narrative and parenthetical citations
fn check_style_balance(index: &CitationIndex) -> Option<Issue> {
    let totals = index.totals();
    if totals.narrative + totals.parenthetical < MIN_CITATIONS_FOR_BALANCE {
        return None;
    }

    let ratio = if totals.parenthetical == 0 {
        f64::INFINITY
    } else {
        totals.narrative as f64 / totals.parenthetical as f64
    };
    if (MIN_STYLE_RATIO..=MAX_STYLE_RATIO).contains(&ratio) {
        return None;
    }

    Some(
        Issue::new(
            "citation-style-balance",
            "Unbalanced citation styles",
            Severity::Minor,
            IssueCategory::Citations,
        )
        .with_description(format!(
            "{} narrative vs. {} parenthetical citations.",
            totals.narrative, totals.parenthetical
        ))
        .with_explanation(
            "Mixing narrative and parenthetical citations keeps the focus on ideas while \
             still crediting authors in the flow of the text.",
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn titles(issues: &[Issue]) -> Vec<&str> {
        issues.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_extracts_both_styles() {
        let body = "Smith and Jones (2020) argued this, as did others (Lee, 2019; Park & Kim, 2018).";
        let citations = extract_citations(body);
        assert_eq!(citations.len(), 3);
        assert_eq!(citations[0].style, CitationStyle::Narrative);
        assert_eq!(citations[0].authors, vec!["Smith", "Jones"]);
        assert_eq!(citations[2].authors, vec!["Park", "Kim"]);
        assert_eq!(&body[citations[1].start..citations[1].end], "Lee, 2019");
    }

    #[test]
    fn test_sentence_opener_is_not_an_author() {
        let citations = extract_citations("However, Smith (2020) disagreed.");
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].authors, vec!["Smith"]);
    }

    #[test]
    fn test_full_list_followed_by_et_al_is_fine() {
        let text = "Early work (Smith, Jones, and Lee, 2020) was replicated (Smith et al., 2020).";
        let issues = check_citations(text);
        assert!(!titles(&issues).contains(&"Use \"et al.\" for three or more authors"));
    }

    #[test]
    fn test_full_list_without_et_al_raises_one_minor() {
        let text = "Early work (Smith, Jones, and Lee, 2020) was influential.";
        let issues = check_citations(text);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Minor);
        assert_eq!(issues[0].title, "Use \"et al.\" for three or more authors");
        assert_eq!(issues[0].text.as_deref(), Some("Smith, Jones, and Lee, 2020"));
    }

    #[test]
    fn test_ampersand_normalized() {
        let citations = extract_citations("(Smith, Jones, & Lee, 2020)");
        assert_eq!(citations[0].authors, vec!["Smith", "Jones", "Lee"]);
    }

    #[test]
    fn test_names_before_et_al_are_fixable() {
        let text = "As reported (Smith, Jones, et al., 2021), effects persist.";
        let issues = check_citations(text);
        let form: Vec<_> = issues
            .iter()
            .filter(|i| i.fix_action() == Some(&FixAction::CollapseEtAl))
            .collect();
        assert_eq!(form.len(), 1);
        assert!(form[0].has_fix());
    }

    #[test]
    fn test_suffix_gap() {
        let text = "Smith (2021a) and later Smith (2021c) both found this.";
        let issues = check_citations(text);
        assert!(titles(&issues).contains(&"Gap in letter suffix"));
    }

    #[test]
    fn test_suffix_must_start_at_a() {
        let text = "Findings (Smith, 2021b; Smith, 2021c) agree.";
        let issues = check_citations(text);
        assert_eq!(titles(&issues), vec!["Letter suffixes do not start at \"a\""]);
    }

    #[test]
    fn test_consecutive_suffixes_are_fine() {
        let text = "Findings (Smith, 2021a; Smith, 2021b) agree.";
        assert!(check_citations(text).is_empty());
    }

    #[test]
    fn test_surnames_are_case_sensitive() {
        let citations = extract_citations("(Smith, 2021a) and (SMITH, 2021c)");
        let index = CitationIndex::build(&citations);
        assert_eq!(index.suffix_groups().len(), 2);
    }

    #[test]
    fn test_secondary_citation_years() {
        let ok = "(Freud, 1900, as cited in Jones, 2010)";
        assert!(check_citations(ok).is_empty());

        let missing = check_citations("(Freud, as cited in Jones, 2010)");
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].severity, Severity::Major);

        let reversed = check_citations("(Freud, 2015, as cited in Jones, 2010)");
        assert_eq!(reversed.len(), 1);
    }

    #[test]
    fn test_personal_communication_date_and_reference() {
        let text = "Policy changed (T. Nguyen, personal communication, 2020).\nReferences\nNguyen, T. (2020). Memo. Agency.";
        let issues = check_citations(text);
        assert_eq!(
            titles(&issues),
            vec![
                "Personal communication missing full date",
                "Personal communication in reference list"
            ]
        );
    }

    #[test]
    fn test_personal_communication_complete() {
        let text = "Policy changed (T. Nguyen, personal communication, February 24, 2020).";
        assert!(check_citations(text).is_empty());
    }

    #[test]
    fn test_twenty_one_authors_without_elision() {
        let names: Vec<String> = (0..21)
            .map(|i| format!("Author{}, {}. ", char::from(b'A' + (i % 26) as u8), "Q"))
            .collect();
        let text = format!("Body.\nReferences\n{}(2020). Big science. Journal.", names.join(""));
        let issues = check_citations(&text);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Major);
        assert!(!issues[0].has_fix());
    }

    #[test]
    fn test_style_balance_document_level() {
        let text = "(Adams, 2001). (Baker, 2002). (Clark, 2003). (Davis, 2004). (Evans, 2005). (Fox, 2006).";
        let issues = check_citations(text);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, "citation-style-balance");
        assert!(issues[0].is_document_level());
    }

    #[test]
    fn test_balanced_styles_pass() {
        let text = "Adams (2001) and (Baker, 2002). Clark (2003) and (Davis, 2004). Evans (2005).";
        assert!(check_citations(text).is_empty());
    }

    #[test]
    fn test_empty_text() {
        assert!(check_citations("").is_empty());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: citation checks never panic on arbitrary input
        #[test]
        fn citation_checks_no_panic(text in "\\PC*") {
            let _ = check_citations(&text);
        }

        /// Property: every fixable citation issue names its fix
        #[test]
        fn fixable_issues_have_actions(
            lead in "[A-Z][a-z]{2,8}",
            second in "[A-Z][a-z]{2,8}",
            year in 1950u32..2030u32
        ) {
            let text = format!("({}, {}, et al., {})", lead, second, year);
            for issue in check_citations(&text) {
                prop_assert!(!issue.has_fix() || issue.fix_action().is_some());
            }
        }
    }
}
