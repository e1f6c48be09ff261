use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single detected APA compliance problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub category: IssueCategory,
    /// Literal anchor used to locate the issue in the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Position in the newline-flattened document text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<TextLocation>,
    has_fix: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fix_action: Option<FixAction>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub ai_generated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_details: Option<AiDetails>,
}

impl Issue {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        severity: Severity,
        category: IssueCategory,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            severity,
            category,
            text: None,
            location: None,
            has_fix: false,
            fix_action: None,
            explanation: String::new(),
            ai_generated: false,
            ai_details: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.text = if text.is_empty() { None } else { Some(text) };
        self
    }

    pub fn with_location(mut self, location: TextLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Anchor the issue to a byte span of `source`, recording both the
    /// literal text and its flattened location.
    pub fn anchored(self, source: &str, start: usize, end: usize) -> Self {
        match source.get(start..end) {
            Some(literal) => self
                .with_text(literal)
                .with_location(TextLocation::from_span(source, start, end)),
            None => self,
        }
    }

    /// Mark the issue as fixable. `has_fix` is only ever set together with an action.
    pub fn with_fix(mut self, action: FixAction) -> Self {
        self.has_fix = true;
        self.fix_action = Some(action);
        self
    }

    pub fn with_ai_details(mut self, details: AiDetails) -> Self {
        self.ai_generated = true;
        self.ai_details = Some(details);
        self
    }

    pub fn has_fix(&self) -> bool {
        self.has_fix && self.fix_action.is_some()
    }

    pub fn fix_action(&self) -> Option<&FixAction> {
        self.fix_action.as_ref()
    }

    /// Neither a literal anchor nor a location: applies to the whole document
    pub fn is_document_level(&self) -> bool {
        self.text.is_none() && self.location.is_none()
    }
}

/// Location of an issue in newline-flattened text, counted in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLocation {
    pub paragraph_index: usize,
    pub char_offset: usize,
    pub length: usize,
}

impl TextLocation {
    /// Convert a byte span of `text` into paragraph/char coordinates.
    ///
    /// Paragraphs are separated by `\n`. Offsets that fall inside a
    /// multi-byte character are clamped back to the previous boundary.
    pub fn from_span(text: &str, start: usize, end: usize) -> Self {
        let start = floor_char_boundary(text, start.min(text.len()));
        let end = floor_char_boundary(text, end.min(text.len())).max(start);

        let before = &text[..start];
        let paragraph_index = before.matches('\n').count();
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);

        Self {
            paragraph_index,
            char_offset: text[line_start..start].chars().count(),
            length: text[start..end].chars().count(),
        }
    }

    pub fn end_offset(&self) -> usize {
        self.char_offset.saturating_add(self.length)
    }

    pub fn overlaps(&self, other: &TextLocation) -> bool {
        self.paragraph_index == other.paragraph_index
            && self.char_offset < other.end_offset()
            && other.char_offset < self.end_offset()
    }
}

/// One-to-one lowercase mapping, so folded text keeps the original length
pub fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Minor,
    Major,
    Critical,
}

/// Issue category. Model output can name categories we have never seen, so
/// unknown names are kept verbatim in `Other` instead of being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IssueCategory {
    Citations,
    References,
    Formatting,
    Structure,
    Tone,
    Clarity,
    MissingCitation,
    Statistics,
    Legal,
    Content,
    Other(String),
}

impl IssueCategory {
    pub fn as_str(&self) -> &str {
        match self {
            IssueCategory::Citations => "citations",
            IssueCategory::References => "references",
            IssueCategory::Formatting => "formatting",
            IssueCategory::Structure => "structure",
            IssueCategory::Tone => "tone",
            IssueCategory::Clarity => "clarity",
            IssueCategory::MissingCitation => "missingCitation",
            IssueCategory::Statistics => "statistics",
            IssueCategory::Legal => "legal",
            IssueCategory::Content => "content",
            IssueCategory::Other(name) => name,
        }
    }
}

impl From<String> for IssueCategory {
    fn from(raw: String) -> Self {
        let key: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "citation" | "citations" | "intextcitation" | "intextcitations" => Self::Citations,
            "reference" | "references" | "referencelist" => Self::References,
            "format" | "formatting" => Self::Formatting,
            "structure" | "organization" | "headings" => Self::Structure,
            "tone" | "style" | "informal" | "informallanguage" => Self::Tone,
            "clarity" | "wordiness" | "concision" => Self::Clarity,
            "missingcitation" | "missingcitations" | "uncitedclaim" | "unsupportedclaim" => {
                Self::MissingCitation
            }
            "statistics" | "numbers" => Self::Statistics,
            "legal" => Self::Legal,
            "content" => Self::Content,
            _ => Self::Other(raw.trim().to_string()),
        }
    }
}

impl From<IssueCategory> for String {
    fn from(category: IssueCategory) -> Self {
        match category {
            IssueCategory::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier the external fix subsystem dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FixAction {
    CollapseEtAl,
    MoveFootnoteMarker,
    CapitalizeEquationReference,
    LegalVersusAbbreviation,
    AddSectionSymbol,
    CapitalizeAppendixReference,
    InsertDataAvailabilityStatement,
    RemoveIntroductionHeading,
    RemoveHeadingPeriod,
    RemoveLeadingZero,
    ReportPLessThan,
    SpaceStatisticOperator,
    ApplyAiSuggestion,
}

impl FixAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FixAction::CollapseEtAl => "collapseEtAl",
            FixAction::MoveFootnoteMarker => "moveFootnoteMarker",
            FixAction::CapitalizeEquationReference => "capitalizeEquationReference",
            FixAction::LegalVersusAbbreviation => "legalVersusAbbreviation",
            FixAction::AddSectionSymbol => "addSectionSymbol",
            FixAction::CapitalizeAppendixReference => "capitalizeAppendixReference",
            FixAction::InsertDataAvailabilityStatement => "insertDataAvailabilityStatement",
            FixAction::RemoveIntroductionHeading => "removeIntroductionHeading",
            FixAction::RemoveHeadingPeriod => "removeHeadingPeriod",
            FixAction::RemoveLeadingZero => "removeLeadingZero",
            FixAction::ReportPLessThan => "reportPLessThan",
            FixAction::SpaceStatisticOperator => "spaceStatisticOperator",
            FixAction::ApplyAiSuggestion => "applyAiSuggestion",
        }
    }
}

impl fmt::Display for FixAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of model-backed analysis a response belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Content,
    Structure,
    Citations,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Content => "content",
            AnalysisKind::Structure => "structure",
            AnalysisKind::Citations => "citations",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "content" => Ok(AnalysisKind::Content),
            "structure" => Ok(AnalysisKind::Structure),
            "citations" | "citation" => Ok(AnalysisKind::Citations),
            other => Err(format!("unknown analysis kind: {}", other)),
        }
    }
}

/// Extra data carried by model-sourced issues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiDetails {
    pub kind: AnalysisKind,
    /// Severity word exactly as the model wrote it
    #[serde(default)]
    pub model_severity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// True when `text` came from a phrase search rather than from the model
    #[serde(default)]
    pub anchor_synthesized: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fold_char_keeps_one_char() {
        assert_eq!(fold_char('A'), 'a');
        assert_eq!(fold_char('Ü'), 'ü');
        assert_eq!(fold_char('7'), '7');
        // 'İ' lowercases to two chars; only the first is kept
        assert_eq!(fold_char('İ'), 'i');
    }

    #[test]
    fn test_overlaps_with_huge_offsets() {
        let far = TextLocation {
            paragraph_index: 0,
            char_offset: usize::MAX,
            length: usize::MAX,
        };
        let near = TextLocation {
            paragraph_index: 0,
            char_offset: 0,
            length: 4,
        };
        assert_eq!(far.end_offset(), usize::MAX);
        assert!(!far.overlaps(&near));
        assert!(!near.overlaps(&far));
    }

    #[test]
    fn test_location_from_span_counts_paragraphs_and_chars() {
        let text = "First line.\nSecond é line here.";
        let start = text.find("line here").unwrap();
        let loc = TextLocation::from_span(text, start, start + "line".len());
        assert_eq!(
            loc,
            TextLocation {
                paragraph_index: 1,
                char_offset: 9,
                length: 4
            }
        );
    }

    #[test]
    fn test_location_clamps_to_char_boundary() {
        let text = "é";
        let loc = TextLocation::from_span(text, 1, 2);
        assert_eq!(loc.char_offset, 0);
        assert_eq!(loc.length, 1);
    }

    #[test]
    fn test_fix_sets_action() {
        let issue = Issue::new("x", "X", Severity::Minor, IssueCategory::Citations)
            .with_fix(FixAction::CollapseEtAl);
        assert!(issue.has_fix());
        assert_eq!(issue.fix_action(), Some(&FixAction::CollapseEtAl));

        let plain = Issue::new("y", "Y", Severity::Minor, IssueCategory::Citations);
        assert!(!plain.has_fix());
        assert!(plain.is_document_level());
    }

    #[test]
    fn test_issue_serializes_camel_case() {
        let issue = Issue::new("id-1", "T", Severity::Major, IssueCategory::MissingCitation)
            .anchored("abc 45% def", 4, 7)
            .with_fix(FixAction::RemoveLeadingZero);
        let json = serde_json::to_value(&issue).unwrap();

        assert_eq!(json["severity"], "Major");
        assert_eq!(json["category"], "missingCitation");
        assert_eq!(json["hasFix"], true);
        assert_eq!(json["fixAction"], "removeLeadingZero");
        assert_eq!(json["location"]["paragraphIndex"], 0);
        assert_eq!(json["location"]["charOffset"], 4);
        assert_eq!(json["text"], "45%");
    }

    #[test]
    fn test_category_falls_back_to_other() {
        assert_eq!(
            IssueCategory::from("Missing Citation".to_string()),
            IssueCategory::MissingCitation
        );
        assert_eq!(
            IssueCategory::from("bias-free language".to_string()),
            IssueCategory::Other("bias-free language".to_string())
        );
    }

    #[test]
    fn test_severity_orders_by_impact() {
        assert!(Severity::Critical > Severity::Major);
        assert!(Severity::Major > Severity::Minor);
    }
}
