//! Normalization of untrusted model responses into issues

use super::smells::find_smell;
use crate::config::AiConfig;
use crate::patterns::find_literal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared_types::{
    AiDetails, AnalysisKind, FixAction, Issue, IssueCategory, Severity, TextLocation,
};
use std::fmt;
use tracing::{debug, warn};

pub const UNPARSEABLE_TITLE: &str = "AI analysis available but unparseable";

/// Envelope keys that hold the issue array
const ENVELOPE_KEYS: &[&str] = &["issues", "problems", "citationIssues"];

const TITLE_KEYS: &[&str] = &["title", "issue", "name", "summary"];
const DESCRIPTION_KEYS: &[&str] = &["description", "message", "detail", "details"];
const SEVERITY_KEYS: &[&str] = &["severity", "level", "priority"];
const CATEGORY_KEYS: &[&str] = &["category", "type"];
const TEXT_KEYS: &[&str] = &["text", "quote", "excerpt", "original", "originalText"];
const EXPLANATION_KEYS: &[&str] = &["explanation", "rationale", "reason"];
const SUGGESTION_KEYS: &[&str] = &["suggestion", "fix", "recommendation", "replacement"];

/// Cap on candidate starts tried when hunting for embedded JSON
const MAX_JSON_CANDIDATES: usize = 32;

/// Severity word as written by the model. The vocabulary is open, so
/// anything unexpected lands in `Unrecognized`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ModelSeverity {
    Minor,
    Moderate,
    Major,
    Critical,
    Unrecognized(String),
}

impl ModelSeverity {
    pub fn to_severity(&self) -> Severity {
        match self {
            ModelSeverity::Minor | ModelSeverity::Unrecognized(_) => Severity::Minor,
            ModelSeverity::Moderate | ModelSeverity::Major => Severity::Major,
            ModelSeverity::Critical => Severity::Critical,
        }
    }
}

impl From<String> for ModelSeverity {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "minor" | "low" => Self::Minor,
            "moderate" | "medium" => Self::Moderate,
            "major" | "high" => Self::Major,
            "critical" | "severe" => Self::Critical,
            _ => Self::Unrecognized(raw),
        }
    }
}

impl From<ModelSeverity> for String {
    fn from(severity: ModelSeverity) -> Self {
        match severity {
            ModelSeverity::Unrecognized(raw) => raw,
            known => known.to_string(),
        }
    }
}

impl fmt::Display for ModelSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSeverity::Minor => f.write_str("minor"),
            ModelSeverity::Moderate => f.write_str("moderate"),
            ModelSeverity::Major => f.write_str("major"),
            ModelSeverity::Critical => f.write_str("critical"),
            ModelSeverity::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

/// Replacement text proposed by the fix-suggestion exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixSuggestion {
    pub original: String,
    pub replacement: String,
    #[serde(default)]
    pub explanation: String,
}

/// Normalize one model response with default settings
pub fn normalize(raw: &str, kind: AnalysisKind, document: &str) -> Vec<Issue> {
    normalize_with(raw, kind, document, &AiConfig::default())
}

/// Normalize one model response.
///
/// Never fails: a response that cannot be read yields exactly one
/// fallback issue so the user knows the analysis ran.
pub fn normalize_with(
    raw: &str,
    kind: AnalysisKind,
    document: &str,
    config: &AiConfig,
) -> Vec<Issue> {
    let Some(items) = extract_json(strip_code_fences(raw)).and_then(issue_list) else {
        warn!(kind = %kind, "model response is not parseable as an issue list");
        return vec![unparseable_issue(kind)];
    };

    let issues: Vec<Issue> = items
        .iter()
        .filter_map(Value::as_object)
        .enumerate()
        .map(|(i, item)| to_issue(item, kind, i + 1, document, config))
        .collect();

    debug!(kind = %kind, count = issues.len(), "normalized model issues");
    issues
}

/// Parse the fix-suggestion exchange; malformed responses give `None`
pub fn normalize_fix_suggestion(raw: &str) -> Option<FixSuggestion> {
    let value = extract_json(strip_code_fences(raw))?;
    let object = match &value {
        Value::Object(map) => map,
        Value::Array(items) => items.first()?.as_object()?,
        _ => return None,
    };

    let original = string_field(object, &["original", "text", "before"])?;
    let replacement = object
        .get("replacement")
        .or_else(|| object.get("suggestion"))
        .or_else(|| object.get("after"))
        .and_then(Value::as_str)?
        .to_string();
    let explanation = string_field(object, EXPLANATION_KEYS).unwrap_or_default();

    if original == replacement {
        debug!("fix suggestion leaves the text unchanged");
        return None;
    }
    Some(FixSuggestion {
        original,
        replacement,
        explanation,
    })
}

/// Remove a Markdown code fence around the payload, if there is one
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(open) = trimmed.find("```") else {
        return trimmed;
    };
    let after = &trimmed[open + 3..];
    // Skip the language tag line ("```json")
    let body = match after.find('\n') {
        Some(i) if !after[..i].contains(['{', '[']) => &after[i + 1..],
        _ => after,
    };
    match body.find("```") {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

/// First balanced `{...}` or `[...]` span, aware of JSON strings
pub fn first_balanced_json(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    balanced_span_at(text, start)
}

fn balanced_span_at(text: &str, start: usize) -> Option<&str> {
    let mut closers: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => closers.push('}'),
            '[' => closers.push(']'),
            '}' | ']' => {
                if closers.pop() != Some(c) {
                    return None;
                }
                if closers.is_empty() {
                    return Some(&text[start..start + i + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Whole payload as JSON, else the first embedded balanced span that parses
fn extract_json(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(text) {
        return Some(value);
    }
    text.char_indices()
        .filter(|(_, c)| *c == '{' || *c == '[')
        .take(MAX_JSON_CANDIDATES)
        .filter_map(|(i, _)| balanced_span_at(text, i))
        .find_map(|span| serde_json::from_str(span).ok())
}

fn issue_list(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => {
            for key in ENVELOPE_KEYS {
                if let Some(Value::Array(items)) = map.remove(*key) {
                    return Some(items);
                }
            }
            // A lone issue object without an envelope
            let looks_like_issue = TITLE_KEYS
                .iter()
                .chain(DESCRIPTION_KEYS)
                .any(|k| map.contains_key(*k));
            looks_like_issue.then(|| vec![Value::Object(map)])
        }
        _ => None,
    }
}

fn to_issue(
    item: &Map<String, Value>,
    kind: AnalysisKind,
    n: usize,
    document: &str,
    config: &AiConfig,
) -> Issue {
    let title = string_field(item, TITLE_KEYS).unwrap_or_else(|| "AI-detected issue".to_string());
    let model_severity = string_field(item, SEVERITY_KEYS).unwrap_or_default();
    let severity = ModelSeverity::from(model_severity.clone()).to_severity();
    let category = string_field(item, CATEGORY_KEYS)
        .map(IssueCategory::from)
        .unwrap_or_else(|| default_category(kind));
    let suggestion = string_field(item, SUGGESTION_KEYS);
    let model_text = string_field(item, TEXT_KEYS);

    let mut anchor_synthesized = false;
    let mut span = None;
    let text = match model_text {
        Some(quoted) => {
            span = if config.case_insensitive_anchors {
                find_literal(document, &quoted)
            } else {
                document.find(&quoted).map(|s| (s, s + quoted.len()))
            };
            Some(quoted)
        }
        None if config.synthesize_anchors => find_smell(&category, document).map(|(s, e)| {
            anchor_synthesized = true;
            span = Some((s, e));
            document[s..e].to_string()
        }),
        None => None,
    };
    let fixable = suggestion.is_some() && text.is_some() && !anchor_synthesized;

    let mut issue = Issue::new(
        format!("ai-{}-{}", kind, n),
        title,
        severity,
        category,
    )
    .with_description(string_field(item, DESCRIPTION_KEYS).unwrap_or_default())
    .with_explanation(string_field(item, EXPLANATION_KEYS).unwrap_or_default());

    if let Some(text) = text {
        issue = issue.with_text(text);
    }
    if let Some((start, end)) = span {
        issue = issue.with_location(TextLocation::from_span(document, start, end));
    }
    if fixable {
        issue = issue.with_fix(FixAction::ApplyAiSuggestion);
    }
    issue.with_ai_details(AiDetails {
        kind,
        model_severity,
        suggestion,
        anchor_synthesized,
    })
}

fn unparseable_issue(kind: AnalysisKind) -> Issue {
    Issue::new(
        format!("ai-{}-unparseable", kind),
        UNPARSEABLE_TITLE,
        Severity::Minor,
        default_category(kind),
    )
    .with_description(format!(
        "The {} analysis returned a response that could not be read.",
        kind
    ))
    .with_explanation("Re-run the analysis to get detailed feedback.")
    .with_ai_details(AiDetails {
        kind,
        model_severity: String::new(),
        suggestion: None,
        anchor_synthesized: false,
    })
}

fn default_category(kind: AnalysisKind) -> IssueCategory {
    match kind {
        AnalysisKind::Content => IssueCategory::Content,
        AnalysisKind::Structure => IssueCategory::Structure,
        AnalysisKind::Citations => IssueCategory::Citations,
    }
}

/// First non-empty string (or number) under any of `keys`
fn string_field(item: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match item.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
