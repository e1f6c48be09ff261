//! Report assembly for the apa-checker binary
//!
//! Everything here is file-system free except the `load_*` helpers, so the
//! report logic can be tested directly.

use anyhow::Context;
use compliance_engine::{ComplianceEngine, ModelResponse, TransportError};
use position_resolver::{resolve_issues, JsonNode, PositionedIssue, ResolveOptions};
use serde::Serialize;
use shared_types::{AnalysisKind, DocumentStructure, Severity};
use std::fs;
use std::path::{Path, PathBuf};

/// Saved model response given on the command line as `kind=path`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiSource {
    pub kind: AnalysisKind,
    pub path: PathBuf,
}

/// clap value parser for `--ai kind=path`
pub fn parse_ai_source(raw: &str) -> Result<AiSource, String> {
    let (kind, path) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected <kind>=<path>, got '{}'", raw))?;
    if path.trim().is_empty() {
        return Err(format!("missing path for '{}'", kind));
    }
    Ok(AiSource {
        kind: kind.parse()?,
        path: PathBuf::from(path.trim()),
    })
}

/// Read saved responses. An unreadable file is treated like a failed model
/// request: the pass continues without it.
pub fn load_responses(sources: &[AiSource]) -> Vec<ModelResponse> {
    sources
        .iter()
        .map(|source| match fs::read_to_string(&source.path) {
            Ok(body) => ModelResponse::ok(source.kind, body),
            Err(e) => ModelResponse::failed(
                source.kind,
                TransportError::Failed(format!("{}: {}", source.path.display(), e)),
            ),
        })
        .collect()
}

pub fn load_structure(path: &Path) -> anyhow::Result<DocumentStructure> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read structure file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse structure file: {}", path.display()))
}

pub fn load_tree(path: &Path) -> anyhow::Result<JsonNode> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read tree file: {}", path.display()))?;
    JsonNode::from_json(&content)
        .with_context(|| format!("Failed to parse tree file: {}", path.display()))
}

/// Inputs for one check
#[derive(Debug, Default)]
pub struct CheckInput {
    pub text: String,
    /// Derived from the text when absent
    pub structure: Option<DocumentStructure>,
    pub responses: Vec<ModelResponse>,
    pub tree: Option<JsonNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub critical: usize,
    pub major: usize,
    pub minor: usize,
    pub fixable: usize,
    pub ai_generated: usize,
    /// Issues placed in the tree; only present when a tree was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub summary: Summary,
    pub issues: Vec<PositionedIssue>,
}

pub fn build_report(engine: &ComplianceEngine, input: &CheckInput) -> CheckReport {
    let derived;
    let structure = match &input.structure {
        Some(structure) => structure,
        None => {
            derived = DocumentStructure::from_text(&input.text);
            &derived
        }
    };

    let issues = engine.analyze(&input.text, structure, &input.responses);

    let positioned = match &input.tree {
        Some(tree) => {
            let options = ResolveOptions {
                case_insensitive_ai: engine.config().ai.case_insensitive_anchors,
            };
            resolve_issues(issues, tree, options)
        }
        None => issues
            .into_iter()
            .map(|issue| PositionedIssue { issue, range: None })
            .collect(),
    };

    let summary = summarize(&positioned, input.tree.is_some());
    tracing::info!(
        total = summary.total,
        critical = summary.critical,
        major = summary.major,
        minor = summary.minor,
        "check finished"
    );

    CheckReport {
        summary,
        issues: positioned,
    }
}

fn summarize(issues: &[PositionedIssue], with_tree: bool) -> Summary {
    let mut summary = Summary {
        total: issues.len(),
        resolved: with_tree.then_some(0),
        ..Summary::default()
    };
    for positioned in issues {
        let issue = &positioned.issue;
        match issue.severity {
            Severity::Critical => summary.critical += 1,
            Severity::Major => summary.major += 1,
            Severity::Minor => summary.minor += 1,
        }
        if issue.has_fix() {
            summary.fixable += 1;
        }
        if issue.ai_generated {
            summary.ai_generated += 1;
        }
        if positioned.range.is_some() {
            if let Some(resolved) = summary.resolved.as_mut() {
                *resolved += 1;
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const TEXT: &str = "Method\nThe effect was significant, p = 0.04.";

    #[test]
    fn test_parse_ai_source() {
        let source = parse_ai_source("citations=out/citations.json").unwrap();
        assert_eq!(source.kind, AnalysisKind::Citations);
        assert_eq!(source.path, PathBuf::from("out/citations.json"));

        assert!(parse_ai_source("citations").is_err());
        assert!(parse_ai_source("tone=x.json").is_err());
        assert!(parse_ai_source("content=").is_err());
    }

    #[test]
    fn test_missing_response_file_is_a_transport_failure() {
        let sources = vec![AiSource {
            kind: AnalysisKind::Content,
            path: PathBuf::from("/nonexistent/content.json"),
        }];
        let responses = load_responses(&sources);
        assert!(matches!(responses[0].body, Err(TransportError::Failed(_))));
    }

    #[test]
    fn test_report_without_tree() {
        let engine = ComplianceEngine::new();
        let input = CheckInput {
            text: TEXT.to_string(),
            ..CheckInput::default()
        };
        let report = build_report(&engine, &input);

        assert_eq!(report.summary.total, report.issues.len());
        assert_eq!(report.summary.resolved, None);
        // Leading zero (minor) and missing data availability statement (major)
        assert_eq!(report.summary.minor, 1);
        assert_eq!(report.summary.major, 1);
        assert_eq!(report.summary.fixable, 2);
    }

    #[test]
    fn test_report_with_tree_and_responses() {
        let engine = ComplianceEngine::new();
        let input = CheckInput {
            text: TEXT.to_string(),
            structure: None,
            responses: vec![ModelResponse::ok(AnalysisKind::Content, "not json")],
            tree: Some(JsonNode::from_paragraphs(&TEXT.split('\n').collect::<Vec<_>>())),
        };
        let report = build_report(&engine, &input);

        assert_eq!(report.summary.ai_generated, 1);
        // Only the p value is anchored
        assert_eq!(report.summary.resolved, Some(1));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["summary"]["resolved"], 1);
        assert!(json["issues"][0].get("range").is_some());
        assert!(json["issues"][0].get("severity").is_some());
    }

    #[test]
    fn test_load_structure_and_tree() {
        let mut structure = tempfile::NamedTempFile::new().unwrap();
        write!(structure, r#"{{"headings": [{{"level": 1, "text": "Method"}}], "paragraphs": []}}"#).unwrap();
        let loaded = load_structure(structure.path()).unwrap();
        assert_eq!(loaded.headings.len(), 1);

        let mut tree = tempfile::NamedTempFile::new().unwrap();
        write!(tree, r#"{{"type": "doc", "content": [{{"type": "paragraph"}}]}}"#).unwrap();
        assert!(load_tree(tree.path()).is_ok());

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        write!(broken, "{{").unwrap();
        let err = load_tree(broken.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse tree file"));
    }
}
