//! End-to-end analysis pass tests
//!
//! A realistic manuscript runs through every rule family, the citation
//! validator, and the model normalizer together.
//!
//! Run with: cargo test -p compliance-engine --test analysis_pass

use compliance_engine::{ComplianceEngine, EngineConfig, MergePolicy, ModelResponse, TransportError};
use shared_types::{AnalysisKind, DocumentStructure, FixAction, Issue, Severity};
use std::collections::HashSet;

const MANUSCRIPT: &str = "\
# Introduction
Prior work (Smith, Jones, and Lee, 2020) found large effects. Smith et al. (2020) later replicated them.
Brown (2019a) and Brown (2019c) disagree.
# Method
Participants completed the survey. The effect was significant, t(38) = 2.10, p = 0.04.
# Results.
See equation 2 for the model.
References
Smith, J., Jones, K., & Lee, M. (2020). Large effects. Journal of Effects, 1(2), 3-4.
Brown, A. (2019a). First. Press.
Brown, A. (2019c). Third. Press.";

// ============================================================================
// Heuristic pass
// ============================================================================

#[test]
fn test_manuscript_heuristic_issues() {
    let engine = ComplianceEngine::new();
    let issues = engine.check_plain(MANUSCRIPT);

    let titles: HashSet<&str> = issues.iter().map(|i| i.title.as_str()).collect();
    assert!(titles.contains("Gap in letter suffix"));
    assert!(titles.contains("Missing data availability statement"));

    let fixes: HashSet<FixAction> = issues.iter().filter_map(|i| i.fix_action().copied()).collect();
    assert!(fixes.contains(&FixAction::RemoveIntroductionHeading));
    assert!(fixes.contains(&FixAction::RemoveHeadingPeriod));
    assert!(fixes.contains(&FixAction::RemoveLeadingZero));
    assert!(fixes.contains(&FixAction::CapitalizeEquationReference));

    // The full author list is followed by "Smith et al." later on
    assert!(!titles.contains("Use \"et al.\" for three or more authors"));
}

#[test]
fn test_issue_ids_are_stable_across_runs() {
    let engine = ComplianceEngine::new();
    let first: Vec<String> = engine.check_plain(MANUSCRIPT).into_iter().map(|i| i.id).collect();
    let second: Vec<String> = engine.check_plain(MANUSCRIPT).into_iter().map(|i| i.id).collect();
    assert_eq!(first, second);
}

#[test]
fn test_anchored_issues_point_at_their_text() {
    let engine = ComplianceEngine::new();
    let lines: Vec<&str> = MANUSCRIPT.split('\n').collect();

    for issue in engine.check_plain(MANUSCRIPT) {
        let (Some(text), Some(location)) = (&issue.text, &issue.location) else {
            continue;
        };
        let line: String = lines[location.paragraph_index]
            .chars()
            .skip(location.char_offset)
            .take(location.length)
            .collect();
        assert_eq!(&line, text, "{}", issue.id);
    }
}

#[test]
fn test_issues_serialize_with_camel_case_fields() {
    let engine = ComplianceEngine::new();
    let issues = engine.check_plain(MANUSCRIPT);
    let json = serde_json::to_value(&issues).unwrap();
    let first = &json[0];
    assert!(first.get("hasFix").is_some());
    assert!(first.get("aiGenerated").is_some());

    let back: Vec<Issue> = serde_json::from_value(json).unwrap();
    assert_eq!(back, issues);
}

// ============================================================================
// Model responses
// ============================================================================

#[test]
fn test_analysis_with_model_responses() {
    let engine = ComplianceEngine::new();
    let structure = DocumentStructure::from_text(MANUSCRIPT);
    let responses = vec![
        ModelResponse::ok(
            AnalysisKind::Content,
            "```json\n{\"issues\": [{\"title\": \"Vague claim\", \"severity\": \"critical\", \"category\": \"clarity\", \"text\": \"found large effects\"}]}\n```",
        ),
        ModelResponse::ok(AnalysisKind::Citations, "The citations look fine to me!"),
        ModelResponse::failed(AnalysisKind::Structure, TransportError::Status(503)),
    ];

    let heuristic = engine.check_text(MANUSCRIPT, &structure);
    let issues = engine.analyze(MANUSCRIPT, &structure, &responses);
    let ai: Vec<&Issue> = issues.iter().filter(|i| i.ai_generated).collect();

    assert_eq!(issues.len(), heuristic.len() + 2);
    assert_eq!(ai[0].id, "ai-content-1");
    assert_eq!(ai[0].severity, Severity::Critical);
    assert!(ai[0].location.is_some());
    assert_eq!(ai[1].id, "ai-citations-unparseable");
}

#[test]
fn test_dedup_policy_from_config() {
    let config = EngineConfig::from_str("merge = \"dedup_overlapping\"").unwrap();
    assert_eq!(config.merge, MergePolicy::DedupOverlapping);

    let engine = ComplianceEngine::with_config(config);
    let text = "The effect was significant, p = 0.04.";
    let responses = vec![ModelResponse::ok(
        AnalysisKind::Content,
        r#"[{"title": "Leading zero", "category": "statistics", "text": "p = 0.04"}]"#,
    )];

    let issues = engine.analyze(text, &DocumentStructure::default(), &responses);
    assert!(issues.iter().all(|i| !i.ai_generated));
}
