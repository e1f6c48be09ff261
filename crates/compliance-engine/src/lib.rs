pub mod ai;
pub mod citations;
pub mod config;
pub mod error;
pub mod merge;
pub mod patterns;
pub mod rules;

pub use config::{AiConfig, EngineConfig};
pub use error::TransportError;
pub use merge::{merge, merge_with_policy, MergePolicy};
pub use rules::RuleFamily;

use shared_types::{AnalysisKind, DocumentStructure, Issue};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// One model exchange as handed over by the orchestrator
#[derive(Debug, Clone)]
pub struct ModelResponse {
    pub kind: AnalysisKind,
    pub body: Result<String, TransportError>,
}

impl ModelResponse {
    pub fn ok(kind: AnalysisKind, body: impl Into<String>) -> Self {
        Self {
            kind,
            body: Ok(body.into()),
        }
    }

    pub fn failed(kind: AnalysisKind, error: TransportError) -> Self {
        Self {
            kind,
            body: Err(error),
        }
    }
}

/// ComplianceEngine entry point
pub struct ComplianceEngine {
    config: EngineConfig,
    families: Vec<Box<dyn RuleFamily>>,
}

impl ComplianceEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let families = rules::all_rule_families()
            .into_iter()
            .filter(|family| !config.is_disabled(family.name()))
            .collect();
        Self { config, families }
    }

    /// Register an additional rule family (skipped if disabled by config)
    pub fn with_family(mut self, family: Box<dyn RuleFamily>) -> Self {
        if !self.config.is_disabled(family.name()) {
            self.families.push(family);
        }
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn family_names(&self) -> Vec<&'static str> {
        self.families.iter().map(|family| family.name()).collect()
    }

    /// Run every enabled rule family.
    ///
    /// A family that panics is logged and contributes nothing for this
    /// pass; the others still run.
    pub fn check_text(&self, text: &str, structure: &DocumentStructure) -> Vec<Issue> {
        let mut issues = Vec::new();

        for family in &self.families {
            match panic::catch_unwind(AssertUnwindSafe(|| family.validate(text, structure))) {
                Ok(found) => {
                    debug!(family = family.name(), count = found.len(), "rule family finished");
                    issues.extend(found);
                }
                Err(_) => {
                    warn!(family = family.name(), "rule family panicked, skipping its issues");
                }
            }
        }

        issues
    }

    /// Check raw text, deriving the structure summary from it
    pub fn check_plain(&self, text: &str) -> Vec<Issue> {
        self.check_text(text, &DocumentStructure::from_text(text))
    }

    /// Normalize every model response. Transport failures are logged and
    /// skipped.
    pub fn normalize_responses(&self, text: &str, responses: &[ModelResponse]) -> Vec<Issue> {
        let mut issues = Vec::new();

        for response in responses {
            match &response.body {
                Ok(body) => {
                    issues.extend(ai::normalize_with(body, response.kind, text, &self.config.ai))
                }
                Err(error) => {
                    warn!(
                        kind = %response.kind,
                        %error,
                        "model request failed, continuing without it"
                    );
                }
            }
        }

        issues
    }

    /// Full analysis pass: heuristics, model responses, merge
    pub fn analyze(
        &self,
        text: &str,
        structure: &DocumentStructure,
        responses: &[ModelResponse],
    ) -> Vec<Issue> {
        let heuristic = self.check_text(text, structure);
        let ai = self.normalize_responses(text, responses);
        debug!(
            heuristic = heuristic.len(),
            ai = ai.len(),
            policy = ?self.config.merge,
            "merging issues"
        );
        merge_with_policy(heuristic, ai, self.config.merge)
    }
}

impl Default for ComplianceEngine {
    fn default() -> Self {
        Self::new()
    }
}
