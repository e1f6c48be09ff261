//! Pattern rule families
//!
//! Each family owns its precompiled patterns and a fixed severity per
//! sub-issue. Families are pure: `validate` reads the text and structure
//! summary and returns issues, nothing else. The engine runs every family
//! fail-open, so a family that panics only loses its own findings.

pub mod conference;
pub mod data_availability;
pub mod equations;
pub mod footnotes;
pub mod headings;
pub mod legal;
pub mod social_media;
pub mod statistics;
pub mod supplemental;

use shared_types::{DocumentStructure, Issue};

/// A family of related APA checks
pub trait RuleFamily: Send + Sync {
    /// Stable family name, used in config and logs
    fn name(&self) -> &'static str;

    /// Scan the text and return zero or more issues
    fn validate(&self, text: &str, structure: &DocumentStructure) -> Vec<Issue>;
}

/// Every pattern rule family, in reporting order
pub fn all_rule_families() -> Vec<Box<dyn RuleFamily>> {
    vec![
        Box::new(headings::HeadingRules),
        Box::new(footnotes::FootnoteRules),
        Box::new(equations::EquationRules),
        Box::new(statistics::StatisticsRules),
        Box::new(legal::LegalRules),
        Box::new(social_media::SocialMediaRules),
        Box::new(conference::ConferenceRules),
        Box::new(data_availability::DataAvailabilityRules),
        Box::new(supplemental::SupplementalRules),
        Box::new(crate::citations::CitationRules),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_family_names_are_unique() {
        let families = all_rule_families();
        let names: HashSet<_> = families.iter().map(|f| f.name()).collect();
        assert_eq!(names.len(), families.len());
    }

    #[test]
    fn test_empty_text_yields_no_issues() {
        let structure = DocumentStructure::default();
        for family in all_rule_families() {
            assert!(
                family.validate("", &structure).is_empty(),
                "{} reported issues on empty text",
                family.name()
            );
        }
    }
}
