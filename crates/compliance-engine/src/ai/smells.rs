//! Phrase search used to anchor model issues that came without quoted text

use crate::patterns::body_text;
use lazy_static::lazy_static;
use regex::Regex;
use shared_types::IssueCategory;

lazy_static! {
    /// Informal filler words
    static ref INFORMAL_FILLER: Regex = Regex::new(
        r"(?i)\b(?:really|basically|actually|totally|a lot of|lots of|kind of|sort of|pretty much|stuff|gonna|wanna|huge)\b"
    )
    .unwrap();

    /// Hedging and wordy constructions
    static ref HEDGING: Regex = Regex::new(
        r"(?i)\b(?:it could be argued that|it seems that|it appears that|due to the fact that|at this point in time|in order to|it is important to note that|might possibly|may potentially|a number of)\b"
    )
    .unwrap();

    /// Bare statistics and appeals to unnamed research
    static ref UNSUPPORTED_CLAIM: Regex = Regex::new(
        r"(?i)(?:\b\d+(?:\.\d+)?\s?(?:%|percent\b)|\b(?:studies|research|experts|scientists)\s+(?:show|shows|suggest|suggests|have shown|indicate|indicates)\b|\bmost people\b)"
    )
    .unwrap();

    /// A parenthetical citation right after the claim
    static ref FOLLOWING_CITATION: Regex = Regex::new(r"^[^.()]{0,40}\([^()]*\d{4}").unwrap();
}

/// First span in the body that smells like the given category.
///
/// Returns byte offsets into `text`. Categories without a phrase list
/// never match.
pub fn find_smell(category: &IssueCategory, text: &str) -> Option<(usize, usize)> {
    let body = body_text(text);
    match category {
        IssueCategory::Tone => INFORMAL_FILLER.find(body).map(|m| (m.start(), m.end())),
        IssueCategory::Clarity => HEDGING.find(body).map(|m| (m.start(), m.end())),
        IssueCategory::MissingCitation => UNSUPPORTED_CLAIM
            .find_iter(body)
            .find(|m| !FOLLOWING_CITATION.is_match(&body[m.end()..]))
            .map(|m| (m.start(), m.end())),
        _ => None,
    }
}
