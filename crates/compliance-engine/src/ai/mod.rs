//! Model-backed analysis
//!
//! The engine never talks to a model itself. The orchestrator sends the
//! prompts from [`prompts`] and hands back whatever came over the wire;
//! [`normalize`] turns that untrusted text into [`Issue`]s.
//!
//! [`Issue`]: shared_types::Issue

mod normalize;
pub mod prompts;
mod smells;

pub use normalize::{
    first_balanced_json, normalize, normalize_fix_suggestion, normalize_with, strip_code_fences,
    FixSuggestion, ModelSeverity, UNPARSEABLE_TITLE,
};
pub use smells::find_smell;
