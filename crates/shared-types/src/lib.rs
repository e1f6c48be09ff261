pub mod structure;
pub mod types;

pub use structure::{DocumentStructure, Heading};
pub use types::{
    fold_char, AiDetails, AnalysisKind, FixAction, Issue, IssueCategory, Severity, TextLocation,
};
