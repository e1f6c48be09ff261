use thiserror::Error;

/// A tree snapshot that cannot be used for position mapping
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("tree snapshot is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("node is missing its type")]
    MissingType,

    #[error("text node is missing its text")]
    MissingText,

    #[error("{0} node cannot have content")]
    UnexpectedContent(String),
}
