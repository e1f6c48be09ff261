use thiserror::Error;

/// Failure of the external model client, handed to the engine by the
/// orchestrator. Never fatal to an analysis pass.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("model request timed out")]
    Timeout,

    #[error("model endpoint returned HTTP {0}")]
    Status(u16),

    #[error("model request failed: {0}")]
    Failed(String),
}
