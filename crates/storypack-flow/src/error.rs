//! Error types for the flow crate.

/// Errors that can occur while reading flow or blackboard documents.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// The flow document could not be parsed.
    #[error("malformed flow document: {0}")]
    MalformedFlow(String),

    /// The blackboard document could not be parsed.
    #[error("malformed blackboard document: {0}")]
    MalformedBlackboard(String),

    /// A command of a registered kind carried a payload its resolver
    /// could not read.
    #[error("invalid payload for command kind {kind:?}: {reason}")]
    InvalidPayload { kind: String, reason: String },
}

/// Convenience alias for flow results.
pub type FlowResult<T> = Result<T, FlowError>;
