/// Domain-level error type shared across the workspace.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Input failed a domain validation rule.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An invariant was broken that callers cannot recover from.
    #[error("Internal error: {0}")]
    Internal(String),
}
