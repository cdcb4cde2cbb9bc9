//! Error types for wrapchain

use thiserror::Error;

/// wrapchain error types
#[derive(Debug, Error)]
pub enum WrapError {
    /// No gadget in the catalog produces this byte.
    #[error("Unsupported byte: 0x{0:02x} is not in the injectable alphabet")]
    UnsupportedByte(u8),
    /// A primitive was applied outside its precondition. Always a synthesis bug.
    #[error("Precondition violation: {0}")]
    PreconditionViolation(String),
    /// The requested target cannot be synthesized as given.
    #[error("Invalid target: {0}")]
    InvalidTarget(String),
    /// A configured resource limit was exceeded.
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),
    /// I/O operation failed while reading or writing data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WrapError {
    pub(crate) fn precondition(primitive: &str, reason: impl std::fmt::Display) -> Self {
        WrapError::PreconditionViolation(format!("{primitive}: {reason}"))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, WrapError>;
