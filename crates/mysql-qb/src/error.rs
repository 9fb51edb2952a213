//! Error types for mysql-qb

use thiserror::Error;

/// Result type alias for builder operations
pub type QbResult<T> = Result<T, QbError>;

/// Errors raised while building or rendering a statement.
///
/// `InvalidIdentifier` and `InvalidArgument` are configuration errors: they are
/// reported by the constructor or setter that received the bad input. `State`
/// reports a call made while the statement is not in a state that allows it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QbError {
    /// Empty or malformed table/column/alias/index name
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Rejected operand, operator, list or table ordinal
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation not allowed in the statement's current state
    #[error("State error: {0}")]
    State(String),
}

impl QbError {
    /// Create an invalid identifier error
    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::InvalidIdentifier(message.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State(message.into())
    }

    /// Check if this error was raised while configuring a node or statement
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidIdentifier(_) | Self::InvalidArgument(_))
    }

    /// Check if this is a usage-ordering error
    pub fn is_state(&self) -> bool {
        matches!(self, Self::State(_))
    }
}
