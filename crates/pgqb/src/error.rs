//! Error types for pgqb

use thiserror::Error;

/// Result type alias for pgqb operations
pub type QbResult<T> = Result<T, QbError>;

/// Errors raised while configuring a statement.
///
/// Every error is returned by the call that introduced the bad input;
/// statement generation itself never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QbError {
    /// Bad arity, empty identifier, non-positive page, unsupported value kind
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operator token that cannot be rendered
    #[error("Unsupported operator: {0:?}")]
    UnsupportedOperator(String),

    /// Generated SQL rejected by the PostgreSQL parser (`check` feature)
    #[error("Invalid SQL: {0}")]
    InvalidSql(String),
}

impl QbError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an unsupported operator error
    pub fn unsupported_operator(op: impl Into<String>) -> Self {
        Self::UnsupportedOperator(op.into())
    }

    /// Create an invalid SQL error
    pub fn invalid_sql(message: impl Into<String>) -> Self {
        Self::InvalidSql(message.into())
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Check if this is an unsupported operator error
    pub fn is_unsupported_operator(&self) -> bool {
        matches!(self, Self::UnsupportedOperator(_))
    }
}
