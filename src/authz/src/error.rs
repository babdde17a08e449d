//! Error types for the authorization engine

use thiserror::Error;

/// Authorization engine errors
///
/// These describe failures of the engine's collaborators (database reads,
/// configuration). They never reach a caller of `authorize`: every failure on
/// the decision path is folded into [`AccessDenied`].
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;

/// The single denial signal handed back to callers.
///
/// Carries no reason on purpose; unauthenticated requests, missing policies
/// and unmatched rules all look the same from the outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("access denied")]
pub struct AccessDenied;
