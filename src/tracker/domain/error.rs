//! Error types for tracker domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain tracker values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackerDomainError {
    /// The repository name does not follow `owner/repo` format.
    #[error("invalid repository name '{0}', expected owner/repo")]
    InvalidRepository(String),

    /// The issue or pull-request number is invalid.
    #[error("invalid task number {0}, expected a positive integer")]
    InvalidTaskNumber(u64),

    /// The organization login is empty after trimming.
    #[error("organization login must not be empty")]
    EmptyOrganization,

    /// The project number is zero.
    #[error("project number must be positive")]
    InvalidProjectNumber,
}

/// Error returned while parsing task states from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task state: {0}")]
pub struct ParseTaskStateError(pub String);

/// Error returned while parsing task kinds from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task kind: {0}")]
pub struct ParseTaskKindError(pub String);
