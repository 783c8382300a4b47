//! Source port for fetching raw project-board items.

use crate::tracker::domain::{ProjectItem, ProjectRef};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Paged-fetch contract against the external tracker.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectSource: Send + Sync {
    /// Fetches every item of the project board, following pagination until
    /// the server reports no further page.
    ///
    /// The returned order is the source's natural order and is not
    /// guaranteed stable across calls. This layer performs no retries;
    /// transient failures propagate to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on any network or API failure.
    async fn fetch_all_items(&self, project: &ProjectRef) -> SourceResult<Vec<ProjectItem>>;
}

/// Errors returned by project source implementations.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// Network-level failure reaching the source.
    #[error("transport failure: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The source answered with a non-success HTTP status.
    #[error("source returned status {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        body: String,
    },

    /// The source accepted the request but reported query errors.
    #[error("source reported errors: {0}")]
    Query(String),

    /// The response payload did not match the expected shape.
    #[error("failed to decode source payload: {0}")]
    Decode(Arc<dyn std::error::Error + Send + Sync>),
}

impl SourceError {
    /// Wraps a transport-level error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Wraps a payload decoding error.
    pub fn decode(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Decode(Arc::new(err))
    }
}
