//! Port contracts for project-board tracking.
//!
//! Ports define infrastructure-agnostic interfaces used by tracker services.

pub mod repository;
pub mod source;

pub use repository::{TaskFilter, TrackerRepository, TrackerRepositoryError, TrackerRepositoryResult};
pub use source::{ProjectSource, SourceError, SourceResult};
