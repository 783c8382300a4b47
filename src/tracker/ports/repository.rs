//! Repository port for task, assignment, snapshot, and statistics storage.
//!
//! The repository owns every write to the four tracker tables. Services
//! compute aggregates in memory and hand finished values here to persist.

use crate::tracker::domain::{
    Assignment, DailyStatisticsRow, RepositoryName, SnapshotEntry, Task, TaskKey, TaskState,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for tracker repository operations.
pub type TrackerRepositoryResult<T> = Result<T, TrackerRepositoryError>;

/// Storage-level task listing filter.
///
/// Carries only predicates the storage layer can evaluate without a notion
/// of "now"; overdue filtering happens in the query service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskFilter {
    state: Option<TaskState>,
    repository: Option<RepositoryName>,
    assignee: Option<String>,
}

impl TaskFilter {
    /// Creates an empty filter matching every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to one lifecycle state.
    #[must_use]
    pub const fn with_state(mut self, state: TaskState) -> Self {
        self.state = Some(state);
        self
    }

    /// Restricts results to one repository.
    #[must_use]
    pub fn with_repository(mut self, repository: RepositoryName) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Restricts results to tasks with an open assignment for the login.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Returns the state predicate.
    #[must_use]
    pub const fn state(&self) -> Option<TaskState> {
        self.state
    }

    /// Returns the repository predicate.
    #[must_use]
    pub const fn repository(&self) -> Option<&RepositoryName> {
        self.repository.as_ref()
    }

    /// Returns the assignee predicate.
    #[must_use]
    pub fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }
}

/// Tracker persistence contract.
#[async_trait]
pub trait TrackerRepository: Send + Sync {
    /// Inserts or updates every task by its stable external key.
    ///
    /// Updates touch only the mutable fields (title, state, status, due
    /// date, source-updated timestamp) plus the `synced_at` stamp; identity
    /// and creation timestamps are immutable once set. The whole batch runs
    /// as a single all-or-nothing unit.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::Persistence`] when any upsert
    /// fails; no partial batch is retained.
    async fn upsert_tasks(
        &self,
        tasks: &[Task],
        synced_at: DateTime<Utc>,
    ) -> TrackerRepositoryResult<()>;

    /// Reconciles the open assignment set of one task against a new report.
    ///
    /// Closes open assignments whose assignee is no longer reported, opens
    /// assignments for newly reported assignees, and leaves unchanged
    /// assignees untouched. Atomic per task.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::TaskNotFound`] when the key has no
    /// stored row.
    async fn sync_assignments(
        &self,
        key: &TaskKey,
        reported: &[String],
        now: DateTime<Utc>,
    ) -> TrackerRepositoryResult<()>;

    /// Writes one snapshot row per entry for the given day.
    ///
    /// Idempotent: entries whose (task, day) snapshot already exists are
    /// skipped, so the call is safe to repeat within a day.
    async fn write_snapshots(
        &self,
        day: NaiveDate,
        entries: &[SnapshotEntry],
    ) -> TrackerRepositoryResult<()>;

    /// Upserts the aggregate row for the given date, overwriting any
    /// existing counts for that date.
    async fn upsert_daily_statistics(
        &self,
        row: &DailyStatisticsRow,
    ) -> TrackerRepositoryResult<()>;

    /// Lists stored tasks matching the filter, assignees resolved from the
    /// currently-open assignment intervals.
    async fn list_tasks(&self, filter: &TaskFilter) -> TrackerRepositoryResult<Vec<Task>>;

    /// Returns every assignment interval recorded for the task, open and
    /// closed, in assignment order.
    async fn assignments(&self, key: &TaskKey) -> TrackerRepositoryResult<Vec<Assignment>>;

    /// Returns the daily statistics rows on or after the date, oldest
    /// first.
    async fn daily_statistics_since(
        &self,
        from: NaiveDate,
    ) -> TrackerRepositoryResult<Vec<DailyStatisticsRow>>;

    /// Reports whether any daily statistics rows exist.
    async fn has_daily_statistics(&self) -> TrackerRepositoryResult<bool>;
}

/// Errors returned by tracker repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TrackerRepositoryError {
    /// A referenced task key has no matching stored row.
    #[error("task not found: {0}")]
    TaskNotFound(TaskKey),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TrackerRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
