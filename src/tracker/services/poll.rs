//! One poll cycle: fetch, normalize, aggregate, persist.

use crate::tracker::{
    domain::{
        DailyStatisticsRow, ProjectRef, SnapshotEntry, TaskStatistics, compute_statistics,
        is_overdue, normalize_all,
    },
    ports::{ProjectSource, SourceError, TrackerRepository, TrackerRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Summary of a completed poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// Number of raw items the source reported.
    pub item_count: usize,
    /// Number of items that normalized into tasks.
    pub task_count: usize,
    /// Statistics computed over the normalized tasks.
    pub statistics: TaskStatistics,
}

/// Errors aborting a poll cycle.
#[derive(Debug, Error)]
pub enum PollCycleError {
    /// Source fetch failed.
    #[error(transparent)]
    Source(#[from] SourceError),
    /// Storage operation failed.
    #[error(transparent)]
    Repository(#[from] TrackerRepositoryError),
}

/// Result type for poll cycle operations.
pub type PollCycleResult<T> = Result<T, PollCycleError>;

/// Executes the fixed-order steps of one poll cycle.
#[derive(Clone)]
pub struct PollService<S, R, C>
where
    S: ProjectSource,
    R: TrackerRepository,
    C: Clock + Send + Sync,
{
    source: Arc<S>,
    repository: Arc<R>,
    clock: Arc<C>,
    project: ProjectRef,
}

impl<S, R, C> PollService<S, R, C>
where
    S: ProjectSource,
    R: TrackerRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new poll service for the given project board.
    #[must_use]
    pub const fn new(
        source: Arc<S>,
        repository: Arc<R>,
        clock: Arc<C>,
        project: ProjectRef,
    ) -> Self {
        Self {
            source,
            repository,
            clock,
            project,
        }
    }

    /// Runs one cycle: fetch, normalize, compute statistics, reconcile
    /// tasks, sync assignments per task, snapshot, record daily
    /// statistics.
    ///
    /// Each step depends on the prior succeeding; the first failure aborts
    /// the remaining steps.
    ///
    /// # Errors
    ///
    /// Returns [`PollCycleError`] from the failing step.
    pub async fn run_cycle(&self) -> PollCycleResult<CycleReport> {
        let now = self.clock.utc();
        let today = self.clock.local().date_naive();

        let items = self.source.fetch_all_items(&self.project).await?;
        let tasks = normalize_all(&items);
        tracing::debug!(
            items = items.len(),
            tasks = tasks.len(),
            "normalized project items"
        );

        let statistics = compute_statistics(&tasks, today);

        self.repository.upsert_tasks(&tasks, now).await?;
        for task in &tasks {
            self.repository
                .sync_assignments(task.key(), task.assignees(), now)
                .await?;
        }

        let entries: Vec<SnapshotEntry> = tasks
            .iter()
            .map(|task| SnapshotEntry {
                key: task.key().clone(),
                state: task.state(),
                status: task.status().map(ToOwned::to_owned),
                overdue: is_overdue(task, today),
            })
            .collect();
        self.repository.write_snapshots(today, &entries).await?;

        self.repository
            .upsert_daily_statistics(&DailyStatisticsRow {
                date: today,
                total: statistics.total,
                open: statistics.open,
                closed: statistics.closed,
                overdue: statistics.overdue,
            })
            .await?;

        Ok(CycleReport {
            item_count: items.len(),
            task_count: tasks.len(),
            statistics,
        })
    }
}
