//! Read-side operations backing the external HTTP surface.
//!
//! These reads never block on the scheduler; they see whatever the
//! persistence layer currently holds, including partial results of a cycle
//! in progress.

use crate::tracker::{
    domain::{DailyStatisticsRow, Task, TaskStatistics, compute_statistics, is_overdue},
    ports::{TaskFilter, TrackerRepository, TrackerRepositoryResult},
};
use chrono::Days;
use mockable::Clock;
use std::sync::Arc;

/// Query service over stored tracker state.
#[derive(Clone)]
pub struct TrackerQueryService<R, C>
where
    R: TrackerRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TrackerQueryService<R, C>
where
    R: TrackerRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new query service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Computes statistics over the currently stored tasks.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the listing fails.
    pub async fn current_statistics(&self) -> TrackerRepositoryResult<TaskStatistics> {
        let today = self.clock.local().date_naive();
        let tasks = self.repository.list_tasks(&TaskFilter::new()).await?;
        Ok(compute_statistics(&tasks, today))
    }

    /// Lists stored tasks matching the filter, optionally restricted to
    /// overdue ones.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the listing fails.
    pub async fn tasks(
        &self,
        filter: &TaskFilter,
        overdue_only: bool,
    ) -> TrackerRepositoryResult<Vec<Task>> {
        let today = self.clock.local().date_naive();
        let mut tasks = self.repository.list_tasks(filter).await?;
        if overdue_only {
            tasks.retain(|task| is_overdue(task, today));
        }
        Ok(tasks)
    }

    /// Lists the currently overdue tasks.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the listing fails.
    pub async fn overdue(&self) -> TrackerRepositoryResult<Vec<Task>> {
        self.tasks(&TaskFilter::new(), true).await
    }

    /// Returns the stored daily statistics of the last `days` days,
    /// oldest first.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the lookup fails.
    pub async fn history(&self, days: u32) -> TrackerRepositoryResult<Vec<DailyStatisticsRow>> {
        let today = self.clock.local().date_naive();
        let from = today
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(today);
        self.repository.daily_statistics_since(from).await
    }
}
