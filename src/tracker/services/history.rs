//! Backfill driver for synthetic statistics history.

use crate::tracker::{
    domain::synthesize_daily_series,
    ports::{TaskFilter, TrackerRepository, TrackerRepositoryResult},
};
use mockable::Clock;
use std::sync::Arc;

/// Reconstructs a retroactive daily-statistics series from stored tasks.
#[derive(Clone)]
pub struct BackfillService<R, C>
where
    R: TrackerRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> BackfillService<R, C>
where
    R: TrackerRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new backfill service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Derives and upserts one statistics row per day of the window,
    /// oldest first, ending today.
    ///
    /// Re-running is idempotent per day because each row goes through the
    /// same date-keyed upsert the live cycle uses. Returns the number of
    /// days written.
    ///
    /// # Errors
    ///
    /// Returns the first repository error; remaining days are abandoned
    /// but rows already written stay in place.
    pub async fn backfill(&self, window_days: u32) -> TrackerRepositoryResult<usize> {
        let today = self.clock.local().date_naive();
        let tasks = self.repository.list_tasks(&TaskFilter::new()).await?;
        let series = synthesize_daily_series(&tasks, today, window_days);

        let mut written = 0usize;
        for row in &series {
            if let Err(err) = self.repository.upsert_daily_statistics(row).await {
                tracing::error!(
                    date = %row.date,
                    written,
                    error = %err,
                    "backfill aborted, keeping days already written"
                );
                return Err(err);
            }
            written += 1;
        }
        tracing::info!(days = written, "backfill complete");
        Ok(written)
    }

    /// Runs a backfill only when no daily statistics exist yet.
    ///
    /// Returns `None` when history was already present and the backfill
    /// was skipped.
    ///
    /// # Errors
    ///
    /// Returns the first repository error, as for [`Self::backfill`].
    pub async fn backfill_if_empty(
        &self,
        window_days: u32,
    ) -> TrackerRepositoryResult<Option<usize>> {
        if self.repository.has_daily_statistics().await? {
            tracing::debug!("daily statistics already present, skipping backfill");
            return Ok(None);
        }
        self.backfill(window_days).await.map(Some)
    }
}
