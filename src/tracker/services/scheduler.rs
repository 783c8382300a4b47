//! Poll scheduling with at-most-one concurrent cycle.
//!
//! The scheduler is the sole mutual-exclusion mechanism guarding against
//! overlapping cycles. The running flag is claimed with an atomic
//! compare-and-swap, so racing triggers from the timer and manual refresh
//! requests cannot both enter a cycle; the loser is dropped with a logged
//! skip rather than queued.

use super::poll::{CycleReport, PollService};
use crate::tracker::ports::{ProjectSource, TrackerRepository};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Outcome class of the most recent completed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// The cycle completed every step.
    Success,
    /// The cycle aborted on a failing step.
    Error,
}

/// Point-in-time view of the scheduler state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerStatus {
    /// Whether a cycle is currently in progress.
    pub running: bool,
    /// Completion time of the most recent cycle.
    pub last_run_at: Option<DateTime<Utc>>,
    /// Outcome of the most recent cycle.
    pub last_outcome: Option<RunOutcome>,
    /// Error message of the most recent failed cycle; cleared on success.
    pub last_error: Option<String>,
}

/// Result of one trigger request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A cycle ran to completion.
    Completed(CycleReport),
    /// A cycle ran and aborted with the given error message.
    Failed(String),
    /// Another cycle was in progress; this trigger was dropped.
    Skipped,
}

#[derive(Debug, Default)]
struct LastRun {
    at: Option<DateTime<Utc>>,
    outcome: Option<RunOutcome>,
    error: Option<String>,
}

struct SchedulerInner<S, R, C>
where
    S: ProjectSource,
    R: TrackerRepository,
    C: Clock + Send + Sync,
{
    service: PollService<S, R, C>,
    clock: Arc<C>,
    running: AtomicBool,
    last: RwLock<LastRun>,
}

/// Drives poll cycles while guaranteeing at most one runs at a time.
pub struct PollScheduler<S, R, C>
where
    S: ProjectSource,
    R: TrackerRepository,
    C: Clock + Send + Sync,
{
    inner: Arc<SchedulerInner<S, R, C>>,
}

impl<S, R, C> Clone for PollScheduler<S, R, C>
where
    S: ProjectSource,
    R: TrackerRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, R, C> PollScheduler<S, R, C>
where
    S: ProjectSource,
    R: TrackerRepository,
    C: Clock + Send + Sync,
{
    /// Creates a scheduler around the given poll service.
    #[must_use]
    pub fn new(service: PollService<S, R, C>, clock: Arc<C>) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                service,
                clock,
                running: AtomicBool::new(false),
                last: RwLock::new(LastRun::default()),
            }),
        }
    }

    /// Requests a poll cycle.
    ///
    /// If no cycle is in progress, runs one to completion and records its
    /// outcome. If a cycle is already running, the trigger is dropped with
    /// a logged skip and no state changes. Failures are caught here and
    /// never propagate; the scheduler stays ready for the next trigger.
    pub async fn trigger(&self) -> TriggerOutcome {
        if self
            .inner
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("poll cycle already in progress, skipping trigger");
            return TriggerOutcome::Skipped;
        }

        tracing::info!("poll cycle started");
        let result = self.inner.service.run_cycle().await;
        let finished_at = self.inner.clock.utc();

        let outcome = match result {
            Ok(report) => {
                tracing::info!(
                    tasks = report.task_count,
                    open = report.statistics.open,
                    overdue = report.statistics.overdue,
                    "poll cycle completed"
                );
                TriggerOutcome::Completed(report)
            }
            Err(err) => {
                tracing::error!(error = %err, "poll cycle failed");
                TriggerOutcome::Failed(err.to_string())
            }
        };

        {
            let mut last = self.inner.last.write().await;
            last.at = Some(finished_at);
            match &outcome {
                TriggerOutcome::Completed(_) => {
                    last.outcome = Some(RunOutcome::Success);
                    last.error = None;
                }
                TriggerOutcome::Failed(message) => {
                    last.outcome = Some(RunOutcome::Error);
                    last.error = Some(message.clone());
                }
                TriggerOutcome::Skipped => {}
            }
        }
        self.inner.running.store(false, Ordering::Release);

        outcome
    }

    /// Returns the current scheduler status.
    pub async fn status(&self) -> SchedulerStatus {
        let last = self.inner.last.read().await;
        SchedulerStatus {
            running: self.inner.running.load(Ordering::Acquire),
            last_run_at: last.at,
            last_outcome: last.outcome,
            last_error: last.error.clone(),
        }
    }
}
