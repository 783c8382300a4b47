//! Scheduler state-machine tests.

use std::sync::Arc;

use super::support::{fixed_clock, fixed_now};
use crate::tracker::{
    adapters::memory::InMemoryTrackerRepository,
    domain::{ProjectItem, ProjectRef},
    ports::{ProjectSource, SourceError, SourceResult, source::MockProjectSource},
    services::{PollScheduler, PollService, RunOutcome, TriggerOutcome},
};
use async_trait::async_trait;
use rstest::rstest;
use tokio::sync::Notify;

fn project() -> ProjectRef {
    ProjectRef::new("octo", 4).expect("valid project ref")
}

fn scheduler_with_source<S: ProjectSource + 'static>(
    source: S,
) -> PollScheduler<S, InMemoryTrackerRepository, super::support::FixedClock> {
    let clock = Arc::new(fixed_clock());
    let service = PollService::new(
        Arc::new(source),
        Arc::new(InMemoryTrackerRepository::new()),
        Arc::clone(&clock),
        project(),
    );
    PollScheduler::new(service, clock)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn successful_trigger_records_outcome_and_timestamp() {
    let mut source = MockProjectSource::new();
    source
        .expect_fetch_all_items()
        .returning(|_| Ok(Vec::new()));
    let scheduler = scheduler_with_source(source);

    let outcome = scheduler.trigger().await;
    assert!(matches!(outcome, TriggerOutcome::Completed(_)));

    let status = scheduler.status().await;
    assert!(!status.running);
    assert_eq!(status.last_run_at, Some(fixed_now()));
    assert_eq!(status.last_outcome, Some(RunOutcome::Success));
    assert_eq!(status.last_error, None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_cycle_is_caught_and_error_clears_on_next_success() {
    let mut source = MockProjectSource::new();
    let mut sequence = mockall::Sequence::new();
    source
        .expect_fetch_all_items()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_| Err(SourceError::Query("rate limited".to_owned())));
    source
        .expect_fetch_all_items()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_| Ok(Vec::new()));
    let scheduler = scheduler_with_source(source);

    let first = scheduler.trigger().await;
    assert!(matches!(first, TriggerOutcome::Failed(_)));

    let failed_status = scheduler.status().await;
    assert!(!failed_status.running);
    assert_eq!(failed_status.last_outcome, Some(RunOutcome::Error));
    let message = failed_status.last_error.expect("error message recorded");
    assert!(message.contains("rate limited"));

    let second = scheduler.trigger().await;
    assert!(matches!(second, TriggerOutcome::Completed(_)));

    let recovered_status = scheduler.status().await;
    assert_eq!(recovered_status.last_outcome, Some(RunOutcome::Success));
    assert_eq!(recovered_status.last_error, None);
}

/// Source that parks inside the fetch until released, so a cycle can be
/// held open while another trigger races it.
struct GatedSource {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl ProjectSource for GatedSource {
    async fn fetch_all_items(&self, _project: &ProjectRef) -> SourceResult<Vec<ProjectItem>> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(Vec::new())
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn trigger_during_running_cycle_is_skipped_without_side_effects() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let scheduler = scheduler_with_source(GatedSource {
        entered: Arc::clone(&entered),
        release: Arc::clone(&release),
    });

    let background = scheduler.clone();
    let first_cycle = tokio::spawn(async move { background.trigger().await });

    // Wait until the first cycle is parked inside its fetch.
    entered.notified().await;

    let second = scheduler.trigger().await;
    assert_eq!(second, TriggerOutcome::Skipped);

    let mid_status = scheduler.status().await;
    assert!(mid_status.running);
    assert_eq!(
        mid_status.last_run_at, None,
        "a skipped trigger must not touch the last-run bookkeeping"
    );

    release.notify_one();
    let first = first_cycle.await.expect("first cycle join");
    assert!(matches!(first, TriggerOutcome::Completed(_)));

    let final_status = scheduler.status().await;
    assert!(!final_status.running);
    assert_eq!(final_status.last_outcome, Some(RunOutcome::Success));
}
