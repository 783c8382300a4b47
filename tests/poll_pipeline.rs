//! End-to-end pipeline test: poll, reconcile, snapshot, backfill, query.

use std::sync::Arc;

use async_trait::async_trait;
use boardwatch::tracker::{
    adapters::memory::InMemoryTrackerRepository,
    domain::{
        ContentDetails, ContentState, FieldData, FieldValue, ProjectItem, ProjectItemContent,
        ProjectRef,
    },
    ports::{ProjectSource, SourceResult, TrackerRepository},
    services::{
        BackfillService, PollScheduler, PollService, RunOutcome, TrackerQueryService,
        TriggerOutcome,
    },
};
use chrono::{DateTime, Local, NaiveDate, TimeDelta, TimeZone, Utc};
use mockable::Clock;

/// Clock pinned to 2025-03-15 12:00:00 UTC.
#[derive(Debug, Clone, Copy)]
struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0)
        .single()
        .expect("valid fixed timestamp")
}

/// Source handing out a fixed board.
struct FixtureSource {
    items: Vec<ProjectItem>,
}

#[async_trait]
impl ProjectSource for FixtureSource {
    async fn fetch_all_items(&self, _project: &ProjectRef) -> SourceResult<Vec<ProjectItem>> {
        Ok(self.items.clone())
    }
}

fn content(
    number: u64,
    state: ContentState,
    created_days_ago: i64,
    updated_days_ago: i64,
    assignees: &[&str],
) -> ContentDetails {
    ContentDetails {
        repository: "octo/widgets".to_owned(),
        number,
        title: format!("Item {number}"),
        state,
        assignees: assignees.iter().map(|login| (*login).to_owned()).collect(),
        created_at: fixed_now() - TimeDelta::days(created_days_ago),
        updated_at: fixed_now() - TimeDelta::days(updated_days_ago),
    }
}

fn due_field(due: NaiveDate) -> FieldValue {
    FieldValue {
        name: "Target Date".to_owned(),
        data: FieldData::Date(due),
    }
}

fn board(today: NaiveDate) -> Vec<ProjectItem> {
    vec![
        // Long-lived open issue, two days overdue.
        ProjectItem {
            added_at: fixed_now() - TimeDelta::days(12),
            content: Some(ProjectItemContent::Issue(content(
                1,
                ContentState::Open,
                12,
                12,
                &["alice"],
            ))),
            fields: vec![due_field(today - TimeDelta::days(2))],
        },
        // Pull request merged yesterday.
        ProjectItem {
            added_at: fixed_now() - TimeDelta::days(12),
            content: Some(ProjectItemContent::PullRequest(content(
                2,
                ContentState::Merged,
                12,
                1,
                &[],
            ))),
            fields: Vec::new(),
        },
        // Fresh issue due tomorrow; not overdue yet.
        ProjectItem {
            added_at: fixed_now() - TimeDelta::days(4),
            content: Some(ProjectItemContent::Issue(content(
                3,
                ContentState::Open,
                4,
                4,
                &["alice", "bob"],
            ))),
            fields: vec![due_field(today + TimeDelta::days(1))],
        },
        // Draft note; never becomes a task.
        ProjectItem {
            added_at: fixed_now(),
            content: Some(ProjectItemContent::Draft),
            fields: Vec::new(),
        },
    ]
}

#[tokio::test(flavor = "multi_thread")]
async fn full_pipeline_from_poll_to_backfilled_history() {
    let clock = Arc::new(FixedClock(fixed_now()));
    let today = clock.local().date_naive();

    let repository = Arc::new(InMemoryTrackerRepository::new());
    let source = Arc::new(FixtureSource {
        items: board(today),
    });
    let project = ProjectRef::new("octo", 4).expect("valid project ref");

    let service = PollService::new(
        source,
        Arc::clone(&repository),
        Arc::clone(&clock),
        project,
    );
    let scheduler = PollScheduler::new(service, Arc::clone(&clock));
    let backfill = BackfillService::new(Arc::clone(&repository), Arc::clone(&clock));
    let queries = TrackerQueryService::new(Arc::clone(&repository), Arc::clone(&clock));

    // Fresh deployment: no history yet.
    assert!(
        !repository
            .has_daily_statistics()
            .await
            .expect("history check")
    );

    let report = match scheduler.trigger().await {
        TriggerOutcome::Completed(report) => report,
        other => panic!("cycle should complete, got {other:?}"),
    };
    assert_eq!(report.item_count, 4);
    assert_eq!(report.task_count, 3);
    assert_eq!(report.statistics.open, 2);
    assert_eq!(report.statistics.closed, 1);
    assert_eq!(report.statistics.overdue, 1);

    let status = scheduler.status().await;
    assert_eq!(status.last_outcome, Some(RunOutcome::Success));
    assert_eq!(status.last_error, None);

    // Current reads match the cycle's aggregates.
    let statistics = queries.current_statistics().await.expect("statistics");
    assert_eq!(statistics.total, 3);
    assert_eq!(statistics.overdue, 1);

    let overdue = queries.overdue().await.expect("overdue listing");
    assert_eq!(overdue.len(), 1);
    assert_eq!(
        overdue.first().map(|task| task.key().to_string()),
        Some("octo/widgets#1".to_owned())
    );

    // Reconstruct the missing history from the just-synced tasks.
    let written = backfill.backfill(10).await.expect("backfill");
    assert_eq!(written, 11);

    let history = queries.history(10).await.expect("history");
    assert_eq!(history.len(), 11);

    let oldest = history.first().expect("oldest row");
    assert_eq!(oldest.date, today - TimeDelta::days(10));
    assert_eq!(oldest.total, 2, "fresh issue does not exist ten days back");
    assert_eq!(oldest.closed, 0, "merge only counts after its update day");
    assert_eq!(oldest.overdue, 0);

    // The overdue issue shows up on every day from its due date onward.
    for row in &history {
        let expected = usize::from(row.date >= today - TimeDelta::days(2));
        assert_eq!(row.overdue, expected, "overdue mismatch on {}", row.date);
    }

    let newest = history.last().expect("newest row");
    assert_eq!(newest.date, today);
    assert_eq!(newest.total, 3);
    assert_eq!(newest.open, 2);
    assert_eq!(newest.closed, 1);

    // Backfill reruns are idempotent day by day.
    backfill.backfill(10).await.expect("second backfill");
    let history_again = queries.history(10).await.expect("history");
    assert_eq!(history, history_again);
}
