//! Tests for the statistics engine.

use super::support::TestTask;
use crate::tracker::domain::{
    NO_STATUS_BUCKET, TaskState, UNASSIGNED_BUCKET, compute_statistics, count_by_assignee,
    count_by_repository, count_by_status, is_overdue, overdue_tasks,
};
use chrono::{NaiveDate, TimeDelta};
use rstest::{fixture, rstest};

#[fixture]
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 15).expect("valid date")
}

#[rstest]
fn task_due_today_is_already_overdue(today: NaiveDate) {
    let task = TestTask::new("octo/widgets", 1).due_on(today).build();
    assert!(is_overdue(&task, today));
}

#[rstest]
fn task_due_tomorrow_is_not_overdue(today: NaiveDate) {
    let task = TestTask::new("octo/widgets", 1)
        .due_on(today + TimeDelta::days(1))
        .build();
    assert!(!is_overdue(&task, today));
}

#[rstest]
#[case(TaskState::Closed)]
#[case(TaskState::Merged)]
fn terminal_tasks_are_never_overdue(today: NaiveDate, #[case] state: TaskState) {
    let task = TestTask::new("octo/widgets", 1)
        .state(state)
        .due_on(today - TimeDelta::days(30))
        .build();
    assert!(!is_overdue(&task, today));
}

#[rstest]
fn task_without_due_date_is_not_overdue(today: NaiveDate) {
    let task = TestTask::new("octo/widgets", 1).build();
    assert!(!is_overdue(&task, today));
}

#[rstest]
fn statistics_count_open_closed_and_overdue(today: NaiveDate) {
    let tasks = vec![
        TestTask::new("octo/widgets", 1).build(),
        TestTask::new("octo/widgets", 2)
            .due_on(today - TimeDelta::days(2))
            .build(),
        TestTask::new("octo/widgets", 3)
            .state(TaskState::Closed)
            .build(),
        TestTask::new("octo/widgets", 4)
            .state(TaskState::Merged)
            .due_on(today - TimeDelta::days(2))
            .build(),
    ];

    let statistics = compute_statistics(&tasks, today);
    assert_eq!(statistics.total, 4);
    assert_eq!(statistics.open, 2);
    assert_eq!(statistics.closed, 2);
    assert_eq!(statistics.overdue, 1);

    let overdue = overdue_tasks(&tasks, today);
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue.first().map(|task| task.key().number().value()), Some(2));
}

#[rstest]
fn assignee_counts_are_non_exclusive() {
    // Two assignees on one task and none on the other: both logins count
    // once each and the unassigned bucket picks up the rest, so the
    // per-assignee sum may exceed the task total.
    let tasks = vec![
        TestTask::new("octo/widgets", 1)
            .assignees(&["alice", "bob"])
            .build(),
        TestTask::new("octo/widgets", 2).build(),
    ];

    let counts = count_by_assignee(&tasks);
    assert_eq!(counts.get("alice"), Some(&1));
    assert_eq!(counts.get("bob"), Some(&1));
    assert_eq!(counts.get(UNASSIGNED_BUCKET), Some(&1));
    assert_eq!(counts.values().sum::<usize>(), 3);
}

#[rstest]
fn status_counts_reserve_a_no_status_bucket() {
    let tasks = vec![
        TestTask::new("octo/widgets", 1).status("In progress").build(),
        TestTask::new("octo/widgets", 2).status("In progress").build(),
        TestTask::new("octo/widgets", 3).build(),
    ];

    let counts = count_by_status(&tasks);
    assert_eq!(counts.get("In progress"), Some(&2));
    assert_eq!(counts.get(NO_STATUS_BUCKET), Some(&1));
}

#[rstest]
fn repository_counts_group_by_full_name() {
    let tasks = vec![
        TestTask::new("octo/widgets", 1).build(),
        TestTask::new("octo/widgets", 2).build(),
        TestTask::new("octo/gears", 7).build(),
    ];

    let counts = count_by_repository(&tasks);
    assert_eq!(counts.get("octo/widgets"), Some(&2));
    assert_eq!(counts.get("octo/gears"), Some(&1));
}
