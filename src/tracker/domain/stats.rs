//! Point-in-time statistics over task collections.
//!
//! Every function here is pure and deterministic given an explicit `today`;
//! callers inject the current calendar date rather than relying on a global
//! clock.

use super::{Task, TaskState};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reserved grouping key for tasks without assignees.
pub const UNASSIGNED_BUCKET: &str = "unassigned";

/// Reserved grouping key for tasks without a project status label.
pub const NO_STATUS_BUCKET: &str = "no-status";

/// Aggregate counts over a task collection at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatistics {
    /// Total number of tasks.
    pub total: usize,
    /// Tasks in the open state.
    pub open: usize,
    /// Tasks in a terminal state (closed or merged).
    pub closed: usize,
    /// Open tasks whose due date has arrived.
    pub overdue: usize,
}

/// Tests whether a task counts as overdue on the given calendar day.
///
/// A task is overdue iff it has a due date, it is still open, and the due
/// date is on or before `today`. The boundary is deliberately inclusive: a
/// task due today is already overdue. Closed and merged tasks are never
/// overdue regardless of due date.
#[must_use]
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    if task.state() != TaskState::Open {
        return false;
    }
    task.due_on().is_some_and(|due| due <= today)
}

/// Computes aggregate counts over the task collection.
#[must_use]
pub fn compute_statistics(tasks: &[Task], today: NaiveDate) -> TaskStatistics {
    TaskStatistics {
        total: tasks.len(),
        open: tasks
            .iter()
            .filter(|task| task.state() == TaskState::Open)
            .count(),
        closed: tasks
            .iter()
            .filter(|task| task.state().is_terminal())
            .count(),
        overdue: tasks
            .iter()
            .filter(|task| is_overdue(task, today))
            .count(),
    }
}

/// Returns the overdue tasks in collection order.
#[must_use]
pub fn overdue_tasks<'a>(tasks: &'a [Task], today: NaiveDate) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| is_overdue(task, today))
        .collect()
}

/// Counts tasks per repository.
#[must_use]
pub fn count_by_repository(tasks: &[Task]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for task in tasks {
        *counts
            .entry(task.key().repository().as_str().to_owned())
            .or_insert(0) += 1;
    }
    counts
}

/// Counts tasks per assignee.
///
/// A task with several assignees counts once under each of them, so the
/// per-assignee counts may sum to more than the task total. Tasks without
/// assignees land in the [`UNASSIGNED_BUCKET`].
#[must_use]
pub fn count_by_assignee(tasks: &[Task]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for task in tasks {
        if task.assignees().is_empty() {
            *counts.entry(UNASSIGNED_BUCKET.to_owned()).or_insert(0) += 1;
            continue;
        }
        for assignee in task.assignees() {
            *counts.entry(assignee.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Counts tasks per project status label.
///
/// Tasks without a status land in the [`NO_STATUS_BUCKET`].
#[must_use]
pub fn count_by_status(tasks: &[Task]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for task in tasks {
        let bucket = task
            .status()
            .map_or_else(|| NO_STATUS_BUCKET.to_owned(), ToOwned::to_owned);
        *counts.entry(bucket).or_insert(0) += 1;
    }
    counts
}
