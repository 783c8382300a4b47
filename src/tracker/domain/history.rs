//! Synthetic reconstruction of daily statistics from task timestamps.
//!
//! When no historical daily statistics exist, a retroactive series is
//! derived from the creation and last-update timestamps of the current task
//! set. The reconstruction is an acknowledged approximation: a task closed
//! after day `d` is treated as still open on `d`, even if it was briefly
//! closed and reopened in between.

use super::Task;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// One day's aggregate counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStatisticsRow {
    /// Calendar date the counts describe.
    pub date: NaiveDate,
    /// Tasks that existed on the date.
    pub total: usize,
    /// Tasks considered open on the date.
    pub open: usize,
    /// Tasks considered closed on the date.
    pub closed: usize,
    /// Tasks considered overdue on the date.
    pub overdue: usize,
}

/// Derives a day-by-day statistics series ending today.
///
/// Produces one row per day from `window_days` days ago through `today`
/// inclusive, oldest first. Deterministic given a fixed task set and a
/// fixed `today`.
#[must_use]
pub fn synthesize_daily_series(
    tasks: &[Task],
    today: NaiveDate,
    window_days: u32,
) -> Vec<DailyStatisticsRow> {
    let start = today
        .checked_sub_days(Days::new(u64::from(window_days)))
        .unwrap_or(today);

    let mut series = Vec::new();
    let mut day = start;
    while day <= today {
        series.push(day_row(tasks, day));
        let Some(next) = day.succ_opt() else {
            break;
        };
        day = next;
    }
    series
}

/// Computes the synthetic counts for one day.
fn day_row(tasks: &[Task], day: NaiveDate) -> DailyStatisticsRow {
    let existing: Vec<&Task> = tasks
        .iter()
        .filter(|task| task.created_at().date_naive() <= day)
        .collect();

    let closed = existing
        .iter()
        .filter(|task| was_closed_by(task, day))
        .count();
    let total = existing.len();

    let overdue = existing
        .iter()
        .filter(|task| {
            task.due_on().is_some_and(|due| due <= day) && !was_closed_by(task, day)
        })
        .count();

    DailyStatisticsRow {
        date: day,
        total,
        open: total - closed,
        closed,
        overdue,
    }
}

/// Whether a task counts as closed at the end of the given day.
///
/// True when its current state is terminal and its last update happened on
/// or before the day; a terminal task updated later is treated as still
/// open on the day.
fn was_closed_by(task: &Task, day: NaiveDate) -> bool {
    task.state().is_terminal() && task.updated_at().date_naive() <= day
}
