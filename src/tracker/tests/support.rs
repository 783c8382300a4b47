//! Shared fixtures for tracker tests.

use crate::tracker::domain::{Task, TaskData, TaskKey, TaskKind, TaskState};
use chrono::{DateTime, Local, NaiveDate, TimeDelta, TimeZone, Utc};
use mockable::Clock;

/// Fixed reference instant used across tests: 2025-03-15 12:00:00 UTC.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0)
        .single()
        .expect("valid fixed timestamp")
}

/// Clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Clock pinned to [`fixed_now`].
pub fn fixed_clock() -> FixedClock {
    FixedClock(fixed_now())
}

/// The calendar date services derive from [`fixed_clock`].
pub fn fixed_today() -> NaiveDate {
    fixed_clock().local().date_naive()
}

/// Builder for task fixtures with sensible defaults: an open issue created
/// five days before the fixed reference instant, no status, no due date,
/// no assignees.
#[derive(Debug, Clone)]
pub struct TestTask {
    repository: String,
    number: u64,
    title: String,
    kind: TaskKind,
    state: TaskState,
    status: Option<String>,
    assignees: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    due_on: Option<NaiveDate>,
    added_at: DateTime<Utc>,
}

impl TestTask {
    pub fn new(repository: &str, number: u64) -> Self {
        let created = fixed_now() - TimeDelta::days(5);
        Self {
            repository: repository.to_owned(),
            number,
            title: format!("Task {number}"),
            kind: TaskKind::Issue,
            state: TaskState::Open,
            status: None,
            assignees: Vec::new(),
            created_at: created,
            updated_at: created,
            due_on: None,
            added_at: created,
        }
    }

    pub fn state(mut self, state: TaskState) -> Self {
        self.state = state;
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.status = Some(status.to_owned());
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    pub fn assignees(mut self, assignees: &[&str]) -> Self {
        self.assignees = assignees.iter().map(|login| (*login).to_owned()).collect();
        self
    }

    pub fn created_days_ago(mut self, days: i64) -> Self {
        self.created_at = fixed_now() - TimeDelta::days(days);
        self.added_at = self.created_at;
        self
    }

    pub fn updated_days_ago(mut self, days: i64) -> Self {
        self.updated_at = fixed_now() - TimeDelta::days(days);
        self
    }

    pub fn due_days_ago(mut self, days: i64) -> Self {
        self.due_on = Some(fixed_today() - TimeDelta::days(days));
        self
    }

    pub fn due_on(mut self, due: NaiveDate) -> Self {
        self.due_on = Some(due);
        self
    }

    pub fn build(self) -> Task {
        let key = TaskKey::from_parts(&self.repository, self.number).expect("valid task key");
        Task::from_data(TaskData {
            key,
            title: self.title,
            kind: self.kind,
            state: self.state,
            status: self.status,
            assignees: self.assignees,
            created_at: self.created_at,
            updated_at: self.updated_at,
            due_on: self.due_on,
            added_at: self.added_at,
        })
    }
}
