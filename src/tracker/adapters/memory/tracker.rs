//! In-memory repository for tracker tests.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::tracker::domain::{
    Assignment, DailyStatisticsRow, SnapshotEntry, Task, TaskData, TaskKey, assignment_delta,
};
use crate::tracker::ports::{
    TaskFilter, TrackerRepository, TrackerRepositoryError, TrackerRepositoryResult,
};

/// Thread-safe in-memory tracker repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTrackerRepository {
    state: Arc<RwLock<InMemoryTrackerState>>,
}

#[derive(Debug, Default)]
struct InMemoryTrackerState {
    tasks: BTreeMap<TaskKey, StoredTask>,
    assignments: BTreeMap<TaskKey, Vec<Assignment>>,
    snapshots: BTreeMap<(TaskKey, NaiveDate), SnapshotEntry>,
    daily: BTreeMap<NaiveDate, DailyStatisticsRow>,
}

#[derive(Debug, Clone)]
struct StoredTask {
    task: Task,
    last_synced_at: DateTime<Utc>,
}

impl InMemoryTrackerRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored task rows.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::Persistence`] when the state lock
    /// is poisoned.
    pub fn task_count(&self) -> TrackerRepositoryResult<usize> {
        Ok(read_state(&self.state)?.tasks.len())
    }

    /// Returns the number of stored snapshot rows.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::Persistence`] when the state lock
    /// is poisoned.
    pub fn snapshot_count(&self) -> TrackerRepositoryResult<usize> {
        Ok(read_state(&self.state)?.snapshots.len())
    }

    /// Returns the last-synced stamp recorded for a task, if stored.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerRepositoryError::Persistence`] when the state lock
    /// is poisoned.
    pub fn last_synced_at(&self, key: &TaskKey) -> TrackerRepositoryResult<Option<DateTime<Utc>>> {
        Ok(read_state(&self.state)?
            .tasks
            .get(key)
            .map(|stored| stored.last_synced_at))
    }
}

type LockedState<'a> = std::sync::RwLockReadGuard<'a, InMemoryTrackerState>;
type LockedStateMut<'a> = std::sync::RwLockWriteGuard<'a, InMemoryTrackerState>;

fn read_state(
    state: &Arc<RwLock<InMemoryTrackerState>>,
) -> TrackerRepositoryResult<LockedState<'_>> {
    state
        .read()
        .map_err(|err| TrackerRepositoryError::persistence(std::io::Error::other(err.to_string())))
}

fn write_state(
    state: &Arc<RwLock<InMemoryTrackerState>>,
) -> TrackerRepositoryResult<LockedStateMut<'_>> {
    state
        .write()
        .map_err(|err| TrackerRepositoryError::persistence(std::io::Error::other(err.to_string())))
}

/// Applies an upsert, keeping identity and creation fields of an existing
/// row immutable.
fn upsert_stored(stored: &mut StoredTask, incoming: &Task, synced_at: DateTime<Utc>) {
    let existing = &stored.task;
    let merged = Task::from_data(TaskData {
        key: existing.key().clone(),
        title: incoming.title().to_owned(),
        kind: existing.kind(),
        state: incoming.state(),
        status: incoming.status().map(ToOwned::to_owned),
        assignees: incoming.assignees().to_vec(),
        created_at: existing.created_at(),
        updated_at: incoming.updated_at(),
        due_on: incoming.due_on(),
        added_at: existing.added_at(),
    });
    stored.task = merged;
    stored.last_synced_at = synced_at;
}

/// Rebuilds a task's assignee list from its open assignment intervals.
fn with_open_assignees(state: &InMemoryTrackerState, stored: &StoredTask) -> Task {
    let task = &stored.task;
    let assignees: Vec<String> = state
        .assignments
        .get(task.key())
        .map(|intervals| {
            intervals
                .iter()
                .filter(|assignment| assignment.is_open())
                .map(|assignment| assignment.assignee.clone())
                .collect()
        })
        .unwrap_or_default();

    Task::from_data(TaskData {
        key: task.key().clone(),
        title: task.title().to_owned(),
        kind: task.kind(),
        state: task.state(),
        status: task.status().map(ToOwned::to_owned),
        assignees,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
        due_on: task.due_on(),
        added_at: task.added_at(),
    })
}

fn matches_filter(state: &InMemoryTrackerState, task: &Task, filter: &TaskFilter) -> bool {
    if filter.state().is_some_and(|wanted| task.state() != wanted) {
        return false;
    }
    if filter
        .repository()
        .is_some_and(|wanted| task.key().repository() != wanted)
    {
        return false;
    }
    if let Some(login) = filter.assignee() {
        let has_open = state
            .assignments
            .get(task.key())
            .is_some_and(|intervals| {
                intervals
                    .iter()
                    .any(|assignment| assignment.is_open() && assignment.assignee == login)
            });
        if !has_open {
            return false;
        }
    }
    true
}

#[async_trait]
impl TrackerRepository for InMemoryTrackerRepository {
    async fn upsert_tasks(
        &self,
        tasks: &[Task],
        synced_at: DateTime<Utc>,
    ) -> TrackerRepositoryResult<()> {
        let mut state = write_state(&self.state)?;
        for task in tasks {
            state
                .tasks
                .entry(task.key().clone())
                .and_modify(|stored| upsert_stored(stored, task, synced_at))
                .or_insert_with(|| StoredTask {
                    task: task.clone(),
                    last_synced_at: synced_at,
                });
        }
        Ok(())
    }

    async fn sync_assignments(
        &self,
        key: &TaskKey,
        reported: &[String],
        now: DateTime<Utc>,
    ) -> TrackerRepositoryResult<()> {
        let mut state = write_state(&self.state)?;
        if !state.tasks.contains_key(key) {
            return Err(TrackerRepositoryError::TaskNotFound(key.clone()));
        }

        let intervals = state.assignments.entry(key.clone()).or_default();
        let open: Vec<String> = intervals
            .iter()
            .filter(|assignment| assignment.is_open())
            .map(|assignment| assignment.assignee.clone())
            .collect();
        let delta = assignment_delta(&open, reported);

        for assignment in intervals.iter_mut() {
            if assignment.is_open() && delta.to_close.contains(&assignment.assignee) {
                assignment.unassigned_at = Some(now);
            }
        }
        for assignee in delta.to_open {
            intervals.push(Assignment {
                assignee,
                assigned_at: now,
                unassigned_at: None,
            });
        }
        Ok(())
    }

    async fn write_snapshots(
        &self,
        day: NaiveDate,
        entries: &[SnapshotEntry],
    ) -> TrackerRepositoryResult<()> {
        let mut state = write_state(&self.state)?;
        for entry in entries {
            state
                .snapshots
                .entry((entry.key.clone(), day))
                .or_insert_with(|| entry.clone());
        }
        Ok(())
    }

    async fn upsert_daily_statistics(
        &self,
        row: &DailyStatisticsRow,
    ) -> TrackerRepositoryResult<()> {
        let mut state = write_state(&self.state)?;
        state.daily.insert(row.date, *row);
        Ok(())
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> TrackerRepositoryResult<Vec<Task>> {
        let state = read_state(&self.state)?;
        Ok(state
            .tasks
            .values()
            .map(|stored| with_open_assignees(&state, stored))
            .filter(|task| matches_filter(&state, task, filter))
            .collect())
    }

    async fn assignments(&self, key: &TaskKey) -> TrackerRepositoryResult<Vec<Assignment>> {
        let state = read_state(&self.state)?;
        Ok(state.assignments.get(key).cloned().unwrap_or_default())
    }

    async fn daily_statistics_since(
        &self,
        from: NaiveDate,
    ) -> TrackerRepositoryResult<Vec<DailyStatisticsRow>> {
        let state = read_state(&self.state)?;
        Ok(state.daily.range(from..).map(|(_, row)| *row).collect())
    }

    async fn has_daily_statistics(&self) -> TrackerRepositoryResult<bool> {
        let state = read_state(&self.state)?;
        Ok(!state.daily.is_empty())
    }
}
