//! Diesel row models for tracker persistence.

use super::schema::{assignments, daily_statistics, snapshots, tasks};
use crate::tracker::domain::{
    Assignment, DailyStatisticsRow, Task, TaskData, TaskKey, TaskKind, TaskState,
};
use crate::tracker::ports::{TrackerRepositoryError, TrackerRepositoryResult};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Repository in `owner/repo` format.
    pub repository: String,
    /// Issue or pull-request number.
    pub number: i64,
    /// Task title.
    pub title: String,
    /// Content kind.
    pub kind: String,
    /// Lifecycle state.
    pub state: String,
    /// Project status label.
    pub status: Option<String>,
    /// Due date.
    pub due_on: Option<NaiveDate>,
    /// Source creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Source last-updated timestamp.
    pub updated_at: DateTime<Utc>,
    /// Time the item was added to the board.
    pub added_at: DateTime<Utc>,
    /// Time of the poll cycle that last reported the task.
    pub last_synced_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Repository in `owner/repo` format.
    pub repository: String,
    /// Issue or pull-request number.
    pub number: i64,
    /// Task title.
    pub title: String,
    /// Content kind.
    pub kind: String,
    /// Lifecycle state.
    pub state: String,
    /// Project status label.
    pub status: Option<String>,
    /// Due date.
    pub due_on: Option<NaiveDate>,
    /// Source creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Source last-updated timestamp.
    pub updated_at: DateTime<Utc>,
    /// Time the item was added to the board.
    pub added_at: DateTime<Utc>,
    /// Time of the poll cycle that last reported the task.
    pub last_synced_at: DateTime<Utc>,
}

/// Query result row for assignment records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = assignments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AssignmentRow {
    /// Internal assignment identifier.
    pub id: uuid::Uuid,
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Assignee login.
    pub assignee: String,
    /// Interval open timestamp.
    pub assigned_at: DateTime<Utc>,
    /// Interval close timestamp.
    pub unassigned_at: Option<DateTime<Utc>>,
}

/// Insert model for assignment records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = assignments)]
pub struct NewAssignmentRow {
    /// Internal assignment identifier.
    pub id: uuid::Uuid,
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Assignee login.
    pub assignee: String,
    /// Interval open timestamp.
    pub assigned_at: DateTime<Utc>,
    /// Interval close timestamp.
    pub unassigned_at: Option<DateTime<Utc>>,
}

/// Insert model for snapshot records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = snapshots)]
pub struct NewSnapshotRow {
    /// Internal snapshot identifier.
    pub id: uuid::Uuid,
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Calendar date the snapshot describes.
    pub snapshot_date: NaiveDate,
    /// Lifecycle state at snapshot time.
    pub state: String,
    /// Project status label at snapshot time.
    pub status: Option<String>,
    /// Whether the task was overdue at snapshot time.
    pub overdue: bool,
}

/// Query result row for daily statistics.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = daily_statistics)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DailyStatisticRow {
    /// Internal row identifier.
    pub id: uuid::Uuid,
    /// Calendar date the counts describe.
    pub stat_date: NaiveDate,
    /// Total number of tasks.
    pub total: i32,
    /// Tasks in the open state.
    pub open: i32,
    /// Tasks in a terminal state.
    pub closed: i32,
    /// Open tasks whose due date had arrived.
    pub overdue: i32,
}

/// Insert model for daily statistics.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = daily_statistics)]
pub struct NewDailyStatisticRow {
    /// Internal row identifier.
    pub id: uuid::Uuid,
    /// Calendar date the counts describe.
    pub stat_date: NaiveDate,
    /// Total number of tasks.
    pub total: i32,
    /// Tasks in the open state.
    pub open: i32,
    /// Tasks in a terminal state.
    pub closed: i32,
    /// Open tasks whose due date had arrived.
    pub overdue: i32,
}

/// Builds an insert model from a domain task.
pub fn to_new_task_row(task: &Task, synced_at: DateTime<Utc>) -> TrackerRepositoryResult<NewTaskRow> {
    let number = i64::try_from(task.key().number().value())
        .map_err(TrackerRepositoryError::persistence)?;
    Ok(NewTaskRow {
        id: uuid::Uuid::new_v4(),
        repository: task.key().repository().as_str().to_owned(),
        number,
        title: task.title().to_owned(),
        kind: task.kind().as_str().to_owned(),
        state: task.state().as_str().to_owned(),
        status: task.status().map(ToOwned::to_owned),
        due_on: task.due_on(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
        added_at: task.added_at(),
        last_synced_at: synced_at,
    })
}

/// Reconstructs a domain task from a stored row and its open assignees.
pub fn row_to_task(row: TaskRow, assignees: Vec<String>) -> TrackerRepositoryResult<Task> {
    let number = u64::try_from(row.number).map_err(TrackerRepositoryError::persistence)?;
    let key =
        TaskKey::from_parts(&row.repository, number).map_err(TrackerRepositoryError::persistence)?;
    let kind =
        TaskKind::try_from(row.kind.as_str()).map_err(TrackerRepositoryError::persistence)?;
    let state =
        TaskState::try_from(row.state.as_str()).map_err(TrackerRepositoryError::persistence)?;

    Ok(Task::from_data(TaskData {
        key,
        title: row.title,
        kind,
        state,
        status: row.status,
        assignees,
        created_at: row.created_at,
        updated_at: row.updated_at,
        due_on: row.due_on,
        added_at: row.added_at,
    }))
}

/// Maps a stored assignment row to the domain value.
pub fn row_to_assignment(row: AssignmentRow) -> Assignment {
    Assignment {
        assignee: row.assignee,
        assigned_at: row.assigned_at,
        unassigned_at: row.unassigned_at,
    }
}

/// Builds an insert model from a domain statistics row.
pub fn to_new_statistic_row(
    row: &DailyStatisticsRow,
) -> TrackerRepositoryResult<NewDailyStatisticRow> {
    Ok(NewDailyStatisticRow {
        id: uuid::Uuid::new_v4(),
        stat_date: row.date,
        total: count_to_db(row.total)?,
        open: count_to_db(row.open)?,
        closed: count_to_db(row.closed)?,
        overdue: count_to_db(row.overdue)?,
    })
}

/// Maps a stored statistics row back to the domain value.
pub fn row_to_statistics(row: DailyStatisticRow) -> TrackerRepositoryResult<DailyStatisticsRow> {
    Ok(DailyStatisticsRow {
        date: row.stat_date,
        total: count_from_db(row.total)?,
        open: count_from_db(row.open)?,
        closed: count_from_db(row.closed)?,
        overdue: count_from_db(row.overdue)?,
    })
}

fn count_to_db(count: usize) -> TrackerRepositoryResult<i32> {
    i32::try_from(count).map_err(TrackerRepositoryError::persistence)
}

fn count_from_db(count: i32) -> TrackerRepositoryResult<usize> {
    usize::try_from(count).map_err(TrackerRepositoryError::persistence)
}
