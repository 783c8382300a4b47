//! `PostgreSQL` repository implementation for tracker storage.

use super::{
    models::{
        AssignmentRow, DailyStatisticRow, NewAssignmentRow, NewSnapshotRow, TaskRow,
        row_to_assignment, row_to_statistics, row_to_task, to_new_statistic_row, to_new_task_row,
    },
    schema::{assignments, daily_statistics, snapshots, tasks},
};
use crate::tracker::{
    domain::{
        Assignment, DailyStatisticsRow, SnapshotEntry, Task, TaskKey, assignment_delta,
    },
    ports::{TaskFilter, TrackerRepository, TrackerRepositoryError, TrackerRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use std::collections::HashMap;

/// `PostgreSQL` connection pool type used by tracker adapters.
pub type TrackerPgPool = Pool<ConnectionManager<PgConnection>>;

impl From<diesel::result::Error> for TrackerRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed tracker repository.
#[derive(Debug, Clone)]
pub struct PostgresTrackerRepository {
    pool: TrackerPgPool,
}

impl PostgresTrackerRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TrackerPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TrackerRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TrackerRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TrackerRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TrackerRepositoryError::persistence)?
    }
}

#[async_trait]
impl TrackerRepository for PostgresTrackerRepository {
    async fn upsert_tasks(
        &self,
        tasks_batch: &[Task],
        synced_at: DateTime<Utc>,
    ) -> TrackerRepositoryResult<()> {
        let rows = tasks_batch
            .iter()
            .map(|task| to_new_task_row(task, synced_at))
            .collect::<TrackerRepositoryResult<Vec<_>>>()?;

        self.run_blocking(move |connection| {
            connection.transaction::<_, TrackerRepositoryError, _>(|tx| {
                for row in &rows {
                    diesel::insert_into(tasks::table)
                        .values(row)
                        .on_conflict((tasks::repository, tasks::number))
                        .do_update()
                        .set((
                            tasks::title.eq(&row.title),
                            tasks::state.eq(&row.state),
                            tasks::status.eq(row.status.clone()),
                            tasks::due_on.eq(row.due_on),
                            tasks::updated_at.eq(row.updated_at),
                            tasks::last_synced_at.eq(row.last_synced_at),
                        ))
                        .execute(tx)?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn sync_assignments(
        &self,
        key: &TaskKey,
        reported: &[String],
        now: DateTime<Utc>,
    ) -> TrackerRepositoryResult<()> {
        let lookup_key = key.clone();
        let reported_set = reported.to_vec();

        self.run_blocking(move |connection| {
            connection.transaction::<_, TrackerRepositoryError, _>(|tx| {
                let task_id = find_task_id(tx, &lookup_key)?
                    .ok_or_else(|| TrackerRepositoryError::TaskNotFound(lookup_key.clone()))?;

                let open_rows: Vec<AssignmentRow> = assignments::table
                    .filter(assignments::task_id.eq(task_id))
                    .filter(assignments::unassigned_at.is_null())
                    .select(AssignmentRow::as_select())
                    .load(tx)?;
                let open: Vec<String> = open_rows
                    .into_iter()
                    .map(|row| row.assignee)
                    .collect();

                let delta = assignment_delta(&open, &reported_set);
                if !delta.to_close.is_empty() {
                    diesel::update(
                        assignments::table
                            .filter(assignments::task_id.eq(task_id))
                            .filter(assignments::unassigned_at.is_null())
                            .filter(assignments::assignee.eq_any(&delta.to_close)),
                    )
                    .set(assignments::unassigned_at.eq(Some(now)))
                    .execute(tx)?;
                }
                for assignee in delta.to_open {
                    diesel::insert_into(assignments::table)
                        .values(NewAssignmentRow {
                            id: uuid::Uuid::new_v4(),
                            task_id,
                            assignee,
                            assigned_at: now,
                            unassigned_at: None,
                        })
                        .execute(tx)?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn write_snapshots(
        &self,
        day: NaiveDate,
        entries: &[SnapshotEntry],
    ) -> TrackerRepositoryResult<()> {
        let snapshot_entries = entries.to_vec();

        self.run_blocking(move |connection| {
            connection.transaction::<_, TrackerRepositoryError, _>(|tx| {
                for entry in &snapshot_entries {
                    let task_id = find_task_id(tx, &entry.key)?
                        .ok_or_else(|| TrackerRepositoryError::TaskNotFound(entry.key.clone()))?;
                    diesel::insert_into(snapshots::table)
                        .values(NewSnapshotRow {
                            id: uuid::Uuid::new_v4(),
                            task_id,
                            snapshot_date: day,
                            state: entry.state.as_str().to_owned(),
                            status: entry.status.clone(),
                            overdue: entry.overdue,
                        })
                        .on_conflict((snapshots::task_id, snapshots::snapshot_date))
                        .do_nothing()
                        .execute(tx)?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn upsert_daily_statistics(
        &self,
        row: &DailyStatisticsRow,
    ) -> TrackerRepositoryResult<()> {
        let new_row = to_new_statistic_row(row)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(daily_statistics::table)
                .values(&new_row)
                .on_conflict(daily_statistics::stat_date)
                .do_update()
                .set((
                    daily_statistics::total.eq(new_row.total),
                    daily_statistics::open.eq(new_row.open),
                    daily_statistics::closed.eq(new_row.closed),
                    daily_statistics::overdue.eq(new_row.overdue),
                ))
                .execute(connection)?;
            Ok(())
        })
        .await
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> TrackerRepositoryResult<Vec<Task>> {
        let list_filter = filter.clone();

        self.run_blocking(move |connection| {
            let mut query = tasks::table.select(TaskRow::as_select()).into_boxed();
            if let Some(state) = list_filter.state() {
                query = query.filter(tasks::state.eq(state.as_str()));
            }
            if let Some(repository) = list_filter.repository() {
                query = query.filter(tasks::repository.eq(repository.as_str().to_owned()));
            }

            let rows: Vec<TaskRow> = query
                .order((tasks::repository.asc(), tasks::number.asc()))
                .load(connection)?;

            let ids: Vec<uuid::Uuid> = rows.iter().map(|row| row.id).collect();
            let open_rows: Vec<AssignmentRow> = assignments::table
                .filter(assignments::task_id.eq_any(&ids))
                .filter(assignments::unassigned_at.is_null())
                .order(assignments::assigned_at.asc())
                .select(AssignmentRow::as_select())
                .load(connection)?;

            let mut assignees_by_task: HashMap<uuid::Uuid, Vec<String>> = HashMap::new();
            for open_row in open_rows {
                assignees_by_task
                    .entry(open_row.task_id)
                    .or_default()
                    .push(open_row.assignee);
            }

            let mut result = Vec::with_capacity(rows.len());
            for row in rows {
                let assignees = assignees_by_task.remove(&row.id).unwrap_or_default();
                if let Some(login) = list_filter.assignee() {
                    if !assignees.iter().any(|assignee| assignee == login) {
                        continue;
                    }
                }
                result.push(row_to_task(row, assignees)?);
            }
            Ok(result)
        })
        .await
    }

    async fn assignments(&self, key: &TaskKey) -> TrackerRepositoryResult<Vec<Assignment>> {
        let lookup_key = key.clone();

        self.run_blocking(move |connection| {
            let Some(task_id) = find_task_id(connection, &lookup_key)? else {
                return Ok(Vec::new());
            };
            let rows: Vec<AssignmentRow> = assignments::table
                .filter(assignments::task_id.eq(task_id))
                .order(assignments::assigned_at.asc())
                .select(AssignmentRow::as_select())
                .load(connection)?;
            Ok(rows.into_iter().map(row_to_assignment).collect())
        })
        .await
    }

    async fn daily_statistics_since(
        &self,
        from: NaiveDate,
    ) -> TrackerRepositoryResult<Vec<DailyStatisticsRow>> {
        self.run_blocking(move |connection| {
            let rows: Vec<DailyStatisticRow> = daily_statistics::table
                .filter(daily_statistics::stat_date.ge(from))
                .order(daily_statistics::stat_date.asc())
                .select(DailyStatisticRow::as_select())
                .load(connection)?;
            rows.into_iter().map(row_to_statistics).collect()
        })
        .await
    }

    async fn has_daily_statistics(&self) -> TrackerRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let count: i64 = daily_statistics::table.count().get_result(connection)?;
            Ok(count > 0)
        })
        .await
    }
}

/// Looks up the internal identifier for a task key.
fn find_task_id(
    connection: &mut PgConnection,
    key: &TaskKey,
) -> TrackerRepositoryResult<Option<uuid::Uuid>> {
    let number =
        i64::try_from(key.number().value()).map_err(TrackerRepositoryError::persistence)?;
    tasks::table
        .filter(tasks::repository.eq(key.repository().as_str()))
        .filter(tasks::number.eq(number))
        .select(tasks::id)
        .first::<uuid::Uuid>(connection)
        .optional()
        .map_err(TrackerRepositoryError::persistence)
}
