//! Diesel schema for tracker persistence.

diesel::table! {
    /// Task records keyed by stable external identity.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Repository in `owner/repo` format; unique with `number`.
        #[max_length = 255]
        repository -> Varchar,
        /// Issue or pull-request number; unique with `repository`.
        number -> Int8,
        /// Task title.
        title -> Text,
        /// Content kind (`issue` or `pull_request`).
        #[max_length = 50]
        kind -> Varchar,
        /// Lifecycle state (`open`, `closed`, or `merged`).
        #[max_length = 50]
        state -> Varchar,
        /// Project status label.
        #[max_length = 255]
        status -> Nullable<Varchar>,
        /// Due date from the board's date field.
        due_on -> Nullable<Date>,
        /// Source creation timestamp; immutable once set.
        created_at -> Timestamptz,
        /// Source last-updated timestamp.
        updated_at -> Timestamptz,
        /// Time the item was added to the board; immutable once set.
        added_at -> Timestamptz,
        /// Time of the poll cycle that last reported the task.
        last_synced_at -> Timestamptz,
    }
}

diesel::table! {
    /// Assignment intervals relating tasks to assignees.
    assignments (id) {
        /// Internal assignment identifier.
        id -> Uuid,
        /// Owning task.
        task_id -> Uuid,
        /// Assignee login.
        #[max_length = 255]
        assignee -> Varchar,
        /// Interval open timestamp.
        assigned_at -> Timestamptz,
        /// Interval close timestamp; null while the assignment is open.
        unassigned_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Immutable per-day task snapshots, one per task per date.
    snapshots (id) {
        /// Internal snapshot identifier.
        id -> Uuid,
        /// Owning task; unique with `snapshot_date`.
        task_id -> Uuid,
        /// Calendar date the snapshot describes.
        snapshot_date -> Date,
        /// Lifecycle state at snapshot time.
        #[max_length = 50]
        state -> Varchar,
        /// Project status label at snapshot time.
        #[max_length = 255]
        status -> Nullable<Varchar>,
        /// Whether the task was overdue at snapshot time.
        overdue -> Bool,
    }
}

diesel::table! {
    /// Aggregate statistics, one row per calendar date.
    daily_statistics (id) {
        /// Internal row identifier.
        id -> Uuid,
        /// Calendar date the counts describe; unique.
        stat_date -> Date,
        /// Total number of tasks.
        total -> Int4,
        /// Tasks in the open state.
        open -> Int4,
        /// Tasks in a terminal state.
        closed -> Int4,
        /// Open tasks whose due date had arrived.
        overdue -> Int4,
    }
}

diesel::joinable!(assignments -> tasks (task_id));
diesel::joinable!(snapshots -> tasks (task_id));

diesel::allow_tables_to_appear_in_same_query!(tasks, assignments, snapshots, daily_statistics);
