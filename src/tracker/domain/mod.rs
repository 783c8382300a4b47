//! Domain model for project-board tracking.
//!
//! The tracker domain models the normalization of raw board items into
//! canonical tasks, the overdue and statistics computations over task
//! collections, assignment-set reconciliation, and the synthetic history
//! series, while keeping all infrastructure concerns outside of the domain
//! boundary. Every time-sensitive function takes an explicit notion of
//! "now" rather than consulting a global clock.

mod assignment;
mod error;
mod history;
mod ids;
mod item;
mod normalize;
mod stats;
mod task;

pub use assignment::{Assignment, AssignmentDelta, assignment_delta};
pub use error::{ParseTaskKindError, ParseTaskStateError, TrackerDomainError};
pub use history::{DailyStatisticsRow, synthesize_daily_series};
pub use ids::{ProjectRef, RepositoryName, TaskKey, TaskNumber};
pub use item::{ContentDetails, ContentState, FieldData, FieldValue, ProjectItem, ProjectItemContent};
pub use normalize::{DUE_DATE_FIELDS, STATUS_FIELD, normalize, normalize_all};
pub use stats::{
    NO_STATUS_BUCKET, TaskStatistics, UNASSIGNED_BUCKET, compute_statistics, count_by_assignee,
    count_by_repository, count_by_status, is_overdue, overdue_tasks,
};
pub use task::{SnapshotEntry, Task, TaskData, TaskKind, TaskState};
