//! Canonical task representation of a board item.

use super::{ParseTaskKindError, ParseTaskStateError, TaskKey};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Kind of the content backing a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Task wraps an issue.
    Issue,
    /// Task wraps a pull request.
    PullRequest,
}

impl TaskKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::PullRequest => "pull_request",
        }
    }
}

impl TryFrom<&str> for TaskKind {
    type Error = ParseTaskKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "issue" => Ok(Self::Issue),
            "pull_request" => Ok(Self::PullRequest),
            _ => Err(ParseTaskKindError(value.to_owned())),
        }
    }
}

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Task is open.
    Open,
    /// Task has been closed.
    Closed,
    /// Pull request has been merged.
    Merged,
}

impl TaskState {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Merged => "merged",
        }
    }

    /// Returns `true` for closed and merged tasks.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Merged)
    }
}

impl TryFrom<&str> for TaskState {
    type Error = ParseTaskStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            "merged" => Ok(Self::Merged),
            _ => Err(ParseTaskStateError(value.to_owned())),
        }
    }
}

/// Canonical task record normalized from a board item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    key: TaskKey,
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

/// Parameter object carrying every task field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskData {
    /// External identity.
    pub key: TaskKey,
    /// Task title.
    pub title: String,
    /// Content kind.
    pub kind: TaskKind,
    /// Lifecycle state.
    pub state: TaskState,
    /// Project status label, if set on the board.
    pub status: Option<String>,
    /// Assignee logins in source order.
    pub assignees: Vec<String>,
    /// Source creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Source last-updated timestamp.
    pub updated_at: DateTime<Utc>,
    /// Due date, if set on the board.
    pub due_on: Option<NaiveDate>,
    /// Time the item was added to the project board.
    pub added_at: DateTime<Utc>,
}

impl Task {
    /// Builds a task from its complete field set.
    #[must_use]
    pub fn from_data(data: TaskData) -> Self {
        Self {
            key: data.key,
            title: data.title,
            kind: data.kind,
            state: data.state,
            status: data.status,
            assignees: data.assignees,
            created_at: data.created_at,
            updated_at: data.updated_at,
            due_on: data.due_on,
            added_at: data.added_at,
        }
    }

    /// Returns the external identity.
    #[must_use]
    pub const fn key(&self) -> &TaskKey {
        &self.key
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the content kind.
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        self.kind
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        self.state
    }

    /// Returns the project status label, if any.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Returns the assignee logins in source order.
    #[must_use]
    pub fn assignees(&self) -> &[String] {
        &self.assignees
    }

    /// Returns the source creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the source last-updated timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_on(&self) -> Option<NaiveDate> {
        self.due_on
    }

    /// Returns the time the item was added to the board.
    #[must_use]
    pub const fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }
}

/// One task's contribution to a daily snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// External task identity.
    pub key: TaskKey,
    /// Lifecycle state at snapshot time.
    pub state: TaskState,
    /// Project status label at snapshot time.
    pub status: Option<String>,
    /// Whether the task was overdue at snapshot time.
    pub overdue: bool,
}
