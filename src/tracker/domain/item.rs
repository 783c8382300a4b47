//! Raw project-board item as reported by the source.
//!
//! A board item wraps its content (issue, pull request, or draft note) in a
//! tagged union so the normalizer can pattern-match on the kind instead of
//! probing for fields.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state reported by the source for item content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentState {
    /// Content is open.
    Open,
    /// Content has been closed.
    Closed,
    /// Pull request has been merged.
    Merged,
}

/// Issue or pull-request payload carried by a board item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentDetails {
    /// Repository the content belongs to, in `owner/repo` form.
    pub repository: String,
    /// Issue or pull-request number.
    pub number: u64,
    /// Content title.
    pub title: String,
    /// Reported lifecycle state.
    pub state: ContentState,
    /// Assignee logins in source order.
    pub assignees: Vec<String>,
    /// Source creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Source last-updated timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Content union attached to a board item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProjectItemContent {
    /// An issue.
    Issue(ContentDetails),
    /// A pull request.
    PullRequest(ContentDetails),
    /// A draft note with no backing issue or pull request.
    Draft,
}

/// Typed value of a named custom field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldData {
    /// Free-form text value.
    Text(String),
    /// Calendar date value.
    Date(NaiveDate),
    /// Single-select option name.
    SingleSelect(String),
    /// Numeric value.
    Number(f64),
}

/// A named custom-field value on a board item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    /// Field name as configured on the board.
    pub name: String,
    /// Typed field value.
    pub data: FieldData,
}

/// One raw item of the project board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectItem {
    /// Time the item was added to the board.
    pub added_at: DateTime<Utc>,
    /// Attached content, absent for items whose content was deleted.
    pub content: Option<ProjectItemContent>,
    /// Custom-field values set on the item.
    pub fields: Vec<FieldValue>,
}

impl ProjectItem {
    /// Looks up a custom-field value by case-insensitive name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldData> {
        self.fields
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
            .map(|field| &field.data)
    }
}
