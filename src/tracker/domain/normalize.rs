//! Normalization of raw board items into canonical tasks.

use super::{
    ContentState, FieldData, ProjectItem, ProjectItemContent, Task, TaskData, TaskKey, TaskKind,
    TaskState,
};

/// Custom-field name carrying the project status label.
pub const STATUS_FIELD: &str = "status";

/// Due-date field candidates, tried in order; the first non-null match wins.
pub const DUE_DATE_FIELDS: [&str; 3] = ["target date", "due date", "deadline"];

/// Maps a raw board item to a canonical task.
///
/// Returns `None` for draft items, items without attached content, and
/// content whose repository/number fail identity validation; these are
/// dropped silently rather than treated as errors.
#[must_use]
pub fn normalize(item: &ProjectItem) -> Option<Task> {
    let (kind, details) = match item.content.as_ref()? {
        ProjectItemContent::Issue(details) => (TaskKind::Issue, details),
        ProjectItemContent::PullRequest(details) => (TaskKind::PullRequest, details),
        ProjectItemContent::Draft => return None,
    };

    let key = TaskKey::from_parts(&details.repository, details.number).ok()?;

    Some(Task::from_data(TaskData {
        key,
        title: details.title.clone(),
        kind,
        state: map_state(kind, details.state),
        status: status_label(item),
        assignees: details.assignees.clone(),
        created_at: details.created_at,
        updated_at: details.updated_at,
        due_on: due_date(item),
        added_at: item.added_at,
    }))
}

/// Maps reported content state onto the task lifecycle.
///
/// `merged` is only meaningful for pull requests; an issue reporting it is
/// folded into `closed`.
const fn map_state(kind: TaskKind, state: ContentState) -> TaskState {
    match (kind, state) {
        (_, ContentState::Open) => TaskState::Open,
        (TaskKind::PullRequest, ContentState::Merged) => TaskState::Merged,
        (_, ContentState::Closed | ContentState::Merged) => TaskState::Closed,
    }
}

/// Extracts the project status label from the item's custom fields.
fn status_label(item: &ProjectItem) -> Option<String> {
    match item.field(STATUS_FIELD)? {
        FieldData::SingleSelect(name) | FieldData::Text(name) => Some(name.clone()),
        FieldData::Date(_) | FieldData::Number(_) => None,
    }
}

/// Resolves the due date from the ordered candidate field names.
fn due_date(item: &ProjectItem) -> Option<chrono::NaiveDate> {
    DUE_DATE_FIELDS.iter().find_map(|name| {
        item.field(name).and_then(|data| match data {
            FieldData::Date(date) => Some(*date),
            FieldData::Text(_) | FieldData::SingleSelect(_) | FieldData::Number(_) => None,
        })
    })
}

/// Convenience wrapper normalizing a full fetch result, dropping items that
/// do not map to tasks.
#[must_use]
pub fn normalize_all(items: &[ProjectItem]) -> Vec<Task> {
    items.iter().filter_map(normalize).collect()
}
