//! Assignment intervals and reconciliation of reported assignee sets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One assignment interval relating a task to an assignee.
///
/// An open interval has `unassigned_at == None`; reconciliation closes an
/// interval by stamping the unassign time and never mutates closed records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Assignee login.
    pub assignee: String,
    /// Time the assignment was first observed.
    pub assigned_at: DateTime<Utc>,
    /// Time the assignment stopped being reported, if it has.
    pub unassigned_at: Option<DateTime<Utc>>,
}

impl Assignment {
    /// Returns `true` while the assignment interval is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.unassigned_at.is_none()
    }
}

/// Set difference between currently-open assignments and a new report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssignmentDelta {
    /// Assignees whose open interval must be closed.
    pub to_close: Vec<String>,
    /// Assignees needing a new open interval.
    pub to_open: Vec<String>,
}

impl AssignmentDelta {
    /// Returns `true` when the report matches the open set exactly.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_close.is_empty() && self.to_open.is_empty()
    }
}

/// Diffs the currently-open assignee set against a newly reported one.
///
/// Assignees present in both sets are untouched. The returned lists are
/// sorted for deterministic application order.
#[must_use]
pub fn assignment_delta(open: &[String], reported: &[String]) -> AssignmentDelta {
    let open_set: BTreeSet<&str> = open.iter().map(String::as_str).collect();
    let reported_set: BTreeSet<&str> = reported.iter().map(String::as_str).collect();

    AssignmentDelta {
        to_close: open_set
            .difference(&reported_set)
            .map(|assignee| (*assignee).to_owned())
            .collect(),
        to_open: reported_set
            .difference(&open_set)
            .map(|assignee| (*assignee).to_owned())
            .collect(),
    }
}
