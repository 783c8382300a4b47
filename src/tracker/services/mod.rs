//! Application services for project-board tracking.

mod history;
mod poll;
mod query;
mod scheduler;

pub use history::BackfillService;
pub use poll::{CycleReport, PollCycleError, PollCycleResult, PollService};
pub use query::TrackerQueryService;
pub use scheduler::{PollScheduler, RunOutcome, SchedulerStatus, TriggerOutcome};
