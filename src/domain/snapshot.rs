use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::domain::issue::{Issue, WorklogEntry};
use crate::domain::scope_change::ScopeChangeFeed;
use crate::domain::sprint::SprintWindow;

/// Everything the chart of one sprint is computed from, already fetched and
/// normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct SprintSnapshot {
    pub window: SprintWindow,
    /// Moment the data was taken; the actual lines end here.
    pub now: NaiveDateTime,
    pub issues: Vec<Issue>,
    pub worklogs: Vec<WorklogEntry>,
    pub scope_feed: ScopeChangeFeed,
    /// Original estimate in seconds per scope-changing issue.
    pub efforts: HashMap<String, f64>,
}
