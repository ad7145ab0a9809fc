use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::domain::time_point::Timestamped;

/// Column transition attached to a change in the scope-change feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnChange {
    pub done: Option<bool>,
    pub not_done: Option<bool>,
}

impl ColumnChange {
    pub fn moved_to_done(&self) -> bool {
        self.done == Some(true)
    }
}

/// One raw entry of the scope-change feed. `added` is only present for
/// changes that add an issue to, or remove it from, the sprint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeChangeRecord {
    pub key: String,
    pub column: Option<ColumnChange>,
    pub added: Option<bool>,
}

/// Normalized scope-change burndown feed of a sprint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeChangeFeed {
    pub start_time: Option<NaiveDateTime>,
    pub now: Option<NaiveDateTime>,
    pub changes: Vec<(NaiveDateTime, Vec<ScopeChangeRecord>)>,
    pub issue_to_parent_keys: HashMap<String, Vec<String>>,
}

impl ScopeChangeFeed {
    /// Sub-tasks are the issues that have a parent.
    pub fn is_sub_task(&self, key: &str) -> bool {
        self.issue_to_parent_keys
            .get(key)
            .is_some_and(|parents| !parents.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeChangeEvent {
    pub timestamp: NaiveDateTime,
    pub issue_key: String,
    pub added: bool,
}

impl Timestamped for ScopeChangeEvent {
    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    fn set_timestamp(&mut self, timestamp: NaiveDateTime) {
        self.timestamp = timestamp;
    }
}
