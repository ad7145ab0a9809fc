use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::issue::{Issue, SECONDS_PER_HOUR, WorklogEntry};
use crate::domain::scope_change::{ScopeChangeFeed, ScopeChangeRecord};
use crate::domain::sprint::SprintWindow;

pub fn on_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    at_hm(year, month, day, hour, 0)
}

pub fn at_hm(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    on_date(year, month, day).and_hms_opt(hour, minute, 0).unwrap()
}

pub fn window(start: NaiveDateTime, end: NaiveDateTime) -> SprintWindow {
    SprintWindow::new(start, end).unwrap()
}

pub fn resolved_issue(key: &str, estimate_hours: f64, resolved: NaiveDateTime) -> Issue {
    Issue {
        key: key.to_string(),
        resolution_date: Some(resolved),
        original_estimate_seconds: Some(estimate_hours * SECONDS_PER_HOUR),
    }
}

pub fn unresolved_issue(key: &str, estimate_hours: f64) -> Issue {
    Issue {
        key: key.to_string(),
        resolution_date: None,
        original_estimate_seconds: Some(estimate_hours * SECONDS_PER_HOUR),
    }
}

pub fn worklog(key: &str, created: NaiveDateTime, hours: f64) -> WorklogEntry {
    WorklogEntry {
        parent_issue_key: key.to_string(),
        created,
        time_spent_seconds: hours * SECONDS_PER_HOUR,
    }
}

/// Effort map in seconds, built from hours.
pub fn efforts(hours: &[(&str, f64)]) -> HashMap<String, f64> {
    hours
        .iter()
        .map(|(key, hours)| (key.to_string(), hours * SECONDS_PER_HOUR))
        .collect()
}

/// Feed in which every listed key is a sub-task of `STORY-1`.
pub fn scope_feed(
    changes: Vec<(NaiveDateTime, Vec<ScopeChangeRecord>)>,
    sub_tasks: &[&str],
) -> ScopeChangeFeed {
    ScopeChangeFeed {
        start_time: None,
        now: None,
        changes,
        issue_to_parent_keys: sub_tasks
            .iter()
            .map(|key| (key.to_string(), vec!["STORY-1".to_string()]))
            .collect(),
    }
}

pub fn scope_added_before(timestamp: NaiveDateTime, sub_tasks: &[&str]) -> ScopeChangeFeed {
    let records = sub_tasks
        .iter()
        .map(|key| ScopeChangeRecord {
            key: key.to_string(),
            column: None,
            added: Some(true),
        })
        .collect();
    scope_feed(vec![(timestamp, records)], sub_tasks)
}
