use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::domain::calendar::compare_timestamp;
use crate::domain::issue::SECONDS_PER_HOUR;
use crate::domain::scope_change::{ScopeChangeEvent, ScopeChangeFeed};
use crate::domain::sprint::SprintWindow;
use crate::domain::time_point::Series;

/// Scope events of a sprint, split at the sprint start.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeChanges {
    /// Every issue that took part in a scope event, in first-seen order.
    pub issue_keys: Vec<String>,
    pub initial: Vec<ScopeChangeEvent>,
    pub in_sprint: Vec<ScopeChangeEvent>,
}

/// Turns the raw feed into scope events of sub-tasks.
///
/// Issues that were moved to a done column at or before the sprint start
/// never entered the tracked scope, so all of their events are discarded.
/// Events after the sprint end are dropped.
pub fn classify_scope_changes(window: &SprintWindow, feed: &ScopeChangeFeed) -> ScopeChanges {
    let already_done: HashSet<&str> = feed
        .changes
        .iter()
        .filter(|(timestamp, _)| *timestamp <= window.start())
        .flat_map(|(_, records)| records)
        .filter(|record| record.column.as_ref().is_some_and(|c| c.moved_to_done()))
        .map(|record| record.key.as_str())
        .collect();

    let mut scope_changes = ScopeChanges::default();
    let mut seen = HashSet::new();

    for (timestamp, records) in &feed.changes {
        for record in records {
            if !feed.is_sub_task(&record.key) {
                continue;
            }
            let Some(added) = record.added else {
                continue;
            };
            if already_done.contains(record.key.as_str()) {
                continue;
            }

            let event = ScopeChangeEvent {
                timestamp: *timestamp,
                issue_key: record.key.clone(),
                added,
            };
            if *timestamp <= window.start() {
                scope_changes.initial.push(event);
            } else if *timestamp <= window.end() {
                scope_changes.in_sprint.push(event);
            }

            if seen.insert(record.key.clone()) {
                scope_changes.issue_keys.push(record.key.clone());
            }
        }
    }

    scope_changes.initial.sort_by(compare_timestamp);
    scope_changes.in_sprint.sort_by(compare_timestamp);
    scope_changes
}

fn effort_hours(efforts: &HashMap<String, f64>, key: &str) -> f64 {
    efforts.get(key).copied().unwrap_or(0.0) / SECONDS_PER_HOUR
}

/// Hours of work in the sprint when it started.
///
/// Every initial event contributes the effort of its issue, whether it
/// added the issue or removed it.
pub fn initial_scope(initial: &[ScopeChangeEvent], efforts: &HashMap<String, f64>) -> f64 {
    info!("Calculating initial sprint scope");
    let mut scope = 0.0;
    for event in initial {
        let effort = effort_hours(efforts, &event.issue_key);
        scope += effort;
        debug!("  adding {}: {effort:.2} hours", event.issue_key);
    }
    info!("  Initial sprint scope is {scope:.2} hours");
    scope
}

/// Running total of scope added (positive) or removed (negative) during the
/// sprint, from `(start, 0)` to `(end, total)`.
pub fn scope_change_series(
    window: &SprintWindow,
    in_sprint: &[ScopeChangeEvent],
    efforts: &HashMap<String, f64>,
) -> Series {
    info!("Calculating sprint scope changes");

    let mut series = Series::new();
    series.push(window.start(), 0.0);

    let mut scope = 0.0;
    for event in in_sprint {
        let effort = effort_hours(efforts, &event.issue_key);
        if event.added {
            scope += effort;
            debug!("  added {}: {effort:.2} hours at {}", event.issue_key, event.timestamp);
        } else {
            scope -= effort;
            debug!("  removed {}: {effort:.2} hours at {}", event.issue_key, event.timestamp);
        }
        series.push(event.timestamp, scope);
    }

    info!("  Overall scope change: {scope:.2} hours");
    series.push(window.end(), scope);
    series
}

/// Mirrors the scope change series around its last value, so the line ends
/// on the baseline and its distance from it shows scope still to come.
pub fn scope_line(scope_changes: &Series) -> Series {
    let end_scope = scope_changes.last().map(|point| point.value).unwrap_or(0.0);
    scope_changes
        .points
        .iter()
        .map(|point| {
            let mut mirrored = *point;
            mirrored.value = end_scope - point.value;
            mirrored
        })
        .collect::<Vec<_>>()
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scope_change::{ColumnChange, ScopeChangeRecord};
    use crate::test_support::{at, efforts, scope_feed, window};

    fn added(key: &str) -> ScopeChangeRecord {
        ScopeChangeRecord {
            key: key.to_string(),
            column: None,
            added: Some(true),
        }
    }

    fn removed(key: &str) -> ScopeChangeRecord {
        ScopeChangeRecord {
            added: Some(false),
            ..added(key)
        }
    }

    fn done(key: &str) -> ScopeChangeRecord {
        ScopeChangeRecord {
            key: key.to_string(),
            column: Some(ColumnChange {
                done: Some(true),
                not_done: None,
            }),
            added: None,
        }
    }

    fn sprint() -> SprintWindow {
        window(at(2026, 2, 16, 0), at(2026, 2, 27, 0))
    }

    #[test]
    fn events_are_split_at_sprint_start_and_dropped_after_end() {
        let feed = scope_feed(
            vec![
                (at(2026, 2, 20, 9), vec![added("S-3")]),
                (at(2026, 2, 13, 9), vec![added("S-1")]),
                (at(2026, 2, 16, 0), vec![added("S-2")]),
                (at(2026, 3, 2, 9), vec![added("S-4")]),
            ],
            &["S-1", "S-2", "S-3", "S-4"],
        );

        let changes = classify_scope_changes(&sprint(), &feed);

        let initial: Vec<&str> = changes.initial.iter().map(|e| e.issue_key.as_str()).collect();
        let in_sprint: Vec<&str> = changes.in_sprint.iter().map(|e| e.issue_key.as_str()).collect();
        assert_eq!(initial, vec!["S-1", "S-2"]);
        assert_eq!(in_sprint, vec!["S-3"]);
        assert_eq!(changes.issue_keys, vec!["S-3", "S-1", "S-2", "S-4"]);
    }

    #[test]
    fn issues_done_before_the_sprint_never_enter_scope() {
        let feed = scope_feed(
            vec![
                (at(2026, 2, 12, 9), vec![added("S-1"), added("S-2")]),
                (at(2026, 2, 13, 9), vec![done("S-1")]),
                (at(2026, 2, 18, 9), vec![removed("S-1")]),
            ],
            &["S-1", "S-2"],
        );

        let changes = classify_scope_changes(&sprint(), &feed);

        assert_eq!(changes.initial.len(), 1);
        assert_eq!(changes.initial[0].issue_key, "S-2");
        assert!(changes.in_sprint.is_empty());
        assert_eq!(changes.issue_keys, vec!["S-2"]);
    }

    #[test]
    fn parent_issues_and_non_scope_changes_are_ignored() {
        let mut feed = scope_feed(
            vec![(
                at(2026, 2, 18, 9),
                vec![added("STORY-1"), done("S-1"), added("S-1")],
            )],
            &["S-1"],
        );
        feed.issue_to_parent_keys.insert("STORY-1".to_string(), Vec::new());

        let changes = classify_scope_changes(&sprint(), &feed);

        assert_eq!(changes.in_sprint.len(), 1);
        assert_eq!(changes.in_sprint[0].issue_key, "S-1");
    }

    #[test]
    fn events_with_equal_timestamps_keep_their_feed_order() {
        let feed = scope_feed(
            vec![
                (at(2026, 2, 18, 9), vec![added("S-2"), added("S-1")]),
                (at(2026, 2, 17, 9), vec![added("S-4")]),
                (at(2026, 2, 18, 9), vec![removed("S-3")]),
                (at(2026, 2, 13, 9), vec![added("S-6"), added("S-5")]),
            ],
            &["S-1", "S-2", "S-3", "S-4", "S-5", "S-6"],
        );

        let changes = classify_scope_changes(&sprint(), &feed);

        let initial: Vec<&str> = changes.initial.iter().map(|e| e.issue_key.as_str()).collect();
        let in_sprint: Vec<&str> = changes.in_sprint.iter().map(|e| e.issue_key.as_str()).collect();
        assert_eq!(initial, vec!["S-6", "S-5"]);
        assert_eq!(in_sprint, vec!["S-4", "S-2", "S-1", "S-3"]);
    }

    #[test]
    fn initial_scope_sums_effort_of_every_initial_event() {
        let changes = vec![
            ScopeChangeEvent { timestamp: at(2026, 2, 10, 9), issue_key: "S-1".into(), added: true },
            ScopeChangeEvent { timestamp: at(2026, 2, 11, 9), issue_key: "S-2".into(), added: true },
            ScopeChangeEvent { timestamp: at(2026, 2, 12, 9), issue_key: "S-3".into(), added: true },
            ScopeChangeEvent { timestamp: at(2026, 2, 13, 9), issue_key: "S-2".into(), added: false },
        ];
        let efforts = efforts(&[("S-1", 8.0), ("S-2", 4.0)]);

        // S-3 has no known effort and counts as zero. The removal of S-2
        // adds its effort once more.
        assert_eq!(initial_scope(&changes, &efforts), 16.0);
    }

    #[test]
    fn scope_change_series_accumulates_additions_and_removals() {
        let changes = vec![
            ScopeChangeEvent { timestamp: at(2026, 2, 17, 9), issue_key: "S-5".into(), added: true },
            ScopeChangeEvent { timestamp: at(2026, 2, 19, 9), issue_key: "S-1".into(), added: false },
        ];
        let efforts = efforts(&[("S-1", 8.0), ("S-5", 2.0)]);

        let series = scope_change_series(&sprint(), &changes, &efforts);

        let values: Vec<f64> = series.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![0.0, 2.0, -6.0, -6.0]);
        assert_eq!(series.first().unwrap().timestamp, at(2026, 2, 16, 0));
        assert_eq!(series.last().unwrap().timestamp, at(2026, 2, 27, 0));
    }

    #[test]
    fn scope_line_mirrors_the_series_around_its_end_value() {
        let mut series = Series::new();
        series.push(at(2026, 2, 16, 0), 0.0);
        series.push(at(2026, 2, 17, 9), 2.0);
        series.push(at(2026, 2, 27, 0), 2.0);

        let line = scope_line(&series);

        let values: Vec<f64> = line.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![2.0, 0.0, 0.0]);
    }

    #[test]
    fn final_scope_is_initial_scope_plus_last_change() {
        let feed = scope_feed(
            vec![
                (at(2026, 2, 13, 9), vec![added("S-1"), added("S-2")]),
                (at(2026, 2, 17, 9), vec![added("S-3")]),
                (at(2026, 2, 18, 9), vec![removed("S-1")]),
                (at(2026, 2, 19, 9), vec![added("S-4")]),
            ],
            &["S-1", "S-2", "S-3", "S-4"],
        );
        let efforts = efforts(&[("S-1", 8.0), ("S-2", 8.0), ("S-3", 3.0), ("S-4", 1.5)]);

        let changes = classify_scope_changes(&sprint(), &feed);
        let initial = initial_scope(&changes.initial, &efforts);
        let series = scope_change_series(&sprint(), &changes.in_sprint, &efforts);

        assert_eq!(initial, 16.0);
        assert_eq!(series.last().unwrap().value, -3.5);
        assert_eq!(initial + series.last().unwrap().value, 12.5);
    }
}
