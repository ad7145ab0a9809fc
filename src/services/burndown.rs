use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::domain::calendar::compare_resolution_date;
use crate::domain::issue::Issue;
use crate::domain::sprint::SprintWindow;
use crate::domain::time_point::Series;

pub fn ideal_burndown(window: &SprintWindow, final_scope: f64) -> Series {
    let mut series = Series::new();
    series.push(window.start(), final_scope);
    series.push(window.end(), 0.0);
    series
}

/// Value of the ideal burndown at `timestamp`.
pub fn ideal_burndown_value_at(ideal: &Series, timestamp: NaiveDateTime) -> f64 {
    let (Some(start), Some(end)) = (ideal.first(), ideal.last()) else {
        return 0.0;
    };
    let length = (end.timestamp - start.timestamp).num_milliseconds() as f64;
    if length <= 0.0 {
        return end.value;
    }
    let remaining = (end.timestamp - timestamp).num_milliseconds() as f64;
    remaining / length * start.value
}

/// Remaining work after every issue resolved during the sprint.
///
/// Issues are sorted by resolution date with unresolved issues last, and the
/// walk stops at the first unresolved one. Resolved issues without an
/// estimate do not burn anything down. The line is closed at `now`, or at
/// the sprint end if that comes first.
pub fn actual_burndown(
    window: &SprintWindow,
    now: NaiveDateTime,
    final_scope: f64,
    issues: &[Issue],
) -> Series {
    let mut sorted: Vec<&Issue> = issues.iter().collect();
    sorted.sort_by(|a, b| compare_resolution_date(a, b));

    info!("Calculating actual burndown");

    let mut remaining = final_scope;
    let mut completed = 0.0;
    let mut series = Series::new();
    series.push(window.start(), remaining);

    for issue in sorted {
        let Some(resolution_date) = issue.resolution_date else {
            break;
        };
        if !window.contains(resolution_date) {
            continue;
        }
        let Some(effort) = issue.estimate_hours() else {
            debug!("  completed {} without an estimate at {resolution_date}", issue.key);
            continue;
        };

        completed += effort;
        remaining -= effort;
        series.push(resolution_date, remaining);
        debug!("  completed {}: {effort:.2} hours at {resolution_date}", issue.key);
    }

    info!("  Overall effort completed: {completed:.2} hours");

    series.push(window.cutoff(now), remaining);
    series
}
