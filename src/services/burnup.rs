use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::domain::calendar::compare_timestamp;
use crate::domain::issue::{SECONDS_PER_HOUR, WorklogEntry};
use crate::domain::sprint::SprintWindow;
use crate::domain::time_point::Series;
use crate::services::chart_composer::ChartError;

/// Hours of logged work inside and outside the sprint window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WorklogTotals {
    pub hours_in: f64,
    pub hours_out: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActualBurnup {
    pub series: Series,
    pub totals: WorklogTotals,
}

/// Chart points per hour of support work. The team's available hours minus
/// the burnup budget correspond to the initial scope.
pub fn points_per_hour(
    initial_scope: f64,
    availability: f64,
    burnup_budget: f64,
) -> Result<f64, ChartError> {
    let capacity = availability - burnup_budget;
    if capacity == 0.0 || !capacity.is_finite() {
        return Err(ChartError::ZeroBurnupCapacity {
            availability,
            burnup_budget,
        });
    }
    Ok(initial_scope / capacity)
}

/// Support work logged during the sprint, starting at minus the budget and
/// reaching zero when the budget is used up.
///
/// Worklogs created outside the window are skipped; they only count towards
/// [`WorklogTotals::hours_out`].
pub fn actual_burnup(
    window: &SprintWindow,
    now: NaiveDateTime,
    worklogs: &[WorklogEntry],
    burnup_budget: f64,
    points_per_hour: f64,
) -> ActualBurnup {
    info!("Calculating support burnup");

    let mut totals = WorklogTotals::default();
    let mut included: Vec<&WorklogEntry> = Vec::new();
    for worklog in worklogs {
        if window.contains(worklog.created) {
            totals.hours_in += worklog.hours();
            included.push(worklog);
            debug!("  adding {}: {:.2} hours", worklog.parent_issue_key, worklog.hours());
        } else {
            totals.hours_out += worklog.hours();
            debug!("  skipping {}: {:.2} hours", worklog.parent_issue_key, worklog.hours());
        }
    }

    info!("  Added a total of {:.2} hours from worklogs", totals.hours_in);
    info!("  Skipped a total of {:.2} hours from worklogs", totals.hours_out);

    included.sort_by(|a, b| compare_timestamp(*a, *b));

    let mut series = Series::new();
    series.push(window.start(), -burnup_budget * points_per_hour);

    let mut time_spent = 0.0;
    for worklog in included {
        time_spent += worklog.time_spent_seconds;
        series.push(
            worklog.created,
            (time_spent / SECONDS_PER_HOUR - burnup_budget) * points_per_hour,
        );
    }
    series.push(
        window.cutoff(now),
        (time_spent / SECONDS_PER_HOUR - burnup_budget) * points_per_hour,
    );

    ActualBurnup { series, totals }
}

pub fn ideal_burnup(window: &SprintWindow, burnup_budget: f64, points_per_hour: f64) -> Series {
    let mut series = Series::new();
    series.push(window.start(), -burnup_budget * points_per_hour);
    series.push(window.end(), 0.0);
    series
}

/// Extrapolates the actual burnup linearly to the end of the sprint.
///
/// Both the burnup and the window bounds must already be on the compressed
/// time axis, otherwise weekends would flatten the slope. Returns the line
/// from the last actual point to the sprint end.
pub fn projected_burnup(
    compressed_start: NaiveDateTime,
    compressed_end: NaiveDateTime,
    compressed_actual: &Series,
) -> Series {
    let (Some(first), Some(last)) = (compressed_actual.first(), compressed_actual.last()) else {
        return Series::new();
    };

    let elapsed = (last.timestamp - first.timestamp).num_milliseconds() as f64;
    let sprint_length = (compressed_end - compressed_start).num_milliseconds() as f64;
    let projected_height = if elapsed > 0.0 {
        (last.value - first.value) / elapsed * sprint_length + first.value
    } else {
        last.value
    };

    let mut series = Series::new();
    series.push(last.timestamp, last.value);
    series.push(compressed_end, projected_height);
    series
}

/// Burndown the team can still expect when support work eats into the
/// sprint. Empty unless the projected burnup stays below zero.
pub fn expected_burndown(
    window: &SprintWindow,
    final_scope: f64,
    projected_burnup_height: f64,
) -> Series {
    let mut series = Series::new();
    if projected_burnup_height < 0.0 {
        series.push(window.start(), final_scope);
        series.push(window.end(), projected_burnup_height);
    }
    series
}
