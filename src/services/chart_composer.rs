use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::info;

use crate::domain::calendar::{day_labels, day_lines, sprint_weekends};
use crate::domain::chart::{
    Annotation, BLACK, BLUE, ChartModel, ChartSeries, ChartTotals, GREEN, LIGHT_GRAY, LineShape,
    LineStyle, RED, SeriesKind,
};
use crate::domain::hours::SprintHours;
use crate::domain::snapshot::SprintSnapshot;
use crate::domain::sprint::{SprintWindow, WeekendInterval};
use crate::domain::time_point::Series;
use crate::services::burndown::{actual_burndown, ideal_burndown, ideal_burndown_value_at};
use crate::services::burnup::{
    actual_burnup, expected_burndown, ideal_burnup, points_per_hour, projected_burnup,
};
use crate::services::scope::{
    classify_scope_changes, initial_scope, scope_change_series, scope_line,
};
use crate::services::weekend_compression::compress_weekends;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error(
        "availability ({availability} h) must differ from the burnup budget ({burnup_budget} h)"
    )]
    ZeroBurnupCapacity { availability: f64, burnup_budget: f64 },
    #[error("sprint has no issues")]
    NoIssues,
}

/// Smallest distance, in points, worth an annotation arrow.
const MIN_ANNOTATED_POINTS: f64 = 2.0;

/// Computes the complete burn-up-and-down chart of a sprint.
///
/// Pure function of its inputs: the same snapshot and hours always yield
/// the same model.
pub fn compute_chart(
    snapshot: &SprintSnapshot,
    hours: &SprintHours,
) -> Result<ChartModel, ChartError> {
    if snapshot.issues.is_empty() {
        return Err(ChartError::NoIssues);
    }

    let window = &snapshot.window;
    info!("Sprint start is {}", window.start());
    info!("Sprint end   is {}", window.end());

    let weekends = sprint_weekends(window);

    // Burndown
    let scope_changes = classify_scope_changes(window, &snapshot.scope_feed);
    let initial_scope = initial_scope(&scope_changes.initial, &snapshot.efforts);
    let scope_changes = scope_change_series(window, &scope_changes.in_sprint, &snapshot.efforts);
    let scope_change = scope_changes.last().map(|point| point.value).unwrap_or(0.0);
    let final_scope = initial_scope + scope_change;

    let ideal_burndown = ideal_burndown(window, final_scope);
    let actual_burndown = actual_burndown(window, snapshot.now, final_scope, &snapshot.issues);

    // Burnup
    let points_per_hour = points_per_hour(initial_scope, hours.availability, hours.burnup_budget)?;
    let actual_burnup = actual_burnup(
        window,
        snapshot.now,
        &snapshot.worklogs,
        hours.burnup_budget,
        points_per_hour,
    );
    let ideal_burnup = ideal_burnup(window, hours.burnup_budget, points_per_hour);

    // Remove all weekends
    let zero = compress(&zero_line(window), &weekends);
    let scope_changes = compress(&scope_changes, &weekends);
    let ideal_burndown = compress(&ideal_burndown, &weekends);
    let actual_burndown = compress(&actual_burndown, &weekends);
    let actual_burnup_series = compress(&actual_burnup.series, &weekends);
    let ideal_burnup = compress(&ideal_burnup, &weekends);
    let day_labels = compress_weekends(&day_labels(window), &weekends);
    let grid_lines = compress_weekends(&day_lines(window), &weekends);

    let (compressed_start, compressed_end) = axis_bounds(window, &zero);

    let projected_burnup = projected_burnup(compressed_start, compressed_end, &actual_burnup_series);
    let projected_burnup_height = projected_burnup
        .last()
        .map(|point| point.value)
        .unwrap_or(0.0);
    let expected_burndown = compress(
        &expected_burndown(window, final_scope, projected_burnup_height),
        &weekends,
    );

    let budget_overrun = distance_annotation(compressed_end, 0.0, projected_burnup_height);
    let points_behind = actual_burndown.last().and_then(|current| {
        let ideal = ideal_burndown_value_at(&ideal_burndown, current.timestamp);
        distance_annotation(current.timestamp, ideal, current.value)
    });

    let totals = ChartTotals {
        initial_scope,
        scope_change,
        final_scope,
        remaining_work: actual_burndown
            .last()
            .map(|point| point.value)
            .unwrap_or(final_scope),
        hours_in_sprint: actual_burnup.totals.hours_in,
        hours_outside_sprint: actual_burnup.totals.hours_out,
        points_per_hour,
    };

    let series = vec![
        chart_series(
            SeriesKind::IdealBurndown,
            LineStyle::solid(LIGHT_GRAY, 2),
            LineShape::Straight,
            ideal_burndown,
        ),
        chart_series(
            SeriesKind::IdealBurnup,
            LineStyle::solid(LIGHT_GRAY, 2),
            LineShape::Straight,
            ideal_burnup,
        ),
        chart_series(
            SeriesKind::Zero,
            LineStyle::dashed(BLACK, 1),
            LineShape::Straight,
            zero,
        ),
        chart_series(
            SeriesKind::Scope,
            LineStyle::solid(BLACK, 2),
            LineShape::Steps { connected: true },
            scope_line(&scope_changes),
        ),
        chart_series(
            SeriesKind::ActualBurndown,
            LineStyle::solid(BLUE, 2),
            LineShape::Steps { connected: true },
            actual_burndown,
        ),
        chart_series(
            SeriesKind::ActualBurnup,
            LineStyle::solid(RED, 2),
            LineShape::Steps { connected: true },
            actual_burnup_series,
        ),
        chart_series(
            SeriesKind::ProjectedBurnup,
            LineStyle::dashed(RED, 1),
            LineShape::Straight,
            projected_burnup,
        ),
        chart_series(
            SeriesKind::ExpectedBurndown,
            LineStyle::solid(GREEN, 2),
            LineShape::Straight,
            expected_burndown,
        ),
    ];

    Ok(ChartModel {
        window: *window,
        compressed_start,
        compressed_end,
        series,
        grid_lines,
        day_labels,
        y_min: -hours.burnup_budget * points_per_hour,
        y_max: final_scope,
        projected_burnup_height,
        budget_overrun,
        points_behind,
        totals,
    })
}

fn zero_line(window: &SprintWindow) -> Series {
    let mut series = Series::new();
    series.push(window.start(), 0.0);
    series.push(window.end(), 0.0);
    series
}

fn compress(series: &Series, weekends: &[WeekendInterval]) -> Series {
    compress_weekends(&series.points, weekends).into()
}

fn axis_bounds(window: &SprintWindow, zero: &Series) -> (NaiveDateTime, NaiveDateTime) {
    let start = zero.first().map(|point| point.timestamp).unwrap_or(window.start());
    let end = zero.last().map(|point| point.timestamp).unwrap_or(window.end());
    (start, end)
}

fn chart_series(kind: SeriesKind, style: LineStyle, shape: LineShape, points: Series) -> ChartSeries {
    ChartSeries {
        kind,
        style,
        shape,
        points,
    }
}

fn distance_annotation(timestamp: NaiveDateTime, from: f64, to: f64) -> Option<Annotation> {
    let points = (from - to).abs().round();
    if points < MIN_ANNOTATED_POINTS {
        return None;
    }
    Some(Annotation {
        timestamp,
        from,
        to,
        label: format!("{points:.0} pts"),
    })
}
