use std::io::{self, Write};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::chart::{Annotation, ChartModel, ChartTotals};

#[derive(Serialize)]
struct ChartRecord {
    sprint_start: String,
    sprint_end: String,
    compressed_end: String,
    y_min: f64,
    y_max: f64,
    projected_burnup_height: f64,
    totals: ChartTotals,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    annotations: Vec<AnnotationRecord>,
    series: Vec<SeriesRecord>,
}

#[derive(Serialize)]
struct AnnotationRecord {
    kind: &'static str,
    at: String,
    from: f64,
    to: f64,
    label: String,
}

#[derive(Serialize)]
struct SeriesRecord {
    name: &'static str,
    points: Vec<PointRecord>,
}

#[derive(Serialize)]
struct PointRecord {
    at: String,
    value: f64,
}

fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format("%Y-%m-%d %H:%M").to_string()
}

fn annotation_record(kind: &'static str, annotation: &Annotation) -> AnnotationRecord {
    AnnotationRecord {
        kind,
        at: format_timestamp(annotation.timestamp),
        from: annotation.from,
        to: annotation.to,
        label: annotation.label.clone(),
    }
}

/// Writes the chart data, on the compressed time axis, as YAML.
pub fn serialize_chart_to_yaml<W: Write>(writer: &mut W, chart: &ChartModel) -> io::Result<()> {
    let annotations = chart
        .budget_overrun
        .iter()
        .map(|annotation| annotation_record("budget_overrun", annotation))
        .chain(
            chart
                .points_behind
                .iter()
                .map(|annotation| annotation_record("points_behind", annotation)),
        )
        .collect();

    let series = chart
        .series
        .iter()
        .map(|series| SeriesRecord {
            name: series.kind.name(),
            points: series
                .points
                .points
                .iter()
                .map(|point| PointRecord {
                    at: format_timestamp(point.timestamp),
                    value: point.value,
                })
                .collect(),
        })
        .collect();

    let record = ChartRecord {
        sprint_start: format_timestamp(chart.window.start()),
        sprint_end: format_timestamp(chart.window.end()),
        compressed_end: format_timestamp(chart.compressed_end),
        y_min: chart.y_min,
        y_max: chart.y_max,
        projected_burnup_height: chart.projected_burnup_height,
        totals: chart.totals,
        annotations,
        series,
    };

    let yaml = serde_yaml::to_string(&record).map_err(io::Error::other)?;
    writer.write_all(yaml.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::{ChartSeries, LineShape, LineStyle, RED, SeriesKind};
    use crate::domain::time_point::{Series, TimePoint};
    use crate::test_support::{at, window};

    #[test]
    fn test_serialize_chart_to_yaml() {
        let chart = ChartModel {
            window: window(at(2026, 2, 16, 9), at(2026, 2, 27, 17)),
            compressed_start: at(2026, 2, 16, 9),
            compressed_end: at(2026, 2, 25, 17),
            series: vec![ChartSeries {
                kind: SeriesKind::ActualBurnup,
                style: LineStyle::solid(RED, 2),
                shape: LineShape::Steps { connected: true },
                points: Series::from(vec![
                    TimePoint::new(at(2026, 2, 16, 9), -6.0),
                    TimePoint::new(at(2026, 2, 17, 10), -4.5),
                ]),
            }],
            grid_lines: Vec::new(),
            day_labels: Vec::new(),
            y_min: -6.0,
            y_max: 24.0,
            projected_burnup_height: 3.0,
            budget_overrun: Some(Annotation {
                timestamp: at(2026, 2, 25, 17),
                from: 0.0,
                to: 3.0,
                label: "3 pts".to_string(),
            }),
            points_behind: None,
            totals: ChartTotals::default(),
        };

        let mut buf = Vec::new();
        serialize_chart_to_yaml(&mut buf, &chart).unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("sprint_start:"));
        assert!(output.contains("2026-02-16 09:00"));
        assert!(output.contains("name: actual burnup"));
        assert!(output.contains("2026-02-17 10:00"));
        assert!(output.contains("value: -4.5"));
        assert!(output.contains("kind: budget_overrun"));
        assert!(output.contains("label: 3 pts"));
        assert!(!output.contains("points_behind"));
    }
}
