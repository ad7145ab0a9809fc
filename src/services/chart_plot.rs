use chrono::{NaiveDateTime, TimeDelta};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use thiserror::Error;

use crate::domain::chart::{Annotation, ChartModel, GRID_GRAY, LineStyle, Rgb};

#[derive(Error, Debug)]
pub enum ChartPlotError {
    #[error("chart has no series to draw")]
    EmptyChart,
    #[error("failed to render chart plot: {0}")]
    Plot(String),
}

const SECONDS_PER_HOUR: f64 = 3600.0;
const DASH_SIZE: u32 = 8;
const DASH_SPACING: u32 = 6;

/// Renders the chart as a PNG image at `output_path`.
pub async fn write_chart_png(
    output_path: &str,
    title: &str,
    chart: &ChartModel,
) -> Result<(), ChartPlotError> {
    if chart.series.iter().all(|series| series.points.is_empty()) {
        return Err(ChartPlotError::EmptyChart);
    }

    let output_path = output_path.to_string();
    let title = title.to_string();
    let chart = chart.clone();
    tokio::task::spawn_blocking(move || render_chart_png(&output_path, &title, &chart))
        .await
        .map_err(|e| ChartPlotError::Plot(e.to_string()))??;
    Ok(())
}

/// Hours since the compressed sprint start.
fn hours_since(start: NaiveDateTime, timestamp: NaiveDateTime) -> f64 {
    (timestamp - start).num_seconds() as f64 / SECONDS_PER_HOUR
}

fn y_range(chart: &ChartModel) -> (f64, f64) {
    let y_min = (chart.y_min * 1.1).min(0.0);
    let y_max = chart.y_max * 1.05;
    if y_max > y_min {
        (y_min, y_max)
    } else {
        (y_min, y_min + 1.0)
    }
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

fn shape_style(style: &LineStyle) -> ShapeStyle {
    ShapeStyle::from(&rgb(style.color)).stroke_width(style.width)
}

fn render_chart_png(output_path: &str, title: &str, chart: &ChartModel) -> Result<(), ChartPlotError> {
    let start = chart.compressed_start;
    let x_max = hours_since(start, chart.compressed_end + TimeDelta::days(1)).max(1.0);
    let (y_min, y_max) = y_range(chart);

    let root = BitMapBackend::new(output_path, (1200, 700)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| ChartPlotError::Plot(e.to_string()))?;

    let mut plot = ChartBuilder::on(&root)
        .margin(20)
        .caption(title, ("sans-serif", 28))
        .x_label_area_size(20)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, y_min..y_max)
        .map_err(|e| ChartPlotError::Plot(e.to_string()))?;

    plot.configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_desc("Points")
        .label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 20))
        .draw()
        .map_err(|e| ChartPlotError::Plot(e.to_string()))?;

    let grid_style = ShapeStyle::from(&rgb(GRID_GRAY)).stroke_width(1);
    plot.draw_series(chart.grid_lines.iter().map(|line| {
        let x = hours_since(start, line.timestamp);
        PathElement::new(vec![(x, y_min), (x, y_max)], grid_style.clone())
    }))
    .map_err(|e| ChartPlotError::Plot(e.to_string()))?;

    let label_y = y_min + (y_max - y_min) * 0.03;
    plot.draw_series(chart.day_labels.iter().map(|label| {
        Text::new(
            label.label.clone(),
            (hours_since(start, label.timestamp), label_y),
            ("sans-serif", 16).into_font().color(&BLACK),
        )
    }))
    .map_err(|e| ChartPlotError::Plot(e.to_string()))?;

    for series in &chart.series {
        let style = shape_style(&series.style);
        for polyline in series.polylines() {
            let points: Vec<(f64, f64)> = polyline
                .iter()
                .map(|point| (hours_since(start, point.timestamp), point.value))
                .collect();
            if series.style.dashed {
                plot.draw_series(DashedLineSeries::new(points, DASH_SIZE, DASH_SPACING, style.clone()))
                    .map_err(|e| ChartPlotError::Plot(e.to_string()))?;
            } else {
                plot.draw_series(LineSeries::new(points, style.clone()))
                    .map_err(|e| ChartPlotError::Plot(e.to_string()))?;
            }
        }
    }

    for annotation in chart.budget_overrun.iter().chain(chart.points_behind.iter()) {
        draw_annotation(&mut plot, start, annotation)?;
    }

    root.present()
        .map_err(|e| ChartPlotError::Plot(e.to_string()))?;
    Ok(())
}

fn draw_annotation<DB: DrawingBackend>(
    plot: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    start: NaiveDateTime,
    annotation: &Annotation,
) -> Result<(), ChartPlotError> {
    let x = hours_since(start, annotation.timestamp);
    let style = ShapeStyle::from(&BLACK).stroke_width(1);

    plot.draw_series(std::iter::once(PathElement::new(
        vec![(x, annotation.from), (x, annotation.to)],
        style,
    )))
    .map_err(|e| ChartPlotError::Plot(e.to_string()))?;
    plot.draw_series(std::iter::once(Circle::new((x, annotation.to), 3, BLACK.filled())))
        .map_err(|e| ChartPlotError::Plot(e.to_string()))?;
    plot.draw_series(std::iter::once(Text::new(
        annotation.label.clone(),
        (x, (annotation.from + annotation.to) / 2.0),
        ("sans-serif", 16).into_font().color(&BLACK),
    )))
    .map_err(|e| ChartPlotError::Plot(e.to_string()))?;
    Ok(())
}
