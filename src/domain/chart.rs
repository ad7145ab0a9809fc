use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::sprint::SprintWindow;
use crate::domain::time_point::{Series, TimePoint, Timestamped};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    Zero,
    Scope,
    IdealBurndown,
    ActualBurndown,
    IdealBurnup,
    ActualBurnup,
    ProjectedBurnup,
    ExpectedBurndown,
}

impl SeriesKind {
    pub fn name(&self) -> &'static str {
        match self {
            SeriesKind::Zero => "zero",
            SeriesKind::Scope => "scope",
            SeriesKind::IdealBurndown => "ideal burndown",
            SeriesKind::ActualBurndown => "actual burndown",
            SeriesKind::IdealBurnup => "ideal burnup",
            SeriesKind::ActualBurnup => "actual burnup",
            SeriesKind::ProjectedBurnup => "projected burnup",
            SeriesKind::ExpectedBurndown => "expected burndown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const BLUE: Rgb = Rgb(0, 0, 255);
pub const RED: Rgb = Rgb(255, 0, 0);
pub const GREEN: Rgb = Rgb(0, 128, 0);
pub const LIGHT_GRAY: Rgb = Rgb(192, 192, 192);
pub const GRID_GRAY: Rgb = Rgb(224, 224, 224);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineStyle {
    pub color: Rgb,
    pub width: u32,
    pub dashed: bool,
}

impl LineStyle {
    pub const fn solid(color: Rgb, width: u32) -> Self {
        Self {
            color,
            width,
            dashed: false,
        }
    }

    pub const fn dashed(color: Rgb, width: u32) -> Self {
        Self {
            color,
            width,
            dashed: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineShape {
    Straight,
    Steps { connected: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub kind: SeriesKind,
    pub style: LineStyle,
    pub shape: LineShape,
    pub points: Series,
}

impl ChartSeries {
    pub fn polylines(&self) -> Vec<Vec<TimePoint>> {
        match self.shape {
            LineShape::Straight if self.points.is_empty() => Vec::new(),
            LineShape::Straight => vec![self.points.points.clone()],
            LineShape::Steps { connected } => self.points.stair_steps(connected),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayLabel {
    pub timestamp: NaiveDateTime,
    pub label: String,
}

impl Timestamped for DayLabel {
    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    fn set_timestamp(&mut self, timestamp: NaiveDateTime) {
        self.timestamp = timestamp;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridLine {
    pub timestamp: NaiveDateTime,
}

impl Timestamped for GridLine {
    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    fn set_timestamp(&mut self, timestamp: NaiveDateTime) {
        self.timestamp = timestamp;
    }
}

/// A vertical arrow between two heights, labelled with the rounded distance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub timestamp: NaiveDateTime,
    pub from: f64,
    pub to: f64,
    pub label: String,
}

/// Sums that explain how the chart came about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ChartTotals {
    pub initial_scope: f64,
    pub scope_change: f64,
    pub final_scope: f64,
    pub remaining_work: f64,
    pub hours_in_sprint: f64,
    pub hours_outside_sprint: f64,
    pub points_per_hour: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartModel {
    /// The real sprint window, before weekends were folded out.
    pub window: SprintWindow,
    pub compressed_start: NaiveDateTime,
    pub compressed_end: NaiveDateTime,
    pub series: Vec<ChartSeries>,
    pub grid_lines: Vec<GridLine>,
    pub day_labels: Vec<DayLabel>,
    pub y_min: f64,
    pub y_max: f64,
    pub projected_burnup_height: f64,
    pub budget_overrun: Option<Annotation>,
    pub points_behind: Option<Annotation>,
    pub totals: ChartTotals,
}

impl ChartModel {
    pub fn series(&self, kind: SeriesKind) -> Option<&ChartSeries> {
        self.series.iter().find(|series| series.kind == kind)
    }
}
