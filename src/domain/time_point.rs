use chrono::NaiveDateTime;
use serde::Serialize;

/// Anything positioned on the chart's time axis. Weekend compression works
/// on this so that data points, grid lines and day labels move together.
pub trait Timestamped {
    fn timestamp(&self) -> NaiveDateTime;
    fn set_timestamp(&mut self, timestamp: NaiveDateTime);
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimePoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

impl TimePoint {
    pub fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Self { timestamp, value }
    }
}

impl Timestamped for TimePoint {
    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    fn set_timestamp(&mut self, timestamp: NaiveDateTime) {
        self.timestamp = timestamp;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Series {
    pub points: Vec<TimePoint>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, timestamp: NaiveDateTime, value: f64) {
        self.points.push(TimePoint::new(timestamp, value));
    }

    pub fn first(&self) -> Option<&TimePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&TimePoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Expands the series into stair steps: every value is held horizontally
    /// until the timestamp of the next point, where the line steps to the new
    /// value. In connected mode the result is a single polyline, otherwise
    /// each hold is its own polyline and the vertical steps are left out.
    pub fn stair_steps(&self, connected: bool) -> Vec<Vec<TimePoint>> {
        let Some(first) = self.points.first() else {
            return Vec::new();
        };

        let mut polylines = Vec::new();
        let mut current = vec![*first];
        let mut previous_value = first.value;

        for point in &self.points[1..] {
            current.push(TimePoint::new(point.timestamp, previous_value));
            if !connected {
                polylines.push(std::mem::take(&mut current));
            }
            current.push(*point);
            previous_value = point.value;
        }

        polylines.push(current);
        polylines
    }
}

impl From<Vec<TimePoint>> for Series {
    fn from(points: Vec<TimePoint>) -> Self {
        Self { points }
    }
}
