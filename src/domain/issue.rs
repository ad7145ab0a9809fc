use chrono::NaiveDateTime;

use crate::domain::time_point::Timestamped;

pub const SECONDS_PER_HOUR: f64 = 3600.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Issue {
	pub key: String,
	pub resolution_date: Option<NaiveDateTime>,
	pub original_estimate_seconds: Option<f64>,
}

impl Issue {
	pub fn new(key: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			..Self::default()
		}
	}

	pub fn estimate_hours(&self) -> Option<f64> {
		self.original_estimate_seconds
			.map(|seconds| seconds / SECONDS_PER_HOUR)
	}
}

/// Time logged on an issue, used for the burnup.
#[derive(Debug, Clone, PartialEq)]
pub struct WorklogEntry {
	pub parent_issue_key: String,
	pub created: NaiveDateTime,
	pub time_spent_seconds: f64,
}

impl WorklogEntry {
	pub fn hours(&self) -> f64 {
		self.time_spent_seconds / SECONDS_PER_HOUR
	}
}

impl Timestamped for WorklogEntry {
	fn timestamp(&self) -> NaiveDateTime {
		self.created
	}

	fn set_timestamp(&mut self, timestamp: NaiveDateTime) {
		self.created = timestamp;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn new_issue_is_open_and_unestimated() {
		let issue = Issue::new("ABC-1");
		assert_eq!(issue.key, "ABC-1");
		assert_eq!(issue.resolution_date, None);
		assert_eq!(issue.estimate_hours(), None);
	}

	#[test]
	fn estimate_is_converted_to_hours() {
		let issue = Issue {
			original_estimate_seconds: Some(5400.0),
			..Issue::new("ABC-2")
		};
		assert_eq!(issue.estimate_hours(), Some(1.5));
	}
}
