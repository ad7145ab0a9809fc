use serde::{Deserialize, Serialize};

/// Per-sprint inputs of the burnup: the hours the team is available and the
/// part of them budgeted for support work.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SprintHours {
    pub availability: f64,
    pub burnup_budget: f64,
}

impl Default for SprintHours {
    fn default() -> Self {
        Self {
            availability: 1.0,
            burnup_budget: 0.0,
        }
    }
}
