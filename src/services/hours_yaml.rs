use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::hours::SprintHours;

#[derive(Error, Debug)]
pub enum HoursYamlError {
    #[error("failed to read hours yaml file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to parse hours yaml file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("failed to write hours yaml file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to serialize hours: {0}")]
    Serialize(#[from] serde_yaml::Error),
    #[error("invalid hours value {value} for {field}: hours must be finite and not negative")]
    InvalidHours { field: &'static str, value: f64 },
}

/// Availability and burnup budget per board and sprint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HoursStore {
    boards: BTreeMap<u64, BTreeMap<u64, SprintHours>>,
}

impl HoursStore {
    /// A missing file is an empty store.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, HoursYamlError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("no hours file at {}, starting empty", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| HoursYamlError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&contents).map_err(|source| HoursYamlError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), HoursYamlError> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml).map_err(|source| HoursYamlError::WriteFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Stored hours of the sprint, or the defaults when none were set.
    pub fn get(&self, board_id: u64, sprint_id: u64) -> SprintHours {
        self.boards
            .get(&board_id)
            .and_then(|sprints| sprints.get(&sprint_id))
            .copied()
            .unwrap_or_default()
    }

    pub fn set_availability(
        &mut self,
        board_id: u64,
        sprint_id: u64,
        availability: f64,
    ) -> Result<(), HoursYamlError> {
        let availability = validate_hours("availability", availability)?;
        self.entry(board_id, sprint_id).availability = availability;
        Ok(())
    }

    pub fn set_burnup_budget(
        &mut self,
        board_id: u64,
        sprint_id: u64,
        burnup_budget: f64,
    ) -> Result<(), HoursYamlError> {
        let burnup_budget = validate_hours("burnup_budget", burnup_budget)?;
        self.entry(board_id, sprint_id).burnup_budget = burnup_budget;
        Ok(())
    }

    fn entry(&mut self, board_id: u64, sprint_id: u64) -> &mut SprintHours {
        self.boards
            .entry(board_id)
            .or_default()
            .entry(sprint_id)
            .or_default()
    }
}

/// Hours must be finite and not negative.
pub fn validate_hours(field: &'static str, value: f64) -> Result<f64, HoursYamlError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(HoursYamlError::InvalidHours { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_fs::prelude::*;

    #[test]
    fn missing_file_is_an_empty_store() {
        let temp = assert_fs::TempDir::new().unwrap();
        let store = HoursStore::load(temp.path().join("hours.yaml")).unwrap();
        assert_eq!(store, HoursStore::default());
        assert_eq!(store.get(1, 2), SprintHours::default());
    }

    #[test]
    fn returns_error_on_invalid_yaml_syntax() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("hours.yaml");
        file.write_str("12: [availability\n").unwrap();

        let err = HoursStore::load(file.path()).unwrap_err();
        assert!(matches!(err, HoursYamlError::Parse { .. }));
    }

    #[test]
    fn partial_entries_fall_back_to_defaults() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("hours.yaml");
        file.write_str("12:\n  34:\n    burnup_budget: 10\n").unwrap();

        let store = HoursStore::load(file.path()).unwrap();
        assert_eq!(
            store.get(12, 34),
            SprintHours {
                availability: 1.0,
                burnup_budget: 10.0
            }
        );
    }

    #[test]
    fn saved_hours_are_loaded_again() {
        let temp = assert_fs::TempDir::new().unwrap();
        let path = temp.path().join("hours.yaml");

        let mut store = HoursStore::default();
        store.set_availability(12, 34, 80.0).unwrap();
        store.set_burnup_budget(12, 34, 16.0).unwrap();
        store.set_availability(12, 35, 60.0).unwrap();
        store.save(&path).unwrap();

        let loaded = HoursStore::load(&path).unwrap();
        assert_eq!(loaded.get(12, 34).availability, 80.0);
        assert_eq!(loaded.get(12, 34).burnup_budget, 16.0);
        assert_eq!(loaded.get(12, 35).burnup_budget, 0.0);
    }

    #[test]
    fn rejects_negative_hours() {
        let mut store = HoursStore::default();
        let err = store.set_burnup_budget(1, 1, -4.0).unwrap_err();
        assert!(matches!(err, HoursYamlError::InvalidHours { field: "burnup_budget", .. }));
        assert_eq!(store, HoursStore::default());
    }
}
