use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::domain::issue::{Issue, WorklogEntry};
use crate::domain::scope_change::ScopeChangeFeed;
use crate::domain::sprint::{InvertedSprintWindow, Sprint, SprintWindow};

#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("resource not found")]
    NotFound,
    #[error("connection error")]
    Connection,
    #[error("parse error: {0}")]
    Parse(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("sprint {0} has no start or end date")]
    MissingSprintDates(u64),
    #[error(transparent)]
    InvalidSprintWindow(#[from] InvertedSprintWindow),
    #[error("{0}")]
    Other(String),
}

/// Describes an interface for retrieving boards, sprints, issues and
/// worklogs from a tracking service. Implementations normalize their wire
/// format into the domain types.
#[async_trait::async_trait]
pub trait SprintDataSource: Send + Sync {
    async fn get_scrum_boards(&self) -> Result<BTreeMap<u64, String>, DataSourceError>;

    async fn get_kanban_boards(&self) -> Result<BTreeMap<u64, String>, DataSourceError>;

    async fn get_sprints(&self, board_id: u64) -> Result<BTreeMap<u64, Sprint>, DataSourceError>;

    async fn get_sprint_dates(
        &self,
        board_id: u64,
        sprint_id: u64,
    ) -> Result<SprintWindow, DataSourceError>;

    /// Sub-tasks of the sprint.
    async fn get_issues(&self, board_id: u64, sprint_id: u64) -> Result<Vec<Issue>, DataSourceError>;

    /// Original estimate in seconds per issue key, 0 for unestimated issues.
    async fn get_effort_for_issues(
        &self,
        board_id: u64,
        issue_keys: &[String],
    ) -> Result<HashMap<String, f64>, DataSourceError>;

    async fn get_scope_change_burndown_chart(
        &self,
        board_id: u64,
        sprint_id: u64,
    ) -> Result<ScopeChangeFeed, DataSourceError>;

    async fn get_issue_worklogs(
        &self,
        board_id: u64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<WorklogEntry>, DataSourceError>;
}
