use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::domain::issue::{Issue, WorklogEntry};
use crate::domain::scope_change::ScopeChangeFeed;
use crate::domain::sprint::{Sprint, SprintWindow};
use crate::services::data_source::{DataSourceError, SprintDataSource};
use crate::services::jira_api::{
    JiraRestClient, get_str, get_u64, jql_timestamp, map_efforts, map_issue, map_worklogs,
};
use crate::services::jira6::{and_query, fetch_scope_change_chart, map_sprints, sprint_window};

const AGILE: &str = "rest/agile/1.0";

/// Jira 7 serves boards, sprints and board issues from the agile API. The
/// scope change chart is still only available from greenhopper.
pub struct Jira7Client {
    rest: JiraRestClient,
    burnup_issue_query: String,
}

impl Jira7Client {
    pub fn new(rest: JiraRestClient, burnup_issue_query: String) -> Self {
        Self {
            rest,
            burnup_issue_query,
        }
    }

    async fn get_boards(&self, board_type: &str) -> Result<BTreeMap<u64, String>, DataSourceError> {
        let mut params = HashMap::new();
        params.insert("type", board_type.to_string());
        let boards = self
            .rest
            .fetch_all(&format!("{AGILE}/board"), params, "values")
            .await?;

        Ok(boards
            .iter()
            .filter_map(|board| Some((get_u64(board, "id")?, get_str(board, "name")?.to_string())))
            .collect())
    }

    async fn board_issues(
        &self,
        board_id: u64,
        jql: String,
        fields: &str,
    ) -> Result<Vec<Value>, DataSourceError> {
        let mut params = HashMap::new();
        params.insert("jql", jql);
        params.insert("fields", fields.to_string());
        self.rest
            .fetch_all(&format!("{AGILE}/board/{board_id}/issue"), params, "issues")
            .await
    }
}

#[async_trait::async_trait]
impl SprintDataSource for Jira7Client {
    async fn get_scrum_boards(&self) -> Result<BTreeMap<u64, String>, DataSourceError> {
        self.get_boards("scrum").await
    }

    async fn get_kanban_boards(&self) -> Result<BTreeMap<u64, String>, DataSourceError> {
        self.get_boards("kanban").await
    }

    async fn get_sprints(&self, board_id: u64) -> Result<BTreeMap<u64, Sprint>, DataSourceError> {
        let sprints = self
            .rest
            .fetch_all(&format!("{AGILE}/board/{board_id}/sprint"), HashMap::new(), "values")
            .await?;
        Ok(map_sprints(&sprints))
    }

    async fn get_sprint_dates(
        &self,
        _board_id: u64,
        sprint_id: u64,
    ) -> Result<SprintWindow, DataSourceError> {
        let payload = self
            .rest
            .fetch_json(&format!("{AGILE}/sprint/{sprint_id}"), &HashMap::new())
            .await?;
        let sprints = map_sprints(std::slice::from_ref(&payload));
        let sprint = sprints
            .get(&sprint_id)
            .ok_or_else(|| DataSourceError::Parse(format!("unexpected payload for sprint {sprint_id}")))?;
        sprint_window(sprint)
    }

    async fn get_issues(&self, board_id: u64, sprint_id: u64) -> Result<Vec<Issue>, DataSourceError> {
        let mut params = HashMap::new();
        params.insert("jql", "issuetype = Sub-task".to_string());
        params.insert("fields", "timetracking,resolutiondate".to_string());
        let issues = self
            .rest
            .fetch_all(
                &format!("{AGILE}/board/{board_id}/sprint/{sprint_id}/issue"),
                params,
                "issues",
            )
            .await?;
        issues.iter().map(map_issue).collect()
    }

    async fn get_effort_for_issues(
        &self,
        board_id: u64,
        issue_keys: &[String],
    ) -> Result<HashMap<String, f64>, DataSourceError> {
        if issue_keys.is_empty() {
            return Ok(HashMap::new());
        }
        let issues = self
            .board_issues(
                board_id,
                format!("issuekey in ({})", issue_keys.join(",")),
                "timetracking",
            )
            .await?;
        Ok(map_efforts(&issues))
    }

    async fn get_scope_change_burndown_chart(
        &self,
        board_id: u64,
        sprint_id: u64,
    ) -> Result<ScopeChangeFeed, DataSourceError> {
        fetch_scope_change_chart(&self.rest, board_id, sprint_id).await
    }

    async fn get_issue_worklogs(
        &self,
        board_id: u64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<WorklogEntry>, DataSourceError> {
        let jql = format!(
            "worklogDate >= {} and worklogDate <= {}",
            jql_timestamp(start),
            jql_timestamp(end)
        );
        let issues = self
            .board_issues(board_id, and_query(jql, &self.burnup_issue_query), "worklog")
            .await?;
        Ok(map_worklogs(&issues))
    }
}
