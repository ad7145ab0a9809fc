use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::domain::issue::{Issue, WorklogEntry};
use crate::domain::scope_change::ScopeChangeFeed;
use crate::domain::sprint::{Sprint, SprintWindow};
use crate::services::data_source::{DataSourceError, SprintDataSource};
use crate::services::jira_api::{
    JiraRestClient, get_str, get_u64, jql_timestamp, map_efforts, map_issue,
    map_scope_change_feed, map_worklogs, parse_timestamp,
};

const SELECTOR_DATA: &str = "rest/greenhopper/1.0/xboard/selectorData";
const SPRINT_REPORT: &str = "rest/greenhopper/1.0/rapid/charts/sprintreport";
pub(crate) const SCOPE_CHANGE_CHART: &str =
    "rest/greenhopper/1.0/rapid/charts/scopechangeburndownchart";
const SEARCH: &str = "rest/api/2/search";

/// Jira 6 exposes boards and sprints only through the greenhopper API.
pub struct Jira6Client {
    rest: JiraRestClient,
    burnup_issue_query: String,
}

impl Jira6Client {
    pub fn new(rest: JiraRestClient, burnup_issue_query: String) -> Self {
        Self {
            rest,
            burnup_issue_query,
        }
    }

    async fn get_rapid_views(
        &self,
        sprint_support_enabled: bool,
    ) -> Result<BTreeMap<u64, String>, DataSourceError> {
        let payload = self.rest.fetch_json(SELECTOR_DATA, &HashMap::new()).await?;
        let views = payload
            .get("rapidViews")
            .and_then(|value| value.as_array())
            .ok_or_else(|| DataSourceError::Parse("missing 'rapidViews' array".to_string()))?;

        Ok(views
            .iter()
            .filter(|view| {
                view.get("sprintSupportEnabled")
                    .and_then(|value| value.as_bool())
                    .unwrap_or(false)
                    == sprint_support_enabled
            })
            .filter_map(|view| Some((get_u64(view, "id")?, get_str(view, "name")?.to_string())))
            .collect())
    }

    async fn search(&self, jql: String, fields: &str) -> Result<Vec<Value>, DataSourceError> {
        let mut params = HashMap::new();
        params.insert("jql", jql);
        params.insert("fields", fields.to_string());
        self.rest.fetch_all(SEARCH, params, "issues").await
    }
}

pub(crate) async fn fetch_scope_change_chart(
    rest: &JiraRestClient,
    board_id: u64,
    sprint_id: u64,
) -> Result<ScopeChangeFeed, DataSourceError> {
    let mut params = HashMap::new();
    params.insert("rapidViewId", board_id.to_string());
    params.insert("sprintId", sprint_id.to_string());
    let payload = rest.fetch_json(SCOPE_CHANGE_CHART, &params).await?;
    map_scope_change_feed(&payload)
}

/// Joins `query` to `jql` unless it is blank.
pub(crate) fn and_query(jql: String, query: &str) -> String {
    let query = query.trim();
    if query.is_empty() {
        jql
    } else {
        format!("{jql} and ({query})")
    }
}

fn map_sprint(sprint: &Value) -> Option<Sprint> {
    Some(Sprint {
        id: get_u64(sprint, "id")?,
        name: get_str(sprint, "name")?.to_string(),
        state: get_str(sprint, "state").map(str::to_string),
        start_date: get_str(sprint, "startDate").and_then(parse_timestamp),
        end_date: get_str(sprint, "endDate").and_then(parse_timestamp),
        complete_date: get_str(sprint, "completeDate").and_then(parse_timestamp),
    })
}

pub(crate) fn sprint_window(sprint: &Sprint) -> Result<SprintWindow, DataSourceError> {
    match sprint.window() {
        Some(window) => Ok(window?),
        None => Err(DataSourceError::MissingSprintDates(sprint.id)),
    }
}

pub(crate) fn map_sprints(sprints: &[Value]) -> BTreeMap<u64, Sprint> {
    sprints
        .iter()
        .filter_map(map_sprint)
        .map(|sprint| (sprint.id, sprint))
        .collect()
}

#[async_trait::async_trait]
impl SprintDataSource for Jira6Client {
    async fn get_scrum_boards(&self) -> Result<BTreeMap<u64, String>, DataSourceError> {
        self.get_rapid_views(true).await
    }

    async fn get_kanban_boards(&self) -> Result<BTreeMap<u64, String>, DataSourceError> {
        self.get_rapid_views(false).await
    }

    async fn get_sprints(&self, board_id: u64) -> Result<BTreeMap<u64, Sprint>, DataSourceError> {
        let sprints = self
            .rest
            .fetch_all(
                &format!("rest/greenhopper/1.0/sprintquery/{board_id}"),
                HashMap::new(),
                "sprints",
            )
            .await?;
        Ok(map_sprints(&sprints))
    }

    async fn get_sprint_dates(
        &self,
        board_id: u64,
        sprint_id: u64,
    ) -> Result<SprintWindow, DataSourceError> {
        let mut params = HashMap::new();
        params.insert("rapidViewId", board_id.to_string());
        params.insert("sprintId", sprint_id.to_string());
        let payload = self.rest.fetch_json(SPRINT_REPORT, &params).await?;

        let sprint = payload
            .get("sprint")
            .and_then(map_sprint)
            .ok_or_else(|| DataSourceError::Parse("sprint report without sprint".to_string()))?;
        sprint_window(&sprint)
    }

    async fn get_issues(&self, _board_id: u64, sprint_id: u64) -> Result<Vec<Issue>, DataSourceError> {
        let issues = self
            .search(
                format!("issuetype = Sub-task and sprint = {sprint_id}"),
                "timetracking,resolutiondate",
            )
            .await?;
        issues.iter().map(map_issue).collect()
    }

    async fn get_effort_for_issues(
        &self,
        _board_id: u64,
        issue_keys: &[String],
    ) -> Result<HashMap<String, f64>, DataSourceError> {
        if issue_keys.is_empty() {
            return Ok(HashMap::new());
        }
        let issues = self
            .search(
                format!("issuekey in ({})", issue_keys.join(",")),
                "timetracking,resolutiondate",
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
        _board_id: u64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<WorklogEntry>, DataSourceError> {
        let jql = format!(
            "(resolved >= {start} or resolution = unresolved) and (created <= {end}) and (updated >= {start})",
            start = jql_timestamp(start),
            end = jql_timestamp(end),
        );
        let issues = self
            .search(and_query(jql, &self.burnup_issue_query), "worklog")
            .await?;
        Ok(map_worklogs(&issues))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::at;
    use serde_json::json;

    #[test]
    fn burnup_query_is_appended_when_present() {
        assert_eq!(and_query("a = 1".to_string(), "  "), "a = 1");
        assert_eq!(
            and_query("a = 1".to_string(), "issuetype = Support"),
            "a = 1 and (issuetype = Support)"
        );
    }

    #[test]
    fn sprint_report_with_none_completion_uses_planned_end() {
        let sprint = map_sprint(&json!({
            "id": 12,
            "name": "Sprint 12",
            "state": "ACTIVE",
            "startDate": "16/Feb/26 9:00 AM",
            "endDate": "27/Feb/26 5:00 PM",
            "completeDate": "None"
        }))
        .unwrap();

        let window = sprint_window(&sprint).unwrap();
        assert_eq!(window.start(), at(2026, 2, 16, 9));
        assert_eq!(window.end(), at(2026, 2, 27, 17));
    }

    #[test]
    fn sprint_without_dates_is_reported() {
        let sprints = map_sprints(&[json!({ "id": 3, "name": "Backlog grooming", "state": "FUTURE" })]);
        let err = sprint_window(&sprints[&3]).unwrap_err();
        assert!(matches!(err, DataSourceError::MissingSprintDates(3)));
    }
}
