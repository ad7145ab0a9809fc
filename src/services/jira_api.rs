use std::collections::HashMap;
use std::env;
use std::fs;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::issue::{Issue, WorklogEntry};
use crate::domain::scope_change::{ColumnChange, ScopeChangeFeed, ScopeChangeRecord};
use crate::services::data_source::{DataSourceError, SprintDataSource};
use crate::services::jira6::Jira6Client;
use crate::services::jira7::Jira7Client;

const PAGE_SIZE: u64 = 1000;

/// Worklogs of support issues feed the burnup unless the config says otherwise.
pub const DEFAULT_BURNUP_ISSUE_QUERY: &str = "issuetype = Support";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JiraConfig {
    pub base_url: String,
    pub api_version: u8,
    /// Extra JQL restricting the issues whose worklogs feed the burnup.
    /// An explicit `null` removes the restriction.
    pub burnup_issue_query: Option<String>,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_version: 6,
            burnup_issue_query: Some(DEFAULT_BURNUP_ISSUE_QUERY.to_string()),
        }
    }
}

impl JiraConfig {
    pub fn from_yaml_file(filepath: &str) -> Result<Self, DataSourceError> {
        let contents = fs::read_to_string(filepath)
            .map_err(|err| DataSourceError::Other(format!("failed to read config: {err}")))?;
        serde_yaml::from_str(&contents)
            .map_err(|err| DataSourceError::Parse(format!("invalid config: {err}")))
    }
}

#[derive(Debug, Clone)]
pub struct AuthData {
    pub username: String,
    pub api_token: String,
}

impl AuthData {
    pub fn from_env() -> Result<Self, DataSourceError> {
        let username = env::var("JIRA_USERNAME").ok();
        let api_token = env::var("JIRA_API_TOKEN").ok();
        match (username, api_token) {
            (Some(username), Some(api_token)) => Ok(Self {
                username,
                api_token,
            }),
            _ => Err(DataSourceError::Unauthorized),
        }
    }
}

/// Creates the client matching the configured Jira version.
pub fn connect(
    config: JiraConfig,
    auth: AuthData,
) -> Result<Box<dyn SprintDataSource>, DataSourceError> {
    let burnup_issue_query = config.burnup_issue_query.clone().unwrap_or_default();
    let rest = JiraRestClient::new(&config.base_url, auth)?;
    match config.api_version {
        6 => Ok(Box::new(Jira6Client::new(rest, burnup_issue_query))),
        7 => Ok(Box::new(Jira7Client::new(rest, burnup_issue_query))),
        other => Err(DataSourceError::Other(format!(
            "unsupported Jira api_version {other}, expected 6 or 7"
        ))),
    }
}

/// Reads the config file and takes the credentials from the environment.
pub fn connect_with_config_file(
    filepath: &str,
) -> Result<Box<dyn SprintDataSource>, DataSourceError> {
    let config = JiraConfig::from_yaml_file(filepath)?;
    let auth = AuthData::from_env()?;
    connect(config, auth)
}

/// HTTP plumbing shared by the version specific clients.
pub struct JiraRestClient {
    base_url: String,
    auth: AuthData,
    client: Client,
}

impl JiraRestClient {
    pub fn new(base_url: &str, auth: AuthData) -> Result<Self, DataSourceError> {
        if base_url.is_empty() {
            return Err(DataSourceError::Other(
                "jira config is missing base_url".to_string(),
            ));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
            client: Client::new(),
        })
    }

    pub async fn fetch_json(
        &self,
        resource: &str,
        params: &HashMap<&str, String>,
    ) -> Result<Value, DataSourceError> {
        let url = format!("{}/{resource}", self.base_url);
        debug!("GET {url} {params:?}");

        let response = self
            .client
            .get(&url)
            .query(params)
            .basic_auth(
                self.auth.username.clone(),
                Some(self.auth.api_token.clone()),
            )
            .send()
            .await
            .map_err(|_| DataSourceError::Connection)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(DataSourceError::Unauthorized);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(DataSourceError::NotFound);
        }
        if !status.is_success() {
            return Err(DataSourceError::Connection);
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| DataSourceError::Parse(err.to_string()))
    }

    /// Follows `startAt`/`maxResults`/`total` (or `isLast`) pagination and
    /// collects the array found under `items_key` of every page.
    pub async fn fetch_all(
        &self,
        resource: &str,
        mut params: HashMap<&str, String>,
        items_key: &str,
    ) -> Result<Vec<Value>, DataSourceError> {
        params.insert("startAt", "0".to_string());
        params.insert("maxResults", PAGE_SIZE.to_string());

        let mut collected = Vec::new();
        loop {
            let payload = self.fetch_json(resource, &params).await?;

            let items = payload
                .get(items_key)
                .and_then(|value| value.as_array())
                .ok_or_else(|| DataSourceError::Parse(format!("missing '{items_key}' array")))?;
            collected.extend(items.iter().cloned());

            if payload
                .get("isLast")
                .and_then(|value| value.as_bool())
                .unwrap_or(false)
            {
                break;
            }

            let start_at = payload.get("startAt").and_then(|value| value.as_u64());
            let max_results = payload.get("maxResults").and_then(|value| value.as_u64());
            let total = payload.get("total").and_then(|value| value.as_u64());

            match (start_at, max_results, total) {
                (Some(start_at), Some(max_results), Some(total)) if max_results > 0 => {
                    let next_start_at = start_at.saturating_add(max_results);
                    if next_start_at >= total {
                        break;
                    }
                    params.insert("startAt", next_start_at.to_string());
                }
                (Some(start_at), Some(max_results), None)
                    if max_results > 0 && items.len() as u64 == max_results =>
                {
                    params.insert("startAt", start_at.saturating_add(max_results).to_string());
                }
                _ => break,
            }
        }

        Ok(collected)
    }
}

pub(crate) fn jql_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format("\"%Y-%m-%d %H:%M\"").to_string()
}

pub(crate) fn get_u64(value: &Value, key: &str) -> Option<u64> {
    value.get(key).and_then(|value| match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.parse().ok(),
        _ => None,
    })
}

pub(crate) fn get_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(|value| value.as_str())
}

/// Parses the timestamp formats Jira uses into local wall-clock time.
///
/// Zoned timestamps are converted to the local zone; the greenhopper sprint
/// report format (`20/Mar/16 9:00 PM`) is already local.
pub(crate) fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(zoned) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(zoned.with_timezone(&Local).naive_local());
    }
    if let Ok(zoned) = DateTime::parse_from_rfc3339(text) {
        return Some(zoned.with_timezone(&Local).naive_local());
    }
    for format in ["%d/%b/%y %I:%M %p", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(local) = NaiveDateTime::parse_from_str(text, format) {
            return Some(local);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Greenhopper chart timestamps are epoch milliseconds whose UTC wall clock
/// reads as the board's local time.
pub(crate) fn parse_chart_timestamp(millis: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis).map(|utc| utc.naive_utc())
}

fn chart_timestamp_field(value: &Value, key: &str) -> Option<NaiveDateTime> {
    value
        .get(key)
        .and_then(|value| match value {
            Value::Number(number) => number.as_i64(),
            Value::String(text) => text.parse().ok(),
            _ => None,
        })
        .and_then(parse_chart_timestamp)
}

pub(crate) fn map_issue(issue: &Value) -> Result<Issue, DataSourceError> {
    let key = get_str(issue, "key")
        .ok_or_else(|| DataSourceError::Parse("issue without key".to_string()))?;
    let fields = issue
        .get("fields")
        .ok_or_else(|| DataSourceError::Parse(format!("issue {key} without fields")))?;

    Ok(Issue {
        key: key.to_string(),
        resolution_date: get_str(fields, "resolutiondate").and_then(parse_timestamp),
        original_estimate_seconds: original_estimate_seconds(fields),
    })
}

fn original_estimate_seconds(fields: &Value) -> Option<f64> {
    fields
        .get("timetracking")
        .and_then(|timetracking| timetracking.get("originalEstimateSeconds"))
        .and_then(|value| value.as_f64())
}

pub(crate) fn map_efforts(issues: &[Value]) -> HashMap<String, f64> {
    issues
        .iter()
        .filter_map(|issue| {
            let key = get_str(issue, "key")?;
            let effort = issue
                .get("fields")
                .and_then(original_estimate_seconds)
                .unwrap_or(0.0);
            Some((key.to_string(), effort))
        })
        .collect()
}

/// Flattens the worklogs of every issue. Worklogs without a readable
/// creation time cannot be placed on the chart and are left out.
pub(crate) fn map_worklogs(issues: &[Value]) -> Vec<WorklogEntry> {
    let mut entries = Vec::new();
    for issue in issues {
        let Some(key) = get_str(issue, "key") else {
            continue;
        };
        let worklogs = issue
            .get("fields")
            .and_then(|fields| fields.get("worklog"))
            .and_then(|worklog| worklog.get("worklogs"))
            .and_then(|worklogs| worklogs.as_array());
        for worklog in worklogs.into_iter().flatten() {
            let Some(created) = get_str(worklog, "created").and_then(parse_timestamp) else {
                debug!("ignoring worklog of {key} without creation time");
                continue;
            };
            entries.push(WorklogEntry {
                parent_issue_key: key.to_string(),
                created,
                time_spent_seconds: worklog
                    .get("timeSpentSeconds")
                    .and_then(|value| value.as_f64())
                    .unwrap_or(0.0),
            });
        }
    }
    entries
}

pub(crate) fn map_scope_change_feed(payload: &Value) -> Result<ScopeChangeFeed, DataSourceError> {
    let changes = payload
        .get("changes")
        .and_then(|value| value.as_object())
        .ok_or_else(|| DataSourceError::Parse("scope change chart without changes".to_string()))?;

    let mut mapped_changes = Vec::with_capacity(changes.len());
    for (timestamp, records) in changes {
        let timestamp = timestamp
            .parse::<i64>()
            .ok()
            .and_then(parse_chart_timestamp)
            .ok_or_else(|| DataSourceError::Parse(format!("invalid change timestamp {timestamp}")))?;
        let records = records
            .as_array()
            .map(|records| records.iter().filter_map(map_scope_change_record).collect())
            .unwrap_or_default();
        mapped_changes.push((timestamp, records));
    }
    mapped_changes.sort_by_key(|(timestamp, _)| *timestamp);

    let issue_to_parent_keys = payload
        .get("issueToParentKeys")
        .and_then(|value| value.as_object())
        .map(|parents| {
            parents
                .iter()
                .map(|(key, parent)| (key.clone(), parent_keys(parent)))
                .collect()
        })
        .unwrap_or_default();

    Ok(ScopeChangeFeed {
        start_time: chart_timestamp_field(payload, "startTime"),
        now: chart_timestamp_field(payload, "now"),
        changes: mapped_changes,
        issue_to_parent_keys,
    })
}

fn map_scope_change_record(record: &Value) -> Option<ScopeChangeRecord> {
    let key = get_str(record, "key")?;
    let column = record.get("column").map(|column| ColumnChange {
        done: column.get("done").and_then(|value| value.as_bool()),
        not_done: column.get("notDone").and_then(|value| value.as_bool()),
    });
    Some(ScopeChangeRecord {
        key: key.to_string(),
        column,
        added: record.get("added").and_then(|value| value.as_bool()),
    })
}

fn parent_keys(parent: &Value) -> Vec<String> {
    match parent {
        Value::String(key) if !key.is_empty() => vec![key.clone()],
        Value::Array(keys) => keys
            .iter()
            .filter_map(|key| key.as_str())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}
