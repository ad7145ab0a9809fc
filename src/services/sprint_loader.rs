use chrono::Local;
use tracing::debug;

use crate::domain::snapshot::SprintSnapshot;
use crate::services::data_source::{DataSourceError, SprintDataSource};
use crate::services::scope::classify_scope_changes;

/// Fetches everything a sprint chart needs from a data source.
pub struct SprintLoader {
    data_source: Box<dyn SprintDataSource>,
}

impl SprintLoader {
    pub fn new(data_source: Box<dyn SprintDataSource>) -> Self {
        Self { data_source }
    }

    /// Worklogs are read from `worklog_board_id`, which may differ from the
    /// sprint board when support work is tracked elsewhere.
    pub async fn load_sprint_snapshot(
        &self,
        board_id: u64,
        sprint_id: u64,
        worklog_board_id: u64,
    ) -> Result<SprintSnapshot, DataSourceError> {
        let window = self.data_source.get_sprint_dates(board_id, sprint_id).await?;
        debug!(
            "loading sprint {sprint_id} of board {board_id} ({} - {})",
            window.start(),
            window.end()
        );

        let scope_feed = self
            .data_source
            .get_scope_change_burndown_chart(board_id, sprint_id)
            .await?;
        let now = scope_feed
            .now
            .unwrap_or_else(|| Local::now().naive_local());

        let scope_changes = classify_scope_changes(&window, &scope_feed);
        let efforts = self
            .data_source
            .get_effort_for_issues(board_id, &scope_changes.issue_keys)
            .await?;

        let issues = self.data_source.get_issues(board_id, sprint_id).await?;
        let worklogs = self
            .data_source
            .get_issue_worklogs(worklog_board_id, window.start(), window.end())
            .await?;

        Ok(SprintSnapshot {
            window,
            now,
            issues,
            worklogs,
            scope_feed,
            efforts,
        })
    }
}
