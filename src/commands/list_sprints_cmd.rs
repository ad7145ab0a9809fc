use chrono::NaiveDateTime;

use crate::commands::base_commands::Commands;
use crate::services::jira_api::connect_with_config_file;

fn format_date(date: Option<NaiveDateTime>) -> String {
    date.map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub async fn list_sprints_command(cmd: Commands) {
    if let Commands::Sprints { config, board } = cmd {
        let data_source = match connect_with_config_file(&config) {
            Ok(data_source) => data_source,
            Err(e) => {
                eprintln!("Failed to connect to Jira: {e:?}");
                return;
            }
        };

        match data_source.get_sprints(board).await {
            Ok(sprints) => {
                for sprint in sprints.values() {
                    println!(
                        "{}\t{}\t{}\t{} - {}",
                        sprint.id,
                        sprint.name,
                        sprint.state.as_deref().unwrap_or("-"),
                        format_date(sprint.start_date),
                        format_date(sprint.complete_date.or(sprint.end_date)),
                    );
                }
            }
            Err(e) => eprintln!("Failed to get sprints of board {board}: {e:?}"),
        }
    }
}
