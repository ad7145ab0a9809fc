use crate::commands::base_commands::Commands;
use crate::services::jira_api::connect_with_config_file;

pub async fn list_boards_command(cmd: Commands) {
    if let Commands::Boards { config, kanban } = cmd {
        let data_source = match connect_with_config_file(&config) {
            Ok(data_source) => data_source,
            Err(e) => {
                eprintln!("Failed to connect to Jira: {e:?}");
                return;
            }
        };

        let boards = if kanban {
            data_source.get_kanban_boards().await
        } else {
            data_source.get_scrum_boards().await
        };
        match boards {
            Ok(boards) => {
                for (id, name) in boards {
                    println!("{id}\t{name}");
                }
            }
            Err(e) => eprintln!("Failed to get boards: {e:?}"),
        }
    }
}
