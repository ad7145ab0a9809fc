use crate::commands::base_commands::Commands;
use crate::commands::report_format::format_chart_report;
use crate::services::chart_composer::compute_chart;
use crate::services::chart_plot::write_chart_png;
use crate::services::chart_yaml::serialize_chart_to_yaml;
use crate::services::hours_yaml::{HoursStore, validate_hours};
use crate::services::jira_api::connect_with_config_file;
use crate::services::sprint_loader::SprintLoader;

pub async fn plot_sprint_command(cmd: Commands) {
    if let Commands::PlotSprint {
        config,
        board,
        sprint,
        output,
        hours,
        availability,
        burnup_budget,
        worklog_board,
        data,
    } = cmd
    {
        let mut sprint_hours = match HoursStore::load(&hours) {
            Ok(store) => store.get(board, sprint),
            Err(e) => {
                eprintln!("Failed to load hours: {e:?}");
                return;
            }
        };
        if let Some(availability) = availability {
            match validate_hours("availability", availability) {
                Ok(availability) => sprint_hours.availability = availability,
                Err(e) => {
                    eprintln!("Failed to apply hours: {e:?}");
                    return;
                }
            }
        }
        if let Some(burnup_budget) = burnup_budget {
            match validate_hours("burnup_budget", burnup_budget) {
                Ok(burnup_budget) => sprint_hours.burnup_budget = burnup_budget,
                Err(e) => {
                    eprintln!("Failed to apply hours: {e:?}");
                    return;
                }
            }
        }

        let data_source = match connect_with_config_file(&config) {
            Ok(data_source) => data_source,
            Err(e) => {
                eprintln!("Failed to connect to Jira: {e:?}");
                return;
            }
        };
        let loader = SprintLoader::new(data_source);
        let snapshot = match loader
            .load_sprint_snapshot(board, sprint, worklog_board.unwrap_or(board))
            .await
        {
            Ok(snapshot) => snapshot,
            Err(e) => {
                eprintln!("Failed to load sprint data: {e:?}");
                return;
            }
        };

        let chart = match compute_chart(&snapshot, &sprint_hours) {
            Ok(chart) => chart,
            Err(e) => {
                eprintln!("Failed to compute sprint chart: {e:?}");
                return;
            }
        };

        let title = format!("Board {board}, sprint {sprint}");
        if let Err(e) = write_chart_png(&output, &title, &chart).await {
            eprintln!("Failed to plot sprint chart: {e:?}");
            return;
        }

        if let Some(data) = data {
            let mut buffer = Vec::new();
            if let Err(e) = serialize_chart_to_yaml(&mut buffer, &chart) {
                eprintln!("Failed to serialize chart to YAML: {e:?}");
                return;
            }
            if let Err(e) = tokio::fs::write(&data, buffer).await {
                eprintln!("Failed to write chart data: {e:?}");
                return;
            }
            println!("Chart data written to {data}");
        }

        println!("{}", format_chart_report(&title, &chart));
        println!("Sprint chart written to {output}");
    }
}
