use clap::{Parser, Subcommand};
use clap_complete::Shell;

pub const DEFAULT_HOURS_FILE: &str = "sprint_hours.yaml";

#[derive(Parser)]
#[command(author, version, about)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the boards of the Jira instance
    Boards {
        /// Path to Jira config YAML
        #[arg(short, long)]
        config: String,
        /// List kanban boards instead of scrum boards
        #[arg(long)]
        kanban: bool,
    },
    /// List the sprints of a board
    Sprints {
        /// Path to Jira config YAML
        #[arg(short, long)]
        config: String,
        /// Board id
        #[arg(short, long)]
        board: u64,
    },
    /// Store availability and burnup budget of a sprint
    SetHours {
        /// Board id
        #[arg(short, long)]
        board: u64,
        /// Sprint id
        #[arg(short, long)]
        sprint: u64,
        /// Hours the team is available in the sprint
        #[arg(short, long)]
        availability: Option<f64>,
        /// Hours of the availability budgeted for support work
        #[arg(short = 'u', long)]
        burnup_budget: Option<f64>,
        /// Hours YAML file
        #[arg(long, default_value = DEFAULT_HOURS_FILE)]
        hours: String,
    },
    /// Plot the burn-up-and-down chart of a sprint into a PNG
    PlotSprint {
        /// Path to Jira config YAML
        #[arg(short, long)]
        config: String,
        /// Board id
        #[arg(short, long)]
        board: u64,
        /// Sprint id
        #[arg(short, long)]
        sprint: u64,
        /// Output PNG file
        #[arg(short, long)]
        output: String,
        /// Hours YAML file
        #[arg(long, default_value = DEFAULT_HOURS_FILE)]
        hours: String,
        /// Override the stored availability
        #[arg(short, long)]
        availability: Option<f64>,
        /// Override the stored burnup budget
        #[arg(short = 'u', long)]
        burnup_budget: Option<f64>,
        /// Board whose worklogs feed the burnup, defaults to the sprint board
        #[arg(short, long)]
        worklog_board: Option<u64>,
        /// Also write the chart data to this YAML file
        #[arg(short, long)]
        data: Option<String>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_sprint_defaults_hours_file_and_worklog_board() {
        let args = CliArgs::parse_from([
            "burnupdown",
            "plot-sprint",
            "-c",
            "jira.yaml",
            "-b",
            "12",
            "-s",
            "34",
            "-o",
            "chart.png",
        ]);

        if let Commands::PlotSprint {
            hours,
            worklog_board,
            availability,
            data,
            ..
        } = args.command
        {
            assert_eq!(hours, DEFAULT_HOURS_FILE);
            assert_eq!(worklog_board, None);
            assert_eq!(availability, None);
            assert_eq!(data, None);
        } else {
            panic!("expected plot-sprint command");
        }
    }

    #[test]
    fn set_hours_parses_both_values() {
        let args = CliArgs::parse_from([
            "burnupdown",
            "set-hours",
            "-b",
            "12",
            "-s",
            "34",
            "--availability",
            "80",
            "--burnup-budget",
            "12.5",
        ]);

        if let Commands::SetHours {
            board,
            sprint,
            availability,
            burnup_budget,
            ..
        } = args.command
        {
            assert_eq!((board, sprint), (12, 34));
            assert_eq!(availability, Some(80.0));
            assert_eq!(burnup_budget, Some(12.5));
        } else {
            panic!("expected set-hours command");
        }
    }

    #[test]
    fn sprints_rejects_non_numeric_board_ids() {
        let result = CliArgs::try_parse_from(["burnupdown", "sprints", "-c", "jira.yaml", "-b", "abc"]);
        assert!(result.is_err());
    }
}
