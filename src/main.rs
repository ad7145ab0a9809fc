use burnupdown::commands::base_commands::{CliArgs, Commands};
use burnupdown::commands::completions_cmd::completions_command;
use burnupdown::commands::list_boards_cmd::list_boards_command;
use burnupdown::commands::list_sprints_cmd::list_sprints_command;
use burnupdown::commands::plot_sprint_cmd::plot_sprint_command;
use burnupdown::commands::set_hours_cmd::set_hours_command;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Diagnostics go to stderr; `RUST_LOG` overrides the default level.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    match args.command {
        cmd @ Commands::Boards { .. } => list_boards_command(cmd).await,
        cmd @ Commands::Sprints { .. } => list_sprints_command(cmd).await,
        cmd @ Commands::SetHours { .. } => set_hours_command(cmd),
        cmd @ Commands::PlotSprint { .. } => plot_sprint_command(cmd).await,
        cmd @ Commands::Completions { .. } => completions_command(cmd),
    }
}
