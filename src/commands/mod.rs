pub mod base_commands;
pub mod completions_cmd;
pub mod list_boards_cmd;
pub mod list_sprints_cmd;
pub mod plot_sprint_cmd;
pub mod report_format;
pub mod set_hours_cmd;
