pub mod burndown;
pub mod burnup;
pub mod chart_composer;
pub mod chart_plot;
pub mod chart_yaml;
pub mod data_source;
pub mod hours_yaml;
pub mod jira6;
pub mod jira7;
pub mod jira_api;
pub mod scope;
pub mod sprint_loader;
pub mod weekend_compression;
