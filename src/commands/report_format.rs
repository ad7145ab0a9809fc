use crate::domain::chart::{Annotation, ChartModel};

pub fn format_chart_report(title: &str, chart: &ChartModel) -> String {
    let totals = &chart.totals;

    let mut lines = Vec::new();
    lines.push(format!("Sprint Report: {title}"));
    lines.push(format!(
        "Sprint: {} - {}",
        chart.window.start().format("%Y-%m-%d %H:%M"),
        chart.window.end().format("%Y-%m-%d %H:%M")
    ));
    lines.push(String::new());
    lines.push("Burndown".to_string());
    lines.push(format!("Initial scope: {:.2} h", totals.initial_scope));
    lines.push(format!("Scope change: {:+.2} h", totals.scope_change));
    lines.push(format!("Final scope: {:.2} h", totals.final_scope));
    lines.push(format!("Remaining work: {:.2} h", totals.remaining_work));
    lines.push(format!("Behind ideal: {}", annotation_label(&chart.points_behind)));
    lines.push(String::new());
    lines.push("Burnup".to_string());
    lines.push(format!("Points per hour: {:.2}", totals.points_per_hour));
    lines.push(format!("Hours logged in sprint: {:.2}", totals.hours_in_sprint));
    lines.push(format!(
        "Hours logged outside sprint: {:.2}",
        totals.hours_outside_sprint
    ));
    lines.push(format!(
        "Projected burnup at sprint end: {:.2}",
        chart.projected_burnup_height
    ));
    lines.push(format!("Budget overrun: {}", annotation_label(&chart.budget_overrun)));

    lines.join("\n")
}

fn annotation_label(annotation: &Option<Annotation>) -> String {
    match annotation {
        Some(annotation) => annotation.label.clone(),
        None => "none".to_string(),
    }
}
