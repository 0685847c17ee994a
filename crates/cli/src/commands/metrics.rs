use recommender_core::metrics::{dashboard_metrics, DashboardMetrics};

use crate::commands::{to_pretty_json, CommandResult};

pub fn run(json: bool) -> CommandResult {
    let metrics = dashboard_metrics();
    if json {
        return to_pretty_json("metrics", &metrics);
    }
    CommandResult::output(render_human(&metrics))
}

fn render_human(metrics: &DashboardMetrics) -> String {
    let mut lines = vec!["product metrics (illustrative):".to_string()];
    for card in &metrics.sidebar {
        match card.delta {
            Some(delta) => lines.push(format!("- {}: {} ({delta})", card.label, card.value)),
            None => lines.push(format!("- {}: {}", card.label, card.value)),
        }
    }

    lines.push("focus areas:".to_string());
    lines.extend(metrics.focus_areas.iter().map(|area| format!("- {area}")));

    lines.push("model performance (illustrative):".to_string());
    lines.extend(
        metrics.model_performance.iter().map(|card| format!("- {}: {}", card.label, card.value)),
    );

    lines.join("\n")
}
