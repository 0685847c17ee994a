//! Static dashboard figures.
//!
//! These values are illustrative. Nothing in the workspace measures or computes them.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: &'static str,
    pub delta: Option<&'static str>,
}

pub const SIDEBAR_METRICS: [MetricCard; 3] = [
    MetricCard { label: "CTR Improvement", value: "+15%", delta: Some("2% increase") },
    MetricCard { label: "Revenue Lift", value: "+8%", delta: Some("$2M annually") },
    MetricCard { label: "Diversity Score", value: "0.82", delta: Some("High") },
];

pub const FOCUS_AREAS: [&str; 5] = [
    "Collaborative Filtering",
    "Deep Learning Re-ranking",
    "Cold Start Mitigation",
    "Diversity & Fairness",
    "A/B Testing Strategy",
];

pub const MODEL_PERFORMANCE: [MetricCard; 4] = [
    MetricCard { label: "Prediction Accuracy", value: "92%", delta: None },
    MetricCard { label: "CTR Improvement", value: "15%", delta: None },
    MetricCard { label: "Diversity Score", value: "0.82", delta: None },
    MetricCard { label: "Revenue Impact", value: "$2M", delta: None },
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DashboardMetrics {
    pub illustrative: bool,
    pub sidebar: Vec<MetricCard>,
    pub focus_areas: Vec<&'static str>,
    pub model_performance: Vec<MetricCard>,
}

pub fn dashboard_metrics() -> DashboardMetrics {
    DashboardMetrics {
        illustrative: true,
        sidebar: SIDEBAR_METRICS.to_vec(),
        focus_areas: FOCUS_AREAS.to_vec(),
        model_performance: MODEL_PERFORMANCE.to_vec(),
    }
}
