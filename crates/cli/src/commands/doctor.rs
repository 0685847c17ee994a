use recommender_core::config::{AppConfig, LoadOptions};
use recommender_core::{Catalog, RecommendationEngine, RecommendationRequest};
use serde::Serialize;

use crate::commands::{CommandResult, EXIT_CATALOG_FAILURE, EXIT_CONFIG_FAILURE};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(options: LoadOptions, json_output: bool) -> CommandResult {
    let report = build_report(options);
    let exit_code = doctor_exit_code(&report);

    if json_output {
        let output = serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
        return CommandResult { exit_code, output };
    }

    CommandResult { exit_code, output: render_human(&report) }
}

fn build_report(options: LoadOptions) -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(options) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            match config.recommender.load_catalog() {
                Ok(catalog) => {
                    checks.push(check_catalog(&config, &catalog));
                    checks.push(check_scoring(&config, &catalog));
                }
                Err(error) => {
                    checks.push(DoctorCheck {
                        name: "catalog_load",
                        status: CheckStatus::Fail,
                        details: error.to_string(),
                    });
                    checks.push(skipped("scoring_dry_run", "catalog did not load"));
                }
            }
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(skipped("catalog_load", "configuration did not load"));
            checks.push(skipped("scoring_dry_run", "configuration did not load"));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

/// Config failures exit with 2; catalog and scoring failures exit with 3.
fn doctor_exit_code(report: &DoctorReport) -> u8 {
    let failed = |name: &str| {
        report.checks.iter().any(|check| check.name == name && check.status == CheckStatus::Fail)
    };

    if failed("config_validation") {
        EXIT_CONFIG_FAILURE
    } else if report.overall_status == CheckStatus::Pass {
        0
    } else {
        EXIT_CATALOG_FAILURE
    }
}

fn skipped(name: &'static str, reason: &str) -> DoctorCheck {
    DoctorCheck { name, status: CheckStatus::Skipped, details: format!("skipped because {reason}") }
}

fn check_catalog(config: &AppConfig, catalog: &Catalog) -> DoctorCheck {
    let source = config
        .recommender
        .catalog_path
        .as_ref()
        .map(|path| format!("`{}`", path.display()))
        .unwrap_or_else(|| "embedded demo catalog".to_string());

    if catalog.is_empty() {
        return DoctorCheck {
            name: "catalog_load",
            status: CheckStatus::Fail,
            details: format!("{source} has no products, recommendations would always be empty"),
        };
    }

    DoctorCheck {
        name: "catalog_load",
        status: CheckStatus::Pass,
        details: format!(
            "{source}: {} categories, {} products",
            catalog.categories().len(),
            catalog.len()
        ),
    }
}

fn check_scoring(config: &AppConfig, catalog: &Catalog) -> DoctorCheck {
    let engine = RecommendationEngine::from_config(&config.recommender);
    let response = engine.recommend(catalog, &RecommendationRequest::new());

    let viewed = response.selection.viewed_product.as_deref().unwrap_or_default();
    let excluded = response.recommendations.iter().all(|r| r.product.name != viewed);
    let ordered = response.recommendations.windows(2).all(|pair| pair[0].score >= pair[1].score);
    let bounded = response.recommendations.len() <= response.top_n;

    if excluded && ordered && bounded {
        DoctorCheck {
            name: "scoring_dry_run",
            status: CheckStatus::Pass,
            details: format!(
                "{} recommendations for `{viewed}` (top_n {})",
                response.recommendations.len(),
                response.top_n
            ),
        }
    } else {
        DoctorCheck {
            name: "scoring_dry_run",
            status: CheckStatus::Fail,
            details: "ranking invariants did not hold for the dry run".to_string(),
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
