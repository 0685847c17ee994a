use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use recommender_core::Catalog;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    catalog: Arc<Catalog>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub catalog: HealthCheck,
    pub checked_at: String,
}

pub fn router(catalog: Arc<Catalog>) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { catalog })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let catalog = catalog_check(&state.catalog);
    let ready = catalog.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "recommender-server runtime initialized".to_string(),
        },
        catalog,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

fn catalog_check(catalog: &Catalog) -> HealthCheck {
    if let Err(error) = catalog.validate() {
        return HealthCheck { status: "degraded", detail: format!("catalog is malformed: {error}") };
    }
    if catalog.is_empty() {
        return HealthCheck {
            status: "degraded",
            detail: "catalog has no products, recommendations will be empty".to_string(),
        };
    }

    HealthCheck {
        status: "ready",
        detail: format!(
            "{} products across {} categories",
            catalog.len(),
            catalog.categories().len()
        ),
    }
}
