//! Dashboard routes.
//!
//! HTML Endpoints:
//! - `GET  /`                         - dashboard page; `?recommend=1` renders recommendations
//!
//! JSON API Endpoints:
//! - `GET  /api/v1/catalog`           - catalog categories and products
//! - `POST /api/v1/recommendations`   - rank products for a recommendation request
//! - `GET  /api/v1/metrics`           - static dashboard metrics

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use recommender_core::metrics::{dashboard_metrics, DashboardMetrics};
use recommender_core::{
    ApplicationError, Catalog, InterfaceError, Recommendation, RecommendationEngine,
    RecommendationRequest, RecommendationResponse, Selection,
};
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct DashboardState {
    catalog: Arc<Catalog>,
    engine: RecommendationEngine,
    templates: Arc<Tera>,
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Query parameters submitted by the dashboard form
#[derive(Debug, Deserialize, Default)]
pub struct DashboardQuery {
    pub category: Option<String>,
    pub viewed: Option<String>,
    pub recommend: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationCard {
    pub name: String,
    pub category: String,
    pub price: String,
    pub rating: f64,
    pub sales: String,
    pub match_pct: u32,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub correlation_id: String,
}

impl From<&InterfaceError> for ApiError {
    fn from(error: &InterfaceError) -> Self {
        Self {
            error: error.user_message().to_string(),
            correlation_id: error.correlation_id().to_string(),
        }
    }
}

impl From<&Recommendation> for RecommendationCard {
    fn from(recommendation: &Recommendation) -> Self {
        let product = &recommendation.product;
        Self {
            name: product.name.clone(),
            category: recommendation.category.clone(),
            price: product.display_price(),
            rating: product.rating,
            sales: product.display_sales(),
            match_pct: recommendation.match_pct(),
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Loads dashboard templates from disk, falling back to the embedded copy.
fn init_templates() -> Arc<Tera> {
    let mut tera = match Tera::new("templates/dashboard/**/*") {
        Ok(t) => t,
        Err(e) => {
            warn!(error = %e, "Failed to load dashboard templates from filesystem, using embedded templates");
            Tera::default()
        }
    };

    if !tera.get_template_names().any(|name| name == "index.html") {
        if let Err(e) = tera
            .add_raw_template("index.html", include_str!("../../../templates/dashboard/index.html"))
        {
            error!(error = %e, "embedded dashboard template failed to parse");
        }
    }

    Arc::new(tera)
}

pub fn router(catalog: Arc<Catalog>, engine: RecommendationEngine) -> Router {
    router_with_templates(catalog, engine, init_templates())
}

fn router_with_templates(
    catalog: Arc<Catalog>,
    engine: RecommendationEngine,
    templates: Arc<Tera>,
) -> Router {
    Router::new()
        // HTML routes
        .route("/", get(dashboard_page))
        // JSON API routes
        .route("/api/v1/catalog", get(get_catalog))
        .route("/api/v1/recommendations", post(create_recommendations))
        .route("/api/v1/metrics", get(get_metrics))
        .with_state(DashboardState { catalog, engine, templates })
}

// ---------------------------------------------------------------------------
// HTML Handlers
// ---------------------------------------------------------------------------

/// Mirrors the dashboard widgets: the viewed product must belong to the selected
/// category, otherwise the category's first product is used.
fn widget_request(catalog: &Catalog, query: &DashboardQuery) -> RecommendationRequest {
    let category = query.category.as_deref().and_then(|name| catalog.category(name));
    let category = category.or_else(|| catalog.categories().first());

    let viewed = query.viewed.as_deref().filter(|viewed| {
        category.is_some_and(|category| {
            category.products.iter().any(|product| product.name == *viewed)
        })
    });

    RecommendationRequest {
        category: category.map(|category| category.name.clone()),
        viewed_product: viewed.map(str::to_owned),
        top_n: None,
        seed: None,
    }
}

async fn dashboard_page(
    Query(query): Query<DashboardQuery>,
    State(state): State<DashboardState>,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    let correlation_id = Uuid::new_v4().to_string();
    let request = widget_request(&state.catalog, &query);
    let requested = query.recommend.is_some();

    let (selection, cards) = if requested {
        let response = state.engine.recommend(&state.catalog, &request);
        log_response(&correlation_id, "dashboard", &response);
        let cards: Vec<RecommendationCard> =
            response.recommendations.iter().map(RecommendationCard::from).collect();
        (response.selection, cards)
    } else {
        (Selection::resolve(&state.catalog, &request), Vec::new())
    };

    let category_products: Vec<&str> = selection
        .category
        .as_deref()
        .and_then(|name| state.catalog.category(name))
        .map(|category| category.products.iter().map(|product| product.name.as_str()).collect())
        .unwrap_or_default();

    let metrics: DashboardMetrics = dashboard_metrics();

    let mut context = Context::new();
    context.insert("categories", &state.catalog.category_names().collect::<Vec<_>>());
    context.insert("selected_category", &selection.category);
    context.insert("category_products", &category_products);
    context.insert("selected_viewed", &selection.viewed_product);
    context.insert("requested", &requested);
    context.insert("recommendations", &cards);
    context.insert("metrics", &metrics);
    context.insert(
        "branding",
        &serde_json::json!({
            "title": "Smart Product Recommender",
            "tagline": "AI-Powered E-Commerce Personalization Engine",
            "footer_title": "AI PM Portfolio Project",
        }),
    );

    let html = state.templates.render("index.html", &context).map_err(|e| {
        let interface = ApplicationError::Rendering(e.to_string()).into_interface(correlation_id);
        error!(
            event_name = "server.dashboard.render_failed",
            correlation_id = %interface.correlation_id(),
            error = ?e,
            "dashboard template failed to render"
        );
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(format!(
                "<h1>Dashboard Unavailable</h1><p>{}</p><p>Reference: {}</p>",
                interface.user_message(),
                interface.correlation_id()
            )),
        )
    })?;

    Ok(Html(html))
}

// ---------------------------------------------------------------------------
// JSON API Handlers
// ---------------------------------------------------------------------------

async fn get_catalog(State(state): State<DashboardState>) -> Json<Catalog> {
    Json(state.catalog.as_ref().clone())
}

async fn get_metrics() -> Json<DashboardMetrics> {
    Json(dashboard_metrics())
}

async fn create_recommendations(
    State(state): State<DashboardState>,
    body: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<Json<RecommendationResponse>, (StatusCode, Json<ApiError>)> {
    let correlation_id = Uuid::new_v4().to_string();

    let Json(request) = body.map_err(|rejection| {
        let interface = ApplicationError::InvalidRequest(rejection.body_text())
            .into_interface(correlation_id.clone());
        warn!(
            event_name = "server.api.recommendations_rejected",
            correlation_id = %correlation_id,
            error = %interface,
            "recommendation request rejected"
        );
        (rejection.status(), Json(ApiError::from(&interface)))
    })?;

    let response = state.engine.recommend(&state.catalog, &request);
    log_response(&correlation_id, "api", &response);
    Ok(Json(response))
}

fn log_response(correlation_id: &str, surface: &'static str, response: &RecommendationResponse) {
    info!(
        event_name = "server.recommendations.generated",
        correlation_id = %correlation_id,
        surface,
        category = response.selection.category.as_deref().unwrap_or("none"),
        viewed_product = response.selection.viewed_product.as_deref().unwrap_or("none"),
        top_n = response.top_n,
        recommendation_count = response.recommendations.len(),
        "recommendations generated"
    );
}
