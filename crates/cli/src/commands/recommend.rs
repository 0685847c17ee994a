use recommender_core::config::LoadOptions;
use recommender_core::{RecommendationEngine, RecommendationRequest, RecommendationResponse};
use tracing::info;

use crate::commands::{load_catalog, to_pretty_json, CommandResult};

#[derive(Debug, Clone, Default)]
pub struct RecommendArgs {
    pub category: Option<String>,
    pub viewed: Option<String>,
    pub top_n: Option<usize>,
    pub json: bool,
}

pub fn run(options: LoadOptions, args: RecommendArgs) -> CommandResult {
    let (config, catalog) = match load_catalog("recommend", options) {
        Ok(loaded) => loaded,
        Err(failure) => return failure,
    };

    let engine = RecommendationEngine::from_config(&config.recommender);
    let request = RecommendationRequest {
        category: args.category,
        viewed_product: args.viewed,
        top_n: args.top_n,
        seed: None,
    };
    let response = engine.recommend(&catalog, &request);

    info!(
        event_name = "cli.recommend.completed",
        category = response.selection.category.as_deref().unwrap_or("none"),
        viewed_product = response.selection.viewed_product.as_deref().unwrap_or("none"),
        recommendation_count = response.recommendations.len(),
        "recommendations generated"
    );

    if args.json {
        return to_pretty_json("recommend", &response);
    }
    CommandResult::output(render_human(&response))
}

fn render_human(response: &RecommendationResponse) -> String {
    let seed = response.seed.map(|seed| seed.to_string()).unwrap_or_else(|| "entropy".to_string());
    let mut lines = vec![format!(
        "recommended for you (category: {}, viewed: {}, seed: {seed})",
        response.selection.category.as_deref().unwrap_or("<none>"),
        response.selection.viewed_product.as_deref().unwrap_or("<none>"),
    )];

    if response.recommendations.is_empty() {
        lines.push("- no recommendations available".to_string());
    }

    for (rank, recommendation) in response.recommendations.iter().enumerate() {
        let product = &recommendation.product;
        lines.push(format!(
            "{}. {} [{}] {} | {} / 5.0 | {} sold | match {}%",
            rank + 1,
            product.name,
            recommendation.category,
            product.display_price(),
            product.rating,
            product.display_sales(),
            recommendation.match_pct(),
        ));
    }

    lines.join("\n")
}
