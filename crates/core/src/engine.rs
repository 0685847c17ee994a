//! Recommendation engine: turns a shopper's request into a ranked response.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::catalog::Catalog;
use crate::config::RecommenderConfig;
use crate::request::{RecommendationRequest, RecommendationResponse, Selection};
use crate::scoring::{ScoreCalculator, DEFAULT_SEED, DEFAULT_TOP_N};

#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    calculator: ScoreCalculator,
    default_top_n: usize,
    seed: Option<u64>,
}

impl RecommendationEngine {
    pub fn new() -> Self {
        Self {
            calculator: ScoreCalculator::default(),
            default_top_n: DEFAULT_TOP_N,
            seed: Some(DEFAULT_SEED),
        }
    }

    pub fn from_config(config: &RecommenderConfig) -> Self {
        Self {
            calculator: ScoreCalculator::with_rating_weight(config.rating_weight),
            default_top_n: config.top_n,
            seed: config.seed,
        }
    }

    /// `None` draws from OS entropy on every request.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.default_top_n = top_n;
        self
    }

    pub fn default_top_n(&self) -> usize {
        self.default_top_n
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Every call builds a fresh generator, so a seeded engine answers identical
    /// requests identically.
    pub fn recommend(
        &self,
        catalog: &Catalog,
        request: &RecommendationRequest,
    ) -> RecommendationResponse {
        let selection = Selection::resolve(catalog, request);
        let top_n = request.top_n.unwrap_or(self.default_top_n);
        let seed = request.seed.or(self.seed);

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let viewed = selection.viewed_product.as_deref().unwrap_or_default();
        let recommendations = self.calculator.rank(catalog, viewed, top_n, &mut rng);

        RecommendationResponse { selection, top_n, seed, recommendations, generated_at: Utc::now() }
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new()
    }
}
