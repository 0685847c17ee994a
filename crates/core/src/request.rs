//! Request/response types exchanged between a host shell and the scoring engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::domain::recommendation::Recommendation;

/// Snapshot of the shopper's selections at the moment they asked for recommendations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    /// Category picked in the browsing-history selector
    #[serde(default)]
    pub category: Option<String>,
    /// Recently viewed product, excluded from the result
    #[serde(default)]
    pub viewed_product: Option<String>,
    /// Number of recommendations wanted; engine default when absent
    #[serde(default)]
    pub top_n: Option<usize>,
    /// Seed for this request only; engine default when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl RecommendationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_viewed_product(mut self, viewed_product: impl Into<String>) -> Self {
        self.viewed_product = Some(viewed_product.into());
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = Some(top_n);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Selections after applying the dashboard's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub category: Option<String>,
    pub viewed_product: Option<String>,
}

impl Selection {
    /// An unknown or missing category falls back to the first category, and a missing
    /// viewed product falls back to the first product of that category. A viewed name
    /// that was given explicitly is kept even when the catalog has no such product.
    pub fn resolve(catalog: &Catalog, request: &RecommendationRequest) -> Self {
        let category = request
            .category
            .as_deref()
            .and_then(|name| catalog.category(name))
            .or_else(|| catalog.categories().first());

        let viewed_product = request.viewed_product.clone().or_else(|| {
            category
                .and_then(|category| category.products.first())
                .map(|product| product.name.clone())
        });

        Self { category: category.map(|category| category.name.clone()), viewed_product }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub selection: Selection,
    pub top_n: usize,
    pub seed: Option<u64>,
    pub recommendations: Vec<Recommendation>,
    pub generated_at: DateTime<Utc>,
}
