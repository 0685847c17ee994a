//! Rating-weighted random scoring of catalog products.

use std::cmp::Ordering;

use rand::Rng;
use tracing::warn;

use crate::catalog::Catalog;
use crate::domain::recommendation::Recommendation;

/// Number of recommendations shown on the dashboard.
pub const DEFAULT_TOP_N: usize = 4;

/// Seed applied before every request so the dashboard output is reproducible.
pub const DEFAULT_SEED: u64 = 42;

/// Multiplier applied to `draw * rating`; keeps scores below 1.0 for ratings up to 5.0.
pub const DEFAULT_RATING_WEIGHT: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreCalculator {
    rating_weight: f64,
}

impl ScoreCalculator {
    pub fn new() -> Self {
        Self { rating_weight: DEFAULT_RATING_WEIGHT }
    }

    pub fn with_rating_weight(rating_weight: f64) -> Self {
        Self { rating_weight }
    }

    pub fn rating_weight(&self) -> f64 {
        self.rating_weight
    }

    /// Score for a single uniform `draw` in `[0, 1)`.
    pub fn score(&self, draw: f64, rating: f64) -> f64 {
        draw * rating * self.rating_weight
    }

    /// Scores every product except `viewed`, drawing once per eligible product in
    /// catalog order, and returns the best `top_n` by descending score.
    ///
    /// Equal scores keep catalog order. A catalog that fails validation yields no
    /// recommendations.
    pub fn rank<R: Rng>(
        &self,
        catalog: &Catalog,
        viewed: &str,
        top_n: usize,
        rng: &mut R,
    ) -> Vec<Recommendation> {
        if top_n == 0 || catalog.is_empty() {
            return Vec::new();
        }

        if let Err(error) = catalog.validate() {
            warn!(
                event_name = "core.scoring.malformed_catalog",
                error = %error,
                "catalog failed validation, returning no recommendations"
            );
            return Vec::new();
        }

        let mut scored: Vec<Recommendation> = catalog
            .flatten()
            .filter(|(_, product)| product.name != viewed)
            .map(|(category, product)| {
                let draw: f64 = rng.gen();
                Recommendation {
                    category: category.to_owned(),
                    product: product.clone(),
                    score: self.score(draw, product.rating),
                }
            })
            .collect();

        // stable: ties keep catalog order
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(top_n);
        scored
    }
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Ranks `catalog` for a shopper who is looking at `viewed_product_name`.
pub fn score_and_rank<R: Rng>(
    catalog: &Catalog,
    viewed_product_name: &str,
    top_n: usize,
    rng: &mut R,
) -> Vec<Recommendation> {
    ScoreCalculator::default().rank(catalog, viewed_product_name, top_n, rng)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal::Decimal;

    use super::*;
    use crate::catalog::Category;
    use crate::domain::product::Product;

    fn product(name: &str, rating: f64) -> Product {
        Product::new(name, Decimal::new(10, 0), rating, 100)
    }

    fn small_catalog() -> Catalog {
        Catalog::new(vec![
            Category {
                name: "Electronics".to_string(),
                products: vec![product("A", 4.5), product("B", 4.7)],
            },
            Category { name: "Home".to_string(), products: vec![product("C", 4.8)] },
        ])
    }

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(DEFAULT_SEED)
    }

    fn assert_sorted_descending(recommendations: &[Recommendation]) {
        for pair in recommendations.windows(2) {
            assert!(
                pair[0].score >= pair[1].score,
                "scores should be non-increasing: {} then {}",
                pair[0].score,
                pair[1].score
            );
        }
    }

    #[test]
    fn viewed_product_is_excluded_and_result_is_truncated_silently() {
        let recommendations = score_and_rank(&small_catalog(), "A", 4, &mut seeded());

        let mut names: Vec<_> = recommendations.iter().map(|r| r.product.name.as_str()).collect();
        assert_eq!(recommendations.len(), 2);
        assert_sorted_descending(&recommendations);
        names.sort_unstable();
        assert_eq!(names, vec!["B", "C"]);
    }

    #[test]
    fn empty_catalog_yields_empty_result() {
        assert!(score_and_rank(&Catalog::default(), "anything", 4, &mut seeded()).is_empty());
    }

    #[test]
    fn zero_top_n_yields_empty_result() {
        assert!(score_and_rank(&Catalog::demo(), "Smart Watch", 0, &mut seeded()).is_empty());
    }

    #[test]
    fn unknown_viewed_product_excludes_nothing() {
        let recommendations = score_and_rank(&small_catalog(), "Toaster", 10, &mut seeded());
        assert_eq!(recommendations.len(), 3);
    }

    #[test]
    fn top_n_limits_result_length() {
        let catalog = Catalog::demo();
        for top_n in 0..=10 {
            let recommendations = score_and_rank(&catalog, "Smart Watch", top_n, &mut seeded());
            assert_eq!(recommendations.len(), top_n.min(7));
            assert!(recommendations.iter().all(|r| r.product.name != "Smart Watch"));
            assert_sorted_descending(&recommendations);
        }
    }

    #[test]
    fn same_seed_produces_identical_output() {
        let catalog = Catalog::demo();
        let first = score_and_rank(&catalog, "Yoga Mat", 4, &mut seeded());
        let second = score_and_rank(&catalog, "Yoga Mat", 4, &mut seeded());

        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn every_viewed_choice_is_excluded_across_seeds() {
        let catalog = Catalog::demo();
        let names: Vec<String> =
            catalog.flatten().map(|(_, product)| product.name.clone()).collect();

        for seed in 0..25_u64 {
            for viewed in &names {
                let mut rng = StdRng::seed_from_u64(seed);
                let recommendations = score_and_rank(&catalog, viewed, DEFAULT_TOP_N, &mut rng);

                assert_eq!(recommendations.len(), DEFAULT_TOP_N);
                assert!(recommendations.iter().all(|r| &r.product.name != viewed));
                assert_sorted_descending(&recommendations);
            }
        }
    }

    #[test]
    fn scores_stay_below_one_for_ratings_up_to_five() {
        let catalog = Catalog::new(vec![Category {
            name: "Top rated".to_string(),
            products: (0..50).map(|index| product(&format!("P{index}"), 5.0)).collect(),
        }]);

        for seed in 0..20_u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            for recommendation in score_and_rank(&catalog, "", 50, &mut rng) {
                assert!((0.0..1.0).contains(&recommendation.score));
                assert!(recommendation.match_pct() < 100);
            }
        }
    }

    #[test]
    fn draws_follow_flattened_catalog_order() {
        let catalog = small_catalog();
        let mut rng = seeded();
        let draws: Vec<f64> = (0..2).map(|_| rng.gen()).collect();

        let recommendations = score_and_rank(&catalog, "A", 4, &mut seeded());
        let score_of = |name: &str| {
            recommendations
                .iter()
                .find(|r| r.product.name == name)
                .map(|r| r.score)
                .unwrap_or_default()
        };

        let calculator = ScoreCalculator::default();
        assert_eq!(score_of("B"), calculator.score(draws[0], 4.7));
        assert_eq!(score_of("C"), calculator.score(draws[1], 4.8));
    }

    #[test]
    fn equal_scores_keep_catalog_order() {
        let catalog = Catalog::new(vec![Category {
            name: "Unrated".to_string(),
            products: vec![product("first", 0.0), product("second", 0.0), product("third", 0.0)],
        }]);

        let names: Vec<_> = score_and_rank(&catalog, "", 3, &mut seeded())
            .into_iter()
            .map(|r| r.product.name)
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn malformed_catalog_degrades_to_empty_result() {
        let catalog = Catalog::new(vec![Category {
            name: "Broken".to_string(),
            products: vec![product("ok", 4.0), product("too good", 9.0)],
        }]);

        assert!(score_and_rank(&catalog, "ok", 4, &mut seeded()).is_empty());
    }

    #[test]
    fn rating_weight_scales_scores() {
        let catalog = small_catalog();
        let base = ScoreCalculator::default().rank(&catalog, "", 3, &mut seeded());
        let halved = ScoreCalculator::with_rating_weight(0.1).rank(&catalog, "", 3, &mut seeded());

        for (full, half) in base.iter().zip(&halved) {
            assert_eq!(full.product.name, half.product.name);
            assert!((full.score / 2.0 - half.score).abs() < 1e-12);
        }
    }
}
