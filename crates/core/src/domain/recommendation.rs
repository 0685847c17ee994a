use serde::{Deserialize, Serialize};

use crate::domain::product::Product;

/// A catalog product paired with the score it was ranked by.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub product: Product,
    pub score: f64,
}

impl Recommendation {
    /// Whole-percent "match" shown on recommendation cards.
    pub fn match_pct(&self) -> u32 {
        (self.score * 100.0).floor().clamp(0.0, 100.0) as u32
    }
}
