use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

pub const MAX_RATING: f64 = 5.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: Decimal,
    pub rating: f64,
    pub sales: u64,
}

impl Product {
    pub fn new(name: impl Into<String>, price: Decimal, rating: f64, sales: u64) -> Self {
        Self { name: name.into(), price, rating, sales }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(self.invalid("name must not be empty"));
        }
        if self.price <= Decimal::ZERO {
            return Err(self.invalid("price must be positive"));
        }
        if !self.rating.is_finite() || !(0.0..=MAX_RATING).contains(&self.rating) {
            return Err(self.invalid("rating must be within 0.0..=5.0"));
        }
        Ok(())
    }

    /// Price as shown on cards, e.g. `$79` or `$12.5`.
    pub fn display_price(&self) -> String {
        format!("${}", self.price.normalize())
    }

    /// Sales count with thousands separators, e.g. `15,000`.
    pub fn display_sales(&self) -> String {
        let digits = self.sales.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (index, digit) in digits.chars().enumerate() {
            if index > 0 && (digits.len() - index) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }
        grouped
    }

    fn invalid(&self, reason: &str) -> DomainError {
        DomainError::InvalidProduct { name: self.name.clone(), reason: reason.to_owned() }
    }
}
