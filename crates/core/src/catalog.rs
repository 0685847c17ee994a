//! Product catalog: an ordered mapping of category name to products.
//!
//! The catalog is built once at startup, either from the embedded demo data
//! or from a TOML file, and is read-only afterwards.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::product::Product;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub products: Vec<Product>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    categories: Vec<Category>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("catalog validation failed: {0}")]
    Invalid(#[from] DomainError),
}

#[derive(Debug, Clone, Copy)]
struct ProductSeed {
    category: &'static str,
    name: &'static str,
    price: i64,
    rating: f64,
    sales: u64,
}

const DEMO_PRODUCTS: &[ProductSeed] = &[
    ProductSeed {
        category: "Electronics",
        name: "Wireless Headphones",
        price: 79,
        rating: 4.5,
        sales: 15_000,
    },
    ProductSeed {
        category: "Electronics",
        name: "Smart Watch",
        price: 199,
        rating: 4.7,
        sales: 12_000,
    },
    ProductSeed {
        category: "Electronics",
        name: "Laptop Stand",
        price: 45,
        rating: 4.3,
        sales: 8_000,
    },
    ProductSeed { category: "Electronics", name: "USB-C Hub", price: 35, rating: 4.6, sales: 20_000 },
    ProductSeed { category: "Home", name: "Air Purifier", price: 149, rating: 4.8, sales: 9_000 },
    ProductSeed { category: "Home", name: "LED Desk Lamp", price: 29, rating: 4.4, sales: 11_000 },
    ProductSeed { category: "Home", name: "Coffee Maker", price: 89, rating: 4.6, sales: 13_000 },
    ProductSeed { category: "Home", name: "Yoga Mat", price: 25, rating: 4.5, sales: 7_000 },
];

impl Catalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// The eight-product catalog the dashboard ships with.
    pub fn demo() -> Self {
        let mut categories: Vec<Category> = Vec::new();
        for seed in DEMO_PRODUCTS {
            let product =
                Product::new(seed.name, Decimal::new(seed.price, 0), seed.rating, seed.sales);
            match categories.iter().position(|category| category.name == seed.category) {
                Some(index) => categories[index].products.push(product),
                None => categories
                    .push(Category { name: seed.category.to_owned(), products: vec![product] }),
            }
        }
        Self { categories }
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
        let file = toml::from_str::<CatalogFile>(&raw)
            .map_err(|source| CatalogError::ParseFile { path: path.to_path_buf(), source })?;

        let catalog = Self::from(file);
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let mut category_names = HashSet::new();
        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(DomainError::InvariantViolation(
                    "category name must not be empty".to_owned(),
                ));
            }
            if !category_names.insert(category.name.as_str()) {
                return Err(DomainError::InvariantViolation(format!(
                    "category `{}` is defined more than once",
                    category.name
                )));
            }

            let mut product_names = HashSet::new();
            for product in &category.products {
                product.validate()?;
                if !product_names.insert(product.name.as_str()) {
                    return Err(DomainError::DuplicateProduct {
                        category: category.name.clone(),
                        name: product.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.name == name)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|category| category.name.as_str())
    }

    /// All products in definition order, tagged with their category.
    pub fn flatten(&self) -> impl Iterator<Item = (&str, &Product)> {
        self.categories.iter().flat_map(|category| {
            category.products.iter().map(move |product| (category.name.as_str(), product))
        })
    }

    pub fn find(&self, product_name: &str) -> Option<(&str, &Product)> {
        self.flatten().find(|(_, product)| product.name == product_name)
    }

    pub fn contains_product(&self, product_name: &str) -> bool {
        self.find(product_name).is_some()
    }

    /// Number of products across all categories.
    pub fn len(&self) -> usize {
        self.categories.iter().map(|category| category.products.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    category: Vec<CategoryEntry>,
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    name: String,
    #[serde(default)]
    product: Vec<Product>,
}

impl From<CatalogFile> for Catalog {
    fn from(file: CatalogFile) -> Self {
        Self::new(
            file.category
                .into_iter()
                .map(|entry| Category { name: entry.name, products: entry.product })
                .collect(),
        )
    }
}
