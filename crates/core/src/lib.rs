//! Core of the product recommender: catalog, scoring, and the request/response
//! contract shared by the CLI and the dashboard server.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod metrics;
pub mod request;
pub mod scoring;

pub use catalog::{Catalog, CatalogError, Category};
pub use domain::product::Product;
pub use domain::recommendation::Recommendation;
pub use engine::RecommendationEngine;
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use request::{RecommendationRequest, RecommendationResponse, Selection};
pub use scoring::{score_and_rank, ScoreCalculator};
