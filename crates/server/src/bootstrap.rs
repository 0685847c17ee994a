use std::sync::Arc;

use recommender_core::config::{AppConfig, ConfigError};
use recommender_core::{Catalog, CatalogError, RecommendationEngine};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub catalog: Arc<Catalog>,
    pub engine: RecommendationEngine,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("catalog load failed: {0}")]
    Catalog(#[from] CatalogError),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let catalog = config.recommender.load_catalog()?;
    info!(
        event_name = "system.bootstrap.catalog_loaded",
        correlation_id = "bootstrap",
        source = config
            .recommender
            .catalog_path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "embedded demo".to_string()),
        categories = catalog.categories().len(),
        products = catalog.len(),
        "catalog loaded"
    );

    let engine = RecommendationEngine::from_config(&config.recommender);

    Ok(Application { config, catalog: Arc::new(catalog), engine })
}
