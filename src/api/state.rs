use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::dataset;
use crate::services::catalog::CatalogService;
use crate::services::providers::{tmdb::TmdbProvider, MetadataProvider};
use crate::services::recommender::Recommender;

/// Shared application state
///
/// Built once at startup and read-only afterwards. The provider and
/// recommender are injected so tests can substitute a fixture dataset and
/// an unreachable-network double.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub recommender: Arc<Recommender>,
}

impl AppState {
    /// Builds process-wide state from configuration.
    ///
    /// A missing or unreadable dataset disables recommendations but never
    /// prevents startup; the proxy endpoints keep working.
    pub fn from_config(config: &Config) -> Self {
        let provider = TmdbProvider::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            Duration::from_millis(config.probe_timeout_ms),
            Duration::from_millis(config.fetch_timeout_ms),
        );

        let recommender = match dataset::load_movies(&config.dataset_path) {
            Ok(records) => Recommender::new(records),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %config.dataset_path,
                    "Failed to load movie dataset, recommendations disabled"
                );
                Recommender::disabled()
            }
        };

        Self::with_parts(Arc::new(provider), recommender)
    }

    /// Assembles state from explicit parts.
    pub fn with_parts(provider: Arc<dyn MetadataProvider>, recommender: Recommender) -> Self {
        Self {
            catalog: Arc::new(CatalogService::new(provider)),
            recommender: Arc::new(recommender),
        }
    }
}
