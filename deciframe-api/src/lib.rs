//! deciframe-api library - song similarity service
//!
//! Answers "find songs similar to X" over a catalog of songs indexed by
//! their chord sets, returning ranked, paginated, cached results under a
//! bounded-concurrency admission policy.

use axum::Router;
use deciframe_common::config::TomlConfig;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod cache;
pub mod db;
pub mod error;
pub mod governor;
pub mod pagination;
pub mod paginator;
pub mod ranker;
pub mod resolver;
pub mod sequences;
pub mod service;

#[cfg(test)]
mod test_support;

pub use error::SearchError;
pub use service::SimilarityService;

use cache::ResultCache;
use db::SongStore;
use governor::Governor;
use paginator::CachedPaginator;
use resolver::QueryResolver;
use sequences::SequenceRegistry;

/// Application state shared across HTTP handlers
#[derive(Clone, Debug)]
pub struct AppState {
    pub service: Arc<SimilarityService>,
}

impl AppState {
    /// Create new application state
    pub fn new(service: SimilarityService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Wire storage and cache into a service configured from `config`
    pub fn from_config(
        config: &TomlConfig,
        store: Arc<dyn SongStore>,
        cache: Arc<dyn ResultCache>,
    ) -> Self {
        let registry = Arc::new(SequenceRegistry::from_config(&config.sequences));
        let service = SimilarityService::new(
            store,
            QueryResolver::new(registry),
            CachedPaginator::new(cache, config.cache_ttl()),
            Governor::new(config.max_concurrent_searches),
        );
        Self::new(service)
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/similares", get(api::get_similar))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        // Results are public; any origin may read them
        .layer(CorsLayer::permissive())
        .with_state(state)
}
