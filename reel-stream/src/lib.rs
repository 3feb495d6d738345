//! reel-stream library - catalog gateway and stream-embed proxy
//!
//! Exposes read-only catalog endpoints (backed by the bounded-concurrency
//! catalog client) and the embed rewriting proxy endpoint.

use axum::Router;
use reel_catalog::CatalogClient;
use reel_common::{Error, Result, StreamConfig};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod rewrite;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Shared catalog client (one dispatcher per process, so the
    /// concurrency cap is meaningful)
    pub catalog: Arc<CatalogClient>,
    /// Stream proxy configuration
    pub stream: StreamConfig,
    /// HTTP client used for upstream embed fetches
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(catalog: Arc<CatalogClient>, stream: StreamConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Internal(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            catalog,
            stream,
            http,
        })
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/api/stream", get(api::proxy_stream))
        .route("/api/catalog/trending", get(api::trending))
        .route("/api/catalog/movies/popular", get(api::popular_movies))
        .route("/api/catalog/movies/now_playing", get(api::now_playing))
        .route("/api/catalog/movies/top_rated", get(api::top_rated))
        .route("/api/catalog/tv/popular", get(api::popular_tv))
        .route("/api/catalog/genres", get(api::genres))
        .route("/api/catalog/discover/movie", get(api::discover_movies))
        .route("/api/catalog/discover/tv", get(api::discover_tv))
        .route("/api/catalog/search/movie", get(api::search_movies))
        .route("/api/catalog/search/tv", get(api::search_tv))
        .route("/api/catalog/movie/:id", get(api::movie_details))
        .route("/api/catalog/tv/:id", get(api::tv_details))
        .route("/api/catalog/tv/:id/season/:number", get(api::season_details))
        .route("/api/catalog/embed", get(api::embed_link))
        .route("/api/build_info", get(api::get_build_info))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
