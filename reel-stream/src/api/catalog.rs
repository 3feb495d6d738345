//! Read-only catalog API endpoints
//!
//! Thin JSON surface over [`CatalogClient`]; every call rides the shared
//! dispatcher, so one failing section never stalls the others. Empty result
//! sets pass through as empty pages rather than errors.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use reel_catalog::types::{Genre, Movie, MovieDetails, Page, SeasonDetails, TvDetails, TvShow};
use reel_catalog::urls::{embed_url, EmbedTarget};
use reel_catalog::{CatalogError, TrendingWindow};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Catalog failure mapped onto an HTTP status
pub struct ApiError(CatalogError);

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::Network(_)
            | CatalogError::Timeout(_)
            | CatalogError::Status(..)
            | CatalogError::Parse(_) => StatusCode::BAD_GATEWAY,
            CatalogError::Config(_) | CatalogError::Dispatch(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        tracing::warn!(status = %status, error = %self.0, "Catalog request failed");
        (status, Json(ErrorBody { error: self.0.to_string() })).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn default_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: u32,
}

#[derive(Debug, Deserialize)]
pub struct TrendingParams {
    #[serde(default)]
    pub window: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
}

#[derive(Debug, Deserialize)]
pub struct DiscoverParams {
    pub genre: i64,
    #[serde(default = "default_page")]
    pub page: u32,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    #[serde(default = "default_page")]
    pub page: u32,
}

/// GET /api/catalog/trending?window=day|week&page=N
pub async fn trending(
    State(state): State<AppState>,
    Query(params): Query<TrendingParams>,
) -> Response {
    let window = match params.window.as_deref() {
        None | Some("week") => TrendingWindow::Week,
        Some("day") => TrendingWindow::Day,
        Some(other) => {
            return (
                StatusCode::BAD_REQUEST,
                format!("unknown trending window '{other}'"),
            )
                .into_response()
        }
    };
    match state.catalog.trending(window, params.page).await {
        Ok(page) => Json(page).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// GET /api/catalog/movies/popular?page=N
pub async fn popular_movies(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<Movie>>, ApiError> {
    Ok(Json(state.catalog.popular_movies(params.page).await?))
}

/// GET /api/catalog/movies/now_playing?page=N
pub async fn now_playing(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<Movie>>, ApiError> {
    Ok(Json(state.catalog.now_playing(params.page).await?))
}

/// GET /api/catalog/movies/top_rated?page=N
pub async fn top_rated(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<Movie>>, ApiError> {
    Ok(Json(state.catalog.top_rated(params.page).await?))
}

/// GET /api/catalog/tv/popular?page=N
pub async fn popular_tv(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<TvShow>>, ApiError> {
    Ok(Json(state.catalog.popular_tv(params.page).await?))
}

/// GET /api/catalog/genres
pub async fn genres(State(state): State<AppState>) -> Result<Json<Vec<Genre>>, ApiError> {
    Ok(Json(state.catalog.genres().await?))
}

/// GET /api/catalog/discover/movie?genre=ID&page=N
pub async fn discover_movies(
    State(state): State<AppState>,
    Query(params): Query<DiscoverParams>,
) -> Result<Json<Page<Movie>>, ApiError> {
    Ok(Json(
        state
            .catalog
            .discover_movies_by_genre(params.genre, params.page)
            .await?,
    ))
}

/// GET /api/catalog/discover/tv?genre=ID&page=N
pub async fn discover_tv(
    State(state): State<AppState>,
    Query(params): Query<DiscoverParams>,
) -> Result<Json<Page<TvShow>>, ApiError> {
    Ok(Json(
        state
            .catalog
            .discover_tv_by_genre(params.genre, params.page)
            .await?,
    ))
}

/// GET /api/catalog/search/movie?query=...&page=N
pub async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Page<Movie>>, ApiError> {
    Ok(Json(
        state.catalog.search_movies(&params.query, params.page).await?,
    ))
}

/// GET /api/catalog/search/tv?query=...&page=N
pub async fn search_tv(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Page<TvShow>>, ApiError> {
    Ok(Json(
        state.catalog.search_tv(&params.query, params.page).await?,
    ))
}

/// GET /api/catalog/movie/:id
pub async fn movie_details(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<MovieDetails>, ApiError> {
    Ok(Json(state.catalog.movie_details(id).await?))
}

/// GET /api/catalog/tv/:id
pub async fn tv_details(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<TvDetails>, ApiError> {
    Ok(Json(state.catalog.tv_details(id).await?))
}

/// GET /api/catalog/tv/:id/season/:number
pub async fn season_details(
    State(state): State<AppState>,
    Path((id, number)): Path<(u64, u32)>,
) -> Result<Json<SeasonDetails>, ApiError> {
    Ok(Json(state.catalog.season_details(id, number).await?))
}

#[derive(Debug, Deserialize)]
pub struct EmbedParams {
    pub media: String,
    pub id: u64,
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct EmbedResponse {
    pub url: String,
}

/// GET /api/catalog/embed?media=movie|tv&id=N[&season=N&episode=N]
///
/// Returns the iframe player URL for a title. TV targets require both
/// season and episode.
pub async fn embed_link(
    State(state): State<AppState>,
    Query(params): Query<EmbedParams>,
) -> Response {
    let target = match params.media.as_str() {
        "movie" => EmbedTarget::Movie { id: params.id },
        "tv" => match (params.season, params.episode) {
            (Some(season), Some(episode)) => EmbedTarget::TvEpisode {
                id: params.id,
                season,
                episode,
            },
            _ => {
                return (
                    StatusCode::BAD_REQUEST,
                    "tv embeds require season and episode",
                )
                    .into_response()
            }
        },
        other => {
            return (
                StatusCode::BAD_REQUEST,
                format!("unknown media type '{other}'"),
            )
                .into_response()
        }
    };

    let url = embed_url(&state.stream.player_base_url, &target);
    Json(EmbedResponse { url }).into_response()
}
