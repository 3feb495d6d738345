//! Media catalog API client
//!
//! Read-only client for the movie/TV catalog. Every request flows
//! dispatcher -> retry wrapper -> HTTP GET -> status triage -> JSON parse,
//! so the concurrency cap and retry budget from the active
//! [`NetworkProfile`](reel_common::NetworkProfile) apply uniformly.

use crate::dispatch::RequestDispatcher;
use crate::error::CatalogError;
use crate::retry::{retry_request, RetryPolicy};
use crate::types::{
    Genre, GenreList, Movie, MovieDetails, Page, SeasonDetails, TvDetails, TvShow,
};
use reel_common::{CatalogConfig, NetworkProfile};
use reqwest::Url;
use serde::de::DeserializeOwned;

const USER_AGENT: &str = concat!("reel/", env!("CARGO_PKG_VERSION"));

/// Trending window accepted by the catalog API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendingWindow {
    Day,
    #[default]
    Week,
}

impl TrendingWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendingWindow::Day => "day",
            TrendingWindow::Week => "week",
        }
    }
}

/// Catalog API client; one shared instance serves the whole service
pub struct CatalogClient {
    http: reqwest::Client,
    config: CatalogConfig,
    dispatcher: RequestDispatcher,
    policy: RetryPolicy,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig, profile: &NetworkProfile) -> Result<Self, CatalogError> {
        profile
            .validate()
            .map_err(|e| CatalogError::Config(e.to_string()))?;

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            http,
            config,
            dispatcher: RequestDispatcher::from_profile(profile)?,
            policy: RetryPolicy::from_profile(profile),
        })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Trending movies for the given window
    pub async fn trending(
        &self,
        window: TrendingWindow,
        page: u32,
    ) -> Result<Page<Movie>, CatalogError> {
        let url = self.endpoint(
            &format!("trending/movie/{}", window.as_str()),
            &[("page", page.to_string())],
        )?;
        self.get_json("trending movies", url).await
    }

    /// Movies currently in theaters
    pub async fn now_playing(&self, page: u32) -> Result<Page<Movie>, CatalogError> {
        let url = self.endpoint("movie/now_playing", &[("page", page.to_string())])?;
        self.get_json("now playing", url).await
    }

    pub async fn popular_movies(&self, page: u32) -> Result<Page<Movie>, CatalogError> {
        let url = self.endpoint("movie/popular", &[("page", page.to_string())])?;
        self.get_json("popular movies", url).await
    }

    pub async fn top_rated(&self, page: u32) -> Result<Page<Movie>, CatalogError> {
        let url = self.endpoint("movie/top_rated", &[("page", page.to_string())])?;
        self.get_json("top rated movies", url).await
    }

    pub async fn popular_tv(&self, page: u32) -> Result<Page<TvShow>, CatalogError> {
        let url = self.endpoint("tv/popular", &[("page", page.to_string())])?;
        self.get_json("popular tv", url).await
    }

    /// Discover movies by genre, most popular first
    pub async fn discover_movies_by_genre(
        &self,
        genre_id: i64,
        page: u32,
    ) -> Result<Page<Movie>, CatalogError> {
        let url = self.endpoint(
            "discover/movie",
            &[
                ("with_genres", genre_id.to_string()),
                ("sort_by", "popularity.desc".to_string()),
                ("page", page.to_string()),
            ],
        )?;
        self.get_json("discover movies by genre", url).await
    }

    /// Discover TV shows by genre, most popular first
    pub async fn discover_tv_by_genre(
        &self,
        genre_id: i64,
        page: u32,
    ) -> Result<Page<TvShow>, CatalogError> {
        let url = self.endpoint(
            "discover/tv",
            &[
                ("with_genres", genre_id.to_string()),
                ("sort_by", "popularity.desc".to_string()),
                ("page", page.to_string()),
            ],
        )?;
        self.get_json("discover tv by genre", url).await
    }

    /// Search movies by title; a blank query yields an empty page without
    /// touching the API
    pub async fn search_movies(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Page<Movie>, CatalogError> {
        if query.trim().is_empty() {
            return Ok(Page::empty());
        }
        let url = self.endpoint(
            "search/movie",
            &[("query", query.to_string()), ("page", page.to_string())],
        )?;
        self.get_json("search movies", url).await
    }

    /// Search TV shows by name; a blank query yields an empty page
    pub async fn search_tv(&self, query: &str, page: u32) -> Result<Page<TvShow>, CatalogError> {
        if query.trim().is_empty() {
            return Ok(Page::empty());
        }
        let url = self.endpoint(
            "search/tv",
            &[("query", query.to_string()), ("page", page.to_string())],
        )?;
        self.get_json("search tv", url).await
    }

    /// Movie genre list
    pub async fn genres(&self) -> Result<Vec<Genre>, CatalogError> {
        let url = self.endpoint("genre/movie/list", &[])?;
        let list: GenreList = self.get_json("genre list", url).await?;
        Ok(list.genres)
    }

    pub async fn movie_details(&self, id: u64) -> Result<MovieDetails, CatalogError> {
        let url = self.endpoint(&format!("movie/{id}"), &[])?;
        self.get_json("movie details", url)
            .await
            .map_err(|e| not_found_for(e, &format!("movie {id}")))
    }

    pub async fn tv_details(&self, id: u64) -> Result<TvDetails, CatalogError> {
        let url = self.endpoint(&format!("tv/{id}"), &[])?;
        self.get_json("tv details", url)
            .await
            .map_err(|e| not_found_for(e, &format!("tv show {id}")))
    }

    pub async fn season_details(
        &self,
        tv_id: u64,
        season_number: u32,
    ) -> Result<SeasonDetails, CatalogError> {
        let url = self.endpoint(&format!("tv/{tv_id}/season/{season_number}"), &[])?;
        self.get_json("season details", url)
            .await
            .map_err(|e| not_found_for(e, &format!("tv show {tv_id} season {season_number}")))
    }

    /// Build an endpoint URL with the api key, language, and extra params
    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url, CatalogError> {
        let joined = format!("{}/{path}", self.config.base_url.trim_end_matches('/'));
        let mut url =
            Url::parse(&joined).map_err(|e| CatalogError::Config(format!("bad URL: {e}")))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api_key", &self.config.api_key);
            query.append_pair("language", "en-US");
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Queue a GET through the dispatcher and retry wrapper
    async fn get_json<T>(&self, operation: &'static str, url: Url) -> Result<T, CatalogError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let http = self.http.clone();
        let policy = self.policy.clone();
        tracing::debug!(operation, "Queueing catalog request");

        self.dispatcher
            .enqueue(move || async move {
                retry_request(operation, &policy, || {
                    let http = http.clone();
                    let url = url.clone();
                    async move { fetch_json::<T>(&http, url).await }
                })
                .await
            })
            .await?
    }
}

/// One HTTP attempt: GET, status triage, JSON parse
async fn fetch_json<T: DeserializeOwned>(
    http: &reqwest::Client,
    url: Url,
) -> Result<T, CatalogError> {
    let response = http
        .get(url)
        .send()
        .await
        .map_err(|e| CatalogError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CatalogError::Status(status.as_u16(), body));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| CatalogError::Parse(e.to_string()))
}

/// Detail lookups translate a final 404 into NotFound for the caller
fn not_found_for(err: CatalogError, what: &str) -> CatalogError {
    match err {
        CatalogError::Status(404, _) => CatalogError::NotFound(what.to_string()),
        other => other,
    }
}
