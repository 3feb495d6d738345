//! Catalog API response models
//!
//! Field sets mirror the media database API payloads; anything the API can
//! omit or null is `Option` or defaulted so a sparse payload still parses.

use serde::{Deserialize, Serialize};

/// One page of a listing response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Page<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Empty page, used where an empty input short-circuits the call
    pub fn empty() -> Self {
        Self {
            page: 1,
            results: Vec::new(),
            total_pages: 0,
        }
    }
}

/// Movie listing entry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Movie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
}

/// TV show listing entry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TvShow {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
}

/// Genre entry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// Wrapper for the genre list endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// Full movie detail
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MovieDetails {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub budget: u64,
    #[serde(default)]
    pub revenue: u64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
}

/// Full TV show detail
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TvDetails {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub number_of_seasons: u32,
    #[serde(default)]
    pub seasons: Vec<SeasonSummary>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
}

/// Season entry inside a TV detail
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeasonSummary {
    pub id: u64,
    pub season_number: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub episode_count: u32,
}

/// Full season detail with episodes
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeasonDetails {
    pub season_number: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

/// Episode entry inside a season detail
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Episode {
    pub id: u64,
    pub episode_number: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub air_date: Option<String>,
    pub still_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_movie_payload_parses() {
        let movie: Movie = serde_json::from_str(r#"{"id": 550, "title": "Fight Club"}"#).unwrap();
        assert_eq!(movie.id, 550);
        assert!(movie.poster_path.is_none());
        assert!(movie.genre_ids.is_empty());
    }

    #[test]
    fn listing_page_parses() {
        let page: Page<Movie> = serde_json::from_str(
            r#"{
                "page": 1,
                "results": [{"id": 1, "title": "A", "poster_path": "/a.jpg"}],
                "total_pages": 12,
                "total_results": 230
            }"#,
        )
        .unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.total_pages, 12);
    }

    #[test]
    fn detail_payload_parses() {
        let details: MovieDetails = serde_json::from_str(
            r#"{
                "id": 550,
                "title": "Fight Club",
                "genres": [{"id": 18, "name": "Drama"}],
                "runtime": 139,
                "status": "Released",
                "budget": 63000000,
                "revenue": 100853753
            }"#,
        )
        .unwrap();
        assert_eq!(details.genres[0].name, "Drama");
        assert_eq!(details.runtime, Some(139));
    }
}
