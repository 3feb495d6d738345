//! HTTP API handlers for reel-stream

pub mod buildinfo;
pub mod catalog;
pub mod health;
pub mod stream;

pub use buildinfo::get_build_info;
pub use catalog::{
    discover_movies, discover_tv, embed_link, genres, movie_details, now_playing, popular_movies,
    popular_tv, search_movies, search_tv, season_details, top_rated, trending, tv_details,
};
pub use health::health_routes;
pub use stream::proxy_stream;
