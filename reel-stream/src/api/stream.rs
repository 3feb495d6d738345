//! Stream embed proxy endpoint
//!
//! Fetches the upstream embed page server-side, rewrites it (base tag +
//! defensive script) and re-serves it under a restrictive
//! Content-Security-Policy. Never returns partially transformed HTML: any
//! failure during fetch or transform degrades to a clean error response.

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::rewrite;
use crate::AppState;

/// Realistic browser user-agent; the upstream rejects obvious bots
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Query parameters for the stream proxy
#[derive(Debug, Deserialize)]
pub struct StreamParams {
    #[serde(default, rename = "movieId")]
    pub movie_id: Option<String>,
}

/// GET /api/stream?movieId=<id>
///
/// | Condition            | Status | Body                    |
/// |----------------------|--------|-------------------------|
/// | missing id           | 400    | plain text error        |
/// | upstream non-2xx     | 404    | "Stream not found"      |
/// | success              | 200    | transformed HTML        |
/// | unexpected exception | 500    | plain text error        |
pub async fn proxy_stream(
    State(state): State<AppState>,
    Query(params): Query<StreamParams>,
) -> Response {
    let Some(movie_id) = params
        .movie_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
    else {
        return (StatusCode::BAD_REQUEST, "Missing movie ID").into_response();
    };

    match fetch_and_rewrite(&state, movie_id).await {
        Ok(response) => response,
        Err(StreamFailure::NotFound) => {
            tracing::warn!(movie_id, "Upstream embed page not available");
            (StatusCode::NOT_FOUND, "Stream not found").into_response()
        }
        Err(StreamFailure::Internal(detail)) => {
            tracing::error!(movie_id, error = %detail, "Stream proxy error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

enum StreamFailure {
    NotFound,
    Internal(String),
}

async fn fetch_and_rewrite(
    state: &AppState,
    movie_id: &str,
) -> Result<Response, StreamFailure> {
    // A single trailing slash on the configured base would double up
    let base = state.stream.embed_base_url.as_str();
    let base = base.strip_suffix('/').unwrap_or(base);
    let target = format!("{base}/movie/{movie_id}");

    let url = reqwest::Url::parse(&target)
        .map_err(|e| StreamFailure::Internal(format!("bad upstream URL {target}: {e}")))?;
    let origin = url.origin().ascii_serialization();

    tracing::debug!(movie_id, url = %url, "Fetching upstream embed page");

    // The upstream commonly rejects referrer-less requests, so the referer
    // points at its own origin
    let response = state
        .http
        .get(url)
        .header(header::USER_AGENT, BROWSER_USER_AGENT)
        .header(header::REFERER, format!("{origin}/"))
        .send()
        .await
        .map_err(|e| StreamFailure::Internal(format!("upstream fetch failed: {e}")))?;

    if !response.status().is_success() {
        return Err(StreamFailure::NotFound);
    }

    let html = response
        .text()
        .await
        .map_err(|e| StreamFailure::Internal(format!("upstream body read failed: {e}")))?;

    let rewritten = rewrite::rewrite_embed_page(&html, &origin);
    let csp = rewrite::content_security_policy(&state.stream.allowed_origins);

    tracing::info!(movie_id, bytes = rewritten.len(), "Serving rewritten embed page");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html")
        .header(header::CONTENT_SECURITY_POLICY, csp)
        .header(header::X_FRAME_OPTIONS, "SAMEORIGIN")
        .header(header::REFERRER_POLICY, "strict-origin-when-cross-origin")
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
        .body(Body::from(rewritten))
        .map_err(|e| StreamFailure::Internal(format!("response build failed: {e}")))
}
