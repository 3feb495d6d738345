//! Image and player-embed URL builders

/// Fallback artwork when the catalog has no poster for a title
const POSTER_PLACEHOLDER: &str = "/abstract-movie-poster.png";
/// Fallback artwork when the catalog has no backdrop for a title
const BACKDROP_PLACEHOLDER: &str = "/movie-backdrop.png";

/// Build a poster image URL for the requested size.
///
/// `base` normally ends in a size segment (e.g. `.../t/p/w500`); when the
/// requested size differs, the trailing segment is swapped out. A base
/// without a size segment gets the size appended.
pub fn image_url(base: &str, path: Option<&str>, size: &str) -> String {
    let Some(path) = path else {
        return POSTER_PLACEHOLDER.to_string();
    };

    let base = base.trim_end_matches('/');
    if let Some(stripped) = strip_size_segment(base) {
        return format!("{stripped}/{size}{path}");
    }
    format!("{base}/{size}{path}")
}

/// Build a backdrop image URL; the backdrop base already carries its size
pub fn backdrop_url(base: &str, path: Option<&str>) -> String {
    match path {
        Some(path) => format!("{}{path}", base.trim_end_matches('/')),
        None => BACKDROP_PLACEHOLDER.to_string(),
    }
}

/// Drop a trailing `/w<digits>` size segment, returning what precedes it
fn strip_size_segment(base: &str) -> Option<&str> {
    let (head, last) = base.rsplit_once('/')?;
    let digits = last.strip_prefix('w')?;
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Some(head)
    } else {
        None
    }
}

/// A playable title for the third-party embed player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedTarget {
    Movie { id: u64 },
    TvEpisode { id: u64, season: u32, episode: u32 },
}

/// Build the iframe player URL for a title
pub fn embed_url(base: &str, target: &EmbedTarget) -> String {
    let base = base.strip_suffix('/').unwrap_or(base);
    match target {
        EmbedTarget::Movie { id } => {
            format!("{base}/v2/embed/movie/{id}?autoPlay=true")
        }
        EmbedTarget::TvEpisode {
            id,
            season,
            episode,
        } => {
            format!("{base}/v2/embed/tv/{id}/{season}/{episode}?autoPlay=true")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_artwork_gets_placeholders() {
        assert_eq!(
            image_url("https://img.example/t/p/w500", None, "w500"),
            POSTER_PLACEHOLDER
        );
        assert_eq!(
            backdrop_url("https://img.example/t/p/w1280", None),
            BACKDROP_PLACEHOLDER
        );
    }

    #[test]
    fn matching_size_passes_through() {
        assert_eq!(
            image_url("https://img.example/t/p/w500", Some("/poster.jpg"), "w500"),
            "https://img.example/t/p/w500/poster.jpg"
        );
    }

    #[test]
    fn differing_size_swaps_the_segment() {
        assert_eq!(
            image_url("https://img.example/t/p/w500", Some("/poster.jpg"), "w342"),
            "https://img.example/t/p/w342/poster.jpg"
        );
    }

    #[test]
    fn base_without_size_gets_one_appended() {
        assert_eq!(
            image_url("https://img.example/t/p", Some("/poster.jpg"), "w780"),
            "https://img.example/t/p/w780/poster.jpg"
        );
    }

    #[test]
    fn backdrop_appends_path() {
        assert_eq!(
            backdrop_url("https://img.example/t/p/w1280", Some("/b.jpg")),
            "https://img.example/t/p/w1280/b.jpg"
        );
    }

    #[test]
    fn movie_embed_url_pattern() {
        assert_eq!(
            embed_url("https://player.example/", &EmbedTarget::Movie { id: 603 }),
            "https://player.example/v2/embed/movie/603?autoPlay=true"
        );
    }

    #[test]
    fn tv_embed_url_pattern() {
        assert_eq!(
            embed_url(
                "https://player.example",
                &EmbedTarget::TvEpisode {
                    id: 1399,
                    season: 2,
                    episode: 5
                }
            ),
            "https://player.example/v2/embed/tv/1399/2/5?autoPlay=true"
        );
    }
}
