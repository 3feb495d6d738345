//! Configuration loading and network tuning profiles
//!
//! All tuning that depends on the client's network class (timeouts, retry
//! budget, concurrency cap) is resolved once at startup into a
//! [`NetworkProfile`] and passed to the dispatcher and retry wrapper at
//! construction time. Nothing downstream re-derives it.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Coarse classification of the network the service is tuned for.
///
/// Mirrors the constrained-device heuristic of the original deployment:
/// `Constrained` is the mobile tuning, `Metered` the slow-connection
/// downgrade (longer timeout, single request in flight).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientClass {
    #[default]
    Standard,
    Constrained,
    Metered,
}

impl FromStr for ClientClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(ClientClass::Standard),
            "constrained" => Ok(ClientClass::Constrained),
            "metered" => Ok(ClientClass::Metered),
            other => Err(Error::InvalidInput(format!(
                "unknown client class '{other}' (expected standard, constrained or metered)"
            ))),
        }
    }
}

/// Network tuning shared by the request dispatcher and retry wrapper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkProfile {
    /// Per-attempt timeout in milliseconds
    pub timeout_ms: u64,
    /// Retries after the first attempt (total attempts = retry_attempts + 1)
    pub retry_attempts: u32,
    /// Fixed delay between attempts in milliseconds
    pub retry_delay_ms: u64,
    /// Maximum catalog requests in flight at once
    pub max_concurrent: usize,
}

impl NetworkProfile {
    pub fn standard() -> Self {
        Self {
            timeout_ms: 10_000,
            retry_attempts: 3,
            retry_delay_ms: 1_000,
            max_concurrent: 4,
        }
    }

    /// Mobile tuning: longer timeout, half the concurrency
    pub fn constrained() -> Self {
        Self {
            timeout_ms: 15_000,
            retry_attempts: 3,
            retry_delay_ms: 1_000,
            max_concurrent: 2,
        }
    }

    /// Slow-connection tuning: one request at a time
    pub fn metered() -> Self {
        Self {
            timeout_ms: 25_000,
            retry_attempts: 3,
            retry_delay_ms: 1_000,
            max_concurrent: 1,
        }
    }

    pub fn for_class(class: ClientClass) -> Self {
        match class {
            ClientClass::Standard => Self::standard(),
            ClientClass::Constrained => Self::constrained(),
            ClientClass::Metered => Self::metered(),
        }
    }

    /// Reject profiles the dispatcher cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent == 0 {
            return Err(Error::Config(
                "network profile: max_concurrent must be at least 1".to_string(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(Error::Config(
                "network profile: timeout_ms must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Media catalog API access configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Catalog API base URL, no trailing slash
    pub base_url: String,
    /// API key appended to every request
    pub api_key: String,
    /// Poster image base URL (ends in a size segment, e.g. `/w500`)
    pub image_base_url: String,
    /// Backdrop image base URL
    pub backdrop_base_url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            api_key: String::new(),
            image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
            backdrop_base_url: "https://image.tmdb.org/t/p/w1280".to_string(),
        }
    }
}

/// Stream proxy configuration
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Upstream embed base URL the proxy fetches from, e.g. `https://vidsrc.xyz/embed`
    pub embed_base_url: String,
    /// Base URL for direct iframe player links (`/v2/embed/...` pattern)
    pub player_base_url: String,
    /// Origins allowed by the proxy's Content-Security-Policy
    pub allowed_origins: Vec<String>,
    pub bind_host: String,
    pub bind_port: u16,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            embed_base_url: "https://vidsrc.xyz/embed".to_string(),
            player_base_url: "https://vidsrc.cc".to_string(),
            allowed_origins: vec![
                "https://vidsrc.xyz".to_string(),
                "https://vidsrc.to".to_string(),
            ],
            bind_host: "127.0.0.1".to_string(),
            bind_port: 5780,
        }
    }
}

/// Complete resolved service settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub client_class: ClientClass,
    pub catalog: CatalogConfig,
    pub stream: StreamConfig,
}

impl Settings {
    /// Network profile implied by the resolved client class
    pub fn network_profile(&self) -> NetworkProfile {
        NetworkProfile::for_class(self.client_class)
    }

    /// Load settings following the priority order:
    /// 1. Command-line argument (highest priority)
    /// 2. Environment variable (`REEL_*`)
    /// 3. TOML config file
    /// 4. Compiled default (fallback)
    ///
    /// `cli_config` overrides where the TOML file is looked for; the other
    /// CLI overrides are applied by the caller on the returned value.
    pub fn load(cli_config: Option<&Path>) -> Result<Self> {
        let mut settings = Settings::default();

        // Priority 3: TOML config file
        if let Some(path) = resolve_config_file(cli_config) {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
            let file: FileSettings = toml::from_str(&contents)
                .map_err(|e| Error::Config(format!("cannot parse {}: {e}", path.display())))?;
            tracing::info!(path = %path.display(), "Loaded config file");
            file.apply(&mut settings)?;
        }

        // Priority 2: environment variables
        apply_env(&mut settings)?;

        Ok(settings)
    }
}

/// Locate the config file: explicit CLI path, then `REEL_CONFIG`, then the
/// platform config directory. Missing file is not an error unless it was
/// named explicitly.
fn resolve_config_file(cli_config: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_config {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var("REEL_CONFIG") {
        return Some(PathBuf::from(path));
    }

    let default = dirs::config_dir().map(|d| d.join("reel").join("config.toml"))?;
    if default.exists() {
        Some(default)
    } else {
        None
    }
}

fn apply_env(settings: &mut Settings) -> Result<()> {
    if let Ok(class) = std::env::var("REEL_CLIENT_CLASS") {
        settings.client_class = class.parse()?;
    }
    if let Ok(key) = std::env::var("REEL_TMDB_API_KEY") {
        settings.catalog.api_key = key;
    }
    if let Ok(base) = std::env::var("REEL_TMDB_BASE_URL") {
        settings.catalog.base_url = base;
    }
    if let Ok(base) = std::env::var("REEL_TMDB_IMAGE_BASE_URL") {
        settings.catalog.image_base_url = base;
    }
    if let Ok(base) = std::env::var("REEL_TMDB_BACKDROP_BASE_URL") {
        settings.catalog.backdrop_base_url = base;
    }
    if let Ok(base) = std::env::var("REEL_EMBED_BASE_URL") {
        settings.stream.embed_base_url = base;
    }
    if let Ok(base) = std::env::var("REEL_PLAYER_BASE_URL") {
        settings.stream.player_base_url = base;
    }
    if let Ok(host) = std::env::var("REEL_BIND_HOST") {
        settings.stream.bind_host = host;
    }
    if let Ok(port) = std::env::var("REEL_BIND_PORT") {
        settings.stream.bind_port = port
            .parse()
            .map_err(|_| Error::Config(format!("REEL_BIND_PORT: invalid port '{port}'")))?;
    }
    Ok(())
}

/// On-disk TOML shape; every field optional so partial files work
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    client_class: Option<String>,
    catalog: Option<FileCatalog>,
    stream: Option<FileStream>,
}

#[derive(Debug, Default, Deserialize)]
struct FileCatalog {
    base_url: Option<String>,
    api_key: Option<String>,
    image_base_url: Option<String>,
    backdrop_base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileStream {
    embed_base_url: Option<String>,
    player_base_url: Option<String>,
    allowed_origins: Option<Vec<String>>,
    bind_host: Option<String>,
    bind_port: Option<u16>,
}

impl FileSettings {
    fn apply(self, settings: &mut Settings) -> Result<()> {
        if let Some(class) = self.client_class {
            settings.client_class = class.parse()?;
        }
        if let Some(catalog) = self.catalog {
            if let Some(v) = catalog.base_url {
                settings.catalog.base_url = v;
            }
            if let Some(v) = catalog.api_key {
                settings.catalog.api_key = v;
            }
            if let Some(v) = catalog.image_base_url {
                settings.catalog.image_base_url = v;
            }
            if let Some(v) = catalog.backdrop_base_url {
                settings.catalog.backdrop_base_url = v;
            }
        }
        if let Some(stream) = self.stream {
            if let Some(v) = stream.embed_base_url {
                settings.stream.embed_base_url = v;
            }
            if let Some(v) = stream.player_base_url {
                settings.stream.player_base_url = v;
            }
            if let Some(v) = stream.allowed_origins {
                settings.stream.allowed_origins = v;
            }
            if let Some(v) = stream.bind_host {
                settings.stream.bind_host = v;
            }
            if let Some(v) = stream.bind_port {
                settings.stream.bind_port = v;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_class_parsing() {
        assert_eq!(
            "constrained".parse::<ClientClass>().unwrap(),
            ClientClass::Constrained
        );
        assert_eq!(
            " Metered ".parse::<ClientClass>().unwrap(),
            ClientClass::Metered
        );
        assert!("cellular".parse::<ClientClass>().is_err());
    }

    #[test]
    fn profiles_match_class_tuning() {
        let standard = NetworkProfile::for_class(ClientClass::Standard);
        assert_eq!(standard.timeout_ms, 10_000);
        assert_eq!(standard.max_concurrent, 4);

        let constrained = NetworkProfile::for_class(ClientClass::Constrained);
        assert_eq!(constrained.timeout_ms, 15_000);
        assert_eq!(constrained.max_concurrent, 2);

        let metered = NetworkProfile::for_class(ClientClass::Metered);
        assert_eq!(metered.timeout_ms, 25_000);
        assert_eq!(metered.max_concurrent, 1);
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let mut profile = NetworkProfile::standard();
        profile.max_concurrent = 0;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn partial_toml_overrides_defaults_only() {
        let file: FileSettings = toml::from_str(
            r#"
            client_class = "constrained"

            [catalog]
            api_key = "abc123"
            "#,
        )
        .unwrap();

        let mut settings = Settings::default();
        file.apply(&mut settings).unwrap();

        assert_eq!(settings.client_class, ClientClass::Constrained);
        assert_eq!(settings.catalog.api_key, "abc123");
        // untouched fields keep compiled defaults
        assert_eq!(settings.catalog.base_url, "https://api.themoviedb.org/3");
        assert_eq!(settings.stream.bind_port, 5780);
    }

    #[test]
    fn stream_defaults_cover_known_mirrors() {
        let stream = StreamConfig::default();
        assert!(stream.embed_base_url.starts_with("https://"));
        assert_eq!(stream.allowed_origins.len(), 2);
    }
}
