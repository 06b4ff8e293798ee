//! Configuration for the vayu dashboard.
//!
//! Everything is environment-driven with sensible defaults, so the binary
//! runs without any setup:
//!
//! - `VAYU_PORT` — listen port (default 8080)
//! - `VAYU_CACHE_PATH` — fjall cache directory (default `.vayu-cache`)
//! - `VAYU_CACHE_TTL_SECS` — response cache TTL (default 3600)
//! - `VAYU_HTTP_TIMEOUT_SECS` — per-request ceiling (default 5)
//! - `VAYU_HTTP_MAX_RETRIES` — retry budget per request (default 5)
//! - `VAYU_CUSTOM_TILES` — extra tile sources, `label|url|attribution`
//!   entries separated by `;`

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One user-supplied map tile source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTile {
    pub label: String,
    pub url: String,
    pub attribution: String,
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VayuConfig {
    /// Web server listen port
    pub port: u16,
    /// Cache directory location
    pub cache_path: PathBuf,
    /// Response cache TTL
    pub cache_ttl: Duration,
    /// Per-request timeout for upstream calls
    pub http_timeout: Duration,
    /// Retry budget for transient upstream failures
    pub http_max_retries: u32,
    /// Additional tile sources beyond the built-in set
    pub custom_tiles: Vec<CustomTile>,
}

impl Default for VayuConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            cache_path: PathBuf::from(".vayu-cache"),
            cache_ttl: Duration::from_secs(3600),
            http_timeout: Duration::from_secs(5),
            http_max_retries: 5,
            custom_tiles: Vec::new(),
        }
    }
}

impl VayuConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env_parsed("VAYU_PORT").unwrap_or(defaults.port),
            cache_path: env::var("VAYU_CACHE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_path),
            cache_ttl: env_parsed("VAYU_CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            http_timeout: env_parsed("VAYU_HTTP_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
            http_max_retries: env_parsed("VAYU_HTTP_MAX_RETRIES")
                .unwrap_or(defaults.http_max_retries),
            custom_tiles: env::var("VAYU_CUSTOM_TILES")
                .map(|raw| parse_custom_tiles(&raw))
                .unwrap_or_default(),
        }
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Parse `label|url|attribution;label|url|attribution` into tile sources.
/// Malformed entries are skipped with a warning.
fn parse_custom_tiles(raw: &str) -> Vec<CustomTile> {
    raw.split(';')
        .filter(|entry| !entry.trim().is_empty())
        .filter_map(|entry| {
            let mut parts = entry.splitn(3, '|');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(label), Some(url), attribution) if !label.trim().is_empty() => {
                    Some(CustomTile {
                        label: label.trim().to_string(),
                        url: url.trim().to_string(),
                        attribution: attribution.unwrap_or("").trim().to_string(),
                    })
                }
                _ => {
                    tracing::warn!("Skipping malformed custom tile entry: {entry:?}");
                    None
                }
            }
        })
        .collect()
}
