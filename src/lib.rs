//! vayu - India air quality, satellite radiation and climate dashboard
//!
//! This library fetches current air-quality, satellite-radiation and climate
//! data from the Open-Meteo APIs for locations in India, computes the CPCB
//! Air Quality Index, and assembles the map and HTML data panels served by
//! the web UI.

use std::sync::LazyLock;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

pub mod api;
pub mod aqi;
pub mod cache;
pub mod config;
pub mod error;
pub mod geo;
pub mod map;
pub mod meteo;
pub mod panels;
pub mod web;

// Re-export core types for public API
pub use aqi::{AqiReport, Pollutant, PollutantReadings, aqi_color, composite_aqi, sub_index};
pub use config::VayuConfig;
pub use error::VayuError;
pub use geo::{Location, is_within_service_region};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Process-wide HTTP client for all upstream calls, with transient-failure
/// retries and a short per-request timeout. Timeout and retry budget come
/// from the environment-driven config.
pub static API_CLIENT: LazyLock<ClientWithMiddleware> = LazyLock::new(|| {
    let config = VayuConfig::from_env();
    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.http_max_retries);
    let client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .user_agent(concat!("vayu/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to create HTTP client");
    ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
