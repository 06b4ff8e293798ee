//! Open-Meteo API clients.
//!
//! Each data feed lives in its own submodule. They all share the process-wide
//! retrying HTTP client, and the data feeds read through the persistent
//! response cache (`cache::remember`).

use anyhow::{Context, Result};
use chrono::NaiveDate;
use chrono_tz::Asia::Kolkata;
use serde::de::DeserializeOwned;

use crate::{API_CLIENT, VayuError};

pub mod air_quality;
pub mod climate;
pub mod geocoding;
pub mod satellite;

pub use air_quality::AirQualitySample;
pub use climate::ClimateSummary;
pub use geocoding::GeocodedPlace;
pub use satellite::SatelliteRadiation;

/// Today's date in Indian Standard Time, the timezone every panel reports in.
#[must_use]
pub fn today_ist() -> NaiveDate {
    chrono::Utc::now().with_timezone(&Kolkata).date_naive()
}

/// GET a URL through the shared client and deserialize the JSON body.
pub(crate) async fn fetch_json<T: DeserializeOwned>(url: &str, what: &str) -> Result<T> {
    tracing::debug!(url, "Calling the {what} API");
    let response = API_CLIENT
        .get(url)
        .send()
        .await
        .with_context(|| format!("{what} request failed"))?;

    let status = response.status();
    if !status.is_success() {
        return Err(VayuError::api(format!("{what} API returned HTTP {status}")).into());
    }

    response
        .json()
        .await
        .with_context(|| format!("Failed to parse {what} response"))
}
