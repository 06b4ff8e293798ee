//! Free-text place search against the Open-Meteo geocoding API,
//! restricted to India.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::geo::Location;
use crate::meteo::fetch_json;

/// Minimum length of a usable search query
pub const MIN_QUERY_LEN: usize = 3;

/// A geocoded place inside the service region
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeocodedPlace {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    /// admin1..admin4 hierarchy, comma-joined, empties dropped
    pub admin: String,
}

impl GeocodedPlace {
    /// Display string used in the status message and the panel headings
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} ({:.4}, {:.4})", self.name, self.latitude, self.longitude)
    }

    #[must_use]
    pub fn to_location(&self) -> Location {
        Location {
            latitude: self.latitude,
            longitude: self.longitude,
            name: self.name.clone(),
            admin: if self.admin.is_empty() {
                None
            } else {
                Some(self.admin.clone())
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    country_code: Option<String>,
    admin1: Option<String>,
    admin2: Option<String>,
    admin3: Option<String>,
    admin4: Option<String>,
}

impl GeocodingResult {
    fn admin_hierarchy(&self) -> String {
        [&self.admin1, &self.admin2, &self.admin3, &self.admin4]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Search for a place by name and return the first India-tagged candidate.
///
/// Returns `Ok(None)` when nothing in the candidate list is tagged `IN`;
/// that is a user-facing "not found" status, not an error.
#[instrument]
pub async fn search_india(name: &str) -> Result<Option<GeocodedPlace>> {
    info!("Geocoding location: '{name}'");

    let url = format!(
        "https://geocoding-api.open-meteo.com/v1/search?name={}&count=5&language=en&format=json&countryCode=IN",
        urlencoding::encode(name)
    );

    let response: GeocodingResponse = fetch_json(&url, "geocoding").await?;

    let hit = first_india_result(response);
    match &hit {
        Some(place) => debug!("Found location: {}", place.display()),
        None => warn!("No India-tagged results for '{name}'"),
    }
    Ok(hit)
}

fn first_india_result(response: GeocodingResponse) -> Option<GeocodedPlace> {
    response
        .results
        .unwrap_or_default()
        .into_iter()
        .find(|result| result.country_code.as_deref() == Some("IN"))
        .map(|result| GeocodedPlace {
            latitude: result.latitude,
            longitude: result.longitude,
            admin: result.admin_hierarchy(),
            name: result.name,
        })
}
