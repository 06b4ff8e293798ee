//! Geographic model and the India service-region gate

use serde::{Deserialize, Serialize};

/// Latitude range of the serviced region (India), degrees, inclusive
pub const SERVICE_LAT: (f64, f64) = (6.0, 36.0);
/// Longitude range of the serviced region (India), degrees, inclusive
pub const SERVICE_LON: (f64, f64) = (68.0, 98.0);

/// National centroid used as the default map center and as the anchor for
/// the out-of-region fallback marker
pub const INDIA_CENTROID: (f64, f64) = (21.146633, 79.088860);

/// True iff the coordinate lies within the serviced region, both bounds
/// inclusive on every edge.
#[must_use]
pub fn is_within_service_region(lat: f64, lon: f64) -> bool {
    SERVICE_LAT.0 <= lat && lat <= SERVICE_LAT.1 && SERVICE_LON.0 <= lon && lon <= SERVICE_LON.1
}

/// A resolved coordinate with display metadata
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Display name (place name or formatted coordinates)
    pub name: String,
    /// Administrative hierarchy, comma-joined (state, district, ...)
    pub admin: Option<String>,
}

impl Location {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, name: String) -> Self {
        Self {
            latitude,
            longitude,
            name,
            admin: None,
        }
    }

    /// A location named after its own coordinates, for manual input
    #[must_use]
    pub fn unnamed(latitude: f64, longitude: f64) -> Self {
        Self::new(latitude, longitude, format!("{latitude:.4}, {longitude:.4}"))
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Round coordinates for cache key generation
    #[must_use]
    pub fn rounded_coordinates(&self, precision: u32) -> (f64, f64) {
        let multiplier = 10_f64.powi(i32::try_from(precision).unwrap_or(4));
        let lat = (self.latitude * multiplier).round() / multiplier;
        let lon = (self.longitude * multiplier).round() / multiplier;
        (lat, lon)
    }

    /// Cache key for one data feed at this location on one date.
    ///
    /// Coordinates are rounded to two decimals so nearby lookups share an
    /// entry.
    #[must_use]
    pub fn cache_key(&self, feed: &str, date: &str) -> String {
        let (lat, lon) = self.rounded_coordinates(2);
        format!("{feed}:{lat:.2}:{lon:.2}:{date}")
    }

    #[must_use]
    pub fn in_service_region(&self) -> bool {
        is_within_service_region(self.latitude, self.longitude)
    }
}
