//! Current air-quality fetch: the six AQI pollutants plus the extra
//! atmospheric readings displayed as-is.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::aqi::PollutantReadings;
use crate::geo::Location;
use crate::cache;
use crate::meteo::{fetch_json, today_ist};
use crate::VayuConfig;

/// Current-instant air quality at one location.
///
/// All concentrations are as reported by the feed, in µg/m³ — including
/// carbon monoxide, which is only converted to mg/m³ inside
/// [`PollutantReadings`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AirQualitySample {
    pub pm2_5: f64,
    pub pm10: f64,
    pub carbon_monoxide: f64,
    pub nitrogen_dioxide: f64,
    pub sulphur_dioxide: f64,
    pub ozone: f64,
    pub aerosol_optical_depth: f64,
    pub dust: f64,
    pub uv_index: f64,
    pub uv_index_clear_sky: f64,
    pub methane: f64,
}

impl AirQualitySample {
    /// Readings for the AQI engine, CO converted to mg/m³
    #[must_use]
    pub fn readings(&self) -> PollutantReadings {
        PollutantReadings::from_feed(
            self.pm2_5,
            self.pm10,
            self.carbon_monoxide,
            self.nitrogen_dioxide,
            self.sulphur_dioxide,
            self.ozone,
        )
    }
}

#[derive(Debug, Deserialize)]
struct AirQualityResponse {
    current: Option<CurrentAirQuality>,
}

/// Missing readings default to zero, matching the "render what we got"
/// policy of the data panel.
#[derive(Debug, Deserialize, Default)]
struct CurrentAirQuality {
    pm2_5: Option<f64>,
    pm10: Option<f64>,
    carbon_monoxide: Option<f64>,
    nitrogen_dioxide: Option<f64>,
    sulphur_dioxide: Option<f64>,
    ozone: Option<f64>,
    aerosol_optical_depth: Option<f64>,
    dust: Option<f64>,
    uv_index: Option<f64>,
    uv_index_clear_sky: Option<f64>,
    methane: Option<f64>,
}

impl From<CurrentAirQuality> for AirQualitySample {
    fn from(current: CurrentAirQuality) -> Self {
        Self {
            pm2_5: current.pm2_5.unwrap_or_default(),
            pm10: current.pm10.unwrap_or_default(),
            carbon_monoxide: current.carbon_monoxide.unwrap_or_default(),
            nitrogen_dioxide: current.nitrogen_dioxide.unwrap_or_default(),
            sulphur_dioxide: current.sulphur_dioxide.unwrap_or_default(),
            ozone: current.ozone.unwrap_or_default(),
            aerosol_optical_depth: current.aerosol_optical_depth.unwrap_or_default(),
            dust: current.dust.unwrap_or_default(),
            uv_index: current.uv_index.unwrap_or_default(),
            uv_index_clear_sky: current.uv_index_clear_sky.unwrap_or_default(),
            methane: current.methane.unwrap_or_default(),
        }
    }
}

/// Fetch the current air-quality sample for a location, cached for the
/// configured TTL.
#[instrument(skip(location), fields(lat = location.latitude, lon = location.longitude))]
pub async fn current(location: &Location) -> Result<AirQualitySample> {
    let date = today_ist().format("%Y-%m-%d").to_string();
    let key = location.cache_key("airq", &date);
    let ttl = VayuConfig::from_env().cache_ttl;
    let (lat, lon) = (location.latitude, location.longitude);

    cache::remember(&key, ttl, || async move {
        info!("Fetching current air quality for {lat:.4}, {lon:.4}");
        let url = format!(
            "https://air-quality-api.open-meteo.com/v1/air-quality?latitude={lat}&longitude={lon}\
             &current=pm2_5,pm10,carbon_monoxide,nitrogen_dioxide,sulphur_dioxide,ozone,\
             aerosol_optical_depth,dust,uv_index,uv_index_clear_sky,methane"
        );
        let response: AirQualityResponse = fetch_json(&url, "air quality").await?;
        Ok(AirQualitySample::from(response.current.unwrap_or_default()))
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_zero() {
        let response: AirQualityResponse =
            serde_json::from_str(r#"{"current": {"pm2_5": 42.5, "ozone": 80.0}}"#).unwrap();
        let sample = AirQualitySample::from(response.current.unwrap());
        assert_eq!(sample.pm2_5, 42.5);
        assert_eq!(sample.ozone, 80.0);
        assert_eq!(sample.pm10, 0.0);
        assert_eq!(sample.methane, 0.0);
    }

    #[test]
    fn readings_convert_co_to_milligrams() {
        let sample = AirQualitySample {
            pm2_5: 10.0,
            pm10: 20.0,
            carbon_monoxide: 1500.0,
            nitrogen_dioxide: 5.0,
            sulphur_dioxide: 5.0,
            ozone: 30.0,
            aerosol_optical_depth: 0.1,
            dust: 2.0,
            uv_index: 5.0,
            uv_index_clear_sky: 6.0,
            methane: 1.9,
        };
        let readings = sample.readings();
        assert_eq!(readings.carbon_monoxide, 1.5);
        assert_eq!(readings.pm2_5, 10.0);
    }

    #[test]
    fn absent_current_block_parses() {
        let response: AirQualityResponse = serde_json::from_str("{}").unwrap();
        assert!(response.current.is_none());
    }
}
