//! Climate fetch: daily aggregate meteorology from the multi-model CMIP6
//! high-resolution ensemble.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use crate::geo::Location;
use crate::cache;
use crate::meteo::fetch_json;
use crate::VayuConfig;
use chrono::NaiveDate;

/// The requested climate model ensemble; the first model supplies the
/// displayed values.
pub const CLIMATE_MODELS: [&str; 7] = [
    "CMCC_CM2_VHR4",
    "FGOALS_f3_H",
    "HiRAM_SIT_HR",
    "MRI_AGCM3_2_S",
    "EC_Earth3P_HR",
    "MPI_ESM1_2_XR",
    "NICAM16_8S",
];

/// The daily aggregate variables, paired with their panel labels
pub const CLIMATE_VARIABLES: [(&str, &str); 19] = [
    ("temperature_2m_max", "Temp Max (°C)"),
    ("temperature_2m_mean", "Temp Mean (°C)"),
    ("temperature_2m_min", "Temp Min (°C)"),
    ("wind_speed_10m_mean", "Wind 10m Mean (m/s)"),
    ("wind_speed_10m_max", "Wind 10m Max (m/s)"),
    ("cloud_cover_mean", "Cloud Cover Mean (%)"),
    ("shortwave_radiation_sum", "Shortwave Rad. Sum (MJ/m²)"),
    ("relative_humidity_2m_mean", "RH Mean (%)"),
    ("relative_humidity_2m_max", "RH Max (%)"),
    ("relative_humidity_2m_min", "RH Min (%)"),
    ("dew_point_2m_mean", "Dew Point Mean (°C)"),
    ("dew_point_2m_min", "Dew Point Min (°C)"),
    ("dew_point_2m_max", "Dew Point Max (°C)"),
    ("precipitation_sum", "Precipitation Sum (mm)"),
    ("rain_sum", "Rain Sum (mm)"),
    ("snowfall_sum", "Snowfall Sum (mm)"),
    ("pressure_msl_mean", "Pressure MSL Mean (hPa)"),
    ("soil_moisture_0_to_10cm_mean", "Soil Moisture 0–10cm Mean (m³/m³)"),
    ("et0_fao_evapotranspiration_sum", "ET₀ FAO Evapotransp. (mm)"),
];

/// One labeled climate value; `None` renders as `-`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClimateValue {
    pub label: String,
    pub value: Option<f64>,
}

/// Daily climate aggregates for one location and date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClimateSummary {
    pub rows: Vec<ClimateValue>,
}

#[derive(Debug, Deserialize)]
struct ClimateResponse {
    /// Arbitrary map: with a multi-model request the keys carry model
    /// suffixes (`temperature_2m_max_CMCC_CM2_VHR4`)
    daily: Value,
}

/// Pull one variable's first daily value out of the response map.
///
/// Prefers the first requested model's suffixed key, falls back to the bare
/// key for single-model responses.
fn first_daily_value(daily: &Value, variable: &str) -> Option<f64> {
    let suffixed = format!("{variable}_{}", CLIMATE_MODELS[0]);
    let series = daily
        .get(suffixed.as_str())
        .or_else(|| daily.get(variable))?;
    series.as_array()?.first()?.as_f64()
}

impl ClimateSummary {
    fn from_response(response: &ClimateResponse) -> Self {
        let rows = CLIMATE_VARIABLES
            .iter()
            .map(|&(variable, label)| ClimateValue {
                label: label.to_string(),
                value: first_daily_value(&response.daily, variable),
            })
            .collect();
        Self { rows }
    }
}

/// Fetch daily climate aggregates for one date, cached for the configured
/// TTL.
#[instrument(skip(location), fields(lat = location.latitude, lon = location.longitude))]
pub async fn for_date(location: &Location, date: NaiveDate) -> Result<ClimateSummary> {
    let date_str = date.format("%Y-%m-%d").to_string();
    let key = location.cache_key("climate", &date_str);
    let ttl = VayuConfig::from_env().cache_ttl;
    let (lat, lon) = (location.latitude, location.longitude);

    cache::remember(&key, ttl, || {
        let date_str = date_str.clone();
        async move {
            info!("Fetching climate data for {lat:.4}, {lon:.4} on {date_str}");
            let daily: Vec<&str> = CLIMATE_VARIABLES.iter().map(|&(name, _)| name).collect();
            let url = format!(
                "https://climate-api.open-meteo.com/v1/climate?latitude={lat}&longitude={lon}\
                 &start_date={date_str}&end_date={date_str}&models={}&daily={}",
                CLIMATE_MODELS.join(","),
                daily.join(",")
            );
            let response: ClimateResponse = fetch_json(&url, "climate").await?;
            Ok(ClimateSummary::from_response(&response))
        }
    })
    .await
}
