//! Satellite-radiation archive fetch: daily sunrise/sunset plus the hourly
//! instantaneous terrestrial radiation series, all rendered in IST.

use anyhow::{Context, Result};
use chrono::{NaiveDate, TimeZone, Utc};
use chrono_tz::Asia::Kolkata;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::geo::Location;
use crate::cache;
use crate::meteo::fetch_json;
use crate::VayuConfig;

/// One hour of the radiation series, time pre-formatted in IST
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RadiationHour {
    pub time_ist: String,
    /// Instantaneous terrestrial radiation in W/m², absent where the
    /// satellite model has no value
    pub radiation: Option<f64>,
}

/// Satellite radiation data for one location and date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SatelliteRadiation {
    /// Sunrise as `HH:MM` IST
    pub sunrise_ist: String,
    /// Sunset as `HH:MM` IST
    pub sunset_ist: String,
    pub hourly: Vec<RadiationHour>,
}

#[derive(Debug, Deserialize)]
struct SatelliteResponse {
    daily: SatelliteDaily,
    hourly: SatelliteHourly,
}

#[derive(Debug, Deserialize)]
struct SatelliteDaily {
    sunrise: Vec<i64>,
    sunset: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct SatelliteHourly {
    time: Vec<i64>,
    terrestrial_radiation_instant: Vec<Option<f64>>,
}

fn format_ist(unix_seconds: i64, format: &str) -> Result<String> {
    let utc = Utc
        .timestamp_opt(unix_seconds, 0)
        .single()
        .with_context(|| format!("Timestamp out of range: {unix_seconds}"))?;
    Ok(utc.with_timezone(&Kolkata).format(format).to_string())
}

impl SatelliteRadiation {
    fn from_response(response: SatelliteResponse) -> Result<Self> {
        let sunrise = *response
            .daily
            .sunrise
            .first()
            .context("No sunrise in satellite response")?;
        let sunset = *response
            .daily
            .sunset
            .first()
            .context("No sunset in satellite response")?;

        let hourly = response
            .hourly
            .time
            .iter()
            .zip(response.hourly.terrestrial_radiation_instant.iter())
            .map(|(&ts, &radiation)| {
                Ok(RadiationHour {
                    time_ist: format_ist(ts, "%Y-%m-%d %H:%M")?,
                    radiation,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            sunrise_ist: format_ist(sunrise, "%H:%M")?,
            sunset_ist: format_ist(sunset, "%H:%M")?,
            hourly,
        })
    }
}

/// Fetch sunrise/sunset and hourly terrestrial radiation for one date,
/// cached for the configured TTL.
#[instrument(skip(location), fields(lat = location.latitude, lon = location.longitude))]
pub async fn for_date(location: &Location, date: NaiveDate) -> Result<SatelliteRadiation> {
    let date_str = date.format("%Y-%m-%d").to_string();
    let key = location.cache_key("satrad", &date_str);
    let ttl = VayuConfig::from_env().cache_ttl;
    let (lat, lon) = (location.latitude, location.longitude);

    cache::remember(&key, ttl, || {
        let date_str = date_str.clone();
        async move {
            info!("Fetching satellite radiation for {lat:.4}, {lon:.4} on {date_str}");
            let url = format!(
                "https://satellite-api.open-meteo.com/v1/archive?latitude={lat}&longitude={lon}\
                 &start_date={date_str}&end_date={date_str}&daily=sunrise,sunset\
                 &hourly=terrestrial_radiation_instant&models=satellite_radiation_seamless\
                 &timeformat=unixtime&timezone=Asia%2FKolkata"
            );
            let response: SatelliteResponse = fetch_json(&url, "satellite radiation").await?;
            SatelliteRadiation::from_response(response)
        }
    })
    .await
}
