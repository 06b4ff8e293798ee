//! HTML fragment assembly for the data panels.
//!
//! Pure string builders; all upstream data arrives pre-fetched. Location
//! labels are user- or geocoder-supplied and get escaped, numeric values are
//! formatted directly.

use std::fmt::Write;

use crate::aqi::{AQI_BANDS, AqiReport};
use crate::meteo::{AirQualitySample, ClimateSummary, SatelliteRadiation};

/// Minimal HTML text escape for interpolated labels
#[must_use]
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Inline red error block shown in place of a panel that failed to load
#[must_use]
pub fn error_panel(what: &str, error: &anyhow::Error) -> String {
    format!(
        "<div style='color:red;padding:.5em;'>{} unavailable: {}</div>",
        escape(what),
        escape(&error.to_string())
    )
}

/// Colored chips for the six AQI bands
fn legend() -> String {
    AQI_BANDS
        .iter()
        .map(|band| {
            format!(
                "<span style='display:inline-block;padding:.2em .6em;margin:.1em;\
                 border-radius:4px;background:{};color:#fff;font-size:.8em;'>{}</span>",
                band.color, band.label
            )
        })
        .collect()
}

/// The AQI panel: colored badge, per-pollutant rows, extras, and the band
/// legend.
#[must_use]
pub fn air_quality_panel(
    sample: &AirQualitySample,
    report: &AqiReport,
    location_label: &str,
    date: &str,
) -> String {
    let mut rows = String::new();
    for (pollutant, index) in &report.sub_indices {
        let concentration = report.readings.concentration(*pollutant);
        // CO is the only pollutant shown with decimals, in mg/m³
        let formatted = if pollutant.unit() == "mg/m³" {
            format!("{concentration:.3}")
        } else {
            format!("{concentration}")
        };
        let _ = write!(
            rows,
            "<tr><td>{}:</td><td>{} {} → {:.0}</td></tr>",
            pollutant.label(),
            formatted,
            pollutant.unit(),
            index
        );
    }
    let _ = write!(
        rows,
        "<tr><td>AOD:</td><td>{}</td></tr>\
         <tr><td>Dust:</td><td>{}</td></tr>\
         <tr><td>UV Index:</td><td>{}</td></tr>\
         <tr><td>UV Index Clear Sky:</td><td>{}</td></tr>\
         <tr><td>Methane (CH₄):</td><td>{} ppm</td></tr>",
        sample.aerosol_optical_depth, sample.dust, sample.uv_index, sample.uv_index_clear_sky,
        sample.methane
    );

    format!(
        "<div style=\"padding:1em;border:1px solid #ddd;border-radius:8px;max-width:100%;margin-top:1em;\">\
           <h4 style=\"margin-bottom:.2em;\">🌿 Air Quality Index (AQI) of {} ({})</h4>\
           <div style=\"display:flex;align-items:center;\">\
             <div style=\"width:60px;height:60px;background:{};border-radius:50%;display:flex;\
                         align-items:center;justify-content:center;font-size:1.25em;color:white;\
                         margin-right:1em;\">{}</div>\
             <div><strong>{}</strong></div>\
           </div>\
           <table style=\"width:100%;margin-top:.5em;font-size:.9em;\">{}</table>\
           <div style=\"margin-top:1em;\"><strong>Legend (AQI bands):</strong> {}</div>\
         </div>",
        escape(location_label),
        escape(date),
        report.color,
        report.aqi as i64,
        report.label,
        rows,
        legend()
    )
}

/// The satellite panel: sunrise/sunset plus the hourly radiation table
#[must_use]
pub fn satellite_panel(sat: &SatelliteRadiation, location_label: &str, date: &str) -> String {
    let mut hourly_rows = String::new();
    for hour in &sat.hourly {
        let value = hour
            .radiation
            .map_or_else(|| "-".to_string(), |v| format!("{v:.1}"));
        let _ = write!(
            hourly_rows,
            "<tr><td>{}</td><td>{}</td></tr>",
            hour.time_ist, value
        );
    }

    format!(
        "<div style=\"padding:1em;border:1px solid #f3b86a;border-radius:8px;max-width:100%;margin-top:1em;\">\
           <h4 style=\"margin-top:1em;margin-bottom:.2em;\">☀️ Satellite Radiation {} ({})</h4>\
           <table style=\"width:100%;font-size:.9em;\">\
             <tr><td>Sunrise (IST):</td><td>{}</td></tr>\
             <tr><td>Sunset (IST):</td><td>{}</td></tr>\
           </table>\
           <br>\
           <h5 style='margin-top:1em;'>📈 Hourly Terrestrial Radiation Instant</h5>\
           <table style=\"width:100%;font-size:.9em;\">\
             <tr><th>Time (IST)</th><th>W/m²</th></tr>{}\
           </table>\
         </div>",
        escape(location_label),
        escape(date),
        sat.sunrise_ist,
        sat.sunset_ist,
        hourly_rows
    )
}

/// The climate panel: one labeled row per daily aggregate variable
#[must_use]
pub fn climate_panel(summary: &ClimateSummary, location_label: &str, date: &str) -> String {
    let mut rows = String::new();
    for row in &summary.rows {
        let value = row
            .value
            .map_or_else(|| "-".to_string(), |v| format!("{v}"));
        let _ = write!(rows, "<tr><td>{}</td><td>{}</td></tr>", row.label, value);
    }

    format!(
        "<div style=\"padding:1em;border:1px solid #87ceeb;border-radius:8px;max-width:100%;margin-top:1em;\">\
           <h4 style=\"margin-bottom:.3em;\">🌦️ Climate Data {} ({})</h4>\
           <table style=\"width:100%;font-size:.92em;\">{}</table>\
         </div>",
        escape(location_label),
        escape(date),
        rows
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aqi::PollutantReadings;
    use crate::meteo::climate::ClimateValue;
    use crate::meteo::satellite::RadiationHour;

    fn sample() -> AirQualitySample {
        AirQualitySample {
            pm2_5: 30.0,
            pm10: 50.0,
            carbon_monoxide: 1000.0,
            nitrogen_dioxide: 40.0,
            sulphur_dioxide: 40.0,
            ozone: 50.0,
            aerosol_optical_depth: 0.2,
            dust: 1.0,
            uv_index: 6.0,
            uv_index_clear_sky: 7.0,
            methane: 1.9,
        }
    }

    #[test]
    fn aqi_panel_shows_badge_and_legend() {
        let sample = sample();
        let report = AqiReport::compute(sample.readings());
        let html = air_quality_panel(&sample, &report, "Nagpur (21.1466, 79.0889)", "2025-06-01");

        assert!(html.contains("background:#009966"));
        assert!(html.contains("<strong>Good</strong>"));
        // Every band appears in the legend
        for band in &AQI_BANDS {
            assert!(html.contains(band.color));
            assert!(html.contains(band.label));
        }
        // CO shown converted, with its sub-index
        assert!(html.contains("1.000 mg/m³ → 50"));
    }

    #[test]
    fn aqi_panel_escapes_location_label() {
        let sample = sample();
        let report = AqiReport::compute(sample.readings());
        let html = air_quality_panel(&sample, &report, "<script>alert(1)</script>", "2025-06-01");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn satellite_panel_renders_hours() {
        let sat = SatelliteRadiation {
            sunrise_ist: "06:00".to_string(),
            sunset_ist: "19:30".to_string(),
            hourly: vec![
                RadiationHour {
                    time_ist: "2025-06-01 06:00".to_string(),
                    radiation: Some(120.5),
                },
                RadiationHour {
                    time_ist: "2025-06-01 07:00".to_string(),
                    radiation: None,
                },
            ],
        };
        let html = satellite_panel(&sat, "Nagpur", "2025-06-01");
        assert!(html.contains("Sunrise (IST):</td><td>06:00"));
        assert!(html.contains("120.5"));
        assert!(html.contains("<td>-</td>"));
    }

    #[test]
    fn climate_panel_renders_dashes_for_missing() {
        let summary = ClimateSummary {
            rows: vec![
                ClimateValue {
                    label: "Temp Max (°C)".to_string(),
                    value: Some(31.5),
                },
                ClimateValue {
                    label: "Rain Sum (mm)".to_string(),
                    value: None,
                },
            ],
        };
        let html = climate_panel(&summary, "Nagpur", "2025-06-01");
        assert!(html.contains("31.5"));
        assert!(html.contains("<tr><td>Rain Sum (mm)</td><td>-</td></tr>"));
    }

    #[test]
    fn error_panel_is_red_and_escaped() {
        let err = anyhow::anyhow!("HTTP 503 <oops>");
        let html = error_panel("Climate data", &err);
        assert!(html.contains("color:red"));
        assert!(html.contains("Climate data unavailable"));
        assert!(html.contains("&lt;oops&gt;"));
    }
}
