//! JSON API backing the dashboard form.
//!
//! Two endpoints mirror the two UI interactions: free-text search and a
//! manual coordinate/zoom/tileset update. Both return the same response
//! shape: resolved coordinates plus three HTML fragments (status, map,
//! data) that the page injects into its output regions.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::aqi::AqiReport;
use crate::geo::Location;
use crate::map::{DEFAULT_ZOOM, TileRegistry, render_map};
use crate::meteo::{air_quality, climate, geocoding, satellite, today_ist};
use crate::meteo::geocoding::MIN_QUERY_LEN;
use crate::panels;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub name: String,
    pub zoom: Option<u8>,
    pub tiles: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateParams {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub zoom: Option<u8>,
    pub tiles: Option<String>,
}

/// Everything the page needs to refresh its three output regions
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Short status message (HTML)
    pub status: String,
    /// Embeddable map fragment
    pub map: String,
    /// Concatenated data panels, possibly with inline error blocks
    pub data: String,
}

pub fn router(registry: Arc<TileRegistry>) -> Router {
    Router::new()
        .route("/search", get(search))
        .route("/update", get(update))
        .route("/tiles", get(tiles))
        .with_state(registry)
}

/// Fetch the three data feeds concurrently and render a panel — or an
/// inline error block — for each. A failed feed never takes down the page.
async fn render_data_panels(location: &Location, label: &str) -> String {
    let date = today_ist();
    let date_str = date.format("%Y-%m-%d").to_string();

    let (aq, sat, cli) = tokio::join!(
        air_quality::current(location),
        satellite::for_date(location, date),
        climate::for_date(location, date),
    );

    let mut html = String::new();
    match aq {
        Ok(sample) => {
            let report = AqiReport::compute(sample.readings());
            html.push_str(&panels::air_quality_panel(&sample, &report, label, &date_str));
        }
        Err(e) => html.push_str(&panels::error_panel("Air quality data", &e)),
    }
    match sat {
        Ok(sat) => html.push_str(&panels::satellite_panel(&sat, label, &date_str)),
        Err(e) => html.push_str(&panels::error_panel("Satellite radiation data", &e)),
    }
    match cli {
        Ok(summary) => html.push_str(&panels::climate_panel(&summary, label, &date_str)),
        Err(e) => html.push_str(&panels::error_panel("Climate data", &e)),
    }
    html
}

#[instrument(skip(registry))]
async fn search(
    State(registry): State<Arc<TileRegistry>>,
    Query(params): Query<SearchParams>,
) -> Json<DashboardResponse> {
    let zoom = params.zoom.unwrap_or(DEFAULT_ZOOM);
    let tiles = registry.resolve(params.tiles.as_deref().unwrap_or_default());
    let name = params.name.trim();

    if name.chars().count() < MIN_QUERY_LEN {
        return Json(DashboardResponse {
            latitude: None,
            longitude: None,
            status: format!("❌ Enter at least {MIN_QUERY_LEN} characters"),
            map: render_map(None, zoom, tiles),
            data: String::new(),
        });
    }

    match geocoding::search_india(name).await {
        Ok(Some(place)) => {
            let location = place.to_location();
            let label = place.display();
            let status = format!(
                "✅ <b>Found:</b> {}<br><i>{}</i>",
                panels::escape(&label),
                panels::escape(&place.admin)
            );
            let data = render_data_panels(&location, &label).await;
            Json(DashboardResponse {
                latitude: Some(place.latitude),
                longitude: Some(place.longitude),
                status,
                map: render_map(Some((place.latitude, place.longitude)), zoom, tiles),
                data,
            })
        }
        Ok(None) => Json(DashboardResponse {
            latitude: None,
            longitude: None,
            status: "❌ No matching location found in India".to_string(),
            map: render_map(None, zoom, tiles),
            data: String::new(),
        }),
        Err(e) => {
            tracing::warn!("Geocoding failed for '{name}': {e:#}");
            Json(DashboardResponse {
                latitude: None,
                longitude: None,
                status: format!("❌ Search failed: {}", panels::escape(&e.to_string())),
                map: render_map(None, zoom, tiles),
                data: String::new(),
            })
        }
    }
}

#[instrument(skip(registry))]
async fn update(
    State(registry): State<Arc<TileRegistry>>,
    Query(params): Query<UpdateParams>,
) -> Json<DashboardResponse> {
    let zoom = params.zoom.unwrap_or(DEFAULT_ZOOM);
    let tiles = registry.resolve(params.tiles.as_deref().unwrap_or_default());

    let marker = match (params.lat, params.lon) {
        (Some(lat), Some(lon)) => Some((lat, lon)),
        _ => None,
    };

    let (status, data) = match marker {
        Some((lat, lon)) if crate::geo::is_within_service_region(lat, lon) => {
            let location = Location::unnamed(lat, lon);
            let label = location.format_coordinates();
            let status = format!("✅ Marker at ({label})");
            let data = render_data_panels(&location, &label).await;
            (status, data)
        }
        _ => (
            "ℹ️ Enter coordinates inside India (lat 6–36, lon 68–98) or search by name"
                .to_string(),
            String::new(),
        ),
    };

    Json(DashboardResponse {
        latitude: params.lat,
        longitude: params.lon,
        status,
        map: render_map(marker, zoom, tiles),
        data,
    })
}

/// Tile labels for the dropdown, built-ins first
async fn tiles(State(registry): State<Arc<TileRegistry>>) -> Json<Vec<String>> {
    Json(registry.labels())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Arc<TileRegistry> {
        Arc::new(TileRegistry::default())
    }

    #[tokio::test]
    async fn short_query_is_rejected_without_a_fetch() {
        let Json(response) = search(
            State(registry()),
            Query(SearchParams {
                name: "ab".to_string(),
                zoom: None,
                tiles: None,
            }),
        )
        .await;

        assert!(response.latitude.is_none());
        assert!(response.status.contains("at least 3"));
        assert!(response.data.is_empty());
        // Map still renders, centered on the default view with no marker
        assert!(!response.map.contains("circleMarker"));
    }

    #[tokio::test]
    async fn update_without_coordinates_shows_hint() {
        let Json(response) = update(
            State(registry()),
            Query(UpdateParams {
                lat: None,
                lon: None,
                zoom: Some(7),
                tiles: Some("CartoDB positron".to_string()),
            }),
        )
        .await;

        assert!(response.status.contains("Enter coordinates"));
        assert!(response.data.is_empty());
        assert!(response.map.contains("basemaps.cartocdn.com"));
    }

    #[tokio::test]
    async fn update_out_of_region_shows_red_marker_and_hint() {
        let Json(response) = update(
            State(registry()),
            Query(UpdateParams {
                lat: Some(48.85),
                lon: Some(2.35),
                zoom: None,
                tiles: None,
            }),
        )
        .await;

        assert_eq!(response.latitude, Some(48.85));
        assert!(response.status.contains("Enter coordinates"));
        assert!(response.map.contains("Out of India bounds"));
        assert!(response.data.is_empty());
    }
}
