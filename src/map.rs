//! Map tile registry and embeddable Leaflet markup.
//!
//! The map is rendered as a self-contained Leaflet document embedded through
//! an iframe `srcdoc`, so the fragment can be injected into the page like any
//! other panel.

use crate::config::CustomTile;
use crate::geo::{INDIA_CENTROID, is_within_service_region};

pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 18;
pub const DEFAULT_ZOOM: u8 = 5;

/// A resolvable tile layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSource {
    pub label: String,
    pub url: String,
    pub attribution: String,
}

fn builtin_tiles() -> Vec<TileSource> {
    vec![
        TileSource {
            label: "OpenStreetMap".to_string(),
            url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; OpenStreetMap contributors".to_string(),
        },
        TileSource {
            label: "CartoDB positron".to_string(),
            url: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; OpenStreetMap contributors &copy; CARTO".to_string(),
        },
    ]
}

/// The fixed built-in tile set plus any config-supplied custom sources
#[derive(Debug, Clone)]
pub struct TileRegistry {
    sources: Vec<TileSource>,
}

impl TileRegistry {
    #[must_use]
    pub fn new(custom: Vec<CustomTile>) -> Self {
        let mut sources = builtin_tiles();
        sources.extend(custom.into_iter().map(|tile| TileSource {
            label: tile.label,
            url: tile.url,
            attribution: tile.attribution,
        }));
        Self { sources }
    }

    /// Dropdown labels, built-ins first
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.label.clone()).collect()
    }

    /// Resolve a label to its tile source; unknown labels fall back to the
    /// first built-in (OpenStreetMap).
    #[must_use]
    pub fn resolve(&self, label: &str) -> &TileSource {
        self.sources
            .iter()
            .find(|s| s.label == label)
            .unwrap_or(&self.sources[0])
    }
}

impl Default for TileRegistry {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Escape a string for use inside a double-quoted HTML attribute (srcdoc)
fn attribute_escape(html: &str) -> String {
    html.replace('&', "&amp;").replace('"', "&quot;")
}

/// Escape for embedding inside a single-quoted JS string literal
fn js_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Render the embeddable map fragment.
///
/// With no marker the map just shows the national centroid. A marker inside
/// the service region is drawn blue at its coordinate; an out-of-region
/// marker is drawn red at the centroid with an "Out of India bounds" popup.
#[must_use]
pub fn render_map(marker: Option<(f64, f64)>, zoom: u8, tiles: &TileSource) -> String {
    let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    let (centroid_lat, centroid_lon) = INDIA_CENTROID;

    let (center, marker_js) = match marker {
        Some((lat, lon)) if is_within_service_region(lat, lon) => (
            (lat, lon),
            format!(
                "L.circleMarker([{lat}, {lon}], {{radius: 9, color: '#2a6fdb', \
                 fillColor: '#2a6fdb', fillOpacity: 0.85}})\
                 .bindPopup('Lat: {lat:.4}, Lon: {lon:.4}').addTo(map);"
            ),
        ),
        Some(_) => (
            (centroid_lat, centroid_lon),
            format!(
                "L.circleMarker([{centroid_lat}, {centroid_lon}], {{radius: 9, color: '#cc0033', \
                 fillColor: '#cc0033', fillOpacity: 0.85}})\
                 .bindPopup('Out of India bounds').addTo(map);"
            ),
        ),
        None => ((centroid_lat, centroid_lon), String::new()),
    };

    let document = format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"/>\
         <link rel=\"stylesheet\" href=\"https://unpkg.com/leaflet@1.9.4/dist/leaflet.css\"/>\
         <script src=\"https://unpkg.com/leaflet@1.9.4/dist/leaflet.js\"></script>\
         <style>html,body,#map{{height:100%;margin:0;}}</style></head>\
         <body><div id=\"map\"></div><script>\
         var map = L.map('map').setView([{}, {}], {zoom});\
         L.tileLayer('{}', {{attribution: '{}', maxZoom: 19}}).addTo(map);\
         {marker_js}\
         </script></body></html>",
        center.0,
        center.1,
        js_escape(&tiles.url),
        js_escape(&tiles.attribution),
    );

    format!(
        "<div style='border-radius:18px;box-shadow:0 4px 18px #8882;overflow:hidden;\
         margin:1em 0;min-height:520px;max-width:100%;'>\
         <iframe style='width:100%;height:520px;border:none;' srcdoc=\"{}\"></iframe></div>",
        attribute_escape(&document)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CustomTile;

    #[test]
    fn unknown_label_falls_back_to_openstreetmap() {
        let registry = TileRegistry::default();
        assert_eq!(registry.resolve("No Such Layer").label, "OpenStreetMap");
        assert_eq!(registry.resolve("CartoDB positron").label, "CartoDB positron");
    }

    #[test]
    fn custom_tiles_are_resolvable() {
        let registry = TileRegistry::new(vec![CustomTile {
            label: "Dark".to_string(),
            url: "https://dark.example/{z}/{x}/{y}.png".to_string(),
            attribution: "© Example".to_string(),
        }]);
        assert!(registry.labels().contains(&"Dark".to_string()));
        assert_eq!(registry.resolve("Dark").url, "https://dark.example/{z}/{x}/{y}.png");
    }

    #[test]
    fn in_region_marker_is_blue_at_its_coordinate() {
        let registry = TileRegistry::default();
        let html = render_map(Some((21.0, 79.0)), 5, registry.resolve("OpenStreetMap"));
        assert!(html.contains("#2a6fdb"));
        assert!(html.contains("Lat: 21.0000, Lon: 79.0000"));
    }

    #[test]
    fn out_of_region_marker_is_red_at_the_centroid() {
        let registry = TileRegistry::default();
        let html = render_map(Some((48.8, 2.3)), 5, registry.resolve("OpenStreetMap"));
        assert!(html.contains("#cc0033"));
        assert!(html.contains("Out of India bounds"));
        assert!(html.contains("21.146633"));
    }

    #[test]
    fn no_marker_centers_on_centroid() {
        let registry = TileRegistry::default();
        let html = render_map(None, 5, registry.resolve("OpenStreetMap"));
        assert!(!html.contains("circleMarker"));
        assert!(html.contains("21.146633"));
    }

    #[test]
    fn zoom_is_clamped_to_the_slider_range() {
        let registry = TileRegistry::default();
        let html = render_map(None, 40, registry.resolve("OpenStreetMap"));
        assert!(html.contains(", 18);"));
    }
}
