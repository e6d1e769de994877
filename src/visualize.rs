//! Map links for drivers.

use std::fmt::Write;

use crate::model::Coordinate;
use crate::traits::RouteVisualizer;

const GOOGLE_MAPS_DIR: &str = "https://www.google.com.br/maps/dir/";

/// Google Maps directions link: every stop as `lat,lon/`, then the map is
/// centred on the first stop with `@lat,lon/`.
#[derive(Debug, Clone)]
pub struct GoogleMapsLink {
    pub base_url: String,
}

impl Default for GoogleMapsLink {
    fn default() -> Self {
        Self {
            base_url: GOOGLE_MAPS_DIR.to_string(),
        }
    }
}

impl RouteVisualizer for GoogleMapsLink {
    fn render(&self, coordinates: &[Coordinate]) -> String {
        let mut url = self.base_url.clone();
        for c in coordinates {
            let _ = write!(url, "{},{}/", c.latitude, c.longitude);
        }
        if let Some(first) = coordinates.first() {
            let _ = write!(url, "@{},{}/", first.latitude, first.longitude);
        }
        url
    }
}
