//! Nominatim geocoding provider

use std::time::Duration;

use log::{debug, info};
use serde::Deserialize;

use super::Geocoder;
use crate::coordinate::Point;
use crate::errors::{MapError, MapResult};

const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One search hit from the Nominatim JSON response. Coordinates come
/// back as strings, not numbers.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    display_name: String,
}

/// Geocoder backed by the public Nominatim search endpoint
pub struct NominatimGeocoder {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl NominatimGeocoder {
    /// Create a provider against the public endpoint
    pub fn new() -> MapResult<Self> {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Create a provider against a custom endpoint (used by tests and
    /// self-hosted Nominatim instances)
    pub fn with_endpoint(endpoint: &str) -> MapResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            // Nominatim's usage policy requires an identifying agent
            .user_agent(concat!("mapgrab/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                MapError::GeocoderUnavailable(format!("could not build HTTP client: {}", e))
            })?;

        Ok(NominatimGeocoder {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    fn parse_hit(&self, hit: &SearchHit) -> MapResult<Point> {
        let lat = hit.lat.parse::<f64>();
        let lon = hit.lon.parse::<f64>();
        match (lon, lat) {
            (Ok(lon), Ok(lat)) => Ok(Point::new(lon, lat)),
            _ => Err(MapError::GeocodeNotFound(format!(
                "provider returned unparseable coordinates for '{}'",
                hit.display_name
            ))),
        }
    }
}

impl Geocoder for NominatimGeocoder {
    fn name(&self) -> &str {
        "nominatim"
    }

    fn geocode(&self, address: &str) -> MapResult<Point> {
        if address.trim().is_empty() {
            return Err(MapError::ArgumentError(
                "address must not be empty".to_string(),
            ));
        }

        debug!("Using Nominatim geocoder at {}", self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .map_err(|e| {
                MapError::GeocoderUnavailable(format!("geocoding request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(MapError::GeocoderUnavailable(format!(
                "geocoding provider returned HTTP {}",
                response.status()
            )));
        }

        let hits: Vec<SearchHit> = response.json().map_err(|e| {
            MapError::GeocoderUnavailable(format!("unreadable geocoding response: {}", e))
        })?;

        let hit = hits
            .first()
            .ok_or_else(|| MapError::GeocodeNotFound(address.to_string()))?;

        let point = self.parse_hit(hit)?;
        debug!("Geocoded place: {}", hit.display_name);
        info!("WGS 84: [{}, {}]", point.x, point.y);
        Ok(point)
    }
}
