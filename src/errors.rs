//! Custom error types for the map-fetch pipeline

use std::fmt;
use std::io;

/// Pipeline-specific error types
#[derive(Debug)]
pub enum MapError {
    /// Projection name or definition string could not be resolved
    InvalidProjection(String),
    /// Coordinate transformation produced no usable result
    ConversionError(String),
    /// Geocoding capability is not available in this build/configuration
    GeocoderUnavailable(String),
    /// Geocoding provider returned no result for the address
    GeocodeNotFound(String),
    /// Tile or map retrieval failed
    TileFetchError(String),
    /// Malformed or missing command-line input
    ArgumentError(String),
    /// I/O error
    IoError(io::Error),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::InvalidProjection(msg) => write!(f, "Invalid projection: {}", msg),
            MapError::ConversionError(msg) => write!(f, "Coordinate conversion failed: {}", msg),
            MapError::GeocoderUnavailable(msg) => write!(f, "Geocoder unavailable: {}", msg),
            MapError::GeocodeNotFound(msg) => write!(f, "No geocoding result: {}", msg),
            MapError::TileFetchError(msg) => write!(f, "Tile fetch failed: {}", msg),
            MapError::ArgumentError(msg) => write!(f, "Argument error: {}", msg),
            MapError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for MapError {}

impl From<io::Error> for MapError {
    fn from(error: io::Error) -> Self {
        MapError::IoError(error)
    }
}

impl From<reqwest::Error> for MapError {
    fn from(error: reqwest::Error) -> Self {
        MapError::TileFetchError(error.to_string())
    }
}

/// Result type for pipeline operations
pub type MapResult<T> = Result<T, MapError>;
