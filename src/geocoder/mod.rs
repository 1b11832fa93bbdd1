//! Address geocoding through an external provider
//!
//! The provider sits behind a trait so the pipeline can be exercised
//! without network access. The crate ships exactly one provider
//! (Nominatim); it is compiled in through the `geocoding` feature and
//! the capability probe reports whether it can be used at all.

#[cfg(feature = "geocoding")]
mod nominatim;

#[cfg(feature = "geocoding")]
pub use self::nominatim::NominatimGeocoder;

use crate::coordinate::Point;
use crate::errors::MapResult;

/// Resolves a free-text address into a WGS84 longitude/latitude pair
pub trait Geocoder {
    /// Provider name, used in log and error messages
    fn name(&self) -> &str;

    /// Geocode an address; exactly one provider call, no retry
    fn geocode(&self, address: &str) -> MapResult<Point>;
}

/// Create the configured geocoding provider
#[cfg(feature = "geocoding")]
pub fn create_geocoder() -> MapResult<Box<dyn Geocoder>> {
    Ok(Box::new(NominatimGeocoder::new()?))
}

/// Create the configured geocoding provider
#[cfg(not(feature = "geocoding"))]
pub fn create_geocoder() -> MapResult<Box<dyn Geocoder>> {
    Err(crate::errors::MapError::GeocoderUnavailable(
        "this build was compiled without the 'geocoding' feature".to_string(),
    ))
}
