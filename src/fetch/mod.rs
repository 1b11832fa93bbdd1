//! Tile fetch backends
//!
//! Two mutually exclusive ways to turn a canonical coordinate pair into
//! image bytes: a WMS GetMap request against a configurable endpoint,
//! or a GET against the fixed-parameter PDF tile service. Both perform
//! exactly one network call, with a bounded timeout and no retry.

mod pdf;
mod wms;

pub use self::pdf::PdfTileClient;
pub use self::wms::WmsClient;

use std::time::Duration;

use crate::errors::{MapError, MapResult};

/// Upper bound on a single fetch round trip
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the blocking HTTP client shared by both backends
pub(crate) fn build_client() -> MapResult<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| MapError::TileFetchError(format!("could not build HTTP client: {}", e)))
}
