use log::info;

use crate::coordinate::Point;
use crate::errors::{MapError, MapResult};
use crate::fetch::{PdfTileClient, WmsClient};
use crate::pipeline::Capabilities;
use crate::projection::{CoordinateNormalizer, ProjectionRegistry};
use crate::utils::geometry::Size;
use crate::utils::logger::Logger;

/// Main interface to the mapgrab library
pub struct MapGrab {
    logger: Logger,
}

impl MapGrab {
    /// Create a new MapGrab instance
    ///
    /// # Arguments
    /// * `log_file` - Optional path to log file, defaults to "mapgrab.log"
    ///
    /// # Returns
    /// A MapGrab instance or an error if initialization fails
    pub fn new(log_file: Option<&str>) -> MapResult<Self> {
        let log_path = log_file.unwrap_or("mapgrab.log");
        let logger = Logger::new(log_path)?;
        Ok(MapGrab { logger })
    }

    /// Normalize a coordinate pair from any supported reference system
    /// into ETRS-TM35FIN
    ///
    /// # Arguments
    /// * `x`, `y` - the pair in the source system
    /// * `source` - system name ("wgs84", "kkj", "tm35fin"), EPSG
    ///   identifier or proj definition string
    pub fn normalize(&self, x: f64, y: f64, source: &str) -> MapResult<(f64, f64)> {
        let descriptor = ProjectionRegistry::resolve(source)?;
        let point = CoordinateNormalizer.normalize(&Point::new(x, y), &descriptor)?;
        self.logger
            .log(&format!("Normalized [{}, {}] from {}", point.x, point.y, source))?;
        Ok((point.x, point.y))
    }

    /// Geocode a free-text address to a WGS84 longitude/latitude pair
    pub fn geocode(&self, address: &str) -> MapResult<(f64, f64)> {
        let capabilities = Capabilities::probe();
        if !capabilities.geocoder {
            return Err(MapError::GeocoderUnavailable(
                "geocoding is not available in this build".to_string(),
            ));
        }
        let geocoder = crate::geocoder::create_geocoder()?;
        let point = geocoder.geocode(address)?;
        Ok((point.x, point.y))
    }

    /// Fetch a map image over WMS for canonical coordinates
    ///
    /// The extent is the map area in projection units starting at the
    /// coordinates; the output size is in pixels.
    #[allow(clippy::too_many_arguments)]
    pub fn fetch_wms(
        &self,
        url: &str,
        layer: &str,
        srs: &str,
        format: &str,
        cookie: Option<&str>,
        coordinates: (f64, f64),
        extent: (u32, u32),
        output: (u32, u32),
    ) -> MapResult<Vec<u8>> {
        let client = WmsClient::new(url, layer, srs, format, cookie)?;
        let bytes = client.fetch_map(
            &Point::new(coordinates.0, coordinates.1),
            &Size::new(extent.0, extent.1),
            &Size::new(output.0, output.1),
        )?;
        info!("WMS fetch returned {} bytes", bytes.len());
        Ok(bytes)
    }

    /// Fetch a tile from the fixed PDF service for canonical coordinates
    pub fn fetch_pdf(
        &self,
        coordinates: (f64, f64),
        output: (u32, u32),
        scale: u32,
    ) -> MapResult<Vec<u8>> {
        let client = PdfTileClient::new()?;
        let bytes = client.fetch_pdf(
            &Point::new(coordinates.0, coordinates.1),
            &Size::new(output.0, output.1),
            scale,
        )?;
        info!("PDF tile fetch returned {} bytes", bytes.len());
        Ok(bytes)
    }

    /// Convenience: resolve an address straight to canonical coordinates
    pub fn locate(&self, address: &str) -> MapResult<(f64, f64)> {
        let (lon, lat) = self.geocode(address)?;
        self.normalize(lon, lat, "wgs84")
    }
}
