//! WMS GetMap client
//!
//! Issues a single synchronous GetMap request and validates that the
//! response actually carries an image. WMS servers report failures as
//! an XML ServiceExceptionReport, often with HTTP 200, so the body's
//! content type is checked and exception documents are surfaced as
//! errors with the server's own message.

use log::{debug, info};
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::header::{CONTENT_TYPE, COOKIE};

use super::build_client;
use crate::coordinate::{BoundingBox, Point};
use crate::errors::{MapError, MapResult};
use crate::utils::geometry::Size;

const WMS_VERSION: &str = "1.1.1";

/// Client for one WMS endpoint/layer combination
pub struct WmsClient {
    base_url: String,
    layer: String,
    srs: String,
    format: String,
    cookie: Option<String>,
    client: reqwest::blocking::Client,
}

impl WmsClient {
    /// Create a client for a GetMap endpoint
    ///
    /// # Arguments
    /// * `base_url` - WMS service URL
    /// * `layer` - layer name to request
    /// * `srs` - spatial reference identifier sent as SRS (e.g. "EPSG:3067")
    /// * `format` - requested image format (e.g. "image/png")
    /// * `cookie` - optional session cookie value
    pub fn new(
        base_url: &str,
        layer: &str,
        srs: &str,
        format: &str,
        cookie: Option<&str>,
    ) -> MapResult<Self> {
        Ok(WmsClient {
            base_url: base_url.to_string(),
            layer: layer.to_string(),
            srs: srs.to_string(),
            format: format.to_string(),
            cookie: cookie.map(|c| c.to_string()),
            client: build_client()?,
        })
    }

    /// Fetch a map image for the extent starting at `origin`
    ///
    /// The extent is interpreted in projection units: the requested
    /// bounding box is (x, y, x + extent.width, y + extent.height).
    /// `output` is the rendered image size in pixels.
    pub fn fetch_map(&self, origin: &Point, extent: &Size, output: &Size) -> MapResult<Vec<u8>> {
        let bbox = BoundingBox::from_point_extent(origin, extent);
        debug!("GetMap bbox: {}", bbox.to_query_value());

        let params = [
            ("SERVICE", "WMS".to_string()),
            ("VERSION", WMS_VERSION.to_string()),
            ("REQUEST", "GetMap".to_string()),
            ("LAYERS", self.layer.clone()),
            ("STYLES", String::new()),
            ("SRS", self.srs.clone()),
            ("BBOX", bbox.to_query_value()),
            ("WIDTH", output.width.to_string()),
            ("HEIGHT", output.height.to_string()),
            ("FORMAT", self.format.clone()),
        ];

        let mut request = self.client.get(&self.base_url).query(&params);
        if let Some(cookie) = &self.cookie {
            request = request.header(COOKIE, cookie.as_str());
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(MapError::TileFetchError(format!(
                "WMS server returned HTTP {}",
                status
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let bytes = response.bytes()?;

        if content_type.contains("xml") {
            let message = service_exception_message(&String::from_utf8_lossy(&bytes))
                .unwrap_or_else(|| "WMS service exception with no message".to_string());
            return Err(MapError::TileFetchError(message));
        }
        if !content_type.starts_with("image/") {
            return Err(MapError::TileFetchError(format!(
                "WMS server answered with '{}' instead of an image",
                content_type
            )));
        }

        info!("Fetched {} bytes from WMS layer '{}'", bytes.len(), self.layer);
        Ok(bytes.to_vec())
    }
}

/// Extract the message text from an OGC ServiceExceptionReport document
fn service_exception_message(xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut in_exception = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"ServiceException" => {
                in_exception = true;
            }
            Ok(Event::Text(t)) if in_exception => {
                return t.unescape().ok().map(|s| s.trim().to_string());
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"ServiceException" => {
                in_exception = false;
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}
