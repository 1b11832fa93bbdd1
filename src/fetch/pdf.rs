//! Fixed-parameter PDF tile service client
//!
//! The service takes its parameters with Finnish names: E/N are the
//! ETRS-TM35FIN easting and northing, leveys/korkeus the output width
//! and height, mittakaava the scale denominator.

use log::{debug, info};
use reqwest::header::CONTENT_TYPE;

use super::build_client;
use crate::coordinate::Point;
use crate::errors::{MapError, MapResult};
use crate::utils::geometry::Size;

const DEFAULT_ENDPOINT: &str = "http://pikakartta.kapsi.fi/kartta.php";

/// Client for the fixed PDF tile endpoint
pub struct PdfTileClient {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl PdfTileClient {
    /// Create a client against the well-known endpoint
    pub fn new() -> MapResult<Self> {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Create a client against a custom endpoint (used by tests)
    pub fn with_endpoint(endpoint: &str) -> MapResult<Self> {
        Ok(PdfTileClient {
            endpoint: endpoint.to_string(),
            client: build_client()?,
        })
    }

    /// Fetch a rendered tile around the canonical coordinates
    pub fn fetch_pdf(&self, point: &Point, output: &Size, scale: u32) -> MapResult<Vec<u8>> {
        debug!(
            "PDF tile request: E={} N={} {}x{} 1:{}",
            point.x, point.y, output.width, output.height, scale
        );

        let params = [
            ("E", point.x.to_string()),
            ("N", point.y.to_string()),
            ("leveys", output.width.to_string()),
            ("korkeus", output.height.to_string()),
            ("mittakaava", scale.to_string()),
        ];

        let response = self.client.get(&self.endpoint).query(&params).send()?;

        // The upstream service was historically trusted blindly here;
        // treat a non-success status as a hard failure instead
        let status = response.status();
        if !status.is_success() {
            return Err(MapError::TileFetchError(format!(
                "tile service returned HTTP {}",
                status
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if content_type.starts_with("text/html") {
            return Err(MapError::TileFetchError(
                "tile service answered with an HTML page instead of a tile".to_string(),
            ));
        }

        let bytes = response.bytes()?;
        info!("Fetched {} bytes from the tile service", bytes.len());
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_fetch_pdf_sends_fixed_parameter_names() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/kartta.php")
                .query_param("E", "385740")
                .query_param("N", "6672140")
                .query_param("leveys", "800")
                .query_param("korkeus", "600")
                .query_param("mittakaava", "16000");
            then.status(200)
                .header("content-type", "application/pdf")
                .body(b"%PDF-1.4 fake");
        });

        let client = PdfTileClient::with_endpoint(&server.url("/kartta.php")).unwrap();
        let bytes = client
            .fetch_pdf(&Point::new(385740.0, 6672140.0), &Size::new(800, 600), 16000)
            .unwrap();

        mock.assert();
        assert_eq!(bytes, b"%PDF-1.4 fake");
    }

    #[test]
    fn test_fetch_pdf_rejects_http_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/kartta.php");
            then.status(404);
        });

        let client = PdfTileClient::with_endpoint(&server.url("/kartta.php")).unwrap();
        let result = client.fetch_pdf(&Point::new(0.0, 0.0), &Size::new(1, 1), 16000);
        assert!(matches!(result, Err(MapError::TileFetchError(_))));
    }

    #[test]
    fn test_fetch_pdf_rejects_html_error_page() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/kartta.php");
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body("<html>quota exceeded</html>");
        });

        let client = PdfTileClient::with_endpoint(&server.url("/kartta.php")).unwrap();
        let result = client.fetch_pdf(&Point::new(0.0, 0.0), &Size::new(1, 1), 16000);
        assert!(matches!(result, Err(MapError::TileFetchError(_))));
    }
}
