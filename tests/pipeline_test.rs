//! Integration tests for the coordinate-normalization and
//! map-retrieval pipeline

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use httpmock::prelude::*;

use mapgrab::coordinate::Point;
use mapgrab::errors::{MapError, MapResult};
use mapgrab::fetch::WmsClient;
use mapgrab::geocoder::Geocoder;
use mapgrab::pipeline::{Capabilities, InputMode, Pipeline};
use mapgrab::utils::geometry::Size;

/// Geocoder stub that records how many times it was invoked
struct CountingGeocoder {
    calls: Arc<AtomicUsize>,
    result: Point,
}

impl CountingGeocoder {
    fn new(result: Point) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            CountingGeocoder {
                calls: Arc::clone(&calls),
                result,
            },
            calls,
        )
    }
}

impl Geocoder for CountingGeocoder {
    fn name(&self) -> &str {
        "counting-stub"
    }

    fn geocode(&self, _address: &str) -> MapResult<Point> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.result)
    }
}

#[test]
fn test_wgs84_mode_never_touches_the_geocoder() {
    let (geocoder, calls) = CountingGeocoder::new(Point::new(0.0, 0.0));
    let pipeline = Pipeline::with_geocoder(Capabilities { geocoder: true }, Box::new(geocoder));

    let mode = InputMode::from_flags(
        None,
        true,
        false,
        None,
        false,
        Some(Point::new(24.94, 60.17)),
        &Capabilities { geocoder: true },
    )
    .unwrap();
    let canonical = pipeline.resolve(&mode).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    // Helsinki lands in UTM zone 35 at a sane northing
    assert!((canonical.x - 385740.0).abs() < 500.0);
    assert!((canonical.y - 6672140.0).abs() < 500.0);
}

#[test]
fn test_address_mode_geocodes_once_then_normalizes() {
    let (geocoder, calls) = CountingGeocoder::new(Point::new(24.94, 60.17));
    let pipeline = Pipeline::with_geocoder(Capabilities { geocoder: true }, Box::new(geocoder));

    let canonical = pipeline
        .resolve(&InputMode::Address("Helsinki".to_string()))
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!((canonical.x - 385740.0).abs() < 500.0);
    assert!((canonical.y - 6672140.0).abs() < 500.0);
}

#[test]
fn test_missing_geocoder_fails_before_any_tile_request() {
    let server = MockServer::start();
    let tile_mock = server.mock(|when, then| {
        when.method(GET).path("/wms");
        then.status(200).header("content-type", "image/png").body(b"png");
    });

    let pipeline = Pipeline::new(Capabilities { geocoder: false }).unwrap();
    let result = pipeline.resolve(&InputMode::Address("Helsinki".to_string()));

    assert!(matches!(result, Err(MapError::GeocoderUnavailable(_))));
    tile_mock.assert_hits(0);
}

#[test]
fn test_address_with_numeric_pair_survives_a_geocoderless_build() {
    // When geocoding is unavailable an explicit pair takes over from
    // the address instead of aborting the invocation
    let caps = Capabilities { geocoder: false };
    let mode = InputMode::from_flags(
        Some("Helsinki"),
        true,
        false,
        None,
        false,
        Some(Point::new(24.94, 60.17)),
        &caps,
    )
    .unwrap();
    assert_eq!(mode, InputMode::Wgs84(Point::new(24.94, 60.17)));

    let pipeline = Pipeline::new(caps).unwrap();
    let canonical = pipeline.resolve(&mode).unwrap();
    assert!((canonical.x - 385740.0).abs() < 500.0);
    assert!((canonical.y - 6672140.0).abs() < 500.0);
}

#[test]
fn test_canonical_mode_feeds_the_wms_fetch_unchanged() {
    let server = MockServer::start();
    let tile_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/wms")
            .query_param("REQUEST", "GetMap")
            .query_param("BBOX", "385000,6672000,387000,6674000")
            .query_param("WIDTH", "800")
            .query_param("HEIGHT", "800");
        then.status(200)
            .header("content-type", "image/png")
            .body(b"tile bytes");
    });

    let pipeline = Pipeline::new(Capabilities { geocoder: false }).unwrap();
    let mode = InputMode::from_flags(
        None,
        false,
        false,
        None,
        true,
        Some(Point::new(385000.0, 6672000.0)),
        &Capabilities { geocoder: false },
    )
    .unwrap();
    let canonical = pipeline.resolve(&mode).unwrap();
    assert_eq!(canonical, Point::new(385000.0, 6672000.0));

    let client = WmsClient::new(
        &server.url("/wms"),
        "taustakartta",
        "EPSG:3067",
        "image/png",
        None,
    )
    .unwrap();
    let bytes = client
        .fetch_map(&canonical, &Size::new(2000, 2000), &Size::new(800, 800))
        .unwrap();

    tile_mock.assert();
    assert_eq!(bytes, b"tile bytes");
}

#[test]
fn test_legacy_grid_mode_reaches_the_same_place_as_wgs84() {
    // KKJ and WGS84 renditions of the same spot should normalize to
    // nearly the same canonical pair (the legacy datum is only good to
    // a couple of metres)
    let pipeline = Pipeline::new(Capabilities { geocoder: false }).unwrap();

    let from_wgs84 = pipeline
        .resolve(&InputMode::Wgs84(Point::new(27.0, 65.0)))
        .unwrap();

    // The same geographic spot expressed in KKJ, obtained by running
    // the inverse chain through the named-projection path
    let kkj_def = "+proj=tmerc +lat_0=0 +lon_0=27 +k=1 +x_0=3500000 +y_0=0 +ellps=intl \
                   +towgs84=-96.062,-82.428,-121.753,4.801,0.345,-1.376,1.496 +units=m +no_defs";
    let kkj = mapgrab::ProjectionRegistry::resolve(kkj_def).unwrap();
    let wgs84 = mapgrab::ProjectionRegistry::resolve("wgs84").unwrap();
    let kkj_pair = mapgrab::CoordinateNormalizer
        .transform_point(&Point::new(27.0, 65.0), &wgs84, &kkj)
        .unwrap();

    let from_kkj = pipeline
        .resolve(&InputMode::LegacyGrid(kkj_pair))
        .unwrap();

    assert!((from_wgs84.x - from_kkj.x).abs() < 0.05);
    assert!((from_wgs84.y - from_kkj.y).abs() < 0.05);
}

#[test]
fn test_named_projection_mode_matches_the_fixed_descriptor() {
    let pipeline = Pipeline::new(Capabilities { geocoder: false }).unwrap();
    let point = Point::new(24.94, 60.17);

    let via_flag = pipeline.resolve(&InputMode::Wgs84(point)).unwrap();
    let via_named = pipeline
        .resolve(&InputMode::Named {
            definition: "EPSG:4326".to_string(),
            point,
        })
        .unwrap();

    assert!((via_flag.x - via_named.x).abs() < 1e-9);
    assert!((via_flag.y - via_named.y).abs() < 1e-9);
}
