//! Pipeline orchestration: from CLI-level input to canonical coordinates
//!
//! The five ways of pointing at a location form an exhaustive tagged
//! union; exactly one is active per invocation. The orchestrator turns
//! the active mode into an ETRS-TM35FIN pair, invoking the geocoder
//! and/or the normalizer as the mode requires.

mod capabilities;

pub use self::capabilities::Capabilities;

use log::debug;

use crate::coordinate::Point;
use crate::errors::{MapError, MapResult};
use crate::geocoder::{create_geocoder, Geocoder};
use crate::projection::{CoordinateNormalizer, ProjectionRegistry};

/// How the input location was supplied
#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    /// Free-text address, to be geocoded
    Address(String),
    /// Pair in geographic WGS84 (longitude, latitude)
    Wgs84(Point),
    /// Pair in the legacy KKJ grid
    LegacyGrid(Point),
    /// Pair in an arbitrary named or definition-string projection
    Named {
        /// Reference-system name or proj definition string
        definition: String,
        point: Point,
    },
    /// Pair already in ETRS-TM35FIN
    Canonical(Point),
}

impl InputMode {
    /// Select the active mode from CLI-level flags
    ///
    /// Address mode wins when an address was given and geocoding is
    /// available; without the capability an explicit numeric pair is
    /// required and claims the mode instead. Selecting no mode at all
    /// is a reportable error, not a fallthrough.
    pub fn from_flags(
        address: Option<&str>,
        wgs84: bool,
        kkj: bool,
        srs: Option<&str>,
        tm35fin: bool,
        coordinates: Option<Point>,
        capabilities: &Capabilities,
    ) -> MapResult<InputMode> {
        if let Some(address) = address {
            if capabilities.geocoder {
                return Ok(InputMode::Address(address.to_string()));
            }
            if coordinates.is_none() {
                return Err(MapError::GeocoderUnavailable(
                    "geocoding is not available in this build and no -x/-y pair was given"
                        .to_string(),
                ));
            }
        }

        let point = coordinates.ok_or_else(|| {
            MapError::ArgumentError("an address or both -x and -y are required".to_string())
        })?;

        if wgs84 {
            Ok(InputMode::Wgs84(point))
        } else if kkj {
            Ok(InputMode::LegacyGrid(point))
        } else if let Some(srs) = srs {
            Ok(InputMode::Named {
                definition: srs.to_string(),
                point,
            })
        } else if tm35fin {
            Ok(InputMode::Canonical(point))
        } else {
            Err(MapError::ArgumentError(
                "no coordinate system selected; use --wgs84, --kkj, --srs or --tm35fin"
                    .to_string(),
            ))
        }
    }
}

/// Orchestrator that resolves an input mode to canonical coordinates
pub struct Pipeline {
    capabilities: Capabilities,
    geocoder: Option<Box<dyn Geocoder>>,
    normalizer: CoordinateNormalizer,
}

impl Pipeline {
    /// Build a pipeline, constructing the geocoding provider when the
    /// capability is present
    pub fn new(capabilities: Capabilities) -> MapResult<Self> {
        let geocoder = if capabilities.geocoder {
            Some(create_geocoder()?)
        } else {
            None
        };
        Ok(Pipeline {
            capabilities,
            geocoder,
            normalizer: CoordinateNormalizer,
        })
    }

    /// Build a pipeline with an explicit geocoding provider
    pub fn with_geocoder(capabilities: Capabilities, geocoder: Box<dyn Geocoder>) -> Self {
        Pipeline {
            capabilities,
            geocoder: Some(geocoder),
            normalizer: CoordinateNormalizer,
        }
    }

    /// Resolve the active input mode to an ETRS-TM35FIN pair
    pub fn resolve(&self, mode: &InputMode) -> MapResult<Point> {
        match mode {
            InputMode::Address(address) => {
                if !self.capabilities.geocoder {
                    return Err(MapError::GeocoderUnavailable(
                        "geocoding is not available in this build".to_string(),
                    ));
                }
                let geocoder = self.geocoder.as_deref().ok_or_else(|| {
                    MapError::GeocoderUnavailable("no geocoding provider configured".to_string())
                })?;
                debug!("Geocoding address with provider '{}'", geocoder.name());
                let wgs84_pair = geocoder.geocode(address)?;
                self.normalizer
                    .normalize(&wgs84_pair, &ProjectionRegistry::wgs84())
            }
            InputMode::Wgs84(point) => {
                debug!("Coordinates are given in WGS84: [{}, {}]", point.x, point.y);
                self.normalizer
                    .normalize(point, &ProjectionRegistry::wgs84())
            }
            InputMode::LegacyGrid(point) => {
                debug!("Coordinates are given in KKJ: [{}, {}]", point.x, point.y);
                self.normalizer
                    .normalize(point, &ProjectionRegistry::legacy_grid())
            }
            InputMode::Named { definition, point } => {
                debug!(
                    "Coordinates are given in {}: [{}, {}]",
                    definition, point.x, point.y
                );
                let source = ProjectionRegistry::resolve(definition)?;
                self.normalizer.normalize(point, &source)
            }
            InputMode::Canonical(point) => {
                debug!("Coordinates are given in ETRS-TM35FIN");
                if !point.is_finite() {
                    return Err(MapError::ConversionError(
                        "canonical coordinates must be finite".to_string(),
                    ));
                }
                Ok(*point)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WITH_GEOCODER: Capabilities = Capabilities { geocoder: true };
    const WITHOUT_GEOCODER: Capabilities = Capabilities { geocoder: false };

    #[test]
    fn test_mode_priority_prefers_address() {
        let mode = InputMode::from_flags(
            Some("Helsinki"),
            true,
            false,
            None,
            false,
            Some(Point::new(1.0, 2.0)),
            &WITH_GEOCODER,
        )
        .unwrap();
        assert_eq!(mode, InputMode::Address("Helsinki".to_string()));
    }

    #[test]
    fn test_address_without_geocoder_falls_back_to_numeric_pair() {
        let mode = InputMode::from_flags(
            Some("Helsinki"),
            true,
            false,
            None,
            false,
            Some(Point::new(24.94, 60.17)),
            &WITHOUT_GEOCODER,
        )
        .unwrap();
        assert_eq!(mode, InputMode::Wgs84(Point::new(24.94, 60.17)));
    }

    #[test]
    fn test_address_without_geocoder_or_pair_is_unavailable() {
        let result = InputMode::from_flags(
            Some("Helsinki"),
            false,
            false,
            None,
            false,
            None,
            &WITHOUT_GEOCODER,
        );
        assert!(matches!(result, Err(MapError::GeocoderUnavailable(_))));
    }

    #[test]
    fn test_mode_requires_coordinates_without_address() {
        let result =
            InputMode::from_flags(None, true, false, None, false, None, &WITH_GEOCODER);
        assert!(matches!(result, Err(MapError::ArgumentError(_))));
    }

    #[test]
    fn test_no_mode_selected_is_an_error() {
        let result = InputMode::from_flags(
            None,
            false,
            false,
            None,
            false,
            Some(Point::new(1.0, 2.0)),
            &WITH_GEOCODER,
        );
        assert!(matches!(result, Err(MapError::ArgumentError(_))));
    }

    #[test]
    fn test_named_mode_carries_definition() {
        let mode = InputMode::from_flags(
            None,
            false,
            false,
            Some("EPSG:4326"),
            false,
            Some(Point::new(24.94, 60.17)),
            &WITH_GEOCODER,
        )
        .unwrap();
        assert_eq!(
            mode,
            InputMode::Named {
                definition: "EPSG:4326".to_string(),
                point: Point::new(24.94, 60.17),
            }
        );
    }

    #[test]
    fn test_canonical_mode_passes_through() {
        let pipeline = Pipeline::new(Capabilities { geocoder: false }).unwrap();
        let point = Point::new(385740.0, 6672140.0);
        let resolved = pipeline.resolve(&InputMode::Canonical(point)).unwrap();
        assert_eq!(resolved, point);
    }

    #[test]
    fn test_address_without_capability_fails_fast() {
        let pipeline = Pipeline::new(Capabilities { geocoder: false }).unwrap();
        let result = pipeline.resolve(&InputMode::Address("Helsinki".to_string()));
        assert!(matches!(result, Err(MapError::GeocoderUnavailable(_))));
    }

    #[test]
    fn test_bad_named_projection_propagates() {
        let pipeline = Pipeline::new(Capabilities { geocoder: false }).unwrap();
        let result = pipeline.resolve(&InputMode::Named {
            definition: "+proj=utm +ellps=GRS80".to_string(),
            point: Point::new(1.0, 2.0),
        });
        assert!(matches!(result, Err(MapError::InvalidProjection(_))));
    }
}
