//! Projection descriptors and definition-string parsing
//!
//! A descriptor carries everything the normalizer needs to transform
//! to and from a reference system: the projection kind with its numeric
//! parameters, the ellipsoid, and the datum shift towards WGS84.
//! Descriptors are immutable once constructed.

use std::collections::HashMap;

use super::ellipsoid::Ellipsoid;
use crate::errors::{MapError, MapResult};

/// The projection method and its parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionKind {
    /// Geographic coordinates (longitude/latitude in degrees)
    Geographic,
    /// Transverse Mercator
    TransverseMercator {
        /// Latitude of origin in degrees
        lat_0: f64,
        /// Central meridian in degrees
        lon_0: f64,
        /// Scale factor at the central meridian
        k_0: f64,
        /// False easting in meters
        x_0: f64,
        /// False northing in meters
        y_0: f64,
    },
}

/// A fully specified reference system
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionDescriptor {
    /// Human-readable name, used in log and error messages
    pub name: String,
    /// Projection method and parameters
    pub kind: ProjectionKind,
    /// Reference ellipsoid
    pub ellipsoid: Ellipsoid,
    /// 7-parameter Helmert shift to WGS84:
    /// dx, dy, dz (m), rx, ry, rz (arc-seconds), ds (ppm)
    pub towgs84: [f64; 7],
}

impl ProjectionDescriptor {
    /// Geographic WGS84 (EPSG:4326)
    pub fn wgs84() -> Self {
        ProjectionDescriptor {
            name: "WGS84".to_string(),
            kind: ProjectionKind::Geographic,
            ellipsoid: Ellipsoid::WGS84,
            towgs84: [0.0; 7],
        }
    }

    /// Canonical target: ETRS-TM35FIN (EPSG:3067), UTM zone 35 on GRS80
    pub fn tm35fin() -> Self {
        ProjectionDescriptor {
            name: "ETRS-TM35FIN".to_string(),
            kind: ProjectionKind::TransverseMercator {
                lat_0: 0.0,
                lon_0: 27.0,
                k_0: 0.9996,
                x_0: 500000.0,
                y_0: 0.0,
            },
            ellipsoid: Ellipsoid::GRS80,
            towgs84: [0.0; 7],
        }
    }

    /// Legacy national grid: KKJ uniform coordinate system (EPSG:2393)
    pub fn kkj() -> Self {
        ProjectionDescriptor {
            name: "KKJ".to_string(),
            kind: ProjectionKind::TransverseMercator {
                lat_0: 0.0,
                lon_0: 27.0,
                k_0: 1.0,
                x_0: 3500000.0,
                y_0: 0.0,
            },
            ellipsoid: Ellipsoid::INTERNATIONAL,
            towgs84: [-96.062, -82.428, -121.753, 4.801, 0.345, -1.376, 1.496],
        }
    }

    /// Resolve a descriptor from a bare EPSG code
    pub fn from_epsg(code: u32) -> MapResult<Self> {
        match code {
            4326 => Ok(Self::wgs84()),
            3067 => Ok(Self::tm35fin()),
            2393 => Ok(Self::kkj()),
            other => Err(MapError::InvalidProjection(format!(
                "unsupported EPSG code {}",
                other
            ))),
        }
    }

    /// Parse a proj-style definition string, e.g.
    /// `+proj=tmerc +lat_0=0 +lon_0=27 +k=1 +x_0=3500000 +ellps=intl`
    pub fn from_definition(definition: &str) -> MapResult<Self> {
        let params = split_definition(definition)?;

        if let Some(Some(init)) = params.get("init") {
            return from_init(init);
        }

        let proj = match params.get("proj") {
            Some(Some(p)) => p.as_str(),
            _ => {
                return Err(MapError::InvalidProjection(
                    "definition is missing +proj".to_string(),
                ))
            }
        };

        let ellipsoid = match params.get("ellps") {
            Some(Some(name)) => Ellipsoid::from_name(name)?,
            Some(None) => {
                return Err(MapError::InvalidProjection(
                    "+ellps requires a value".to_string(),
                ))
            }
            // proj's own default datum
            None => Ellipsoid::WGS84,
        };

        let towgs84 = match params.get("towgs84") {
            Some(Some(list)) => parse_towgs84(list)?,
            Some(None) => {
                return Err(MapError::InvalidProjection(
                    "+towgs84 requires a value".to_string(),
                ))
            }
            None => [0.0; 7],
        };

        let kind = match proj {
            "longlat" | "latlong" => ProjectionKind::Geographic,
            "tmerc" => ProjectionKind::TransverseMercator {
                lat_0: numeric_param(&params, "lat_0", 0.0)?,
                lon_0: numeric_param(&params, "lon_0", 0.0)?,
                k_0: scale_param(&params)?,
                x_0: numeric_param(&params, "x_0", 0.0)?,
                y_0: numeric_param(&params, "y_0", 0.0)?,
            },
            "utm" => {
                let zone = match params.get("zone") {
                    Some(Some(z)) => z.parse::<u32>().map_err(|_| {
                        MapError::InvalidProjection(format!("invalid UTM zone '{}'", z))
                    })?,
                    _ => {
                        return Err(MapError::InvalidProjection(
                            "+proj=utm requires +zone".to_string(),
                        ))
                    }
                };
                if !(1..=60).contains(&zone) {
                    return Err(MapError::InvalidProjection(format!(
                        "UTM zone {} out of range 1-60",
                        zone
                    )));
                }
                ProjectionKind::TransverseMercator {
                    lat_0: 0.0,
                    lon_0: 6.0 * zone as f64 - 183.0,
                    k_0: 0.9996,
                    x_0: 500000.0,
                    y_0: if params.contains_key("south") {
                        10000000.0
                    } else {
                        0.0
                    },
                }
            }
            other => {
                return Err(MapError::InvalidProjection(format!(
                    "unsupported projection method '{}'",
                    other
                )))
            }
        };

        Ok(ProjectionDescriptor {
            name: definition.trim().to_string(),
            kind,
            ellipsoid,
            towgs84,
        })
    }

    /// Whether this descriptor uses geographic (degree) coordinates
    pub fn is_geographic(&self) -> bool {
        self.kind == ProjectionKind::Geographic
    }
}

/// Split `+key=value` tokens into a parameter map
fn split_definition(definition: &str) -> MapResult<HashMap<String, Option<String>>> {
    let mut params = HashMap::new();

    if definition.trim().is_empty() {
        return Err(MapError::InvalidProjection(
            "empty definition string".to_string(),
        ));
    }

    for token in definition.split_whitespace() {
        let token = token.strip_prefix('+').ok_or_else(|| {
            MapError::InvalidProjection(format!("malformed token '{}'", token))
        })?;
        match token.split_once('=') {
            Some((key, value)) => params.insert(key.to_string(), Some(value.to_string())),
            None => params.insert(token.to_string(), None),
        };
    }

    Ok(params)
}

/// Handle `+init=epsg:NNNN` definitions
fn from_init(init: &str) -> MapResult<ProjectionDescriptor> {
    let code = init
        .to_uppercase()
        .strip_prefix("EPSG:")
        .and_then(|c| c.parse::<u32>().ok())
        .ok_or_else(|| MapError::InvalidProjection(format!("unsupported init '{}'", init)))?;
    ProjectionDescriptor::from_epsg(code)
}

/// Parse a numeric projection parameter with a proj-compatible default
fn numeric_param(
    params: &HashMap<String, Option<String>>,
    key: &str,
    default: f64,
) -> MapResult<f64> {
    match params.get(key) {
        Some(Some(value)) => value.parse::<f64>().map_err(|_| {
            MapError::InvalidProjection(format!("non-numeric value '{}' for +{}", value, key))
        }),
        Some(None) => Err(MapError::InvalidProjection(format!(
            "+{} requires a value",
            key
        ))),
        None => Ok(default),
    }
}

/// Scale factor comes as either +k or +k_0
fn scale_param(params: &HashMap<String, Option<String>>) -> MapResult<f64> {
    if params.contains_key("k") {
        numeric_param(params, "k", 1.0)
    } else {
        numeric_param(params, "k_0", 1.0)
    }
}

/// Parse a comma-separated 3- or 7-parameter datum shift
fn parse_towgs84(list: &str) -> MapResult<[f64; 7]> {
    let values: Result<Vec<f64>, _> = list.split(',').map(|v| v.trim().parse::<f64>()).collect();
    let values = values.map_err(|_| {
        MapError::InvalidProjection(format!("non-numeric +towgs84 value in '{}'", list))
    })?;

    let mut shift = [0.0; 7];
    match values.len() {
        3 | 7 => {
            shift[..values.len()].copy_from_slice(&values);
            Ok(shift)
        }
        n => Err(MapError::InvalidProjection(format!(
            "+towgs84 needs 3 or 7 values, got {}",
            n
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kkj_definition() {
        let def = "+proj=tmerc +lat_0=0 +lon_0=27 +k=1 +x_0=3500000 +y_0=0 +ellps=intl \
                   +towgs84=-96.062,-82.428,-121.753,4.801,0.345,-1.376,1.496 +units=m +no_defs";
        let desc = ProjectionDescriptor::from_definition(def).unwrap();
        assert_eq!(desc.ellipsoid, Ellipsoid::INTERNATIONAL);
        assert_eq!(
            desc.kind,
            ProjectionKind::TransverseMercator {
                lat_0: 0.0,
                lon_0: 27.0,
                k_0: 1.0,
                x_0: 3500000.0,
                y_0: 0.0,
            }
        );
        assert!((desc.towgs84[0] + 96.062).abs() < 1e-9);
        assert!((desc.towgs84[6] - 1.496).abs() < 1e-9);
    }

    #[test]
    fn test_parse_utm_definition() {
        let desc = ProjectionDescriptor::from_definition(
            "+proj=utm +zone=35 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs",
        )
        .unwrap();
        assert_eq!(desc.kind, ProjectionDescriptor::tm35fin().kind);
        assert_eq!(desc.ellipsoid, Ellipsoid::GRS80);
    }

    #[test]
    fn test_parse_init_epsg() {
        let desc = ProjectionDescriptor::from_definition("+init=EPSG:4326").unwrap();
        assert!(desc.is_geographic());
    }

    #[test]
    fn test_utm_without_zone_fails() {
        assert!(matches!(
            ProjectionDescriptor::from_definition("+proj=utm +ellps=GRS80"),
            Err(MapError::InvalidProjection(_))
        ));
    }

    #[test]
    fn test_malformed_token_fails() {
        assert!(matches!(
            ProjectionDescriptor::from_definition("proj=tmerc lon_0=27"),
            Err(MapError::InvalidProjection(_))
        ));
    }

    #[test]
    fn test_unknown_method_fails() {
        assert!(matches!(
            ProjectionDescriptor::from_definition("+proj=omerc +lon_0=27"),
            Err(MapError::InvalidProjection(_))
        ));
    }

    #[test]
    fn test_towgs84_wrong_arity_fails() {
        assert!(matches!(
            ProjectionDescriptor::from_definition("+proj=longlat +towgs84=1,2"),
            Err(MapError::InvalidProjection(_))
        ));
    }
}
