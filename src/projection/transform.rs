//! Coordinate transformation between reference systems
//!
//! Transforms run through the classic chain: inverse projection on the
//! source system, 7-parameter Helmert shift between datums in geocentric
//! space, forward projection on the target system. The transverse
//! Mercator series are the standard ellipsoidal expansions (Snyder),
//! good to well under a millimetre for in-zone coordinates.

use std::f64::consts::PI;

use log::info;

use super::descriptor::{ProjectionDescriptor, ProjectionKind};
use super::ellipsoid::Ellipsoid;
use super::registry::ProjectionRegistry;
use crate::coordinate::Point;
use crate::errors::{MapError, MapResult};

const ARCSEC_TO_RAD: f64 = PI / (180.0 * 3600.0);

/// Transformer for converting between reference systems
pub struct CoordinateNormalizer;

impl CoordinateNormalizer {
    /// Normalize a pair from `source` into the canonical ETRS-TM35FIN
    /// system, logging the produced coordinates
    pub fn normalize(&self, point: &Point, source: &ProjectionDescriptor) -> MapResult<Point> {
        let canonical = ProjectionRegistry::canonical();
        let result = self.transform_point(point, source, &canonical)?;
        info!("ETRS-TM35FIN: [{:.3}, {:.3}]", result.x, result.y);
        Ok(result)
    }

    /// Transform a point between two reference systems
    pub fn transform_point(
        &self,
        point: &Point,
        from: &ProjectionDescriptor,
        to: &ProjectionDescriptor,
    ) -> MapResult<Point> {
        if !point.is_finite() {
            return Err(MapError::ConversionError(format!(
                "non-finite input coordinates [{}, {}]",
                point.x, point.y
            )));
        }

        if from == to {
            return Ok(*point);
        }

        // Source system -> geodetic latitude/longitude (radians)
        let (lat, lon) = match from.kind {
            ProjectionKind::Geographic => (point.y.to_radians(), point.x.to_radians()),
            ProjectionKind::TransverseMercator { .. } => {
                tmerc_inverse(point.x, point.y, &from.ellipsoid, &from.kind)?
            }
        };

        // Datum shift via geocentric space, skipped when both systems
        // share the ellipsoid and shift parameters
        let (lat, lon) = if from.ellipsoid == to.ellipsoid && from.towgs84 == to.towgs84 {
            (lat, lon)
        } else {
            let xyz = geodetic_to_geocentric(lat, lon, &from.ellipsoid);
            let xyz = helmert(xyz, &from.towgs84, false);
            let xyz = helmert(xyz, &to.towgs84, true);
            geocentric_to_geodetic(xyz, &to.ellipsoid)
        };

        // Geodetic -> target system
        let result = match to.kind {
            ProjectionKind::Geographic => Point::new(lon.to_degrees(), lat.to_degrees()),
            ProjectionKind::TransverseMercator { .. } => {
                let (x, y) = tmerc_forward(lat, lon, &to.ellipsoid, &to.kind)?;
                Point::new(x, y)
            }
        };

        if !result.is_finite() {
            return Err(MapError::ConversionError(format!(
                "transform from '{}' to '{}' produced non-finite coordinates",
                from.name, to.name
            )));
        }

        Ok(result)
    }
}

/// Meridian arc length from the equator to latitude `lat` (radians)
fn meridian_arc(ell: &Ellipsoid, lat: f64) -> f64 {
    let e2 = ell.e2();
    let e4 = e2 * e2;
    let e6 = e4 * e2;

    ell.a
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * lat).sin())
}

fn tmerc_params(kind: &ProjectionKind) -> MapResult<(f64, f64, f64, f64, f64)> {
    match *kind {
        ProjectionKind::TransverseMercator {
            lat_0,
            lon_0,
            k_0,
            x_0,
            y_0,
        } => {
            if k_0 <= 0.0 {
                return Err(MapError::ConversionError(format!(
                    "scale factor must be positive, got {}",
                    k_0
                )));
            }
            Ok((lat_0.to_radians(), lon_0.to_radians(), k_0, x_0, y_0))
        }
        ProjectionKind::Geographic => Err(MapError::ConversionError(
            "geographic system has no projection parameters".to_string(),
        )),
    }
}

/// Forward transverse Mercator: geodetic (radians) to easting/northing
fn tmerc_forward(
    lat: f64,
    lon: f64,
    ell: &Ellipsoid,
    kind: &ProjectionKind,
) -> MapResult<(f64, f64)> {
    let (lat0, lon0, k0, x0, y0) = tmerc_params(kind)?;
    let e2 = ell.e2();
    let ep2 = ell.ep2();

    let sin_lat = lat.sin();
    let cos_lat = lat.cos();

    let n = ell.a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    let t = (lat.tan()).powi(2);
    let c = ep2 * cos_lat * cos_lat;

    // Keep the meridian offset in (-pi, pi]
    let mut dlon = lon - lon0;
    while dlon > PI {
        dlon -= 2.0 * PI;
    }
    while dlon < -PI {
        dlon += 2.0 * PI;
    }
    let a1 = dlon * cos_lat;

    let m = meridian_arc(ell, lat);
    let m0 = meridian_arc(ell, lat0);

    let a2 = a1 * a1;
    let a3 = a2 * a1;
    let a4 = a2 * a2;
    let a5 = a4 * a1;
    let a6 = a4 * a2;

    let x = k0
        * n
        * (a1
            + (1.0 - t + c) * a3 / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a5 / 120.0)
        + x0;
    let y = k0
        * (m - m0
            + n * lat.tan()
                * (a2 / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a6 / 720.0))
        + y0;

    Ok((x, y))
}

/// Inverse transverse Mercator: easting/northing to geodetic (radians)
fn tmerc_inverse(
    x: f64,
    y: f64,
    ell: &Ellipsoid,
    kind: &ProjectionKind,
) -> MapResult<(f64, f64)> {
    let (lat0, lon0, k0, x0, y0) = tmerc_params(kind)?;
    let e2 = ell.e2();
    let ep2 = ell.ep2();

    let m = meridian_arc(ell, lat0) + (y - y0) / k0;
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    let mu = m / (ell.a * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));

    let sqrt_1me2 = (1.0 - e2).sqrt();
    let e1 = (1.0 - sqrt_1me2) / (1.0 + sqrt_1me2);
    let e1_2 = e1 * e1;
    let e1_3 = e1_2 * e1;
    let e1_4 = e1_2 * e1_2;

    // Footpoint latitude
    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1_3 / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1_2 / 16.0 - 55.0 * e1_4 / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1_3 / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1_4 / 512.0) * (8.0 * mu).sin();

    let sin_phi1 = phi1.sin();
    let cos_phi1 = phi1.cos();
    let tan_phi1 = phi1.tan();

    let c1 = ep2 * cos_phi1 * cos_phi1;
    let t1 = tan_phi1 * tan_phi1;
    let denom = 1.0 - e2 * sin_phi1 * sin_phi1;
    let n1 = ell.a / denom.sqrt();
    let r1 = ell.a * (1.0 - e2) / denom.powf(1.5);
    let d = (x - x0) / (n1 * k0);

    let d2 = d * d;
    let d3 = d2 * d;
    let d4 = d2 * d2;
    let d5 = d4 * d;
    let d6 = d4 * d2;

    let lat = phi1
        - (n1 * tan_phi1 / r1)
            * (d2 / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d4 / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                    * d6
                    / 720.0);
    let lon = lon0
        + (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1) * d5
                / 120.0)
            / cos_phi1;

    Ok((lat, lon))
}

/// Geodetic (radians, zero height) to geocentric cartesian meters
fn geodetic_to_geocentric(lat: f64, lon: f64, ell: &Ellipsoid) -> [f64; 3] {
    let e2 = ell.e2();
    let sin_lat = lat.sin();
    let n = ell.a / (1.0 - e2 * sin_lat * sin_lat).sqrt();

    [
        n * lat.cos() * lon.cos(),
        n * lat.cos() * lon.sin(),
        n * (1.0 - e2) * sin_lat,
    ]
}

/// Geocentric cartesian meters to geodetic (radians)
fn geocentric_to_geodetic(xyz: [f64; 3], ell: &Ellipsoid) -> (f64, f64) {
    let [x, y, z] = xyz;
    let e2 = ell.e2();
    let p = (x * x + y * y).sqrt();
    let lon = y.atan2(x);

    // Fixed-point iteration on latitude, converges in a handful of steps
    let mut lat = z.atan2(p * (1.0 - e2));
    for _ in 0..10 {
        let sin_lat = lat.sin();
        let n = ell.a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let next = (z + e2 * n * sin_lat).atan2(p);
        if (next - lat).abs() < 1e-14 {
            lat = next;
            break;
        }
        lat = next;
    }

    (lat, lon)
}

/// 7-parameter Helmert transformation, position-vector convention.
/// Rotations are arc-seconds, scale is ppm, matching +towgs84 ordering.
/// `reverse` applies the inverse shift (small-angle approximation).
fn helmert(xyz: [f64; 3], params: &[f64; 7], reverse: bool) -> [f64; 3] {
    if params.iter().all(|&v| v == 0.0) {
        return xyz;
    }

    let sign = if reverse { -1.0 } else { 1.0 };
    let dx = sign * params[0];
    let dy = sign * params[1];
    let dz = sign * params[2];
    let rx = sign * params[3] * ARCSEC_TO_RAD;
    let ry = sign * params[4] * ARCSEC_TO_RAD;
    let rz = sign * params[5] * ARCSEC_TO_RAD;
    let scale = 1.0 + sign * params[6] * 1e-6;

    let [x, y, z] = xyz;
    [
        dx + scale * (x - rz * y + ry * z),
        dy + scale * (rz * x + y - rx * z),
        dz + scale * (-ry * x + rx * y + z),
    ]
}
