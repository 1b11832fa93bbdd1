//! Reference ellipsoid parameters

use crate::errors::{MapError, MapResult};

/// A reference ellipsoid, given by semi-major axis and inverse flattening
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis in meters
    pub a: f64,
    /// Inverse flattening (1/f)
    pub rf: f64,
}

impl Ellipsoid {
    /// GRS 1980, used by ETRS-TM35FIN
    pub const GRS80: Ellipsoid = Ellipsoid {
        a: 6378137.0,
        rf: 298.257222101,
    };

    /// WGS 84
    pub const WGS84: Ellipsoid = Ellipsoid {
        a: 6378137.0,
        rf: 298.257223563,
    };

    /// International 1924 (Hayford), used by the legacy KKJ grid
    pub const INTERNATIONAL: Ellipsoid = Ellipsoid {
        a: 6378388.0,
        rf: 297.0,
    };

    /// Flattening
    pub fn f(&self) -> f64 {
        1.0 / self.rf
    }

    /// First eccentricity squared
    pub fn e2(&self) -> f64 {
        let f = self.f();
        f * (2.0 - f)
    }

    /// Second eccentricity squared
    pub fn ep2(&self) -> f64 {
        let e2 = self.e2();
        e2 / (1.0 - e2)
    }

    /// Semi-minor axis in meters
    pub fn b(&self) -> f64 {
        self.a * (1.0 - self.f())
    }

    /// Resolve an ellipsoid from its proj-style name (e.g. "+ellps=intl")
    pub fn from_name(name: &str) -> MapResult<Ellipsoid> {
        match name.to_uppercase().as_str() {
            "GRS80" => Ok(Ellipsoid::GRS80),
            "WGS84" => Ok(Ellipsoid::WGS84),
            "INTL" | "INTERNATIONAL" => Ok(Ellipsoid::INTERNATIONAL),
            other => Err(MapError::InvalidProjection(format!(
                "unknown ellipsoid '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grs80_eccentricity() {
        // Known value for GRS80: e^2 ~ 0.00669438
        assert!((Ellipsoid::GRS80.e2() - 0.00669438).abs() < 1e-7);
    }

    #[test]
    fn test_name_lookup() {
        assert_eq!(Ellipsoid::from_name("intl").unwrap(), Ellipsoid::INTERNATIONAL);
        assert_eq!(Ellipsoid::from_name("GRS80").unwrap(), Ellipsoid::GRS80);
        assert!(Ellipsoid::from_name("bessel").is_err());
    }
}
