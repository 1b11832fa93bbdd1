//! Registry of fixed reference systems
//!
//! The three systems the CLI names directly (wgs84, kkj, tm35fin) are
//! built once at startup; anything else resolves on demand through the
//! definition-string parser.

use std::collections::HashMap;

use lazy_static::lazy_static;

use super::descriptor::ProjectionDescriptor;
use crate::errors::{MapError, MapResult};

lazy_static! {
    static ref FIXED_SYSTEMS: HashMap<&'static str, ProjectionDescriptor> = {
        let mut m = HashMap::new();
        m.insert("wgs84", ProjectionDescriptor::wgs84());
        m.insert("kkj", ProjectionDescriptor::kkj());
        m.insert("tm35fin", ProjectionDescriptor::tm35fin());
        m
    };
}

/// Lookup facade over the fixed systems and the ad-hoc parser
pub struct ProjectionRegistry;

impl ProjectionRegistry {
    /// The canonical target projection every request is normalized to
    pub fn canonical() -> ProjectionDescriptor {
        FIXED_SYSTEMS["tm35fin"].clone()
    }

    /// Geographic WGS84
    pub fn wgs84() -> ProjectionDescriptor {
        FIXED_SYSTEMS["wgs84"].clone()
    }

    /// The legacy national grid
    pub fn legacy_grid() -> ProjectionDescriptor {
        FIXED_SYSTEMS["kkj"].clone()
    }

    /// Resolve a reference system given by name, EPSG identifier or
    /// proj-style definition string
    pub fn resolve(identifier: &str) -> MapResult<ProjectionDescriptor> {
        let trimmed = identifier.trim();

        if let Some(descriptor) = FIXED_SYSTEMS.get(trimmed.to_lowercase().as_str()) {
            return Ok(descriptor.clone());
        }

        if let Some(code) = trimmed.to_uppercase().strip_prefix("EPSG:") {
            let code = code.parse::<u32>().map_err(|_| {
                MapError::InvalidProjection(format!("invalid EPSG code '{}'", code))
            })?;
            return ProjectionDescriptor::from_epsg(code);
        }

        if trimmed.starts_with('+') {
            return ProjectionDescriptor::from_definition(trimmed);
        }

        Err(MapError::InvalidProjection(format!(
            "unknown reference system '{}'",
            identifier
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_names_resolve() {
        assert_eq!(ProjectionRegistry::resolve("wgs84").unwrap().name, "WGS84");
        assert_eq!(ProjectionRegistry::resolve("KKJ").unwrap().name, "KKJ");
        assert_eq!(
            ProjectionRegistry::resolve("tm35fin").unwrap().name,
            "ETRS-TM35FIN"
        );
    }

    #[test]
    fn test_epsg_names_resolve() {
        assert_eq!(
            ProjectionRegistry::resolve("EPSG:3067").unwrap(),
            ProjectionRegistry::canonical()
        );
        assert_eq!(
            ProjectionRegistry::resolve("epsg:4326").unwrap(),
            ProjectionRegistry::wgs84()
        );
    }

    #[test]
    fn test_unknown_name_fails() {
        assert!(matches!(
            ProjectionRegistry::resolve("mercator-of-doom"),
            Err(MapError::InvalidProjection(_))
        ));
    }

    #[test]
    fn test_definition_string_resolves() {
        let desc =
            ProjectionRegistry::resolve("+proj=utm +zone=35 +ellps=GRS80 +units=m +no_defs")
                .unwrap();
        assert_eq!(desc.kind, ProjectionRegistry::canonical().kind);
    }
}
