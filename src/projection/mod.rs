//! Projection handling: reference-system descriptors and the
//! coordinate normalizer that brings every input into ETRS-TM35FIN
//!
//! The registry holds the three fixed reference systems (WGS84, the
//! legacy KKJ grid and the canonical ETRS-TM35FIN) and resolves ad-hoc
//! named or definition-string projections on demand.

mod descriptor;
mod ellipsoid;
mod registry;
mod transform;

// Re-export key types
pub use self::descriptor::{ProjectionDescriptor, ProjectionKind};
pub use self::ellipsoid::Ellipsoid;
pub use self::registry::ProjectionRegistry;
pub use self::transform::CoordinateNormalizer;
