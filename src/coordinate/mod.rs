//! Coordinate handling for the map-fetch pipeline
//!
//! This module provides the point and bounding-box structures shared
//! by the projection and tile-fetch layers.

mod bbox;
mod point;

// Re-export key types
pub use self::bbox::BoundingBox;
pub use self::point::Point;
