pub mod api;
pub mod commands;
pub mod coordinate;
pub mod errors;
pub mod fetch;
pub mod geocoder;
pub mod pipeline;
pub mod projection;
pub mod utils;

pub use crate::api::MapGrab;

pub use coordinate::{BoundingBox, Point};
pub use errors::{MapError, MapResult};
pub use pipeline::{Capabilities, InputMode, Pipeline};
pub use projection::{CoordinateNormalizer, ProjectionDescriptor, ProjectionRegistry};
