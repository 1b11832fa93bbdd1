//! Utility modules for common functionality

pub mod geometry;
pub mod logger;
