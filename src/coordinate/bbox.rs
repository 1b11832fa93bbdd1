//! Bounding box structure for defining map extents

use super::point::Point;
use crate::utils::geometry::Size;

/// A bounding box in a projected coordinate system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum X coordinate
    pub min_x: f64,
    /// Minimum Y coordinate
    pub min_y: f64,
    /// Maximum X coordinate
    pub max_x: f64,
    /// Maximum Y coordinate
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Build the box requested from a WMS server: the origin point is the
    /// lower-left corner and the extent grows towards north-east, so the
    /// box is exactly (x, y, x + width, y + height) in projection units.
    pub fn from_point_extent(origin: &Point, extent: &Size) -> Self {
        BoundingBox::new(
            origin.x,
            origin.y,
            origin.x + extent.width as f64,
            origin.y + extent.height as f64,
        )
    }

    /// Get the width of the bounding box
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Get the height of the bounding box
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Get the center point of the bounding box
    pub fn center(&self) -> Point {
        Point::new(
            self.min_x + self.width() / 2.0,
            self.min_y + self.height() / 2.0,
        )
    }

    /// Format as a WMS BBOX query value (minx,miny,maxx,maxy)
    pub fn to_query_value(&self) -> String {
        format!("{},{},{},{}", self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_grows_from_origin() {
        let origin = Point::new(385000.0, 6672000.0);
        let bbox = BoundingBox::from_point_extent(&origin, &Size::new(2000, 1000));

        assert_eq!(bbox.min_x, 385000.0);
        assert_eq!(bbox.min_y, 6672000.0);
        assert_eq!(bbox.max_x, 387000.0);
        assert_eq!(bbox.max_y, 6673000.0);
    }

    #[test]
    fn test_extent_change_keeps_origin() {
        let origin = Point::new(100.0, 200.0);
        let small = BoundingBox::from_point_extent(&origin, &Size::new(10, 10));
        let large = BoundingBox::from_point_extent(&origin, &Size::new(500, 700));

        assert_eq!(small.min_x, large.min_x);
        assert_eq!(small.min_y, large.min_y);
        assert_eq!(large.max_x, 600.0);
        assert_eq!(large.max_y, 900.0);
    }

    #[test]
    fn test_query_value_format() {
        let bbox = BoundingBox::new(1.0, 2.0, 3.5, 4.5);
        assert_eq!(bbox.to_query_value(), "1,2,3.5,4.5");
    }
}
