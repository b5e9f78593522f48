//! Geometric primitives shared by the reshape, warp and draw modules.

use serde::{Deserialize, Serialize};

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X-coordinate of the point.
    pub x: f32,
    /// Y-coordinate of the point.
    pub y: f32,
}

impl Point {
    /// Creates a new point with the given coordinates.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A bounding box represented by a collection of points.
///
/// The points may describe an axis-aligned rectangle or an arbitrary polygon;
/// [`BoundingBox::extent`] reduces either to its axis-aligned extent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundingBox {
    /// The points that define the bounding box.
    pub points: Vec<Point>,
}

impl BoundingBox {
    /// Creates a new bounding box from a vector of points.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Creates an axis-aligned bounding box from corner coordinates.
    ///
    /// `(x1, y1)` is the top-left corner and `(x2, y2)` the bottom-right
    /// corner in image coordinates.
    pub fn from_coords(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        let points = vec![
            Point::new(x1, y1),
            Point::new(x2, y1),
            Point::new(x2, y2),
            Point::new(x1, y2),
        ];
        Self { points }
    }

    /// Returns the axis-aligned extent as (top-left, bottom-right) corners.
    ///
    /// Returns `None` when the box has no points.
    pub fn extent(&self) -> Option<(Point, Point)> {
        if self.points.is_empty() {
            return None;
        }

        let (min_x, max_x, min_y, max_y) = self.points.iter().fold(
            (
                f32::INFINITY,
                f32::NEG_INFINITY,
                f32::INFINITY,
                f32::NEG_INFINITY,
            ),
            |(min_x, max_x, min_y, max_y), p| {
                (
                    min_x.min(p.x),
                    max_x.max(p.x),
                    min_y.min(p.y),
                    max_y.max(p.y),
                )
            },
        );

        Some((Point::new(min_x, min_y), Point::new(max_x, max_y)))
    }

    /// Width of the axis-aligned extent, or 0.0 for an empty box.
    pub fn width(&self) -> f32 {
        self.extent().map_or(0.0, |(tl, br)| br.x - tl.x)
    }

    /// Height of the axis-aligned extent, or 0.0 for an empty box.
    pub fn height(&self) -> f32 {
        self.extent().map_or(0.0, |(tl, br)| br.y - tl.y)
    }
}
