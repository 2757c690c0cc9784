//! Planar bounding box type

use std::fmt;

/// Axis-aligned 2D bounding box (envelope)
///
/// Field order follows the shapefile header: `xmin, ymin, xmax, ymax`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox2D {
    /// Minimum X
    pub xmin: f64,
    /// Minimum Y
    pub ymin: f64,
    /// Maximum X
    pub xmax: f64,
    /// Maximum Y
    pub ymax: f64,
}

impl BoundingBox2D {
    /// Create a new bounding box from its four extents
    pub const fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        BoundingBox2D {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Create a degenerate bounding box around a single coordinate
    pub fn from_point(x: f64, y: f64) -> Self {
        BoundingBox2D::new(x, y, x, y)
    }

    /// Create the smallest bounding box containing all `(x, y)` pairs
    pub fn from_coords<I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut iter = coords.into_iter();
        let (x, y) = iter.next()?;
        let mut bbox = BoundingBox2D::from_point(x, y);
        for (x, y) in iter {
            bbox.expand_to_include(x, y);
        }
        Some(bbox)
    }

    /// Get the width of the bounding box
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Get the height of the bounding box
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Whether the box is inverted or contains NaN extents
    ///
    /// Shapefiles with no shapes often carry an all-zero or garbage header box.
    pub fn is_empty(&self) -> bool {
        !(self.xmin <= self.xmax && self.ymin <= self.ymax)
    }

    /// Check if this bounding box contains a coordinate
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.xmin && x <= self.xmax && y >= self.ymin && y <= self.ymax
    }

    /// Check whether two boxes overlap (touching edges count)
    pub fn intersects(&self, other: &BoundingBox2D) -> bool {
        self.xmin <= other.xmax
            && other.xmin <= self.xmax
            && self.ymin <= other.ymax
            && other.ymin <= self.ymax
    }

    /// Expand the bounding box to include another coordinate
    pub fn expand_to_include(&mut self, x: f64, y: f64) {
        self.xmin = self.xmin.min(x);
        self.ymin = self.ymin.min(y);
        self.xmax = self.xmax.max(x);
        self.ymax = self.ymax.max(y);
    }

    /// Merge with another bounding box
    pub fn merge(&self, other: &BoundingBox2D) -> BoundingBox2D {
        BoundingBox2D {
            xmin: self.xmin.min(other.xmin),
            ymin: self.ymin.min(other.ymin),
            xmax: self.xmax.max(other.xmax),
            ymax: self.ymax.max(other.ymax),
        }
    }
}

impl fmt::Display for BoundingBox2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BBox2D[({}, {}) -> ({}, {})]",
            self.xmin, self.ymin, self.xmax, self.ymax
        )
    }
}
