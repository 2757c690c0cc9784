//! Geometry values produced by shape decoders and consumed through cursors
//!
//! The model is intentionally small: the four base shape kinds a shapefile can
//! hold, with optional Z and M ordinates carried per vertex. Z/M variants of a
//! kind share the same Rust type; only the presence of `z`/`m` differs.

mod cursor;

pub use cursor::{FilteredGeometryCursor, GeometryCursor, SimpleGeometryCursor};

use crate::types::BoundingBox2D;
use std::fmt;

/// Kind of geometry stored in a shapefile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GeometryType {
    /// Kind could not be determined from the shape-type code
    #[default]
    Unknown,
    /// Single point
    Point,
    /// Set of points
    MultiPoint,
    /// One or more paths (PolyLine in the ESRI documentation)
    Polyline,
    /// One or more closed rings
    Polygon,
}

impl GeometryType {
    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            GeometryType::Unknown => "Unknown",
            GeometryType::Point => "Point",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::Polyline => "Polyline",
            GeometryType::Polygon => "Polygon",
        }
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A vertex with optional elevation (`z`) and measure (`m`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub m: Option<f64>,
}

impl Point {
    /// Create a planar point
    pub const fn new(x: f64, y: f64) -> Self {
        Point {
            x,
            y,
            z: None,
            m: None,
        }
    }

    /// Create a point with an elevation
    pub const fn with_z(x: f64, y: f64, z: f64) -> Self {
        Point {
            x,
            y,
            z: Some(z),
            m: None,
        }
    }

    /// Return a copy carrying the given measure
    pub fn measured(self, m: Option<f64>) -> Self {
        Point { m, ..self }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}", self.x, self.y)?;
        if let Some(z) = self.z {
            write!(f, ", z={}", z)?;
        }
        if let Some(m) = self.m {
            write!(f, ", m={}", m)?;
        }
        write!(f, ")")
    }
}

/// An unordered set of points
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiPoint {
    pub points: Vec<Point>,
}

impl MultiPoint {
    /// Create a multipoint from its points
    pub fn new(points: Vec<Point>) -> Self {
        MultiPoint { points }
    }
}

/// One or more connected sequences of vertices
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline {
    pub paths: Vec<Vec<Point>>,
}

impl Polyline {
    /// Create a polyline from its paths
    pub fn new(paths: Vec<Vec<Point>>) -> Self {
        Polyline { paths }
    }

    /// Planar length of all paths
    pub fn length(&self) -> f64 {
        self.paths
            .iter()
            .flat_map(|path| path.windows(2))
            .map(|w| ((w[1].x - w[0].x).powi(2) + (w[1].y - w[0].y).powi(2)).sqrt())
            .sum()
    }
}

/// One or more closed rings
///
/// Ring orientation follows the shapefile convention: clockwise rings are
/// exterior boundaries, counter-clockwise rings are holes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub rings: Vec<Vec<Point>>,
}

impl Polygon {
    /// Create a polygon from its rings
    pub fn new(rings: Vec<Vec<Point>>) -> Self {
        Polygon { rings }
    }

    /// Signed shoelace area of a ring (negative for clockwise rings)
    pub fn signed_ring_area(ring: &[Point]) -> f64 {
        if ring.len() < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for w in ring.windows(2) {
            sum += w[0].x * w[1].y - w[1].x * w[0].y;
        }
        let (first, last) = (ring[0], ring[ring.len() - 1]);
        sum += last.x * first.y - first.x * last.y;
        sum / 2.0
    }

    /// Number of clockwise (exterior) rings
    pub fn exterior_ring_count(&self) -> usize {
        self.rings
            .iter()
            .filter(|ring| Self::signed_ring_area(ring) < 0.0)
            .count()
    }

    /// Planar area: exterior rings minus holes
    pub fn area(&self) -> f64 {
        -self
            .rings
            .iter()
            .map(|ring| Self::signed_ring_area(ring))
            .sum::<f64>()
    }
}

/// A decoded shape
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    MultiPoint(MultiPoint),
    Polyline(Polyline),
    Polygon(Polygon),
    /// A null shape record in a file of the given kind
    Empty(GeometryType),
}

impl Geometry {
    /// Kind of this geometry
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            Geometry::Polyline(_) => GeometryType::Polyline,
            Geometry::Polygon(_) => GeometryType::Polygon,
            Geometry::Empty(kind) => *kind,
        }
    }

    /// Whether the geometry has no vertices
    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }

    /// Total number of vertices
    pub fn point_count(&self) -> usize {
        match self {
            Geometry::Point(_) => 1,
            Geometry::MultiPoint(mp) => mp.points.len(),
            Geometry::Polyline(pl) => pl.paths.iter().map(Vec::len).sum(),
            Geometry::Polygon(pg) => pg.rings.iter().map(Vec::len).sum(),
            Geometry::Empty(_) => 0,
        }
    }

    /// Number of paths (polylines) or rings (polygons); zero for point kinds
    pub fn part_count(&self) -> usize {
        match self {
            Geometry::Polyline(pl) => pl.paths.len(),
            Geometry::Polygon(pg) => pg.rings.len(),
            _ => 0,
        }
    }

    /// Iterate over every vertex in storage order
    pub fn points(&self) -> Box<dyn Iterator<Item = &Point> + '_> {
        match self {
            Geometry::Point(p) => Box::new(std::iter::once(p)),
            Geometry::MultiPoint(mp) => Box::new(mp.points.iter()),
            Geometry::Polyline(pl) => Box::new(pl.paths.iter().flatten()),
            Geometry::Polygon(pg) => Box::new(pg.rings.iter().flatten()),
            Geometry::Empty(_) => Box::new(std::iter::empty()),
        }
    }

    /// Planar envelope of all vertices, `None` when empty
    pub fn bounding_box(&self) -> Option<BoundingBox2D> {
        BoundingBox2D::from_coords(self.points().map(|p| (p.x, p.y)))
    }

    pub fn as_point(&self) -> Option<&Point> {
        match self {
            Geometry::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_multi_point(&self) -> Option<&MultiPoint> {
        match self {
            Geometry::MultiPoint(mp) => Some(mp),
            _ => None,
        }
    }

    pub fn as_polyline(&self) -> Option<&Polyline> {
        match self {
            Geometry::Polyline(pl) => Some(pl),
            _ => None,
        }
    }

    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            Geometry::Polygon(pg) => Some(pg),
            _ => None,
        }
    }
}

impl From<Point> for Geometry {
    fn from(p: Point) -> Self {
        Geometry::Point(p)
    }
}

impl From<MultiPoint> for Geometry {
    fn from(mp: MultiPoint) -> Self {
        Geometry::MultiPoint(mp)
    }
}

impl From<Polyline> for Geometry {
    fn from(pl: Polyline) -> Self {
        Geometry::Polyline(pl)
    }
}

impl From<Polygon> for Geometry {
    fn from(pg: Polygon) -> Self {
        Geometry::Polygon(pg)
    }
}
