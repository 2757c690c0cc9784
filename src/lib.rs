//! # shpcursor
//!
//! A streaming reader for the geometry records of ESRI shapefiles (`.shp`).
//!
//! The `.shp` main file mixes big-endian and little-endian fields in its
//! header and stores one shape per variable-length record. This crate parses
//! the header once and then decodes records lazily, one per pull, so files of
//! any size can be processed in bounded memory.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shpcursor::{GeometryCursor, ShapefileGeometryCursor};
//!
//! let mut cursor = ShapefileGeometryCursor::from_file("roads.shp")?;
//! println!("{} file, extent {}", cursor.geometry_type(), cursor.bounding_box());
//!
//! while let Some(geometry) = cursor.next_geometry()? {
//!     println!("record {}: {} parts", cursor.geometry_id(), geometry.part_count());
//! }
//! # Ok::<(), shpcursor::ShapeError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`io::shp::MixedEndianReader`] - big/little-endian primitive reads over any `Read`
//! - [`ShapefileGeometryCursor`] - header parsing and the record loop
//! - [`io::shp::ShapeDecoder`] - payload decoding seam, with [`io::shp::EsriShapeDecoder`] as default
//! - [`GeometryCursor`] - pull-based geometry source shared with
//!   [`SimpleGeometryCursor`] and [`FilteredGeometryCursor`]

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod geometry;
pub mod io;
pub mod types;

// Re-export commonly used types
pub use error::{Result, ShapeError};
pub use geometry::{
    FilteredGeometryCursor, Geometry, GeometryCursor, GeometryType, MultiPoint, Point, Polygon,
    Polyline, SimpleGeometryCursor,
};
pub use io::{ShapefileGeometryCursor, ShapefileReaderConfiguration};
pub use types::BoundingBox2D;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
