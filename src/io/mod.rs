//! I/O module for reading shapefile geometry

pub mod shp;

pub use shp::{ShapefileGeometryCursor, ShapefileReaderConfiguration};
