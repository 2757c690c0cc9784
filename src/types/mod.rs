//! Value types shared by the reader and the geometry model

mod bounds;

pub use bounds::BoundingBox2D;
