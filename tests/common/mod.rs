//! Shared test utilities for shpcursor integration tests.
//!
//! Test crates import this via `mod common;`.

#![allow(dead_code)]

pub mod builders;

use shpcursor::{Geometry, Result, ShapefileGeometryCursor};
use std::io::Cursor;

pub use builders::ShapefileBuilder;

/// Open a cursor over an in-memory byte stream.
pub fn open(bytes: Vec<u8>) -> Result<ShapefileGeometryCursor<Cursor<Vec<u8>>>> {
    ShapefileGeometryCursor::new(Cursor::new(bytes))
}

/// Pull until the end marker, panicking on error.
pub fn read_all(bytes: Vec<u8>) -> Vec<Geometry> {
    let mut cursor = open(bytes).expect("header should parse");
    let mut out = Vec::new();
    while let Some(g) = cursor.next_geometry().expect("record should decode") {
        out.push(g);
    }
    out
}

/// A seven-point file with record `i` at `(i, 2i)`.
pub fn seven_points() -> ShapefileBuilder {
    (1..=7).fold(
        ShapefileBuilder::new(1).bbox(1.0, 2.0, 7.0, 14.0),
        |b, i| b.point(i as f64, 2.0 * i as f64),
    )
}
