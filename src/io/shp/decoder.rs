//! Shape record payload decoding.
//!
//! A record payload starts with a little-endian shape-type code followed by a
//! type-specific body. [`ShapeDecoder`] is the seam the cursor calls through;
//! [`EsriShapeDecoder`] implements the published payload layouts:
//!
//! - **Point**: `x, y` (`z` for Z types, then `m` for Z and M types)
//! - **MultiPoint**: `box[4], num_points, points[num_points]`
//! - **PolyLine / Polygon**: `box[4], num_parts, num_points, parts[num_parts], points[num_points]`
//!
//! Z types append `zmin, zmax, z[num_points]`; Z and M types may append
//! `mmin, mmax, m[num_points]`. The M block is optional in practice and is
//! read only when the payload has room for it.

use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use super::header::{Dimensions, ShapeType};
use crate::error::{Result, ShapeError};
use crate::geometry::{Geometry, GeometryType, MultiPoint, Point, Polygon, Polyline};

/// Measures smaller than this are the "no data" marker.
pub const NO_DATA_MEASURE: f64 = -1.0e38;

/// Turns a record payload into a geometry.
///
/// `kind` is the geometry kind declared by the file header; implementations
/// may use it as a hint or check the payload against it. Errors returned here
/// are propagated to the cursor's caller unchanged.
pub trait ShapeDecoder {
    fn decode(&self, payload: &[u8], kind: GeometryType) -> Result<Geometry>;
}

impl<F> ShapeDecoder for F
where
    F: Fn(&[u8], GeometryType) -> Result<Geometry>,
{
    fn decode(&self, payload: &[u8], kind: GeometryType) -> Result<Geometry> {
        self(payload, kind)
    }
}

/// Decoder for the standard shapefile payload layouts.
#[derive(Debug, Clone, Copy, Default)]
pub struct EsriShapeDecoder;

impl ShapeDecoder for EsriShapeDecoder {
    fn decode(&self, payload: &[u8], kind: GeometryType) -> Result<Geometry> {
        let mut r = PayloadReader::new(payload);
        let code = r.i32("shape type")?;

        if code == ShapeType::Null.code() {
            return match kind {
                GeometryType::Unknown => Err(decode_error(
                    "null shape in a file of unknown geometry type",
                )),
                kind => Ok(Geometry::Empty(kind)),
            };
        }

        let shape_type = ShapeType::from_code(code)
            .ok_or_else(|| decode_error(format!("unknown shape type {}", code)))?;
        if shape_type == ShapeType::MultiPatch {
            return Err(decode_error("MultiPatch shapes are not supported"));
        }

        let actual = shape_type.geometry_type();
        if kind != GeometryType::Unknown && actual != kind {
            return Err(decode_error(format!(
                "record holds {} but file declares {}",
                actual, kind
            )));
        }

        let dims = shape_type.dimensions();
        match actual {
            GeometryType::Point => read_point(&mut r, dims).map(Geometry::Point),
            GeometryType::MultiPoint => {
                r.skip(32, "bounding box")?;
                let num_points = r.count("point count", 16)?;
                let points = read_points(&mut r, num_points, dims)?;
                Ok(Geometry::MultiPoint(MultiPoint::new(points)))
            }
            GeometryType::Polyline => {
                read_parts(&mut r, dims).map(|paths| Geometry::Polyline(Polyline::new(paths)))
            }
            GeometryType::Polygon => {
                read_parts(&mut r, dims).map(|rings| Geometry::Polygon(Polygon::new(rings)))
            }
            GeometryType::Unknown => Err(decode_error(format!("unsupported shape type {}", code))),
        }
    }
}

fn decode_error(msg: impl Into<String>) -> ShapeError {
    ShapeError::PayloadDecode(msg.into())
}

fn measure(value: f64) -> Option<f64> {
    if value < NO_DATA_MEASURE {
        None
    } else {
        Some(value)
    }
}

/// Little-endian reads over a borrowed payload.
struct PayloadReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> PayloadReader<'a> {
    fn new(payload: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(payload),
        }
    }

    fn remaining(&self) -> usize {
        let len = self.cursor.get_ref().len() as u64;
        len.saturating_sub(self.cursor.position()) as usize
    }

    fn i32(&mut self, what: &str) -> Result<i32> {
        self.cursor
            .read_i32::<LittleEndian>()
            .map_err(|_| decode_error(format!("payload ends inside {}", what)))
    }

    fn f64(&mut self, what: &str) -> Result<f64> {
        self.cursor
            .read_f64::<LittleEndian>()
            .map_err(|_| decode_error(format!("payload ends inside {}", what)))
    }

    fn skip(&mut self, n: usize, what: &str) -> Result<()> {
        if self.remaining() < n {
            return Err(decode_error(format!("payload ends inside {}", what)));
        }
        let mut sink = [0u8; 32];
        let mut left = n;
        while left > 0 {
            let step = left.min(sink.len());
            self.cursor
                .read_exact(&mut sink[..step])
                .map_err(|_| decode_error(format!("payload ends inside {}", what)))?;
            left -= step;
        }
        Ok(())
    }

    /// Read an element count and check the payload can hold that many
    /// elements of `elem_size` bytes.
    fn count(&mut self, what: &str, elem_size: usize) -> Result<usize> {
        let n = self.i32(what)?;
        if n < 0 {
            return Err(decode_error(format!("negative {}: {}", what, n)));
        }
        let n = n as usize;
        match n.checked_mul(elem_size) {
            Some(bytes) if bytes <= self.remaining() => Ok(n),
            _ => Err(decode_error(format!(
                "{} {} exceeds payload size",
                what, n
            ))),
        }
    }
}

fn read_point(r: &mut PayloadReader<'_>, dims: Dimensions) -> Result<Point> {
    let x = r.f64("point")?;
    let y = r.f64("point")?;
    let mut point = Point::new(x, y);
    if dims.contains(Dimensions::Z) {
        point.z = Some(r.f64("point z")?);
    }
    if dims.contains(Dimensions::M) && r.remaining() >= 8 {
        point.m = measure(r.f64("point m")?);
    }
    Ok(point)
}

/// Read `num_points` XY pairs followed by the optional Z and M blocks.
fn read_points(r: &mut PayloadReader<'_>, num_points: usize, dims: Dimensions) -> Result<Vec<Point>> {
    let mut points = Vec::with_capacity(num_points);
    for _ in 0..num_points {
        let x = r.f64("points")?;
        let y = r.f64("points")?;
        points.push(Point::new(x, y));
    }

    if dims.contains(Dimensions::Z) {
        r.skip(16, "z range")?;
        for point in points.iter_mut() {
            point.z = Some(r.f64("z values")?);
        }
    }

    if dims.contains(Dimensions::M) && r.remaining() >= 16 + 8 * num_points {
        r.skip(16, "m range")?;
        for point in points.iter_mut() {
            point.m = measure(r.f64("m values")?);
        }
    }

    Ok(points)
}

/// Read a multi-part body (polyline paths or polygon rings).
fn read_parts(r: &mut PayloadReader<'_>, dims: Dimensions) -> Result<Vec<Vec<Point>>> {
    r.skip(32, "bounding box")?;
    let num_parts = r.i32("part count")?;
    let num_points = r.i32("point count")?;
    if num_parts < 0 || num_points < 0 {
        return Err(decode_error(format!(
            "negative part or point count ({} parts, {} points)",
            num_parts, num_points
        )));
    }
    let (num_parts, num_points) = (num_parts as usize, num_points as usize);
    let needed = num_parts
        .checked_mul(4)
        .and_then(|p| num_points.checked_mul(16).and_then(|q| p.checked_add(q)));
    match needed {
        Some(bytes) if bytes <= r.remaining() => {}
        _ => {
            return Err(decode_error(format!(
                "{} parts and {} points exceed payload size",
                num_parts, num_points
            )))
        }
    }

    let mut starts = Vec::with_capacity(num_parts);
    for _ in 0..num_parts {
        let start = r.i32("part index")?;
        let start = usize::try_from(start)
            .map_err(|_| decode_error(format!("negative part index {}", start)))?;
        if start > num_points || starts.last().is_some_and(|&prev| start < prev) {
            return Err(decode_error(format!("invalid part index {}", start)));
        }
        starts.push(start);
    }
    if starts.first().is_some_and(|&first| first != 0) {
        return Err(decode_error("first part does not start at index 0"));
    }

    let mut points = read_points(r, num_points, dims)?;

    let mut parts = Vec::with_capacity(num_parts);
    for i in (0..starts.len()).rev() {
        let tail = points.split_off(starts[i]);
        parts.push(tail);
    }
    parts.reverse();
    Ok(parts)
}
