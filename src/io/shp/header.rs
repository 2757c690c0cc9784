//! Shapefile main-file header and shape-type codes.
//!
//! Header layout (100 bytes):
//!
//! | Offset | Field                  | Type   | Order  |
//! |--------|------------------------|--------|--------|
//! | 0      | File code (9994)       | i32    | big    |
//! | 4      | Unused (5 × i32)       |        |        |
//! | 24     | File length (words)    | i32    | big    |
//! | 28     | Version (1000)         | i32    | little |
//! | 32     | Shape type             | i32    | little |
//! | 36     | Xmin, Ymin, Xmax, Ymax | 4 × f64| little |
//! | 68     | Zmin, Zmax             | 2 × f64| little |
//! | 84     | Mmin, Mmax             | 2 × f64| little |

use std::fmt;
use std::io::Read;

use bitflags::bitflags;

use super::mixed_endian::MixedEndianReader;
use crate::error::{Result, ShapeError};
use crate::geometry::GeometryType;
use crate::types::BoundingBox2D;

/// Expected value of the file code field.
pub const FILE_CODE: i32 = 9994;

/// Expected value of the version field.
pub const FILE_VERSION: i32 = 1000;

/// Size of the fixed header in bytes (50 words).
pub const HEADER_SIZE: u64 = 100;

/// Size of a record envelope (record number + content length) in bytes.
pub const RECORD_HEADER_SIZE: u64 = 8;

bitflags! {
    /// Extra ordinates a shape type carries beyond X/Y.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Dimensions: u8 {
        /// Elevation values.
        const Z = 1;
        /// Measure values.
        const M = 2;
    }
}

/// Shape-type codes defined for the shapefile format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ShapeType {
    Null = 0,
    Point = 1,
    PolyLine = 3,
    Polygon = 5,
    MultiPoint = 8,
    PointZ = 11,
    PolyLineZ = 13,
    PolygonZ = 15,
    MultiPointZ = 18,
    PointM = 21,
    PolyLineM = 23,
    PolygonM = 25,
    MultiPointM = 28,
    MultiPatch = 31,
}

impl ShapeType {
    /// Look up a shape type by its numeric code.
    pub fn from_code(code: i32) -> Option<Self> {
        let shape_type = match code {
            0 => Self::Null,
            1 => Self::Point,
            3 => Self::PolyLine,
            5 => Self::Polygon,
            8 => Self::MultiPoint,
            11 => Self::PointZ,
            13 => Self::PolyLineZ,
            15 => Self::PolygonZ,
            18 => Self::MultiPointZ,
            21 => Self::PointM,
            23 => Self::PolyLineM,
            25 => Self::PolygonM,
            28 => Self::MultiPointM,
            31 => Self::MultiPatch,
            _ => return None,
        };
        Some(shape_type)
    }

    /// Numeric code as stored in the file.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Extra ordinates stored with each vertex.
    pub fn dimensions(self) -> Dimensions {
        match self {
            Self::PointZ | Self::PolyLineZ | Self::PolygonZ | Self::MultiPointZ => {
                Dimensions::Z | Dimensions::M
            }
            Self::MultiPatch => Dimensions::Z | Dimensions::M,
            Self::PointM | Self::PolyLineM | Self::PolygonM | Self::MultiPointM => Dimensions::M,
            _ => Dimensions::empty(),
        }
    }

    /// Base geometry kind, ignoring Z/M.
    pub fn geometry_type(self) -> GeometryType {
        match self {
            Self::Point | Self::PointZ | Self::PointM => GeometryType::Point,
            Self::PolyLine | Self::PolyLineZ | Self::PolyLineM => GeometryType::Polyline,
            Self::Polygon | Self::PolygonZ | Self::PolygonM => GeometryType::Polygon,
            Self::MultiPoint | Self::MultiPointZ | Self::MultiPointM => GeometryType::MultiPoint,
            Self::Null | Self::MultiPatch => GeometryType::Unknown,
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}

/// Map a header shape-type code to a geometry kind.
///
/// The last decimal digit identifies the base kind for the plain, Z (1x) and
/// M (2x) families, so only `code % 10` is inspected. Anything else maps to
/// [`GeometryType::Unknown`].
pub fn geometry_type_from_code(code: i32) -> GeometryType {
    match code % 10 {
        1 => GeometryType::Point,
        3 => GeometryType::Polyline,
        5 => GeometryType::Polygon,
        8 => GeometryType::MultiPoint,
        _ => GeometryType::Unknown,
    }
}

/// Parsed 100-byte header of a `.shp` file.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapefileHeader {
    /// Total file length in bytes (header included).
    pub file_length: u64,
    /// Raw shape-type code.
    pub shape_type_code: i32,
    /// Geometry kind derived from the shape-type code.
    pub geometry_type: GeometryType,
    /// Planar extent of all shapes.
    pub bounding_box: BoundingBox2D,
    /// Elevation range (`zmin`, `zmax`).
    pub z_range: (f64, f64),
    /// Measure range (`mmin`, `mmax`).
    pub m_range: (f64, f64),
}

impl ShapefileHeader {
    /// Parse the header from the start of a stream.
    ///
    /// Consumes exactly [`HEADER_SIZE`] bytes on success.
    pub fn read<R: Read>(reader: &mut MixedEndianReader<R>) -> Result<Self> {
        let file_code = reader.read_be_i32()?;
        if file_code != FILE_CODE {
            return Err(ShapeError::UnsupportedFormat(format!(
                "file code {} is not supported",
                file_code
            )));
        }

        reader.skip(20)?;

        let file_length_words = reader.read_be_i32()?;
        let file_length = u64::from(file_length_words.max(0) as u32) * 2;

        let version = reader.read_le_i32()?;
        if version != FILE_VERSION {
            return Err(ShapeError::UnsupportedFormat(format!(
                "version {} is not supported",
                version
            )));
        }

        let shape_type_code = reader.read_le_i32()?;

        let xmin = reader.read_le_f64()?;
        let ymin = reader.read_le_f64()?;
        let xmax = reader.read_le_f64()?;
        let ymax = reader.read_le_f64()?;
        let zmin = reader.read_le_f64()?;
        let zmax = reader.read_le_f64()?;
        let mmin = reader.read_le_f64()?;
        let mmax = reader.read_le_f64()?;

        Ok(Self {
            file_length,
            shape_type_code,
            geometry_type: geometry_type_from_code(shape_type_code),
            bounding_box: BoundingBox2D::new(xmin, ymin, xmax, ymax),
            z_range: (zmin, zmax),
            m_range: (mmin, mmax),
        })
    }

    /// Shape type named by the header, if the code is a defined one.
    pub fn shape_type(&self) -> Option<ShapeType> {
        ShapeType::from_code(self.shape_type_code)
    }
}

/// Envelope preceding each record payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// 1-based record number.
    pub record_number: i32,
    /// Payload length in 16-bit words.
    pub content_length: i32,
}

impl RecordHeader {
    /// Read the 8-byte big-endian envelope.
    pub fn read<R: Read>(reader: &mut MixedEndianReader<R>) -> Result<Self> {
        let record_number = reader.read_be_i32()?;
        let content_length = reader.read_be_i32()?;
        Ok(Self {
            record_number,
            content_length,
        })
    }

    /// Payload length in bytes; negative lengths are returned as-is.
    pub fn payload_len(&self) -> i64 {
        i64::from(self.content_length) * 2
    }
}
