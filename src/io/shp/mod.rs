//! ESRI shapefile main-file (`.shp`) reading
//!
//! The main file is a 100-byte header followed by length-prefixed records,
//! each holding one shape. [`ShapefileGeometryCursor`] pulls the records one
//! at a time and hands each payload to a [`ShapeDecoder`].

mod cursor;
mod decoder;
mod header;
mod mixed_endian;

pub use cursor::{ShapefileGeometryCursor, ShapefileReaderConfiguration};
pub use decoder::{EsriShapeDecoder, ShapeDecoder, NO_DATA_MEASURE};
pub use header::{
    geometry_type_from_code, Dimensions, RecordHeader, ShapeType, ShapefileHeader, FILE_CODE,
    FILE_VERSION, HEADER_SIZE, RECORD_HEADER_SIZE,
};
pub use mixed_endian::MixedEndianReader;
