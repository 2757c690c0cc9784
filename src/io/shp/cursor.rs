//! Streaming cursor over the records of a `.shp` file.
//!
//! # Usage
//!
//! ```rust,ignore
//! use shpcursor::io::shp::ShapefileGeometryCursor;
//!
//! let mut cursor = ShapefileGeometryCursor::from_file("parcels.shp")?;
//! while let Some(geometry) = cursor.next_geometry()? {
//!     println!("{}: {} vertices", cursor.current_record_id(), geometry.point_count());
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::{debug, trace, warn};

use super::decoder::{EsriShapeDecoder, ShapeDecoder};
use super::header::{RecordHeader, ShapefileHeader, HEADER_SIZE, RECORD_HEADER_SIZE};
use super::mixed_endian::MixedEndianReader;
use crate::error::{Result, ShapeError};
use crate::geometry::{Geometry, GeometryCursor, GeometryType};
use crate::types::BoundingBox2D;

/// Configuration options for the shapefile reader.
#[derive(Debug, Clone)]
pub struct ShapefileReaderConfiguration {
    /// When `true`, a record whose content length is negative or runs past the
    /// file length declared in the header is rejected with
    /// [`ShapeError::InvalidRecordLength`] before any payload is read.
    ///
    /// When `false`, only negative lengths are rejected; an oversized length
    /// fails later as [`ShapeError::Truncated`] once the source runs dry.
    ///
    /// Default: `true`.
    pub check_record_bounds: bool,

    /// When `true`, a record number that does not follow its predecessor
    /// is logged as a warning. Reading continues either way.
    ///
    /// Default: `true`.
    pub warn_on_record_gaps: bool,
}

impl Default for ShapefileReaderConfiguration {
    fn default() -> Self {
        Self {
            check_record_bounds: true,
            warn_on_record_gaps: true,
        }
    }
}

/// Forward-only cursor producing one geometry per shapefile record.
///
/// The header is parsed once at construction. Each pull reads one record
/// envelope and payload, so memory use is bounded by the largest record.
/// Any error leaves the cursor exhausted; geometries already returned remain
/// valid.
pub struct ShapefileGeometryCursor<R: Read, D = EsriShapeDecoder> {
    reader: MixedEndianReader<R>,
    decoder: D,
    header: ShapefileHeader,
    config: ShapefileReaderConfiguration,

    /// Byte offset of the next record envelope.
    position: u64,

    /// Record number of the most recently read record.
    record_number: i32,

    /// Set once a pull has failed.
    failed: bool,
}

impl ShapefileGeometryCursor<BufReader<File>> {
    /// Open a `.shp` file by path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read> ShapefileGeometryCursor<R> {
    /// Create a cursor decoding payloads with [`EsriShapeDecoder`].
    pub fn new(reader: R) -> Result<Self> {
        Self::with_decoder(reader, EsriShapeDecoder)
    }
}

impl<R: Read, D: ShapeDecoder> ShapefileGeometryCursor<R, D> {
    /// Create a cursor handing payloads to a custom decoder.
    ///
    /// Fails with [`ShapeError::UnsupportedFormat`] when the file code or
    /// version is wrong, or [`ShapeError::Truncated`] when the stream is
    /// shorter than the header.
    pub fn with_decoder(reader: R, decoder: D) -> Result<Self> {
        let mut reader = MixedEndianReader::new(reader);
        let header = ShapefileHeader::read(&mut reader)?;

        debug!(
            file_length = header.file_length,
            shape_type = header.shape_type_code,
            geometry_type = %header.geometry_type,
            bbox = %header.bounding_box,
            "parsed shapefile header"
        );

        Ok(Self {
            reader,
            decoder,
            header,
            config: ShapefileReaderConfiguration::default(),
            position: HEADER_SIZE,
            record_number: 0,
            failed: false,
        })
    }

    /// Set configuration options.
    pub fn with_configuration(mut self, config: ShapefileReaderConfiguration) -> Self {
        self.config = config;
        self
    }

    /// The parsed file header.
    pub fn header(&self) -> &ShapefileHeader {
        &self.header
    }

    /// Geometry kind of every record in the file.
    pub fn geometry_type(&self) -> GeometryType {
        self.header.geometry_type
    }

    /// Planar extent declared by the header.
    pub fn bounding_box(&self) -> BoundingBox2D {
        self.header.bounding_box
    }

    /// Record number of the most recently read record.
    ///
    /// Meaningless before the first pull.
    pub fn current_record_id(&self) -> i32 {
        self.record_number
    }

    /// Byte offset of the next record envelope.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Total file length in bytes, as declared by the header.
    pub fn file_length(&self) -> u64 {
        self.header.file_length
    }

    /// Whether the declared file length has not been reached yet.
    pub fn has_next(&self) -> bool {
        !self.failed && self.position < self.header.file_length
    }

    /// Read and decode the next record, or `Ok(None)` once exhausted.
    pub fn next_geometry(&mut self) -> Result<Option<Geometry>> {
        if !self.has_next() {
            return Ok(None);
        }
        match self.read_record() {
            Ok(geometry) => Ok(Some(geometry)),
            Err(e) => {
                self.failed = true;
                Err(e)
            }
        }
    }

    /// Release the underlying byte source.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    fn read_record(&mut self) -> Result<Geometry> {
        let record = RecordHeader::read(&mut self.reader)?;

        let expected = self.record_number.wrapping_add(1);
        if self.config.warn_on_record_gaps && record.record_number != expected {
            warn!(
                previous = self.record_number,
                current = record.record_number,
                "shapefile record numbers are not sequential"
            );
        }
        self.record_number = record.record_number;

        let payload_len = record.payload_len();
        let remaining =
            self.header.file_length as i64 - (self.position + RECORD_HEADER_SIZE) as i64;
        if payload_len < 0 || (self.config.check_record_bounds && payload_len > remaining) {
            return Err(ShapeError::InvalidRecordLength {
                record: record.record_number,
                length: record.content_length,
                remaining,
            });
        }

        let payload = self.reader.read_bytes(payload_len as usize)?;
        self.position += RECORD_HEADER_SIZE + payload_len as u64;

        trace!(
            record = record.record_number,
            bytes = payload_len,
            offset = self.position,
            "read shape record"
        );

        self.decoder.decode(&payload, self.header.geometry_type)
    }
}

impl<R: Read, D: ShapeDecoder> GeometryCursor for ShapefileGeometryCursor<R, D> {
    fn has_next(&self) -> bool {
        Self::has_next(self)
    }

    fn next_geometry(&mut self) -> Result<Option<Geometry>> {
        Self::next_geometry(self)
    }

    fn geometry_id(&self) -> i32 {
        self.record_number
    }
}

impl<R: Read, D: ShapeDecoder> Iterator for ShapefileGeometryCursor<R, D> {
    type Item = Result<Geometry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_geometry().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn header(words: i32, shape_type: i32) -> Vec<u8> {
        let mut buf = 9994i32.to_be_bytes().to_vec();
        buf.extend_from_slice(&[0u8; 20]);
        buf.extend_from_slice(&words.to_be_bytes());
        buf.extend_from_slice(&1000i32.to_le_bytes());
        buf.extend_from_slice(&shape_type.to_le_bytes());
        for v in [0.0f64, 0.0, 10.0, 10.0, 0.0, 0.0, 0.0, 0.0] {
            buf.extend_from_slice(&v.to_le_bytes());
        }
        buf
    }

    fn point_record(buf: &mut Vec<u8>, number: i32, x: f64, y: f64) {
        buf.extend_from_slice(&number.to_be_bytes());
        buf.extend_from_slice(&10i32.to_be_bytes());
        buf.extend_from_slice(&1i32.to_le_bytes());
        buf.extend_from_slice(&x.to_le_bytes());
        buf.extend_from_slice(&y.to_le_bytes());
    }

    #[test]
    fn test_header_only_file_is_exhausted() {
        let cursor = ShapefileGeometryCursor::new(Cursor::new(header(50, 1))).unwrap();
        assert!(!cursor.has_next());
        assert_eq!(cursor.position(), 100);
        assert_eq!(cursor.geometry_type(), GeometryType::Point);
    }

    #[test]
    fn test_reads_points_in_order() {
        let mut buf = header(50 + 2 * 14, 1);
        point_record(&mut buf, 1, 1.0, 2.0);
        point_record(&mut buf, 2, 3.0, 4.0);

        let mut cursor = ShapefileGeometryCursor::new(Cursor::new(buf)).unwrap();
        let first = cursor.next_geometry().unwrap().unwrap();
        assert_eq!(first.as_point().map(|p| (p.x, p.y)), Some((1.0, 2.0)));
        assert_eq!(cursor.current_record_id(), 1);
        assert_eq!(cursor.position(), 128);

        cursor.next_geometry().unwrap().unwrap();
        assert_eq!(cursor.current_record_id(), 2);
        assert!(!cursor.has_next());
        assert!(cursor.next_geometry().unwrap().is_none());
    }

    #[test]
    fn test_oversized_record_rejected_by_bound_check() {
        let mut buf = header(50 + 14, 1);
        buf.extend_from_slice(&1i32.to_be_bytes());
        buf.extend_from_slice(&1_000_000i32.to_be_bytes());

        let mut cursor = ShapefileGeometryCursor::new(Cursor::new(buf)).unwrap();
        let err = cursor.next_geometry().unwrap_err();
        assert!(matches!(err, ShapeError::InvalidRecordLength { record: 1, .. }));
        assert!(!cursor.has_next());
        assert!(cursor.next_geometry().unwrap().is_none());
    }

    #[test]
    fn test_oversized_record_without_bound_check_is_truncated() {
        let mut buf = header(50 + 14, 1);
        buf.extend_from_slice(&1i32.to_be_bytes());
        buf.extend_from_slice(&1_000_000i32.to_be_bytes());

        let config = ShapefileReaderConfiguration {
            check_record_bounds: false,
            ..Default::default()
        };
        let mut cursor = ShapefileGeometryCursor::new(Cursor::new(buf))
            .unwrap()
            .with_configuration(config);
        assert!(cursor.next_geometry().unwrap_err().is_truncated());
    }

    #[test]
    fn test_negative_length_always_rejected() {
        let mut buf = header(50 + 14, 1);
        buf.extend_from_slice(&1i32.to_be_bytes());
        buf.extend_from_slice(&(-4i32).to_be_bytes());

        let config = ShapefileReaderConfiguration {
            check_record_bounds: false,
            warn_on_record_gaps: false,
        };
        let mut cursor = ShapefileGeometryCursor::new(Cursor::new(buf))
            .unwrap()
            .with_configuration(config);
        assert!(matches!(
            cursor.next_geometry(),
            Err(ShapeError::InvalidRecordLength { length: -4, .. })
        ));
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let mut buf = header(50 + 3 * 14, 1);
        point_record(&mut buf, 1, 1.0, 1.0);
        buf.extend_from_slice(&2i32.to_be_bytes());

        let cursor = ShapefileGeometryCursor::new(Cursor::new(buf)).unwrap();
        let results: Vec<_> = cursor.collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].as_ref().unwrap_err().is_truncated());
    }

    #[test]
    fn test_custom_decoder_receives_payload_and_kind() {
        let mut buf = header(50 + 14, 21);
        point_record(&mut buf, 1, 1.0, 1.0);

        let decoder = |payload: &[u8], kind: GeometryType| -> Result<Geometry> {
            assert_eq!(payload.len(), 20);
            Ok(Geometry::Empty(kind))
        };
        let mut cursor = ShapefileGeometryCursor::with_decoder(Cursor::new(buf), decoder).unwrap();
        assert_eq!(
            cursor.next_geometry().unwrap(),
            Some(Geometry::Empty(GeometryType::Point))
        );
    }

    #[test]
    fn test_decoder_error_propagates() {
        let mut buf = header(50 + 14, 5);
        point_record(&mut buf, 1, 1.0, 1.0);

        let mut cursor = ShapefileGeometryCursor::new(Cursor::new(buf)).unwrap();
        assert!(matches!(
            cursor.next_geometry(),
            Err(ShapeError::PayloadDecode(_))
        ));
        assert!(!cursor.has_next());
    }

    #[test]
    fn test_into_inner_releases_source() {
        let cursor = ShapefileGeometryCursor::new(Cursor::new(header(50, 3))).unwrap();
        let source = cursor.into_inner();
        assert_eq!(source.position(), 100);
    }
}
