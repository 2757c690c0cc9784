//! Mixed-endian primitive reader.
//!
//! The shapefile header interleaves big-endian and little-endian fields, so a
//! single reader has to offer both byte orders. Wraps any [`Read`] source and
//! reports a short read as [`ShapeError::Truncated`].

use std::io::{self, Read};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};

use crate::error::{Result, ShapeError};

/// Reads fixed-width integers and doubles in either byte order.
#[derive(Debug)]
pub struct MixedEndianReader<R> {
    inner: R,
    /// Bytes consumed so far.
    position: u64,
}

/// Convert an EOF from the underlying stream into a truncation error.
fn map_short_read(err: io::Error, expected: usize, context: &'static str) -> ShapeError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        ShapeError::Truncated { expected, context }
    } else {
        ShapeError::Io(err)
    }
}

impl<R: Read> MixedEndianReader<R> {
    /// Wrap a byte source positioned at its first byte.
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    /// Number of bytes consumed from the source.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Borrow the underlying byte source.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Release the underlying byte source.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Read a 32-bit signed integer, high byte first.
    pub fn read_be_i32(&mut self) -> Result<i32> {
        let v = self
            .inner
            .read_i32::<BigEndian>()
            .map_err(|e| map_short_read(e, 4, "big-endian i32"))?;
        self.position += 4;
        Ok(v)
    }

    /// Read a 32-bit signed integer, low byte first.
    pub fn read_le_i32(&mut self) -> Result<i32> {
        let v = self
            .inner
            .read_i32::<LittleEndian>()
            .map_err(|e| map_short_read(e, 4, "little-endian i32"))?;
        self.position += 4;
        Ok(v)
    }

    /// Read a 64-bit signed integer, high byte first.
    pub fn read_be_i64(&mut self) -> Result<i64> {
        let v = self
            .inner
            .read_i64::<BigEndian>()
            .map_err(|e| map_short_read(e, 8, "big-endian i64"))?;
        self.position += 8;
        Ok(v)
    }

    /// Read a 64-bit signed integer, low byte first.
    pub fn read_le_i64(&mut self) -> Result<i64> {
        let v = self
            .inner
            .read_i64::<LittleEndian>()
            .map_err(|e| map_short_read(e, 8, "little-endian i64"))?;
        self.position += 8;
        Ok(v)
    }

    /// Read a little-endian IEEE-754 double.
    ///
    /// The bit pattern of [`read_le_i64`](Self::read_le_i64) is reinterpreted
    /// unchanged, so NaN payloads and signed zeros survive.
    pub fn read_le_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_le_i64()? as u64))
    }

    /// Read a big-endian IEEE-754 double.
    pub fn read_be_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_be_i64()? as u64))
    }

    /// Discard `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        let skipped = io::copy(&mut (&mut self.inner).take(n as u64), &mut io::sink())?;
        self.position += skipped;
        if skipped < n as u64 {
            return Err(ShapeError::Truncated {
                expected: n,
                context: "skipped bytes",
            });
        }
        Ok(())
    }

    /// Read exactly `n` bytes into a new buffer.
    ///
    /// The buffer grows with the data actually read, so a corrupt length does
    /// not allocate more than the source can supply.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let read = (&mut self.inner).take(n as u64).read_to_end(&mut buf)?;
        self.position += read as u64;
        if read < n {
            return Err(ShapeError::Truncated {
                expected: n,
                context: "record payload",
            });
        }
        Ok(buf)
    }
}
