//! Synthetic shapefile builders.
//!
//! `ShapefileBuilder` assembles a complete `.shp` byte stream in memory:
//! the 100-byte header (with the file length computed from the records added)
//! followed by one envelope + payload per record, numbered from 1.

#![allow(dead_code)]

/// Builder for in-memory `.shp` streams.
pub struct ShapefileBuilder {
    shape_type: i32,
    bbox: [f64; 8],
    records: Vec<Vec<u8>>,
    length_override: Option<i32>,
    record_numbers: Option<Vec<i32>>,
    version: i32,
    file_code: i32,
}

impl ShapefileBuilder {
    pub fn new(shape_type: i32) -> Self {
        Self {
            shape_type,
            bbox: [0.0; 8],
            records: Vec::new(),
            length_override: None,
            record_numbers: None,
            version: 1000,
            file_code: 9994,
        }
    }

    /// Set `xmin, ymin, xmax, ymax`.
    pub fn bbox(mut self, xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        self.bbox[..4].copy_from_slice(&[xmin, ymin, xmax, ymax]);
        self
    }

    /// Set `zmin, zmax, mmin, mmax`.
    pub fn zm_ranges(mut self, zmin: f64, zmax: f64, mmin: f64, mmax: f64) -> Self {
        self.bbox[4..].copy_from_slice(&[zmin, zmax, mmin, mmax]);
        self
    }

    pub fn version(mut self, version: i32) -> Self {
        self.version = version;
        self
    }

    pub fn file_code(mut self, file_code: i32) -> Self {
        self.file_code = file_code;
        self
    }

    /// Declare a file length (in words) instead of computing it.
    pub fn declared_length_words(mut self, words: i32) -> Self {
        self.length_override = Some(words);
        self
    }

    /// Number records explicitly instead of 1..N.
    pub fn record_numbers(mut self, numbers: &[i32]) -> Self {
        self.record_numbers = Some(numbers.to_vec());
        self
    }

    /// Append a record with an arbitrary payload (length must be even).
    pub fn raw_record(mut self, payload: Vec<u8>) -> Self {
        assert!(payload.len() % 2 == 0, "payload must be a whole number of words");
        self.records.push(payload);
        self
    }

    pub fn null_record(self) -> Self {
        self.raw_record(0i32.to_le_bytes().to_vec())
    }

    pub fn point(self, x: f64, y: f64) -> Self {
        let mut p = Vec::new();
        put_i32(&mut p, 1);
        put_f64s(&mut p, &[x, y]);
        self.raw_record(p)
    }

    pub fn point_z(self, x: f64, y: f64, z: f64, m: f64) -> Self {
        let mut p = Vec::new();
        put_i32(&mut p, 11);
        put_f64s(&mut p, &[x, y, z, m]);
        self.raw_record(p)
    }

    pub fn multipoint(self, points: &[(f64, f64)]) -> Self {
        let mut p = Vec::new();
        put_i32(&mut p, 8);
        put_f64s(&mut p, &bbox_of(points.iter().copied()));
        put_i32(&mut p, points.len() as i32);
        for &(x, y) in points {
            put_f64s(&mut p, &[x, y]);
        }
        self.raw_record(p)
    }

    pub fn polyline(self, paths: &[&[(f64, f64)]]) -> Self {
        let payload = multipart(3, paths);
        self.raw_record(payload)
    }

    pub fn polygon(self, rings: &[&[(f64, f64)]]) -> Self {
        let payload = multipart(5, rings);
        self.raw_record(payload)
    }

    /// Serialize header and records.
    pub fn build(&self) -> Vec<u8> {
        let body_len: usize = self.records.iter().map(|r| 8 + r.len()).sum();
        let words = self
            .length_override
            .unwrap_or(((100 + body_len) / 2) as i32);

        let mut buf = Vec::with_capacity(100 + body_len);
        buf.extend_from_slice(&self.file_code.to_be_bytes());
        buf.extend_from_slice(&[0u8; 20]);
        buf.extend_from_slice(&words.to_be_bytes());
        put_i32(&mut buf, self.version);
        put_i32(&mut buf, self.shape_type);
        put_f64s(&mut buf, &self.bbox);

        for (i, payload) in self.records.iter().enumerate() {
            let number = self
                .record_numbers
                .as_ref()
                .and_then(|numbers| numbers.get(i).copied())
                .unwrap_or(i as i32 + 1);
            buf.extend_from_slice(&number.to_be_bytes());
            buf.extend_from_slice(&((payload.len() / 2) as i32).to_be_bytes());
            buf.extend_from_slice(payload);
        }
        buf
    }

    /// Byte offsets at which each record envelope starts.
    pub fn record_offsets(&self) -> Vec<usize> {
        let mut offsets = Vec::with_capacity(self.records.len());
        let mut offset = 100;
        for r in &self.records {
            offsets.push(offset);
            offset += 8 + r.len();
        }
        offsets
    }
}

fn put_i32(buf: &mut Vec<u8>, v: i32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn put_f64s(buf: &mut Vec<u8>, values: &[f64]) {
    for v in values {
        buf.extend_from_slice(&v.to_le_bytes());
    }
}

fn bbox_of(points: impl Iterator<Item = (f64, f64)>) -> [f64; 4] {
    let mut b = [f64::MAX, f64::MAX, f64::MIN, f64::MIN];
    for (x, y) in points {
        b[0] = b[0].min(x);
        b[1] = b[1].min(y);
        b[2] = b[2].max(x);
        b[3] = b[3].max(y);
    }
    b
}

fn multipart(shape_type: i32, parts: &[&[(f64, f64)]]) -> Vec<u8> {
    let mut p = Vec::new();
    put_i32(&mut p, shape_type);
    put_f64s(&mut p, &bbox_of(parts.iter().flat_map(|part| part.iter().copied())));
    let num_points: usize = parts.iter().map(|part| part.len()).sum();
    put_i32(&mut p, parts.len() as i32);
    put_i32(&mut p, num_points as i32);
    let mut start = 0;
    for part in parts {
        put_i32(&mut p, start as i32);
        start += part.len();
    }
    for part in parts {
        for &(x, y) in part.iter() {
            put_f64s(&mut p, &[x, y]);
        }
    }
    p
}
