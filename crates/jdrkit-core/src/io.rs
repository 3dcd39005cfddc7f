//! Versioned binary codec for value types
//!
//! The byte layout is big-endian throughout. Strings are stored as a `u32`
//! byte length followed by UTF-8 data. Each value type that can be stored
//! implements [`Persist`], keyed to the [`FormatVersion`] of the file being
//! written or read.

use std::fmt;
use std::io::{Read, Write};

use lyon::geom::euclid::default::Transform2D;

use crate::error::FormatError;

/// Supported file format versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormatVersion {
    /// Version 1.6
    V1_6,
    /// Version 1.8, the current version
    V1_8,
}

impl FormatVersion {
    /// The version written by default
    pub const CURRENT: FormatVersion = FormatVersion::V1_8;

    /// Every version this codec can write and read
    pub const ALL: [FormatVersion; 2] = [FormatVersion::V1_6, FormatVersion::V1_8];

    /// Numeric version, as stored in file headers
    pub fn number(self) -> f32 {
        match self {
            FormatVersion::V1_6 => 1.6,
            FormatVersion::V1_8 => 1.8,
        }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.number())
    }
}

/// Writes big-endian primitives to an underlying stream
#[derive(Debug)]
pub struct JdrWriter<W: Write> {
    inner: W,
}

impl<W: Write> JdrWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), FormatError> {
        self.inner.write_all(&[value])?;
        Ok(())
    }

    pub fn write_bool(&mut self, value: bool) -> Result<(), FormatError> {
        self.write_u8(u8::from(value))
    }

    pub fn write_i32(&mut self, value: i32) -> Result<(), FormatError> {
        self.inner.write_all(&value.to_be_bytes())?;
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), FormatError> {
        self.inner.write_all(&value.to_be_bytes())?;
        Ok(())
    }

    pub fn write_f64(&mut self, value: f64) -> Result<(), FormatError> {
        self.inner.write_all(&value.to_be_bytes())?;
        Ok(())
    }

    pub fn write_str(&mut self, value: &str) -> Result<(), FormatError> {
        let len = u32::try_from(value.len()).map_err(|_| FormatError::InvalidValue {
            field: "string",
            reason: format!("length {} exceeds u32", value.len()),
        })?;
        self.write_u32(len)?;
        self.inner.write_all(value.as_bytes())?;
        Ok(())
    }
}

/// Reads big-endian primitives from an underlying stream
#[derive(Debug)]
pub struct JdrReader<R: Read> {
    inner: R,
}

impl<R: Read> JdrReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], FormatError> {
        let mut buf = [0u8; N];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> Result<u8, FormatError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool, FormatError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(FormatError::InvalidId {
                field: "boolean",
                value: i64::from(other),
            }),
        }
    }

    pub fn read_i32(&mut self) -> Result<i32, FormatError> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, FormatError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_f64(&mut self) -> Result<f64, FormatError> {
        Ok(f64::from_be_bytes(self.read_array()?))
    }

    pub fn read_string(&mut self, field: &'static str) -> Result<String, FormatError> {
        let len = self.read_u32()?;
        let mut buf = Vec::new();
        (&mut self.inner).take(u64::from(len)).read_to_end(&mut buf)?;
        if buf.len() as u64 != u64::from(len) {
            return Err(FormatError::InvalidValue {
                field,
                reason: format!("string of {} bytes truncated after {}", len, buf.len()),
            });
        }
        String::from_utf8(buf).map_err(|_| FormatError::InvalidString { field })
    }
}

/// A value that can be written to and read back from the binary format
pub trait Persist: Sized {
    fn save<W: Write>(&self, out: &mut JdrWriter<W>, version: FormatVersion)
        -> Result<(), FormatError>;

    fn read<R: Read>(input: &mut JdrReader<R>, version: FormatVersion) -> Result<Self, FormatError>;

    /// Convenience: encode into a fresh byte buffer.
    fn to_bytes(&self, version: FormatVersion) -> Result<Vec<u8>, FormatError> {
        let mut writer = JdrWriter::new(Vec::new());
        self.save(&mut writer, version)?;
        Ok(writer.into_inner())
    }

    /// Convenience: decode from a byte slice.
    fn from_bytes(bytes: &[u8], version: FormatVersion) -> Result<Self, FormatError> {
        let mut reader = JdrReader::new(bytes);
        Self::read(&mut reader, version)
    }
}

// Stored as the six matrix entries: scaleX, shearY, shearX, scaleY,
// translateX, translateY.
impl Persist for Transform2D<f64> {
    fn save<W: Write>(
        &self,
        out: &mut JdrWriter<W>,
        _version: FormatVersion,
    ) -> Result<(), FormatError> {
        for value in self.to_array() {
            out.write_f64(value)?;
        }
        Ok(())
    }

    fn read<R: Read>(input: &mut JdrReader<R>, _version: FormatVersion) -> Result<Self, FormatError> {
        let mut m = [0.0; 6];
        for value in m.iter_mut() {
            *value = input.read_f64()?;
        }
        Ok(Transform2D::new(m[0], m[1], m[2], m[3], m[4], m[5]))
    }
}
