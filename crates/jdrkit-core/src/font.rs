//! Font descriptions
//!
//! Only the attributes needed to select a font survive here: family, LaTeX
//! shape and series, and size. Glyph metrics belong to the renderer.

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::error::FormatError;
use crate::io::{FormatVersion, JdrReader, JdrWriter, Persist};
use crate::units::Length;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontShape {
    #[default]
    Upright,
    Italic,
    Slanted,
    SmallCaps,
}

impl FontShape {
    pub fn id(self) -> u8 {
        match self {
            FontShape::Upright => 0,
            FontShape::Italic => 1,
            FontShape::Slanted => 2,
            FontShape::SmallCaps => 3,
        }
    }

    pub fn from_id(id: u8) -> Result<Self, FormatError> {
        match id {
            0 => Ok(FontShape::Upright),
            1 => Ok(FontShape::Italic),
            2 => Ok(FontShape::Slanted),
            3 => Ok(FontShape::SmallCaps),
            _ => Err(FormatError::InvalidId {
                field: "font shape",
                value: i64::from(id),
            }),
        }
    }

    /// LaTeX shape declaration
    pub fn latex(self) -> &'static str {
        match self {
            FontShape::Upright => "\\upshape",
            FontShape::Italic => "\\itshape",
            FontShape::Slanted => "\\slshape",
            FontShape::SmallCaps => "\\scshape",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSeries {
    #[default]
    Medium,
    Bold,
}

impl FontSeries {
    pub fn id(self) -> u8 {
        match self {
            FontSeries::Medium => 0,
            FontSeries::Bold => 1,
        }
    }

    pub fn from_id(id: u8) -> Result<Self, FormatError> {
        match id {
            0 => Ok(FontSeries::Medium),
            1 => Ok(FontSeries::Bold),
            _ => Err(FormatError::InvalidId {
                field: "font series",
                value: i64::from(id),
            }),
        }
    }

    pub fn latex(self) -> &'static str {
        match self {
            FontSeries::Medium => "\\mdseries",
            FontSeries::Bold => "\\bfseries",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    pub shape: FontShape,
    pub series: FontSeries,
    pub size: Length,
}

impl Font {
    pub fn new(family: impl Into<String>, shape: FontShape, series: FontSeries, size: Length) -> Self {
        Self {
            family: family.into(),
            shape,
            series,
            size,
        }
    }

    pub fn is_bold(&self) -> bool {
        self.series == FontSeries::Bold
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("Serif", FontShape::Upright, FontSeries::Medium, Length::bp(10.0))
    }
}

// Before 1.8 the series is stored as a bold flag.
impl Persist for Font {
    fn save<W: Write>(&self, out: &mut JdrWriter<W>, version: FormatVersion) -> Result<(), FormatError> {
        out.write_str(&self.family)?;
        out.write_u8(self.shape.id())?;
        if version < FormatVersion::V1_8 {
            out.write_bool(self.is_bold())?;
        } else {
            out.write_u8(self.series.id())?;
        }
        self.size.save(out, version)
    }

    fn read<R: Read>(input: &mut JdrReader<R>, version: FormatVersion) -> Result<Self, FormatError> {
        let family = input.read_string("font family")?;
        let shape = FontShape::from_id(input.read_u8()?)?;
        let series = if version < FormatVersion::V1_8 {
            if input.read_bool()? {
                FontSeries::Bold
            } else {
                FontSeries::Medium
            }
        } else {
            FontSeries::from_id(input.read_u8()?)?
        };
        let size = Length::read(input, version)?;
        Ok(Font {
            family,
            shape,
            series,
            size,
        })
    }
}
