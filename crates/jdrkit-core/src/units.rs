//! Unit conversion utilities
//!
//! Handles conversion between the named TeX/PostScript units a drawing can be
//! stored in. Every unit is defined by its size in PostScript big points
//! (bp), so any pair of units converts through that single factor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

use crate::error::FormatError;
use crate::io::{FormatVersion, JdrReader, JdrWriter, Persist};

/// Named length unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// TeX point (1/72.27 in)
    Pt,
    /// Inch
    In,
    /// Centimetre
    Cm,
    /// PostScript big point (1/72 in)
    Bp,
    /// Millimetre
    Mm,
    /// Pica (12 pt)
    Pc,
    /// Didot point (1238/1157 pt)
    Dd,
    /// Cicero (12 dd)
    Cc,
}

impl Default for Unit {
    fn default() -> Self {
        Self::Bp
    }
}

impl Unit {
    /// All units, in identifier order
    pub const ALL: [Unit; 8] = [
        Unit::Pt,
        Unit::In,
        Unit::Cm,
        Unit::Bp,
        Unit::Mm,
        Unit::Pc,
        Unit::Dd,
        Unit::Cc,
    ];

    /// Size of one of this unit in big points
    pub fn bp_per_unit(self) -> f64 {
        const PT: f64 = 72.0 / 72.27;
        const DD: f64 = 1238.0 / 1157.0 * PT;
        match self {
            Unit::Pt => PT,
            Unit::In => 72.0,
            Unit::Cm => 72.0 / 2.54,
            Unit::Bp => 1.0,
            Unit::Mm => 72.0 / 25.4,
            Unit::Pc => 12.0 * PT,
            Unit::Dd => DD,
            Unit::Cc => 12.0 * DD,
        }
    }

    /// Convert `value`, measured in this unit, to `target` units
    pub fn to_unit(self, value: f64, target: Unit) -> f64 {
        if self == target {
            return value;
        }
        value * self.bp_per_unit() / target.bp_per_unit()
    }

    /// Convert `value`, measured in `source` units, to this unit
    pub fn from_unit(self, value: f64, source: Unit) -> f64 {
        source.to_unit(value, self)
    }

    /// Convert `value` in this unit to big points
    pub fn to_bp(self, value: f64) -> f64 {
        self.to_unit(value, Unit::Bp)
    }

    /// Convert `value` in big points to this unit
    pub fn from_bp(self, value: f64) -> f64 {
        self.from_unit(value, Unit::Bp)
    }

    /// Short label, as used by TeX
    pub fn label(self) -> &'static str {
        match self {
            Unit::Pt => "pt",
            Unit::In => "in",
            Unit::Cm => "cm",
            Unit::Bp => "bp",
            Unit::Mm => "mm",
            Unit::Pc => "pc",
            Unit::Dd => "dd",
            Unit::Cc => "cc",
        }
    }

    /// Identifier used by the binary codec
    pub fn id(self) -> u8 {
        match self {
            Unit::Pt => 0,
            Unit::In => 1,
            Unit::Cm => 2,
            Unit::Bp => 3,
            Unit::Mm => 4,
            Unit::Pc => 5,
            Unit::Dd => 6,
            Unit::Cc => 7,
        }
    }

    pub fn from_id(id: u8) -> Result<Unit, FormatError> {
        Unit::ALL
            .get(usize::from(id))
            .copied()
            .ok_or(FormatError::InvalidId {
                field: "unit",
                value: i64::from(id),
            })
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Unit::ALL
            .into_iter()
            .find(|unit| unit.label() == s)
            .ok_or_else(|| format!("Unknown unit: {}", s))
    }
}

/// A length with an explicit unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Length {
    pub value: f64,
    pub unit: Unit,
}

impl Length {
    pub fn new(value: f64, unit: Unit) -> Self {
        debug_assert!(value.is_finite(), "length must be finite, got {value}");
        Self { value, unit }
    }

    pub fn bp(value: f64) -> Self {
        Self::new(value, Unit::Bp)
    }

    pub fn to_bp(&self) -> f64 {
        self.unit.to_bp(self.value)
    }

    /// Value of this length expressed in `unit`
    pub fn value_in(&self, unit: Unit) -> f64 {
        self.unit.to_unit(self.value, unit)
    }

    /// Same length re-expressed in another unit
    pub fn to_unit(&self, unit: Unit) -> Length {
        Length::new(self.value_in(unit), unit)
    }
}

impl Default for Length {
    fn default() -> Self {
        Self::bp(0.0)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

// Before 1.8 the value precedes the unit identifier.
impl Persist for Length {
    fn save<W: Write>(&self, out: &mut JdrWriter<W>, version: FormatVersion) -> Result<(), FormatError> {
        if version < FormatVersion::V1_8 {
            out.write_f64(self.value)?;
            out.write_u8(self.unit.id())
        } else {
            out.write_u8(self.unit.id())?;
            out.write_f64(self.value)
        }
    }

    fn read<R: Read>(input: &mut JdrReader<R>, version: FormatVersion) -> Result<Self, FormatError> {
        let (value, unit) = if version < FormatVersion::V1_8 {
            let value = input.read_f64()?;
            (value, Unit::from_id(input.read_u8()?)?)
        } else {
            let unit = Unit::from_id(input.read_u8()?)?;
            (input.read_f64()?, unit)
        };
        if !value.is_finite() {
            tracing::warn!("Rejecting non-finite stored length {}", value);
            return Err(FormatError::InvalidValue {
                field: "length",
                reason: format!("non-finite value {}", value),
            });
        }
        Ok(Length { value, unit })
    }
}
