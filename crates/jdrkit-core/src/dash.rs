//! Dash patterns for stroked lines

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::error::{FormatError, ParameterError};
use crate::io::{FormatVersion, JdrReader, JdrWriter, Persist};

/// Alternating on/off lengths in bp, plus a phase offset.
///
/// An empty pattern draws a solid line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashPattern {
    pub pattern: Vec<f64>,
    pub offset: f64,
}

impl DashPattern {
    pub fn solid() -> Self {
        Self::default()
    }

    pub fn new(pattern: Vec<f64>, offset: f64) -> Result<Self, ParameterError> {
        if let Some(bad) = pattern.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(ParameterError::InvalidValue {
                param: "dash length",
                reason: format!("must be a non-negative number, got {}", bad),
            });
        }
        if !offset.is_finite() {
            return Err(ParameterError::InvalidValue {
                param: "dash offset",
                reason: format!("must be finite, got {}", offset),
            });
        }
        Ok(Self { pattern, offset })
    }

    pub fn is_solid(&self) -> bool {
        self.pattern.is_empty()
    }

    /// Pattern with every length multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> DashPattern {
        DashPattern {
            pattern: self.pattern.iter().map(|v| v * factor).collect(),
            offset: self.offset * factor,
        }
    }
}

impl Persist for DashPattern {
    fn save<W: Write>(&self, out: &mut JdrWriter<W>, _version: FormatVersion) -> Result<(), FormatError> {
        let count = i32::try_from(self.pattern.len()).map_err(|_| FormatError::InvalidValue {
            field: "dash pattern",
            reason: format!("{} entries", self.pattern.len()),
        })?;
        out.write_i32(count)?;
        if count > 0 {
            for value in &self.pattern {
                out.write_f64(*value)?;
            }
            out.write_f64(self.offset)?;
        }
        Ok(())
    }

    fn read<R: Read>(input: &mut JdrReader<R>, _version: FormatVersion) -> Result<Self, FormatError> {
        let count = input.read_i32()?;
        if count < 0 {
            return Err(FormatError::InvalidValue {
                field: "dash pattern",
                reason: format!("negative entry count {}", count),
            });
        }
        if count == 0 {
            return Ok(DashPattern::solid());
        }
        // the count comes from the file, so it only bounds the loop
        let mut pattern = Vec::with_capacity((count as usize).min(64));
        for _ in 0..count {
            pattern.push(input.read_f64()?);
        }
        let offset = input.read_f64()?;
        DashPattern::new(pattern, offset).map_err(|e| FormatError::InvalidValue {
            field: "dash pattern",
            reason: e.to_string(),
        })
    }
}
