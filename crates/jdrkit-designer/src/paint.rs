//! Line and fill paint
//!
//! Solid colours in the RGB, CMYK and grey colour spaces, plus two-colour
//! linear and radial gradients. Every component, alpha included, lies in
//! [0, 1]; constructors reject anything else.

use serde::{Deserialize, Serialize};

use jdrkit_core::{check_component, Angle, ParameterError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Rgb {
    pub fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Result<Self, ParameterError> {
        Ok(Self {
            red: check_component("red", red)?,
            green: check_component("green", green)?,
            blue: check_component("blue", blue)?,
            alpha: check_component("alpha", alpha)?,
        })
    }

    pub fn opaque(red: f64, green: f64, blue: f64) -> Result<Self, ParameterError> {
        Self::new(red, green, blue, 1.0)
    }

    pub const BLACK: Rgb = Rgb {
        red: 0.0,
        green: 0.0,
        blue: 0.0,
        alpha: 1.0,
    };

    /// `#rrggbb`, ignoring alpha
    pub fn to_hex(&self) -> String {
        let byte = |v: f64| (v * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.red), byte(self.green), byte(self.blue))
    }

    fn mix(&self, other: &Rgb, t: f64) -> Rgb {
        let lerp = |a: f64, b: f64| a + (b - a) * t;
        Rgb {
            red: lerp(self.red, other.red),
            green: lerp(self.green, other.green),
            blue: lerp(self.blue, other.blue),
            alpha: lerp(self.alpha, other.alpha),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cmyk {
    pub cyan: f64,
    pub magenta: f64,
    pub yellow: f64,
    pub black: f64,
    pub alpha: f64,
}

impl Cmyk {
    pub fn new(cyan: f64, magenta: f64, yellow: f64, black: f64, alpha: f64) -> Result<Self, ParameterError> {
        Ok(Self {
            cyan: check_component("cyan", cyan)?,
            magenta: check_component("magenta", magenta)?,
            yellow: check_component("yellow", yellow)?,
            black: check_component("black", black)?,
            alpha: check_component("alpha", alpha)?,
        })
    }

    // PostScript's naive conversion
    pub fn to_rgb(&self) -> Rgb {
        Rgb {
            red: 1.0 - (self.cyan + self.black).min(1.0),
            green: 1.0 - (self.magenta + self.black).min(1.0),
            blue: 1.0 - (self.yellow + self.black).min(1.0),
            alpha: self.alpha,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grey {
    pub grey: f64,
    pub alpha: f64,
}

impl Grey {
    pub fn new(grey: f64, alpha: f64) -> Result<Self, ParameterError> {
        Ok(Self {
            grey: check_component("grey", grey)?,
            alpha: check_component("alpha", alpha)?,
        })
    }

    pub fn to_rgb(&self) -> Rgb {
        Rgb {
            red: self.grey,
            green: self.grey,
            blue: self.grey,
            alpha: self.alpha,
        }
    }
}

/// Solid colour used as a gradient end
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "space", rename_all = "lowercase")]
pub enum SolidColour {
    Rgb(Rgb),
    Cmyk(Cmyk),
    Grey(Grey),
}

impl SolidColour {
    pub fn to_rgb(&self) -> Rgb {
        match self {
            SolidColour::Rgb(c) => *c,
            SolidColour::Cmyk(c) => c.to_rgb(),
            SolidColour::Grey(c) => c.to_rgb(),
        }
    }
}

/// Where a radial gradient starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadialCentre {
    #[default]
    Centre,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl RadialCentre {
    /// Position within the unit box, y pointing down
    pub fn offset(self) -> (f64, f64) {
        match self {
            RadialCentre::Centre => (0.5, 0.5),
            RadialCentre::North => (0.5, 0.0),
            RadialCentre::NorthEast => (1.0, 0.0),
            RadialCentre::East => (1.0, 0.5),
            RadialCentre::SouthEast => (1.0, 1.0),
            RadialCentre::South => (0.5, 1.0),
            RadialCentre::SouthWest => (0.0, 1.0),
            RadialCentre::West => (0.0, 0.5),
            RadialCentre::NorthWest => (0.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Paint {
    #[default]
    Transparent,
    Rgb(Rgb),
    Cmyk(Cmyk),
    Grey(Grey),
    LinearGradient {
        start: SolidColour,
        end: SolidColour,
        direction: Angle,
    },
    RadialGradient {
        start: SolidColour,
        end: SolidColour,
        centre: RadialCentre,
    },
}

impl Paint {
    pub fn black() -> Self {
        Paint::Rgb(Rgb::BLACK)
    }

    pub fn is_transparent(&self) -> bool {
        matches!(self, Paint::Transparent)
    }

    pub fn is_gradient(&self) -> bool {
        matches!(self, Paint::LinearGradient { .. } | Paint::RadialGradient { .. })
    }

    /// Single RGB approximation; gradients fold to their midpoint colour
    pub fn to_rgb(&self) -> Rgb {
        match self {
            Paint::Transparent => Rgb {
                alpha: 0.0,
                ..Rgb::BLACK
            },
            Paint::Rgb(c) => *c,
            Paint::Cmyk(c) => c.to_rgb(),
            Paint::Grey(c) => c.to_rgb(),
            Paint::LinearGradient { start, end, .. } | Paint::RadialGradient { start, end, .. } => {
                start.to_rgb().mix(&end.to_rgb(), 0.5)
            }
        }
    }

    pub fn alpha(&self) -> f64 {
        self.to_rgb().alpha
    }

    /// PDF colour operator for filling, or `None` when nothing is painted
    pub fn pdf_fill_spec(&self) -> Option<String> {
        self.pdf_spec(false)
    }

    /// PDF colour operator for stroking
    pub fn pdf_stroke_spec(&self) -> Option<String> {
        self.pdf_spec(true)
    }

    fn pdf_spec(&self, stroking: bool) -> Option<String> {
        let op = |fill: &'static str, stroke: &'static str| if stroking { stroke } else { fill };
        match self {
            Paint::Transparent => None,
            Paint::Grey(c) => Some(format!("{} {}", c.grey, op("g", "G"))),
            Paint::Cmyk(c) => Some(format!(
                "{} {} {} {} {}",
                c.cyan,
                c.magenta,
                c.yellow,
                c.black,
                op("k", "K")
            )),
            _ => {
                let c = self.to_rgb();
                Some(format!("{} {} {} {}", c.red, c.green, c.blue, op("rg", "RG")))
            }
        }
    }
}
