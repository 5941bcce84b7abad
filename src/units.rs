//! Document lengths and the 96 dpi pixel space
//!
//! Label files store every length as a string such as `"84pt"`. All geometry
//! is computed in a 96 dpi pixel space; the render pass scales that space to
//! the target resolution once, as the outermost transform.

use std::fmt;
use std::str::FromStr;

use crate::errors::{LabelError, Result};

/// Resolution of the internal pixel space.
pub const SOURCE_DPI: f64 = 96.0;

/// Millimetres per 96 dpi pixel.
pub const PX_TO_MM: f64 = 0.264_655_663_062_037_64;

/// Unit suffix of a document length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Unit {
    /// No suffix, or `px`: already in the 96 dpi pixel space.
    #[default]
    Px,
    Pt,
    In,
    Mm,
    Cm,
}

impl Unit {
    fn suffix(self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::Pt => "pt",
            Unit::In => "in",
            Unit::Mm => "mm",
            Unit::Cm => "cm",
        }
    }
}

/// A length as written in the document.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Length {
    pub value: f64,
    pub unit: Unit,
}

impl Length {
    pub const ZERO: Length = Length {
        value: 0.0,
        unit: Unit::Px,
    };

    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Convert to pixels at `dpi`. Unitless and `px` values pass through.
    pub fn to_px_at(self, dpi: f64) -> f64 {
        match self.unit {
            Unit::Px => self.value,
            Unit::Pt => self.value * dpi / 72.0,
            Unit::In => self.value * dpi,
            Unit::Mm => self.value * dpi / 25.4,
            Unit::Cm => self.value * dpi / 2.54,
        }
    }

    /// Convert to 96 dpi pixels.
    pub fn to_px(self) -> f64 {
        self.to_px_at(SOURCE_DPI)
    }
}

impl FromStr for Length {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
            .unwrap_or(trimmed.len());
        let (number, suffix) = trimmed.split_at(split);

        let unit = match suffix {
            "" | "px" => Unit::Px,
            "pt" => Unit::Pt,
            "in" => Unit::In,
            "mm" => Unit::Mm,
            "cm" => Unit::Cm,
            _ => return Err(malformed(s)),
        };

        let value: f64 = number.trim_end().parse().map_err(|_| malformed(s))?;
        if !value.is_finite() {
            return Err(malformed(s));
        }
        Ok(Length { value, unit })
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            Unit::Px => write!(f, "{}", self.value),
            unit => write!(f, "{}{}", self.value, unit.suffix()),
        }
    }
}

fn malformed(s: &str) -> LabelError {
    LabelError::MalformedLength {
        value: s.to_string(),
    }
}

/// Parse a length string and convert it to pixels at `dpi`.
pub fn to_pixels_at(length: &str, dpi: f64) -> Result<f64> {
    Ok(length.parse::<Length>()?.to_px_at(dpi))
}

/// Parse a length string and convert it to 96 dpi pixels.
pub fn to_pixels(length: &str) -> Result<f64> {
    to_pixels_at(length, SOURCE_DPI)
}

/// Convert 96 dpi pixels to millimetres.
pub fn px_to_mm(px: f64) -> f64 {
    px * PX_TO_MM
}
