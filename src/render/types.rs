//! Value types passed to drawing surfaces

use std::fmt;

/// A font request, in surface units.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    /// CSS-style weight, 400 regular, 700 bold
    pub weight: u16,
    pub italic: bool,
    pub size: f64,
}

impl Font {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            weight: 400,
            italic: false,
            size,
        }
    }

    pub fn with_size(&self, size: f64) -> Font {
        Font {
            size,
            ..self.clone()
        }
    }

    pub fn is_bold(&self) -> bool {
        self.weight >= 600
    }
}

impl Default for Font {
    fn default() -> Self {
        Font::new("sans-serif", 10.0)
    }
}

/// CSS font shorthand, e.g. `italic 700 12px Arial`.
impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.italic {
            write!(f, "italic ")?;
        }
        write!(f, "{} {}px {}", self.weight, self.size, self.family)
    }
}

/// Which point of the text lands on the anchor x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Which line of the text lands on the anchor y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    Top,
    Middle,
    Bottom,
    #[default]
    Alphabetic,
}
