//! Geometry and color primitives shared by the renderer and its surfaces.
//!
//! All geometry is `f64` in the 96 dpi pixel space unless a surface says
//! otherwise; affine transforms are `glam::DAffine2`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub use glam::{DAffine2, DVec2, dvec2};

/// Axis-aligned rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning two corners, in any order.
    pub fn from_corners(a: DVec2, b: DVec2) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    pub fn origin(&self) -> DVec2 {
        dvec2(self.x, self.y)
    }

    pub fn size(&self) -> DVec2 {
        dvec2(self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_corners(
            self.origin().min(other.origin()),
            dvec2(self.right(), self.bottom()).max(dvec2(other.right(), other.bottom())),
        )
    }

    /// Axis-aligned bounds of this rectangle after `transform`.
    pub fn transformed(&self, transform: &DAffine2) -> Rect {
        let corners = [
            dvec2(self.x, self.y),
            dvec2(self.right(), self.y),
            dvec2(self.x, self.bottom()),
            dvec2(self.right(), self.bottom()),
        ]
        .map(|p| transform.transform_point2(p));
        let min = corners.iter().fold(corners[0], |acc, p| acc.min(*p));
        let max = corners.iter().fold(corners[0], |acc, p| acc.max(*p));
        Rect::from_corners(min, max)
    }
}

/// Error parsing a color string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color: {0:?}")]
pub struct ColorError(pub String);

/// Straight (non-premultiplied) RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    fn named(name: &str) -> Option<Color> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => Color::BLACK,
            "white" => Color::WHITE,
            "red" => Color::RED,
            "green" => Color::rgb(0, 128, 0),
            "blue" => Color::rgb(0, 0, 255),
            "yellow" => Color::rgb(255, 255, 0),
            "gray" | "grey" => Color::rgb(128, 128, 128),
            "transparent" => Color::TRANSPARENT,
            _ => return None,
        };
        Some(color)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl FromStr for Color {
    type Err = ColorError;

    /// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa` and a handful of names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ColorError(s.to_string());
        let Some(hex) = s.strip_prefix('#') else {
            return Color::named(s).ok_or_else(err);
        };
        if !hex.is_ascii() {
            return Err(err());
        }
        let channel = |i: usize, len: usize| u8::from_str_radix(&hex[i..i + len], 16);
        let color = match hex.len() {
            3 => {
                let c = |i| channel(i, 1).map(|v| v * 17);
                Color::rgb(c(0).map_err(|_| err())?, c(1).map_err(|_| err())?, c(2).map_err(|_| err())?)
            }
            6 | 8 => {
                let c = |i| channel(i, 2).map_err(|_| err());
                let a = if hex.len() == 8 { c(6)? } else { 255 };
                Color::rgba(c(0)?, c(2)?, c(4)?, a)
            }
            _ => return Err(err()),
        };
        Ok(color)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}
