//! Font faces for the raster surface
//!
//! Labels name fonts by family (`Arial`, `Meiryo UI`). The raster surface
//! looks families up in a [`FontBook`] the caller fills with TrueType or
//! OpenType data; there is no system font discovery.

use std::path::Path;

use tiny_skia::PathBuilder;
use ttf_parser::{Face, GlyphId, OutlineBuilder};

use crate::errors::{LabelError, Result};

/// Horizontal shear applied to synthesize italics.
const ITALIC_SKEW: f32 = 0.2;

#[derive(Clone)]
struct FaceData {
    family: String,
    data: Vec<u8>,
    index: u32,
}

/// Font data by family name.
#[derive(Clone, Default)]
pub struct FontBook {
    faces: Vec<FaceData>,
    fallback: Option<usize>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field(
                "families",
                &self.faces.iter().map(|face| &face.family).collect::<Vec<_>>(),
            )
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register font data under `family`. The first font added is the
    /// fallback until [`FontBook::set_fallback`] says otherwise.
    pub fn add(&mut self, family: impl Into<String>, data: Vec<u8>) -> Result<()> {
        let family = family.into();
        if let Err(e) = Face::parse(&data, 0) {
            return Err(LabelError::Font {
                family,
                message: e.to_string(),
            });
        }
        self.faces.push(FaceData {
            family,
            data,
            index: 0,
        });
        if self.fallback.is_none() {
            self.fallback = Some(self.faces.len() - 1);
        }
        Ok(())
    }

    /// Read a font file and register it under `family`.
    pub fn load(&mut self, family: impl Into<String>, path: &Path) -> Result<()> {
        let data = std::fs::read(path).map_err(|source| LabelError::Io {
            name: path.display().to_string(),
            source,
        })?;
        self.add(family, data)
    }

    /// Use `family` for text whose family isn't registered. Returns false if
    /// `family` itself isn't registered.
    pub fn set_fallback(&mut self, family: &str) -> bool {
        match self.position(family) {
            Some(index) => {
                self.fallback = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Face for `family` (case-insensitive), else the fallback.
    pub fn face(&self, family: &str) -> Option<Face<'_>> {
        let index = self.position(family).or(self.fallback)?;
        let data = &self.faces[index];
        Face::parse(&data.data, data.index).ok()
    }

    fn position(&self, family: &str) -> Option<usize> {
        self.faces
            .iter()
            .position(|face| face.family.eq_ignore_ascii_case(family))
    }
}

fn glyph(face: &Face<'_>, c: char) -> GlyphId {
    face.glyph_index(c).unwrap_or(GlyphId(0))
}

fn px_per_unit(face: &Face<'_>, size: f64) -> f64 {
    size / face.units_per_em().max(1) as f64
}

/// Advance width of `text` at `size` pixels.
pub(crate) fn advance(face: &Face<'_>, text: &str, size: f64) -> f64 {
    let units: f64 = text
        .chars()
        .map(|c| face.glyph_hor_advance(glyph(face, c)).unwrap_or(0) as f64)
        .sum();
    units * px_per_unit(face, size)
}

/// Ascent above and descent below the baseline, both positive, in pixels.
pub(crate) fn vertical_metrics(face: &Face<'_>, size: f64) -> (f64, f64) {
    let scale = px_per_unit(face, size);
    (
        face.ascender() as f64 * scale,
        -(face.descender() as f64) * scale,
    )
}

struct PathConverter {
    builder: PathBuilder,
    scale: f32,
    skew: f32,
    x: f32,
}

impl PathConverter {
    fn point(&self, px: f32, py: f32) -> (f32, f32) {
        (
            self.x + (px + py * self.skew) * self.scale,
            -py * self.scale,
        )
    }
}

impl OutlineBuilder for PathConverter {
    fn move_to(&mut self, px: f32, py: f32) {
        let (x, y) = self.point(px, py);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, px: f32, py: f32) {
        let (x, y) = self.point(px, py);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, px: f32, py: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x, y) = self.point(px, py);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, px: f32, py: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x2, y2) = self.point(x2, y2);
        let (x, y) = self.point(px, py);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

/// Outline of `text` with the pen starting at the origin on the baseline,
/// y growing downwards.
pub(crate) fn outline(face: &Face<'_>, text: &str, size: f64, italic: bool) -> Option<tiny_skia::Path> {
    let scale = px_per_unit(face, size);
    let mut converter = PathConverter {
        builder: PathBuilder::new(),
        scale: scale as f32,
        skew: if italic { ITALIC_SKEW } else { 0.0 },
        x: 0.0,
    };
    for c in text.chars() {
        let id = glyph(face, c);
        face.outline_glyph(id, &mut converter);
        converter.x += (face.glyph_hor_advance(id).unwrap_or(0) as f64 * scale) as f32;
    }
    converter.builder.finish()
}
