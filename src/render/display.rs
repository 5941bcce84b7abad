//! Recording surface
//!
//! [`DisplayList`] records every drawing call together with the full surface
//! state it was issued under. It is how the render pass is inspected in tests
//! and how callers without a rasterizer can still consume a label.

use std::fmt;

use image::RgbaImage;

use crate::errors::Result;
use crate::types::{DVec2, Rect, dvec2};

use super::geometry::Path;
use super::surface::{StateStack, Surface, SurfaceState};

/// Proportional character widths, in hundredths of an em-ish unit, for
/// printable ASCII starting at `' '`.
#[rustfmt::skip]
pub const AW_CHAR: [u8; 95] = [
    45,  55,  62, 115,  90, 132, 125,  40,
    55,  55,  71, 115,  45,  48,  45,  50,
    91,  91,  91,  91,  91,  91,  91,  91,
    91,  91,  50,  50, 120, 120, 120,  78,
   142, 102, 105, 110, 115, 105,  98, 105,
   125,  58,  58, 107,  95, 145, 125, 115,
    95, 115, 107,  95,  97, 118, 102, 150,
   100,  93, 100,  58,  50,  58, 119,  72,
    72,  86,  92,  80,  92,  85,  52,  92,
    92,  47,  47,  88,  48, 135,  92,  86,
    92,  92,  69,  75,  58,  92,  80, 121,
    81,  80,  76,  91,  49,  91, 118,
];

/// Character width to font size ratio the table is normalised to.
const CHAR_ASPECT: f64 = 0.08 / 0.14;

/// Sum of proportional widths of `text`; characters outside ASCII count 100.
pub fn text_length(text: &str) -> u32 {
    text.chars()
        .map(|c| match c {
            ' '..='~' => AW_CHAR[c as usize - 0x20] as u32,
            _ => 100,
        })
        .sum()
}

/// Approximate advance width of `text` at font `size`.
pub fn proportional_width(text: &str, size: f64) -> f64 {
    text_length(text) as f64 * 0.01 * CHAR_ASPECT * size
}

/// What was drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawKind {
    FillRect(Rect),
    StrokeRect(Rect),
    StrokePath(Path),
    FillText {
        text: String,
        origin: DVec2,
        max_width: Option<f64>,
    },
    DrawImage {
        width: u32,
        height: u32,
        origin: DVec2,
        size: Option<DVec2>,
    },
}

impl DrawKind {
    fn name(&self) -> &'static str {
        match self {
            DrawKind::FillRect(_) => "fill_rect",
            DrawKind::StrokeRect(_) => "stroke_rect",
            DrawKind::StrokePath(_) => "stroke_path",
            DrawKind::FillText { .. } => "fill_text",
            DrawKind::DrawImage { .. } => "draw_image",
        }
    }
}

/// A recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawOp {
    pub kind: DrawKind,
    pub state: SurfaceState,
}

impl DrawOp {
    /// Bounds in user space, before the op's transform.
    pub fn local_bounds(&self) -> Option<Rect> {
        match &self.kind {
            DrawKind::FillRect(rect) | DrawKind::StrokeRect(rect) => Some(*rect),
            DrawKind::StrokePath(path) => path.bounds(),
            DrawKind::DrawImage {
                width,
                height,
                origin,
                size,
            } => {
                let size = size.unwrap_or(dvec2(*width as f64, *height as f64));
                Some(Rect::new(origin.x, origin.y, size.x, size.y))
            }
            DrawKind::FillText { .. } => None,
        }
    }

    /// Bounds in device pixels.
    pub fn device_bounds(&self) -> Option<Rect> {
        self.local_bounds()
            .map(|rect| rect.transformed(&self.state.transform))
    }
}

impl fmt::Display for DrawOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.name())?;
        if let Some(b) = self.device_bounds() {
            write!(
                f,
                " {:.1},{:.1} {:.1}x{:.1}",
                b.x, b.y, b.width, b.height
            )?;
        }
        let s = &self.state;
        match &self.kind {
            DrawKind::FillRect(_) => write!(f, " fill={}", s.fill_color),
            DrawKind::StrokeRect(_) | DrawKind::StrokePath(_) => {
                write!(f, " stroke={} width={:.2}", s.stroke_color, s.line_width)?;
                if !s.line_dash.is_empty() {
                    write!(f, " dash={:?}", s.line_dash)?;
                }
                Ok(())
            }
            DrawKind::FillText { text, origin, .. } => {
                let at = s.transform.transform_point2(*origin);
                write!(
                    f,
                    " {:.1},{:.1} {text:?} font=\"{}\" fill={} align={:?} baseline={:?}",
                    at.x, at.y, s.font, s.fill_color, s.text_align, s.text_baseline
                )
            }
            DrawKind::DrawImage { width, height, .. } => {
                write!(f, " image={width}x{height} smooth={}", s.image_smoothing)
            }
        }
    }
}

/// A surface that records instead of rasterizing.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    width: u32,
    height: u32,
    states: StateStack,
    ops: Vec<DrawOp>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// The last op whose device bounds contain `point`: what a viewer sees
    /// on top there. Text has no bounds and never hits.
    pub fn topmost_at(&self, point: DVec2) -> Option<&DrawOp> {
        self.ops
            .iter()
            .rev()
            .find(|op| op.device_bounds().is_some_and(|b| b.contains(point)))
    }

    fn record(&mut self, kind: DrawKind) {
        self.ops.push(DrawOp {
            kind,
            state: self.states.current().clone(),
        });
    }
}

impl fmt::Display for DisplayList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.ops {
            writeln!(f, "{op}")?;
        }
        Ok(())
    }
}

impl Surface for DisplayList {
    fn states(&self) -> &StateStack {
        &self.states
    }

    fn states_mut(&mut self) -> &mut StateStack {
        &mut self.states
    }

    fn reset(&mut self, width: u32, height: u32) -> Result<()> {
        self.width = width;
        self.height = height;
        self.states.clear();
        self.ops.clear();
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.record(DrawKind::FillRect(rect));
    }

    fn stroke_rect(&mut self, rect: Rect) {
        self.record(DrawKind::StrokeRect(rect));
    }

    fn stroke_path(&mut self, path: &Path) {
        self.record(DrawKind::StrokePath(path.clone()));
    }

    fn measure_text(&self, text: &str) -> f64 {
        proportional_width(text, self.state().font.size)
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, max_width: Option<f64>) {
        self.record(DrawKind::FillText {
            text: text.to_string(),
            origin: dvec2(x, y),
            max_width,
        });
    }

    fn draw_image(&mut self, image: &RgbaImage, x: f64, y: f64, size: Option<DVec2>) {
        self.record(DrawKind::DrawImage {
            width: image.width(),
            height: image.height(),
            origin: dvec2(x, y),
            size,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;

    #[test]
    fn text_length_uses_the_width_table() {
        assert_eq!(text_length(" "), 45);
        assert_eq!(text_length("AB"), 102 + 105);
        assert_eq!(text_length("é"), 100);
    }

    #[test]
    fn measurement_scales_with_font_size() {
        let w10 = proportional_width("Hello", 10.0);
        let w20 = proportional_width("Hello", 20.0);
        assert!((w20 - 2.0 * w10).abs() < 1e-9);
    }

    #[test]
    fn ops_capture_state_at_call_time() {
        let mut list = DisplayList::new();
        list.reset(100, 50).unwrap();
        list.save();
        list.scale(2.0, 2.0);
        list.set_fill_color(Color::RED);
        list.fill_rect(Rect::new(1.0, 1.0, 4.0, 4.0));
        list.restore();
        list.fill_rect(Rect::new(1.0, 1.0, 4.0, 4.0));

        assert_eq!(list.len(), 2);
        assert_eq!(list.ops()[0].state.fill_color, Color::RED);
        assert_eq!(
            list.ops()[0].device_bounds(),
            Some(Rect::new(2.0, 2.0, 8.0, 8.0))
        );
        assert_eq!(list.ops()[1].state.fill_color, Color::BLACK);
    }

    #[test]
    fn topmost_prefers_later_ops() {
        let mut list = DisplayList::new();
        list.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        list.stroke_rect(Rect::new(5.0, 5.0, 10.0, 10.0));
        let hit = list.topmost_at(dvec2(7.0, 7.0)).unwrap();
        assert!(matches!(hit.kind, DrawKind::StrokeRect(_)));
        let hit = list.topmost_at(dvec2(2.0, 2.0)).unwrap();
        assert!(matches!(hit.kind, DrawKind::FillRect(_)));
        assert!(list.topmost_at(dvec2(50.0, 50.0)).is_none());
    }

    #[test]
    fn reset_clears_ops_and_state() {
        let mut list = DisplayList::new();
        list.scale(3.0, 3.0);
        list.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        list.reset(10, 20).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.size(), (10, 20));
        assert_eq!(list.transform(), crate::types::DAffine2::IDENTITY);
    }
}
