//! Raster surface backed by tiny-skia

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use tiny_skia::{
    ColorU8, FillRule, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, StrokeDash,
    Transform,
};

use crate::errors::{LabelError, Result};
use crate::log::warn;
use crate::types::{Color, DAffine2, DVec2, Rect, dvec2};

use super::display::proportional_width;
use super::fonts::{self, FontBook};
use super::geometry::{Path, PathCommand};
use super::surface::{StateStack, Surface};
use super::types::{TextAlign, TextBaseline};

/// Stroke width, relative to font size, used to embolden bold text.
const BOLD_STROKE: f64 = 0.04;

/// A surface that paints into an RGBA pixmap.
#[derive(Debug)]
pub struct PixmapSurface {
    pixmap: Option<Pixmap>,
    states: StateStack,
    fonts: FontBook,
}

impl PixmapSurface {
    /// A surface with no pixels until the first [`Surface::reset`].
    pub fn new(fonts: FontBook) -> Self {
        Self {
            pixmap: None,
            states: StateStack::default(),
            fonts,
        }
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Straight-alpha color of a device pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let c = self.pixmap.as_ref()?.pixel(x, y)?.demultiply();
        Some(Color::rgba(c.red(), c.green(), c.blue(), c.alpha()))
    }

    /// Copy of the pixels as a straight-alpha image.
    pub fn to_image(&self) -> RgbaImage {
        let (width, height) = self.size();
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba(self.pixel(x, y).unwrap_or(Color::TRANSPARENT).to_array())
        })
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());
        self.to_image()
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|source| LabelError::Encode { source })?;
        Ok(out.into_inner())
    }

    fn paint(color: Color) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.anti_alias = true;
        paint
    }

    fn stroke(&self) -> Stroke {
        let state = self.state();
        let mut stroke = Stroke {
            width: state.line_width as f32,
            ..Stroke::default()
        };
        if !state.line_dash.is_empty() {
            let mut pattern: Vec<f32> = state.line_dash.iter().map(|d| d.abs() as f32).collect();
            if pattern.len() % 2 == 1 {
                pattern.extend(pattern.clone());
            }
            stroke.dash = StrokeDash::new(pattern, 0.0);
        }
        stroke
    }

    fn transform_at(&self, local: DAffine2) -> Transform {
        to_skia(&(self.transform() * local))
    }
}

fn to_skia(t: &DAffine2) -> Transform {
    let m = t.matrix2;
    Transform::from_row(
        m.x_axis.x as f32,
        m.x_axis.y as f32,
        m.y_axis.x as f32,
        m.y_axis.y as f32,
        t.translation.x as f32,
        t.translation.y as f32,
    )
}

fn to_skia_path(path: &Path) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for cmd in path.commands() {
        match *cmd {
            PathCommand::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathCommand::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathCommand::QuadTo(c, p) => pb.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathCommand::Close => pb.close(),
        }
    }
    pb.finish()
}

fn to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

impl Surface for PixmapSurface {
    fn states(&self) -> &StateStack {
        &self.states
    }

    fn states_mut(&mut self) -> &mut StateStack {
        &mut self.states
    }

    fn reset(&mut self, width: u32, height: u32) -> Result<()> {
        let pixmap = Pixmap::new(width, height)
            .ok_or(LabelError::InvalidSurfaceSize { width, height })?;
        self.pixmap = Some(pixmap);
        self.states.clear();
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        self.pixmap
            .as_ref()
            .map_or((0, 0), |p| (p.width(), p.height()))
    }

    fn fill_rect(&mut self, rect: Rect) {
        let Some(r) =
            tiny_skia::Rect::from_xywh(rect.x as f32, rect.y as f32, rect.width as f32, rect.height as f32)
        else {
            return;
        };
        let paint = Self::paint(self.state().fill_color);
        let ts = self.transform_at(DAffine2::IDENTITY);
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill_rect(r, &paint, ts, None);
        }
    }

    fn stroke_path(&mut self, path: &Path) {
        let Some(path) = to_skia_path(path) else {
            return;
        };
        let paint = Self::paint(self.state().stroke_color);
        let stroke = self.stroke();
        let ts = self.transform_at(DAffine2::IDENTITY);
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.stroke_path(&path, &paint, &stroke, ts, None);
        }
    }

    fn measure_text(&self, text: &str) -> f64 {
        let font = &self.state().font;
        match self.fonts.face(&font.family) {
            Some(face) => fonts::advance(&face, text, font.size),
            None => proportional_width(text, font.size),
        }
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, max_width: Option<f64>) {
        let state = self.state();
        let font = &state.font;
        let Some(face) = self.fonts.face(&font.family) else {
            warn!(family = font.family.as_str(), "no font available, text skipped");
            return;
        };

        let width = fonts::advance(&face, text, font.size);
        let squeeze = match max_width {
            Some(max) if width > max && width > 0.0 => (max / width).max(0.0),
            _ => 1.0,
        };
        let drawn = width * squeeze;
        let left = match state.text_align {
            TextAlign::Left => x,
            TextAlign::Center => x - drawn / 2.0,
            TextAlign::Right => x - drawn,
        };
        let (ascent, descent) = fonts::vertical_metrics(&face, font.size);
        let baseline = match state.text_baseline {
            TextBaseline::Top => y + ascent,
            TextBaseline::Middle => y + (ascent - descent) / 2.0,
            TextBaseline::Bottom => y - descent,
            TextBaseline::Alphabetic => y,
        };

        let Some(path) = fonts::outline(&face, text, font.size, font.italic) else {
            return;
        };
        let paint = Self::paint(state.fill_color);
        let bold = font.is_bold().then(|| Stroke {
            width: (font.size * BOLD_STROKE) as f32,
            ..Stroke::default()
        });
        let ts = self.transform_at(
            DAffine2::from_translation(dvec2(left, baseline)) * DAffine2::from_scale(dvec2(squeeze, 1.0)),
        );

        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill_path(&path, &paint, FillRule::Winding, ts, None);
            if let Some(stroke) = bold {
                pixmap.stroke_path(&path, &paint, &stroke, ts, None);
            }
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, x: f64, y: f64, size: Option<DVec2>) {
        if image.width() == 0 || image.height() == 0 {
            return;
        }
        let Some(source) = to_pixmap(image) else {
            return;
        };
        let natural = dvec2(image.width() as f64, image.height() as f64);
        let scale = size.map_or(DVec2::ONE, |size| size / natural);
        let ts = self.transform_at(DAffine2::from_translation(dvec2(x, y)) * DAffine2::from_scale(scale));
        let paint = PixmapPaint {
            quality: if self.state().image_smoothing {
                FilterQuality::Bilinear
            } else {
                FilterQuality::Nearest
            },
            ..PixmapPaint::default()
        };
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, ts, None);
        }
    }
}
