//! The drawing surface abstraction
//!
//! A [`Surface`] is a 2D canvas with a current transform and paint state that
//! can be pushed and popped. State handling is shared: implementors hand out
//! their [`StateStack`] and get the setters for free, implementing only the
//! drawing primitives.

use image::RgbaImage;

use crate::errors::Result;
use crate::types::{Color, DAffine2, DVec2, Rect, dvec2};

use super::geometry::{Path, rounded_rect};
use super::types::{Font, TextAlign, TextBaseline};

/// Paint and transform state of a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceState {
    pub transform: DAffine2,
    pub fill_color: Color,
    pub stroke_color: Color,
    pub line_width: f64,
    pub line_dash: Vec<f64>,
    pub font: Font,
    pub text_align: TextAlign,
    pub text_baseline: TextBaseline,
    pub image_smoothing: bool,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            transform: DAffine2::IDENTITY,
            fill_color: Color::BLACK,
            stroke_color: Color::BLACK,
            line_width: 1.0,
            line_dash: Vec::new(),
            font: Font::default(),
            text_align: TextAlign::default(),
            text_baseline: TextBaseline::default(),
            image_smoothing: true,
        }
    }
}

/// Current state plus the saved states beneath it.
#[derive(Debug, Clone, Default)]
pub struct StateStack {
    current: SurfaceState,
    saved: Vec<SurfaceState>,
}

impl StateStack {
    pub fn current(&self) -> &SurfaceState {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut SurfaceState {
        &mut self.current
    }

    pub fn save(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// Pop the last saved state. Unbalanced restores are ignored.
    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.current = state;
        }
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Back to the default state with nothing saved.
    pub fn clear(&mut self) {
        *self = StateStack::default();
    }
}

/// A 2D drawing target.
pub trait Surface {
    fn states(&self) -> &StateStack;

    fn states_mut(&mut self) -> &mut StateStack;

    /// Resize to `width` x `height` device pixels, clearing content and state.
    fn reset(&mut self, width: u32, height: u32) -> Result<()>;

    fn size(&self) -> (u32, u32);

    fn fill_rect(&mut self, rect: Rect);

    fn stroke_path(&mut self, path: &Path);

    fn stroke_rect(&mut self, rect: Rect) {
        self.stroke_path(&rounded_rect(rect, 0.0));
    }

    /// Advance width of `text` in the current font, in user units.
    fn measure_text(&self, text: &str) -> f64;

    /// Draw `text` anchored at `(x, y)` per the current alignment and
    /// baseline, squeezed horizontally to `max_width` when it is wider.
    fn fill_text(&mut self, text: &str, x: f64, y: f64, max_width: Option<f64>);

    /// Draw `image` with its top-left at `(x, y)`, scaled to `size` when given.
    fn draw_image(&mut self, image: &RgbaImage, x: f64, y: f64, size: Option<DVec2>);

    fn state(&self) -> &SurfaceState {
        self.states().current()
    }

    fn save(&mut self) {
        self.states_mut().save();
    }

    fn restore(&mut self) {
        self.states_mut().restore();
    }

    fn transform(&self) -> DAffine2 {
        self.state().transform
    }

    fn set_transform(&mut self, transform: DAffine2) {
        self.states_mut().current_mut().transform = transform;
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        let t = self.transform() * DAffine2::from_scale(dvec2(sx, sy));
        self.set_transform(t);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        let t = self.transform() * DAffine2::from_translation(dvec2(dx, dy));
        self.set_transform(t);
    }

    fn set_fill_color(&mut self, color: Color) {
        self.states_mut().current_mut().fill_color = color;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.states_mut().current_mut().stroke_color = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.states_mut().current_mut().line_width = width;
    }

    fn set_line_dash(&mut self, dash: &[f64]) {
        self.states_mut().current_mut().line_dash = dash.to_vec();
    }

    fn set_font(&mut self, font: &Font) {
        self.states_mut().current_mut().font = font.clone();
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.states_mut().current_mut().text_align = align;
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.states_mut().current_mut().text_baseline = baseline;
    }

    fn set_image_smoothing(&mut self, enabled: bool) {
        self.states_mut().current_mut().image_smoothing = enabled;
    }
}
