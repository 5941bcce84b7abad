//! Text objects and the text fit engine

use crate::dom::Element;
use crate::errors::Result;

use super::context::RenderContext;
use super::defaults;
use super::objects::{DataRef, Draw};
use super::style::{FontInfo, HorizontalAlign, ObjectStyle, TextAlignment, VerticalAlign};
use super::surface::Surface;
use super::types::{Font, TextAlign, TextBaseline};

/// Largest font size whose measured width fits `desired_width`.
///
/// Binary search over `[1, max_size]`, stopping once the interval is no
/// wider than one pixel; returns the lower bound, so the result is at least
/// 1 even when nothing fits. A non-positive or NaN `max_size` means the 300
/// default. `measure` maps a font size to the rendered width.
pub fn fit_size(mut measure: impl FnMut(f64) -> f64, desired_width: f64, max_size: f64) -> f64 {
    let mut min = 1.0;
    let mut max = if max_size > 0.0 {
        max_size
    } else {
        defaults::MAX_FONT_SIZE
    };
    while max - min > 1.0 {
        let test = min + (max - min) / 2.0;
        if measure(test) > desired_width {
            max = test;
        } else {
            min = test;
        }
    }
    min
}

/// [`fit_size`] measuring `text` on `surface` in `font` at each trial size.
/// Leaves the surface font at the last trial size.
pub fn fit_font_size(
    surface: &mut dyn Surface,
    text: &str,
    font: &Font,
    desired_width: f64,
    max_size: f64,
) -> f64 {
    fit_size(
        |size| {
            surface.set_font(&font.with_size(size));
            surface.measure_text(text)
        },
        desired_width,
        max_size,
    )
}

/// `text:text`: one line of text shrunk to fit its box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextObject {
    pub style: ObjectStyle,
    pub font: FontInfo,
    pub align: TextAlignment,
    pub data: DataRef,
}

impl TextObject {
    pub fn read(el: &Element) -> Result<TextObject> {
        Ok(TextObject {
            style: ObjectStyle::read(el)?,
            font: FontInfo::read(el)?,
            align: TextAlignment::read(el)?,
            data: DataRef::read(el)?,
        })
    }
}

impl Draw for TextObject {
    fn draw(&self, cx: &mut RenderContext<'_>) -> Result<()> {
        let text = cx.text(&self.data);
        let b = self.style.bounds;

        let font = self.font.font(self.font.size);
        let max_size = match self.font.max_fit_size(b.height) {
            max if max > 0.0 => max,
            _ => cx.options.max_font_size,
        };
        let size = fit_font_size(cx.surface, &text, &font, b.width, max_size);
        cx.surface.set_font(&font.with_size(size));
        cx.surface.set_fill_color(self.font.color);

        let (align, dx) = match self.align.horizontal {
            HorizontalAlign::Left => (TextAlign::Left, 0.0),
            HorizontalAlign::Center => (TextAlign::Center, b.width / 2.0),
            HorizontalAlign::Right => (TextAlign::Right, b.width),
        };
        let (baseline, dy) = match self.align.vertical {
            VerticalAlign::Top => (TextBaseline::Top, 0.0),
            VerticalAlign::Center => (TextBaseline::Middle, b.height / 2.0),
            VerticalAlign::Bottom => (TextBaseline::Bottom, b.height),
        };
        cx.surface.set_text_align(align);
        cx.surface.set_text_baseline(baseline);
        cx.surface.fill_text(&text, b.x + dx, b.y + dy, Some(b.width));
        Ok(())
    }
}
