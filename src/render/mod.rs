//! Label rendering
//!
//! This module is organized into submodules:
//! - `defaults`, `options`: render settings
//! - `types`, `geometry`: values passed to surfaces
//! - `surface`: the `Surface` trait and its shared state stack
//! - `display`, `raster`, `fonts`: the recording and tiny-skia surfaces
//! - `context`: what painters can reach while drawing
//! - `style`: style extractors
//! - `objects`: the object model and tree walker
//! - `text`, `bitmap`, `barcode`, `shapes`: per-kind painters

pub mod barcode;
pub mod bitmap;
pub mod context;
pub mod defaults;
pub mod display;
pub mod fonts;
pub mod geometry;
pub mod objects;
pub mod options;
pub mod raster;
pub mod shapes;
pub mod style;
pub mod surface;
pub mod text;
pub mod types;

pub use barcode::{
    BarcodeGenerator, BarcodeParams, NoBarcodes, SkipBarcodes, ean_check_digit, prepare_payload,
};
pub use bitmap::binarize;
pub use context::RenderContext;
pub use display::{DisplayList, DrawKind, DrawOp};
pub use fonts::FontBook;
pub use geometry::{Path, PathCommand};
pub use image::RgbaImage;
pub use objects::{Draw, LabelObject};
pub use options::{BarcodeOptions, RenderOptions};
pub use raster::PixmapSurface;
pub use surface::{StateStack, Surface, SurfaceState};
pub use text::fit_size;
pub use types::{Font, TextAlign, TextBaseline};

use crate::dom::Document;
use crate::errors::Result;
use crate::log::debug;
use crate::paper::Paper;
use crate::types::{Color, Rect};

/// Device size of the printable area: printable width and height times the
/// resolution scale, truncated to whole pixels.
pub fn canvas_size(paper: &Paper, options: &RenderOptions) -> (u32, u32) {
    let scale = options.scale();
    (
        (paper.width * scale).max(0.0) as u32,
        (paper.height * scale).max(0.0) as u32,
    )
}

/// Render `document` onto the context's surface.
///
/// Resets the surface to the canvas size and paints it white, then sets up
/// the page transform: resolution scale, fit correction, and a shift back
/// by a fraction of the left and top margins. Objects of the document's
/// first `pt:objects` are drawn in document order, later ones on top.
pub fn render(cx: &mut RenderContext<'_>, document: &Document, paper: &Paper) -> Result<()> {
    let objects = objects::read_objects(document.root())?;
    let (width, height) = canvas_size(paper, cx.options);
    debug!(width, height, objects = objects.len(), "rendering label");

    cx.surface.reset(width, height)?;
    {
        let mut page = cx.save();
        page.surface.set_fill_color(Color::WHITE);
        page.surface
            .fill_rect(Rect::new(0.0, 0.0, width as f64, height as f64));
    }

    let options = cx.options;
    let scale = options.scale();
    cx.surface.scale(scale, scale);
    cx.surface
        .scale(options.fit_correction.x, options.fit_correction.y);
    cx.surface.translate(
        -paper.margin_left * options.margin_correction.x,
        -paper.margin_top * options.margin_correction.y,
    );

    objects::draw_all(cx, &objects)
}
