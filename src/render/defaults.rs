//! Default render settings (in 96 dpi pixels unless noted)

use crate::types::{Color, DVec2, dvec2};

/// Output resolution.
pub const TARGET_DPI: f64 = 300.0;

/// Scale nudge applied after the resolution scale so content lands inside
/// the printable area the way P-touch Editor prints it.
pub const FIT_CORRECTION: DVec2 = dvec2(0.995, 0.992);

/// Fraction of the left and top margins the page is shifted back by.
pub const MARGIN_CORRECTION: DVec2 = dvec2(0.9, 0.95);

/// Upper bound for fitted text when the box gives none.
pub const MAX_FONT_SIZE: f64 = 300.0;

/// Grey level below which an image channel counts as ink.
pub const MONO_THRESHOLD: u16 = 128;

/// Stroke width of rectangles and polylines (1pt).
pub const SHAPE_LINE_WIDTH: f64 = 4.0 / 3.0;

/// Vertical room reserved under a barcode for its human-readable text,
/// in pixels before the resolution scale.
pub const BARCODE_TEXT_ALLOWANCE: f64 = 11.0;
pub const BARCODE_MARGIN: f64 = 0.0;
pub const BARCODE_MARGIN_BOTTOM: f64 = 2.0;
pub const BARCODE_FONT_SIZE: f64 = 10.0;

/// Device pixels a barcode may overshoot its box before we warn.
pub const BARCODE_OVERSIZE_TOLERANCE: f64 = 1.0;

/// Outline drawn for objects the renderer has no painter for.
pub const OUTLINE_COLOR: Color = Color::RED;
pub const OUTLINE_DASH: [f64; 2] = [3.0, 2.0];
