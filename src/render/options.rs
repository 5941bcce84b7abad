//! Render configuration

use crate::types::{Color, DVec2};
use crate::units::SOURCE_DPI;

use super::defaults;

/// Barcode sizing handed to the generator.
#[derive(Debug, Clone, PartialEq)]
pub struct BarcodeOptions {
    /// Room left under the bars for human-readable text, before scaling
    pub text_allowance: f64,
    pub margin: f64,
    pub margin_bottom: f64,
    /// Font size of the human-readable text, before scaling
    pub font_size: f64,
    /// Device pixels a generated barcode may overshoot its box before a warning
    pub oversize_tolerance: f64,
}

impl Default for BarcodeOptions {
    fn default() -> Self {
        Self {
            text_allowance: defaults::BARCODE_TEXT_ALLOWANCE,
            margin: defaults::BARCODE_MARGIN,
            margin_bottom: defaults::BARCODE_MARGIN_BOTTOM,
            font_size: defaults::BARCODE_FONT_SIZE,
            oversize_tolerance: defaults::BARCODE_OVERSIZE_TOLERANCE,
        }
    }
}

/// Knobs of the render pass. The defaults reproduce P-touch Editor output
/// at 300 dpi.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub target_dpi: f64,
    pub fit_correction: DVec2,
    pub margin_correction: DVec2,
    pub max_font_size: f64,
    pub shape_line_width: f64,
    pub outline_color: Color,
    pub outline_dash: Vec<f64>,
    pub barcode: BarcodeOptions,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            target_dpi: defaults::TARGET_DPI,
            fit_correction: defaults::FIT_CORRECTION,
            margin_correction: defaults::MARGIN_CORRECTION,
            max_font_size: defaults::MAX_FONT_SIZE,
            shape_line_width: defaults::SHAPE_LINE_WIDTH,
            outline_color: defaults::OUTLINE_COLOR,
            outline_dash: defaults::OUTLINE_DASH.to_vec(),
            barcode: BarcodeOptions::default(),
        }
    }
}

impl RenderOptions {
    /// Device pixels per 96 dpi pixel.
    pub fn scale(&self) -> f64 {
        self.target_dpi / SOURCE_DPI
    }

    pub fn with_dpi(mut self, dpi: f64) -> Self {
        self.target_dpi = dpi;
        self
    }

    /// Drop the scale and margin nudges: the page maps 1:1 (times the
    /// resolution scale) onto the printable area.
    pub fn without_corrections(mut self) -> Self {
        self.fit_correction = DVec2::ONE;
        self.margin_correction = DVec2::ZERO;
        self
    }

    pub fn with_barcode(mut self, barcode: BarcodeOptions) -> Self {
        self.barcode = barcode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scale_is_300_over_96() {
        assert_eq!(RenderOptions::default().scale(), 3.125);
        assert_eq!(RenderOptions::default().with_dpi(96.0).scale(), 1.0);
    }

    #[test]
    fn corrections_can_be_disabled() {
        let options = RenderOptions::default().without_corrections();
        assert_eq!(options.fit_correction, DVec2::ONE);
        assert_eq!(options.margin_correction, DVec2::ZERO);
    }
}
