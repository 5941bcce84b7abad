//! Barcode objects
//!
//! Bar patterns come from an external [`BarcodeGenerator`]; this module
//! prepares the payload (EAN check digits), sizes the request and places the
//! returned bitmap pixel-aligned on the device grid.

use image::RgbaImage;

use crate::dom::Element;
use crate::errors::{LabelError, Result};
use crate::log::warn;

use super::context::RenderContext;
use super::objects::{DataRef, Draw};
use super::style::{ObjectStyle, length, required};

/// Sizing of a generator request, in device pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct BarcodeParams {
    /// Width of the narrowest bar
    pub bar_width: f64,
    /// Height of the bars, without the human-readable text row
    pub height: f64,
    pub margin: f64,
    pub margin_bottom: f64,
    /// Font size of the human-readable text row
    pub font_size: f64,
}

/// Produces barcode bitmaps.
pub trait BarcodeGenerator {
    /// Bitmap for `payload` in `symbology` (`"EAN13"`, `"CODE39"`, ...).
    fn generate(&self, symbology: &str, payload: &str, params: &BarcodeParams) -> Result<RgbaImage>;
}

impl<F> BarcodeGenerator for F
where
    F: Fn(&str, &str, &BarcodeParams) -> Result<RgbaImage>,
{
    fn generate(&self, symbology: &str, payload: &str, params: &BarcodeParams) -> Result<RgbaImage> {
        self(symbology, payload, params)
    }
}

/// A generator that has no symbologies: labels with barcodes fail to render.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBarcodes;

impl BarcodeGenerator for NoBarcodes {
    fn generate(&self, symbology: &str, _payload: &str, _params: &BarcodeParams) -> Result<RgbaImage> {
        Err(LabelError::BarcodeUnavailable {
            symbology: symbology.to_string(),
        })
    }
}

/// A generator that leaves barcodes out: every request logs a warning and
/// yields an empty bitmap, so the rest of the label still renders.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipBarcodes;

impl BarcodeGenerator for SkipBarcodes {
    fn generate(&self, symbology: &str, payload: &str, _params: &BarcodeParams) -> Result<RgbaImage> {
        warn!(symbology, payload, "no barcode generator, leaving the barcode out");
        Ok(RgbaImage::new(0, 0))
    }
}

/// Payload digits (before the check digit) of the EAN symbologies.
fn ean_digits(symbology: &str) -> Option<usize> {
    match symbology {
        "EAN13" => Some(12),
        "EAN8" => Some(7),
        _ => None,
    }
}

/// EAN/UPC check digit of a digit string, `None` if it holds anything else.
///
/// Weights alternate 3, 1, 3, ... starting from the rightmost digit.
pub fn ean_check_digit(digits: &str) -> Option<u32> {
    let sum = digits
        .chars()
        .rev()
        .enumerate()
        .map(|(i, c)| c.to_digit(10).map(|d| if i % 2 == 0 { d * 3 } else { d }))
        .sum::<Option<u32>>()?;
    Some((10 - sum % 10) % 10)
}

/// The string handed to the generator for `raw` data.
///
/// EAN-13 and EAN-8 payloads are zero-padded to 12 and 7 digits and get
/// their check digit appended; everything else passes through.
pub fn prepare_payload(symbology: &str, raw: &str) -> Result<String> {
    let Some(len) = ean_digits(symbology) else {
        return Ok(raw.to_string());
    };
    let invalid = || LabelError::InvalidBarcodePayload {
        symbology: symbology.to_string(),
        payload: raw.to_string(),
        max_digits: len,
    };
    if raw.len() > len {
        return Err(invalid());
    }
    let padded = format!("{raw:0>len$}");
    let check = ean_check_digit(&padded).ok_or_else(invalid)?;
    Ok(format!("{padded}{check}"))
}

/// `barcode:barcode`
#[derive(Debug, Clone, PartialEq)]
pub struct BarcodeObject {
    pub style: ObjectStyle,
    pub symbology: String,
    /// Narrow bar width in pixels
    pub bar_width: f64,
    pub data: DataRef,
}

impl BarcodeObject {
    pub fn read(el: &Element) -> Result<BarcodeObject> {
        let barcode_style = required(el, "barcode:barcodeStyle")?;
        let symbology = barcode_style
            .attr("protocol")
            .ok_or_else(|| LabelError::missing_attr(barcode_style.name(), "protocol"))?
            .to_string();
        Ok(BarcodeObject {
            style: ObjectStyle::read(el)?,
            symbology,
            bar_width: length(barcode_style, "barWidth")?,
            data: DataRef::read(el)?,
        })
    }

    /// Generator request for this barcode at the output resolution.
    pub fn params(&self, cx: &RenderContext<'_>) -> BarcodeParams {
        let scale = cx.options.scale();
        let options = &cx.options.barcode;
        BarcodeParams {
            bar_width: self.bar_width * scale,
            height: self.style.bounds.height * scale - options.text_allowance * scale,
            margin: options.margin,
            margin_bottom: options.margin_bottom,
            font_size: options.font_size * scale,
        }
    }
}

impl Draw for BarcodeObject {
    fn draw(&self, cx: &mut RenderContext<'_>) -> Result<()> {
        let payload = prepare_payload(&self.symbology, &cx.text(&self.data))?;
        let params = self.params(cx);
        let bitmap = cx.barcodes.generate(&self.symbology, &payload, &params)?;

        let scale = cx.options.scale();
        let b = self.style.bounds;
        let overshoot = bitmap.height() as f64 - b.height * scale;
        if overshoot > cx.options.barcode.oversize_tolerance {
            warn!(
                symbology = self.symbology.as_str(),
                overshoot, "barcode taller than its box"
            );
        }

        // Device-pixel scale, keeping the page translation, so bars land on
        // whole pixels.
        let mut transform = cx.surface.transform();
        transform.matrix2.x_axis.x = 1.0;
        transform.matrix2.y_axis.y = 1.0;
        cx.surface.set_transform(transform);
        cx.surface.set_image_smoothing(false);
        cx.surface.draw_image(&bitmap, b.x * scale - scale, b.y * scale, None);
        Ok(())
    }
}
