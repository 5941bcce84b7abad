//! Image objects and binarization

use image::RgbaImage;

use crate::dom::Element;
use crate::errors::{LabelError, Result};
use crate::log::debug;

use super::context::RenderContext;
use super::defaults;
use super::objects::Draw;
use super::style::{ObjectStyle, required};

/// Reduce `image` to pure black ink on white paper.
///
/// A pixel with any color channel below `threshold` becomes opaque black;
/// every other pixel becomes white, fully transparent when `transparent`
/// is set and opaque otherwise. Applying it twice changes nothing.
pub fn binarize(image: &mut RgbaImage, threshold: u16, transparent: bool) {
    for pixel in image.pixels_mut() {
        let [r, g, b, _] = pixel.0;
        let ink = [r, g, b].iter().any(|&c| u16::from(c) < threshold);
        pixel.0 = if ink {
            [0, 0, 0, 255]
        } else {
            [255, 255, 255, if transparent { 0 } else { 255 }]
        };
    }
}

/// `image:image`: a bitmap from the archive, printed monochrome.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageObject {
    pub style: ObjectStyle,
    pub file_name: String,
    pub threshold: u16,
    pub transparent: bool,
}

impl ImageObject {
    pub fn read(el: &Element) -> Result<ImageObject> {
        let image_style = required(el, "image:imageStyle")?;
        let file_name = image_style
            .attr("fileName")
            .ok_or_else(|| LabelError::missing_attr(image_style.name(), "fileName"))?
            .to_string();

        let threshold = match el.first("image:mono").and_then(|mono| mono.attr("threshold")) {
            Some(value) => value.trim().parse().unwrap_or_else(|_| {
                debug!(value, "unparsable mono threshold, using default");
                defaults::MONO_THRESHOLD
            }),
            None => defaults::MONO_THRESHOLD,
        };
        let transparent = el
            .first("image:transparent")
            .and_then(|t| t.attr("flag"))
            == Some("true");

        Ok(ImageObject {
            style: ObjectStyle::read(el)?,
            file_name,
            threshold,
            transparent,
        })
    }

    /// Fetch, decode and binarize the bitmap.
    pub fn load(&self, cx: &RenderContext<'_>) -> Result<RgbaImage> {
        let bytes = cx.assets.get_asset(&self.file_name)?;
        let mut bitmap = image::load_from_memory(&bytes)
            .map_err(|source| LabelError::ImageDecode {
                name: self.file_name.clone(),
                source,
            })?
            .to_rgba8();
        binarize(&mut bitmap, self.threshold, self.transparent);
        Ok(bitmap)
    }
}

impl Draw for ImageObject {
    fn draw(&self, cx: &mut RenderContext<'_>) -> Result<()> {
        let bitmap = self.load(cx)?;
        let b = self.style.bounds;
        cx.surface.set_image_smoothing(true);
        cx.surface.draw_image(&bitmap, b.x, b.y, Some(b.size()));
        Ok(())
    }
}
