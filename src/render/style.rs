//! Style extractors
//!
//! Pure readers from label elements to typed style values. Lengths come out
//! in 96 dpi pixels.

use crate::dom::Element;
use crate::errors::{LabelError, Result};
use crate::log::debug;
use crate::types::{Color, Rect};
use crate::units::to_pixels;

use super::types::Font;

/// First descendant `tag` of `obj`, else [`LabelError::MissingElement`].
pub(crate) fn required<'a>(obj: &'a Element, tag: &str) -> Result<&'a Element> {
    obj.first(tag).ok_or_else(|| LabelError::missing(obj.name(), tag))
}

/// Length attribute in pixels; absent reads as zero.
pub(crate) fn length(el: &Element, attr: &str) -> Result<f64> {
    el.attr(attr).map_or(Ok(0.0), to_pixels)
}

fn color(el: &Element, attr: &str) -> Option<Color> {
    let value = el.attr(attr)?;
    match value.parse() {
        Ok(color) => Some(color),
        Err(_e) => {
            debug!(tag = el.name(), attr, value, "ignoring unparsable color");
            None
        }
    }
}

/// Bounding box and background of an object, from its first `pt:objectStyle`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectStyle {
    pub bounds: Rect,
    pub background: Option<Color>,
}

impl ObjectStyle {
    pub fn read(obj: &Element) -> Result<ObjectStyle> {
        let style = obj
            .first("pt:objectStyle")
            .ok_or_else(|| LabelError::MissingObjectStyle {
                tag: obj.name().to_string(),
            })?;
        Self::from_style(style)
    }

    /// Read a `pt:objectStyle` element itself.
    pub fn from_style(style: &Element) -> Result<ObjectStyle> {
        Ok(ObjectStyle {
            bounds: Rect::new(
                length(style, "x")?,
                length(style, "y")?,
                length(style, "width")?,
                length(style, "height")?,
            ),
            background: color(style, "backColor"),
        })
    }
}

/// Font of a text object, from `text:ptFontInfo`.
#[derive(Debug, Clone, PartialEq)]
pub struct FontInfo {
    pub family: String,
    pub weight: u16,
    pub italic: bool,
    /// Declared size in pixels
    pub size: f64,
    /// Size the author picked before P-touch Editor shrank the text, in
    /// pixels; `None` when the file doesn't say
    pub original_size: Option<f64>,
    pub color: Color,
}

impl FontInfo {
    pub fn read(obj: &Element) -> Result<FontInfo> {
        let info = required(obj, "text:ptFontInfo")?;
        let log_font = required(info, "text:logFont")?;
        let ext = required(info, "text:fontExt")?;

        let weight = match log_font.attr("weight").map(str::parse::<u16>) {
            Some(Ok(weight)) => weight,
            _ => 400,
        };
        let original_size = match ext.attr("orgSize") {
            Some(value) => Some(to_pixels(value)?),
            None => None,
        };

        Ok(FontInfo {
            family: log_font.attr("name").unwrap_or_default().to_string(),
            weight,
            italic: log_font.attr("italic") == Some("true"),
            size: length(ext, "size")?,
            original_size,
            color: color(ext, "textColor").unwrap_or(Color::BLACK),
        })
    }

    /// Largest size text may be fitted to inside a box of `box_height`.
    pub fn max_fit_size(&self, box_height: f64) -> f64 {
        box_height.min(self.original_size.unwrap_or(self.size))
    }

    pub fn font(&self, size: f64) -> Font {
        Font {
            family: self.family.clone(),
            weight: self.weight,
            italic: self.italic,
            size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Alignment of a text object inside its box, from `text:textAlign`.
/// Unrecognised values mean centered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextAlignment {
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
}

impl TextAlignment {
    pub fn read(obj: &Element) -> Result<TextAlignment> {
        let align = required(obj, "text:textAlign")?;
        let horizontal = match align.attr("horizontalAlignment") {
            Some("LEFT") => HorizontalAlign::Left,
            Some("RIGHT") => HorizontalAlign::Right,
            _ => HorizontalAlign::Center,
        };
        let vertical = match align.attr("verticalAlignment") {
            Some("TOP") => VerticalAlign::Top,
            Some("BOTTOM") => VerticalAlign::Bottom,
            _ => VerticalAlign::Center,
        };
        Ok(TextAlignment {
            horizontal,
            vertical,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_object(font_ext: Element, align: Option<Element>) -> Element {
        let mut obj = Element::new("text:text")
            .with_child(
                Element::new("pt:objectStyle")
                    .with_attr("x", "12pt")
                    .with_attr("y", "3pt")
                    .with_attr("width", "60pt")
                    .with_attr("height", "15pt")
                    .with_attr("backColor", "#FFFFFF"),
            )
            .with_child(
                Element::new("text:ptFontInfo")
                    .with_child(
                        Element::new("text:logFont")
                            .with_attr("name", "Arial")
                            .with_attr("weight", "700")
                            .with_attr("italic", "true"),
                    )
                    .with_child(font_ext),
            );
        if let Some(align) = align {
            obj = obj.with_child(align);
        }
        obj
    }

    fn ext() -> Element {
        Element::new("text:fontExt")
            .with_attr("size", "9pt")
            .with_attr("orgSize", "27pt")
            .with_attr("textColor", "#FF0000")
    }

    #[test]
    fn object_style_reads_bounds_in_pixels() {
        let style = ObjectStyle::read(&text_object(ext(), None)).unwrap();
        assert_eq!(style.bounds, Rect::new(16.0, 4.0, 80.0, 20.0));
        assert_eq!(style.background, Some(Color::WHITE));
    }

    #[test]
    fn object_style_is_required() {
        let err = ObjectStyle::read(&Element::new("draw:rect")).unwrap_err();
        assert!(matches!(err, LabelError::MissingObjectStyle { ref tag } if tag == "draw:rect"));
    }

    #[test]
    fn font_info_reads_log_font_and_extension() {
        let font = FontInfo::read(&text_object(ext(), None)).unwrap();
        assert_eq!(font.family, "Arial");
        assert_eq!(font.weight, 700);
        assert!(font.italic);
        assert_eq!(font.size, 12.0);
        assert_eq!(font.original_size, Some(36.0));
        assert_eq!(font.color, Color::RED);
        assert_eq!(font.max_fit_size(20.0), 20.0);
        assert_eq!(font.max_fit_size(100.0), 36.0);
    }

    #[test]
    fn missing_original_size_falls_back_to_declared_size() {
        let ext = Element::new("text:fontExt").with_attr("size", "9pt");
        let font = FontInfo::read(&text_object(ext, None)).unwrap();
        assert_eq!(font.original_size, None);
        assert_eq!(font.max_fit_size(100.0), 12.0);
        assert_eq!(font.color, Color::BLACK);
    }

    #[test]
    fn font_info_requires_extension() {
        let obj = Element::new("text:text").with_child(
            Element::new("text:ptFontInfo").with_child(Element::new("text:logFont")),
        );
        let err = FontInfo::read(&obj).unwrap_err();
        assert!(
            matches!(err, LabelError::MissingElement { ref parent, ref tag } if parent == "text:ptFontInfo" && tag == "text:fontExt"),
            "got {err:?}"
        );
    }

    #[test]
    fn alignment_defaults_to_center() {
        let align = Element::new("text:textAlign")
            .with_attr("horizontalAlignment", "JUSTIFY")
            .with_attr("verticalAlignment", "TOP");
        let read = TextAlignment::read(&text_object(ext(), Some(align))).unwrap();
        assert_eq!(read.horizontal, HorizontalAlign::Center);
        assert_eq!(read.vertical, VerticalAlign::Top);

        let err = TextAlignment::read(&text_object(ext(), None)).unwrap_err();
        assert!(matches!(err, LabelError::MissingElement { .. }));
    }
}
