//! Paper geometry and the canonical stock-size name
//!
//! `style:paper` carries the total paper size including margins;
//! `style:backGround` carries the printable area.

use std::fmt;

use crate::dom::{Document, Element};
use crate::errors::{LabelError, Result};
use crate::units::{px_to_mm, to_pixels};

/// Paper orientation as stored in `style:paper@orientation`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("landscape") => Orientation::Landscape,
            _ => Orientation::Portrait,
        }
    }
}

/// Resolved paper geometry, in 96 dpi pixels.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Paper {
    /// Printable width
    pub width: f64,
    /// Printable height
    pub height: f64,
    /// Width including margins
    pub total_width: f64,
    /// Height including margins
    pub total_height: f64,
    pub margin_left: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub orientation: Orientation,
    /// Continuous tape cut to the label length
    pub auto_length: bool,
    pub print_color_display: bool,
}

impl Paper {
    /// Read paper geometry from a label document.
    pub fn resolve(document: &Document) -> Result<Paper> {
        let paper = document
            .first("style:paper")
            .ok_or(LabelError::MissingPaperNode)?;
        let background = document
            .first("style:backGround")
            .ok_or(LabelError::MissingBackgroundNode)?;

        Ok(Paper {
            width: length(background, "width")?,
            height: length(background, "height")?,
            total_width: length(paper, "width")?,
            total_height: length(paper, "height")?,
            margin_left: length(paper, "marginLeft")?,
            margin_top: length(paper, "marginTop")?,
            margin_right: length(paper, "marginRight")?,
            margin_bottom: length(paper, "marginBottom")?,
            orientation: Orientation::from_attr(paper.attr("orientation")),
            auto_length: paper.attr("autoLength") == Some("true"),
            print_color_display: paper.attr("printColorDisplay") == Some("true"),
        })
    }

    /// Canonical stock name (`"62"`, `"29x90"`) used to pick the tape or die-cut
    /// label when printing.
    ///
    /// Portrait papers name their width first, landscape papers their height;
    /// auto-length papers name only that first dimension.
    pub fn name(&self) -> PaperName {
        let width = px_to_mm(self.total_width).round() as i64;
        let height = px_to_mm(self.total_height).round() as i64;
        let (across, along) = match self.orientation {
            Orientation::Portrait => (width, height),
            Orientation::Landscape => (height, width),
        };
        PaperName {
            width_mm: across,
            length_mm: (!self.auto_length).then_some(along),
        }
    }
}

/// A stock-size identifier in whole millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaperName {
    pub width_mm: i64,
    /// `None` for continuous (auto-length) tape.
    pub length_mm: Option<i64>,
}

impl fmt::Display for PaperName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.length_mm {
            Some(length) => write!(f, "{}x{}", self.width_mm, length),
            None => write!(f, "{}", self.width_mm),
        }
    }
}

/// Missing lengths read as zero; present but unparsable ones are errors.
fn length(el: &Element, attr: &str) -> Result<f64> {
    match el.attr(attr) {
        Some(value) => to_pixels(value),
        None => Ok(0.0),
    }
}
