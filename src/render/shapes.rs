//! Rectangles and polylines

use crate::dom::Element;
use crate::errors::{LabelError, Result};
use crate::types::{DVec2, dvec2};
use crate::units::to_pixels;

use super::context::RenderContext;
use super::geometry::{polyline, rounded_rect};
use super::objects::Draw;
use super::style::{ObjectStyle, length, required};

/// `draw:rect`: an outlined rectangle, optionally with rounded corners.
#[derive(Debug, Clone, PartialEq)]
pub struct RectObject {
    pub style: ObjectStyle,
    /// `RECT`, `ROUNDRECT`, ...; empty when the file has no rect style
    pub shape: String,
    pub roundness_x: f64,
    pub roundness_y: f64,
}

impl RectObject {
    pub fn read(el: &Element) -> Result<RectObject> {
        let (shape, roundness_x, roundness_y) = match el.first("draw:rectStyle") {
            Some(rect) => (
                rect.attr("shape").unwrap_or_default().to_string(),
                length(rect, "roundnessX")?,
                length(rect, "roundnessY")?,
            ),
            None => (String::new(), 0.0, 0.0),
        };
        Ok(RectObject {
            style: ObjectStyle::read(el)?,
            shape,
            roundness_x,
            roundness_y,
        })
    }

    /// Corner radius. Corners are symmetric: half the horizontal roundness.
    pub fn radius(&self) -> f64 {
        self.roundness_x / 2.0
    }
}

impl Draw for RectObject {
    fn draw(&self, cx: &mut RenderContext<'_>) -> Result<()> {
        cx.surface.set_line_width(cx.options.shape_line_width);
        cx.surface
            .stroke_path(&rounded_rect(self.style.bounds, self.radius()));
        Ok(())
    }
}

/// `draw:poly`: an open polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyObject {
    pub style: ObjectStyle,
    pub points: Vec<DVec2>,
}

impl PolyObject {
    pub fn read(el: &Element) -> Result<PolyObject> {
        let line = required(el, "draw:polyLinePoints")?;
        let points = line
            .attr("points")
            .ok_or_else(|| LabelError::missing_attr(line.name(), "points"))?;
        Ok(PolyObject {
            style: ObjectStyle::read(el)?,
            points: parse_points(points)?,
        })
    }
}

/// Space-separated `x,y` pairs of lengths.
fn parse_points(points: &str) -> Result<Vec<DVec2>> {
    points
        .split_whitespace()
        .map(|pair| {
            let (x, y) = pair.split_once(',').ok_or_else(|| LabelError::MalformedLength {
                value: pair.to_string(),
            })?;
            Ok(dvec2(to_pixels(x)?, to_pixels(y)?))
        })
        .collect()
}

impl Draw for PolyObject {
    fn draw(&self, cx: &mut RenderContext<'_>) -> Result<()> {
        cx.surface.set_line_width(cx.options.shape_line_width);
        cx.surface.stroke_path(&polyline(&self.points));
        Ok(())
    }
}
