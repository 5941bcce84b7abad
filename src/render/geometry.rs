//! Vector paths for stroked shapes

use crate::types::{DVec2, Rect, dvec2};

/// One path segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(DVec2),
    LineTo(DVec2),
    /// Quadratic curve: control point, end point
    QuadTo(DVec2, DVec2),
    Close,
}

/// A path in the coordinate space of whoever strokes it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.commands.push(PathCommand::MoveTo(dvec2(x, y)));
        self
    }

    /// Line to `(x, y)`; on an empty path this starts a subpath instead.
    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        let p = dvec2(x, y);
        if self.commands.is_empty() {
            self.commands.push(PathCommand::MoveTo(p));
        } else {
            self.commands.push(PathCommand::LineTo(p));
        }
        self
    }

    pub fn quad_to(mut self, cx: f64, cy: f64, x: f64, y: f64) -> Self {
        self.commands
            .push(PathCommand::QuadTo(dvec2(cx, cy), dvec2(x, y)));
        self
    }

    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::Close);
        self
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Bounds of every point on the path, control points included.
    pub fn bounds(&self) -> Option<Rect> {
        let mut points = self.commands.iter().flat_map(|cmd| match *cmd {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => [Some(p), None],
            PathCommand::QuadTo(c, p) => [Some(c), Some(p)],
            PathCommand::Close => [None, None],
        });
        let first = points.find_map(|p| p)?;
        let (min, max) = points
            .flatten()
            .fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Rect::from_corners(min, max))
    }
}

/// Rectangle outline with quadratic corners of `radius`.
///
/// Four edges and four corner curves, closed. A zero radius degenerates to
/// sharp corners.
pub fn rounded_rect(rect: Rect, radius: f64) -> Path {
    let Rect {
        x,
        y,
        width,
        height,
    } = rect;
    let r = radius;
    Path::new()
        .move_to(x + r, y)
        .line_to(x + width - r, y)
        .quad_to(x + width, y, x + width, y + r)
        .line_to(x + width, y + height - r)
        .quad_to(x + width, y + height, x + width - r, y + height)
        .line_to(x + r, y + height)
        .quad_to(x, y + height, x, y + height - r)
        .line_to(x, y + r)
        .quad_to(x, y, x + r, y)
        .close()
}

/// Open polyline through `points`.
pub fn polyline(points: &[DVec2]) -> Path {
    points
        .iter()
        .fold(Path::new(), |path, p| path.line_to(p.x, p.y))
}
