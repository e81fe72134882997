//! Fill patterns.
//!
//! Each [`FillStyle`] has one stateless filler implementing
//! [`FillGenerator`]. Most of them start from the same hachure scan lines
//! and differ only in how each [`FillLine`] is drawn.
//!
//! ## Rust Lesson: Trait objects with a static registry
//!
//! Fillers carry no data, so a `&'static dyn FillGenerator` pointing at a
//! unit struct is free: no allocation, no lazy initialisation, and the
//! `match` in [`filler_for`] is checked for exhaustiveness by the compiler.

mod dashed;
mod dots;
mod hachure;
mod solid;
mod starburst;
mod zigzag;
mod zigzag_line;

pub use dashed::Dashed;
pub use dots::Dots;
pub use hachure::{CrossHatch, Hachure, HachureIterator, ScanLine, ellipse_hachure_lines, hachure_lines};
pub use solid::Solid;
pub use starburst::Burst;
pub use zigzag::Zigzag;
pub use zigzag_line::ZigzagLine;

use tracing::trace;

use crate::geometry::{FillLine, Point, ellipse_points};
use crate::ops::OperationSet;
use crate::options::FillStyle;
use crate::rough::RoughContext;
use crate::scribble::ScribbleFill;

/// Fills the interior of a shape.
///
/// Returning `None` means there is nothing to draw.
pub trait FillGenerator: Send + Sync {
    /// Fill a simple polygon. Fewer than three points yields `None`.
    fn fill_polygon(&self, points: &[Point], ctx: &mut RoughContext<'_>) -> Option<OperationSet>;

    /// Fill several rings as one shape (even-odd).
    ///
    /// The default fills each ring on its own and merges the results.
    fn fill_rings(&self, rings: &[Vec<Point>], ctx: &mut RoughContext<'_>) -> Option<OperationSet> {
        let sets: Vec<OperationSet> = rings
            .iter()
            .filter_map(|ring| self.fill_polygon(ring, ctx))
            .collect();
        merge_sets(sets)
    }

    /// Fill an ellipse of the given width and height.
    ///
    /// The default approximates the ellipse with a polygon.
    fn fill_ellipse(&self, center: Point, width: f64, height: f64, ctx: &mut RoughContext<'_>) -> Option<OperationSet> {
        let (rx, ry) = (width.abs() / 2.0, height.abs() / 2.0);
        let points = ellipse_points(center, rx, ry, outline_steps(rx.max(ry) * std::f64::consts::TAU));
        self.fill_polygon(&points, ctx)
    }

    /// Fill a pie slice from `start` to `stop` radians.
    ///
    /// The default builds a fan of the centre and points along the arc.
    fn fill_arc(
        &self,
        center: Point,
        width: f64,
        height: f64,
        start: f64,
        stop: f64,
        ctx: &mut RoughContext<'_>,
    ) -> Option<OperationSet> {
        let points = arc_fan(center, width, height, start, stop)?;
        self.fill_polygon(&points, ctx)
    }
}

/// The filler for `style`.
pub fn filler_for(style: FillStyle) -> &'static dyn FillGenerator {
    match style {
        FillStyle::Hachure => &Hachure,
        FillStyle::Solid => &Solid,
        FillStyle::Zigzag => &Zigzag,
        FillStyle::CrossHatch => &CrossHatch,
        FillStyle::Dots => &Dots,
        FillStyle::Dashed => &Dashed,
        FillStyle::ZigzagLine => &ZigzagLine,
        FillStyle::SunBurst => &Burst { star: false },
        FillStyle::StarBurst => &Burst { star: true },
        FillStyle::Scribble => &ScribbleFill,
    }
}

/// Number of polygon points used to approximate a curved outline.
fn outline_steps(length: f64) -> usize {
    if !length.is_finite() {
        return 16;
    }
    ((length / 4.0).ceil() as usize).clamp(16, 256)
}

/// Centre followed by points along the arc, or `None` for a degenerate arc.
pub fn arc_fan(center: Point, width: f64, height: f64, start: f64, stop: f64) -> Option<Vec<Point>> {
    let (rx, ry) = (width.abs() / 2.0, height.abs() / 2.0);
    let span = (stop - start).clamp(-std::f64::consts::TAU, std::f64::consts::TAU);
    if !span.is_finite() || span.abs() < 1e-6 || rx <= 0.0 || ry <= 0.0 {
        return None;
    }
    let steps = outline_steps(span.abs() * rx.max(ry)).max(4);
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    points.extend((0..=steps).map(|i| {
        let angle = start + span * i as f64 / steps as f64;
        Point::new(center.x + rx * angle.cos(), center.y + ry * angle.sin())
    }));
    Some(points)
}

/// Rings with at least three points.
pub(crate) fn usable_rings(rings: &[Vec<Point>]) -> Vec<&[Point]> {
    rings
        .iter()
        .filter(|ring| ring.len() >= 3)
        .map(|ring| ring.as_slice())
        .collect()
}

/// Draw each line as a rough fill stroke.
pub(crate) fn render_lines(lines: &[FillLine], ctx: &mut RoughContext<'_>) -> Option<OperationSet> {
    let mut ops = Vec::with_capacity(lines.len() * 4);
    for line in lines {
        ops.extend(ctx.double_line_ops(line.start, line.end));
    }
    sketch(ops)
}

/// Wrap non-empty operations in a `FillSketch` set.
pub(crate) fn sketch(ops: Vec<crate::ops::Operation>) -> Option<OperationSet> {
    if ops.is_empty() {
        trace!("fill produced no operations");
        None
    } else {
        Some(OperationSet::fill_sketch(ops))
    }
}

/// Concatenate sets of the same kind into one.
pub(crate) fn merge_sets(sets: Vec<OperationSet>) -> Option<OperationSet> {
    let mut iter = sets.into_iter();
    let mut merged = iter.next()?;
    for set in iter {
        merged.operations.extend(set.operations);
    }
    Some(merged)
}
