//! Zigzag fill: hachure lines joined end to end.

use crate::clip::point_in_polygon;
use crate::geometry::{FillLine, Point};
use crate::ops::OperationSet;
use crate::rough::RoughContext;

use super::hachure::option_lines;
use super::{FillGenerator, sketch, usable_rings};

#[derive(Debug, Clone, Copy, Default)]
pub struct Zigzag;

/// Even-odd containment over several rings.
fn inside(p: Point, rings: &[&[Point]]) -> bool {
    rings.iter().filter(|ring| point_in_polygon(p, ring)).count() % 2 == 1
}

impl FillGenerator for Zigzag {
    fn fill_polygon(&self, points: &[Point], ctx: &mut RoughContext<'_>) -> Option<OperationSet> {
        if points.len() < 3 {
            return None;
        }
        self.fill_rings(&[points.to_vec()], ctx)
    }

    fn fill_rings(&self, rings: &[Vec<Point>], ctx: &mut RoughContext<'_>) -> Option<OperationSet> {
        let options = ctx.options();
        let lines = option_lines(rings, options, options.fill_angle, options.fill_gap());
        let shape = usable_rings(rings);

        let mut ops = Vec::with_capacity(lines.len() * 8);
        let mut previous: Option<FillLine> = None;
        for (i, line) in lines.iter().enumerate() {
            // Alternate direction so each connector runs back across the shape
            let line = if i % 2 == 0 { *line } else { FillLine::new(line.end, line.start) };
            ops.extend(ctx.double_line_ops(line.start, line.end));
            if let Some(prev) = previous {
                // Connectors usually run along the boundary, so probe a point
                // pulled towards the two lines; outside means a concavity
                let centre = prev.start.midpoint(prev.end).midpoint(line.start.midpoint(line.end));
                let probe = prev.end.midpoint(line.start).midpoint(centre);
                if inside(probe, &shape) {
                    ops.extend(ctx.double_line_ops(prev.end, line.start));
                }
            }
            previous = Some(line);
        }
        sketch(ops)
    }
}
