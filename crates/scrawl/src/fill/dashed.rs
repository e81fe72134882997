//! Dashed fill: hachure lines broken into evenly spaced dashes.

use crate::geometry::{FillLine, Point};
use crate::ops::OperationSet;
use crate::rough::RoughContext;

use super::hachure::option_lines;
use super::{FillGenerator, sketch};

#[derive(Debug, Clone, Copy, Default)]
pub struct Dashed;

/// Cut each line into dashes of `dash` separated by `gap`.
///
/// Only whole dashes are drawn; the leftover length is split between both
/// ends so the dashes sit centred on the line.
pub(crate) fn dashes(lines: &[FillLine], dash: f64, gap: f64) -> Vec<FillLine> {
    let period = dash + gap;
    let mut out = Vec::new();
    if !(dash > 0.0) || !(period > 0.0) {
        return out;
    }
    for line in lines {
        let line = line.left_to_right();
        let Some(dir) = line.direction() else {
            continue;
        };
        let length = line.length();
        let count = (length / period).floor() as usize;
        let lead = (length + gap - count as f64 * period) / 2.0;
        for i in 0..count {
            let from = lead + i as f64 * period;
            out.push(FillLine::new(line.start + dir * from, line.start + dir * (from + dash)));
        }
    }
    out
}

impl FillGenerator for Dashed {
    fn fill_polygon(&self, points: &[Point], ctx: &mut RoughContext<'_>) -> Option<OperationSet> {
        if points.len() < 3 {
            return None;
        }
        self.fill_rings(&[points.to_vec()], ctx)
    }

    fn fill_rings(&self, rings: &[Vec<Point>], ctx: &mut RoughContext<'_>) -> Option<OperationSet> {
        let options = ctx.options();
        let lines = option_lines(rings, options, options.fill_angle, options.fill_gap());
        let mut ops = Vec::new();
        for dash in dashes(&lines, options.dash_offset_or_gap(), options.dash_gap_or_gap()) {
            ops.extend(ctx.double_line_ops(dash.start, dash.end));
        }
        sketch(ops)
    }
}
