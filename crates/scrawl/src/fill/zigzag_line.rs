//! Zigzag-line fill: every hachure line drawn as a row of zigzags.

use std::f64::consts::FRAC_PI_4;

use crate::geometry::{FillLine, Point};
use crate::ops::OperationSet;
use crate::rough::RoughContext;

use super::hachure::option_lines;
use super::{FillGenerator, sketch};

#[derive(Debug, Clone, Copy, Default)]
pub struct ZigzagLine;

/// Replace each line with teeth of width `2 * offset`.
///
/// Each tooth rises at 45 degrees to a peak `offset * sqrt(2)` away and
/// comes back down to the line.
pub(crate) fn zigzag_teeth(lines: &[FillLine], offset: f64) -> Vec<FillLine> {
    let mut teeth = Vec::new();
    if !(offset > 0.0) {
        return teeth;
    }
    let rise = (2.0 * offset * offset).sqrt();
    for line in lines {
        let line = line.left_to_right();
        let Some(dir) = line.direction() else {
            continue;
        };
        let count = (line.length() / (2.0 * offset)).round() as usize;
        let peak_dir = dir.rotate_around(Point::default(), FRAC_PI_4);
        for i in 0..count {
            let start = line.start + dir * (i as f64 * 2.0 * offset);
            let end = line.start + dir * ((i + 1) as f64 * 2.0 * offset);
            let peak = start + peak_dir * rise;
            teeth.push(FillLine::new(start, peak));
            teeth.push(FillLine::new(peak, end));
        }
    }
    teeth
}

impl FillGenerator for ZigzagLine {
    fn fill_polygon(&self, points: &[Point], ctx: &mut RoughContext<'_>) -> Option<OperationSet> {
        if points.len() < 3 {
            return None;
        }
        self.fill_rings(&[points.to_vec()], ctx)
    }

    fn fill_rings(&self, rings: &[Vec<Point>], ctx: &mut RoughContext<'_>) -> Option<OperationSet> {
        let options = ctx.options();
        let gap = options.fill_gap();
        let offset = options.zigzag_offset_or_gap();
        // Rows are spaced so neighbouring teeth do not touch
        let lines = option_lines(rings, options, options.fill_angle, gap + offset);

        let mut ops = Vec::new();
        for tooth in zigzag_teeth(&lines, offset) {
            ops.extend(ctx.double_line_ops(tooth.start, tooth.end));
        }
        sketch(ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teeth_span_the_line() {
        let line = FillLine::new(Point::new(0.0, 0.0), Point::new(40.0, 0.0));
        let teeth = zigzag_teeth(&[line], 5.0);
        assert_eq!(teeth.len(), 8);
        let first_peak = teeth[0].end;
        assert!((first_peak.x - 5.0).abs() < 1e-9);
        assert!((first_peak.y - 5.0).abs() < 1e-9);
        assert!((teeth[7].end.x - 40.0).abs() < 1e-9);
    }

    #[test]
    fn vertical_lines_do_not_break() {
        let line = FillLine::new(Point::new(0.0, 30.0), Point::new(0.0, 0.0));
        let teeth = zigzag_teeth(&[line], 5.0);
        assert_eq!(teeth.len(), 6);
        assert!(teeth.iter().all(|t| t.start.is_finite() && t.end.is_finite()));
    }
}
