//! Hachure scan lines, the base of every line-based fill.
//!
//! A scan line is kept in line-equation form `ax + by + c = 0` with
//! `(a, b)` the unit normal. Near-vertical and near-horizontal angles get
//! exact axis-aligned lines instead of a normal computed from an unstable
//! angle.

use crate::geometry::{EPSILON, FillLine, Point, bounding_box, ellipse_points};
use crate::ops::OperationSet;
use crate::options::{MIN_FILL_GAP, RenderOptions};
use crate::rough::RoughContext;

use super::{FillGenerator, render_lines, usable_rings};

/// One infinite scan line, `a*x + b*y + c = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanLine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl ScanLine {
    /// Signed distance of `p` from the line.
    #[inline]
    pub fn side(&self, p: Point) -> f64 {
        self.a * p.x + self.b * p.y + self.c
    }

    /// Unit direction along the line.
    #[inline]
    pub fn direction(&self) -> Point {
        Point::new(-self.b, self.a)
    }
}

#[derive(Debug, Clone, Copy)]
enum ScanMode {
    /// `x = pos`
    Vertical,
    /// `y = pos`
    Horizontal,
    /// `cos * x + sin * y = pos`
    Angled { cos: f64, sin: f64 },
}

/// Walks parallel scan lines across a bounding box.
///
/// The first line sits one gap in from the near edge; lines continue while
/// they are strictly inside the far edge. With a spacing pattern the gap
/// changes between equal sections of the range.
#[derive(Debug, Clone)]
pub struct HachureIterator {
    mode: ScanMode,
    pos: f64,
    start: f64,
    end: f64,
    gap: f64,
    pattern: Vec<f64>,
}

impl HachureIterator {
    /// Scan lines over `(min_x, min_y, max_x, max_y)` at `angle_degrees`.
    ///
    /// Angle 0 gives vertical lines, 90 horizontal ones.
    pub fn new(bounds: (f64, f64, f64, f64), angle_degrees: f64, gap: f64, pattern: Option<&[f64]>) -> Self {
        let (min_x, min_y, max_x, max_y) = bounds;
        let gap = if gap.is_finite() { gap.max(MIN_FILL_GAP) } else { MIN_FILL_GAP };
        let angle = (angle_degrees % 180.0).to_radians();
        let (sin, cos) = angle.sin_cos();

        let (mode, start, end) = if sin.abs() < 1e-4 {
            (ScanMode::Vertical, min_x, max_x)
        } else if sin.abs() > 0.9999 {
            (ScanMode::Horizontal, min_y, max_y)
        } else {
            let corners = [
                Point::new(min_x, min_y),
                Point::new(max_x, min_y),
                Point::new(max_x, max_y),
                Point::new(min_x, max_y),
            ];
            let projected = corners.map(|p| cos * p.x + sin * p.y);
            let lo = projected.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = projected.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (ScanMode::Angled { cos, sin }, lo, hi)
        };

        let pattern: Vec<f64> = pattern
            .unwrap_or_default()
            .iter()
            .copied()
            .filter(|m| m.is_finite() && *m > 0.0)
            .collect();

        let mut it = Self { mode, pos: start, start, end, gap, pattern };
        it.pos = start + it.gap_at(start);
        it
    }

    /// Gap to the next line after `pos`.
    fn gap_at(&self, pos: f64) -> f64 {
        if self.pattern.is_empty() || self.end <= self.start {
            return self.gap;
        }
        let sections = self.pattern.len();
        let frac = (pos - self.start) / (self.end - self.start);
        let index = ((frac * sections as f64).floor().max(0.0) as usize).min(sections - 1);
        (self.gap * self.pattern[index]).max(MIN_FILL_GAP)
    }
}

impl Iterator for HachureIterator {
    type Item = ScanLine;

    fn next(&mut self) -> Option<ScanLine> {
        if !(self.pos < self.end) {
            return None;
        }
        let pos = self.pos;
        self.pos += self.gap_at(pos);
        Some(match self.mode {
            ScanMode::Vertical => ScanLine { a: 1.0, b: 0.0, c: -pos },
            ScanMode::Horizontal => ScanLine { a: 0.0, b: 1.0, c: -pos },
            ScanMode::Angled { cos, sin } => ScanLine { a: cos, b: sin, c: -pos },
        })
    }
}

/// Fill segments where scan lines cross the interior of `rings`.
///
/// Crossings use the half-open rule (an edge counts when its endpoints lie
/// on strictly different sides, with "on the line" grouped with one side),
/// so a vertex exactly on a scan line is counted once. Crossings are sorted
/// along the line and paired even/odd, which also handles holes.
pub fn hachure_lines(rings: &[Vec<Point>], angle_degrees: f64, gap: f64, pattern: Option<&[f64]>) -> Vec<FillLine> {
    let rings = usable_rings(rings);
    let all: Vec<Point> = rings.iter().flat_map(|r| r.iter().copied()).collect();
    let Some(bounds) = bounding_box(&all) else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    let mut hits: Vec<(f64, Point)> = Vec::new();
    for scan in HachureIterator::new(bounds, angle_degrees, gap, pattern) {
        hits.clear();
        let dir = scan.direction();
        for ring in &rings {
            let n = ring.len();
            for i in 0..n {
                let p = ring[i];
                let q = ring[(i + 1) % n];
                let dp = scan.side(p);
                let dq = scan.side(q);
                if (dp > 0.0) != (dq > 0.0) {
                    let t = dp / (dp - dq);
                    let hit = p + (q - p) * t;
                    hits.push((hit.dot(dir), hit));
                }
            }
        }
        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        for pair in hits.chunks_exact(2) {
            let line = FillLine::new(pair[0].1, pair[1].1);
            if line.length() > EPSILON {
                lines.push(line);
            }
        }
    }
    lines
}

/// Scan lines with the gap and spacing pattern configured in `options`.
pub(crate) fn option_lines(rings: &[Vec<Point>], options: &RenderOptions, angle_degrees: f64, gap: f64) -> Vec<FillLine> {
    hachure_lines(rings, angle_degrees, gap, options.fill_spacing_pattern.as_deref())
}

/// Hachure segments for an ellipse without building a polygon.
///
/// The ellipse is treated as an affine image of a circle of radius `rx`:
/// vertical chords are laid across the circle at an adjusted gap, then
/// mapped through a shear/scale to the target angle. The gap adjustment is
/// a heuristic; density drifts from `gap` on very elongated ellipses.
/// Returns `None` when the angle is too close to horizontal for the
/// construction, in which case callers fill the polygon instead.
pub fn ellipse_hachure_lines(
    center: Point,
    width: f64,
    height: f64,
    angle_degrees: f64,
    gap: f64,
    ctx: &mut RoughContext<'_>,
) -> Option<Vec<FillLine>> {
    // Negated so the chords run the same way as polygon scan lines
    let angle = -(angle_degrees % 180.0).to_radians();
    if angle.cos().abs() < 1e-4 {
        return None;
    }
    let (half_w, half_h) = (width.abs() / 2.0, height.abs() / 2.0);
    if !(half_w > EPSILON && half_h > EPSILON) {
        return Some(Vec::new());
    }
    let rx = half_w + ctx.rand_offset(half_w * 0.05);
    let ry = half_h + ctx.rand_offset(half_h * 0.05);
    let (cx, cy) = (center.x, center.y);

    let tan = angle.tan();
    let aspect = ry / rx;
    let hyp = ((aspect * tan).powi(2) + 1.0).sqrt();
    let sin_p = aspect * tan / hyp;
    let cos_p = 1.0 / hyp;
    let gap_p = gap / ((rx * ry / ((ry * cos_p).powi(2) + (rx * sin_p).powi(2)).sqrt()) / rx);
    if !(gap_p > EPSILON) || !gap_p.is_finite() {
        return Some(Vec::new());
    }

    let affine = |x: f64, y: f64| {
        let a = -cx * cos_p - cy * sin_p + cx;
        let b = aspect * (cx * sin_p - cy * cos_p) + cy;
        Point::new(
            a + cos_p * x + sin_p * y,
            b - aspect * sin_p * x + aspect * cos_p * y,
        )
    };

    let mut lines = Vec::new();
    let mut x = cx - rx + gap_p;
    while x < cx + rx {
        let half = (rx * rx - (cx - x).powi(2)).max(0.0).sqrt();
        let line = FillLine::new(affine(x, cy - half), affine(x, cy + half));
        if line.length() > EPSILON {
            lines.push(line);
        }
        x += gap_p;
    }
    Some(lines)
}

/// Scan lines for an ellipse, falling back to a polygon when the affine
/// construction does not apply.
fn ellipse_lines(center: Point, width: f64, height: f64, angle: f64, ctx: &mut RoughContext<'_>) -> Vec<FillLine> {
    let options = ctx.options();
    let gap = options.fill_gap();
    if options.fill_spacing_pattern.is_none() {
        if let Some(lines) = ellipse_hachure_lines(center, width, height, angle, gap, ctx) {
            return lines;
        }
    }
    let steps = ((width.abs().max(height.abs()) * std::f64::consts::PI / 4.0).ceil() as usize).clamp(16, 256);
    let ring = ellipse_points(center, width.abs() / 2.0, height.abs() / 2.0, steps);
    option_lines(&[ring], options, angle, gap)
}

/// Parallel rough lines at the fill angle.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hachure;

impl FillGenerator for Hachure {
    fn fill_polygon(&self, points: &[Point], ctx: &mut RoughContext<'_>) -> Option<OperationSet> {
        if points.len() < 3 {
            return None;
        }
        self.fill_rings(&[points.to_vec()], ctx)
    }

    fn fill_rings(&self, rings: &[Vec<Point>], ctx: &mut RoughContext<'_>) -> Option<OperationSet> {
        let options = ctx.options();
        let lines = option_lines(rings, options, options.fill_angle, options.fill_gap());
        render_lines(&lines, ctx)
    }

    fn fill_ellipse(&self, center: Point, width: f64, height: f64, ctx: &mut RoughContext<'_>) -> Option<OperationSet> {
        let angle = ctx.options().fill_angle;
        let lines = ellipse_lines(center, width, height, angle, ctx);
        render_lines(&lines, ctx)
    }
}

/// Hachure at the fill angle plus a second pass at 90 degrees to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossHatch;

impl FillGenerator for CrossHatch {
    fn fill_polygon(&self, points: &[Point], ctx: &mut RoughContext<'_>) -> Option<OperationSet> {
        if points.len() < 3 {
            return None;
        }
        self.fill_rings(&[points.to_vec()], ctx)
    }

    fn fill_rings(&self, rings: &[Vec<Point>], ctx: &mut RoughContext<'_>) -> Option<OperationSet> {
        let options = ctx.options();
        let gap = options.fill_gap();
        let mut lines = option_lines(rings, options, options.fill_angle, gap);
        lines.extend(option_lines(rings, options, options.fill_angle + 90.0, gap));
        render_lines(&lines, ctx)
    }

    fn fill_ellipse(&self, center: Point, width: f64, height: f64, ctx: &mut RoughContext<'_>) -> Option<OperationSet> {
        let angle = ctx.options().fill_angle;
        let mut lines = ellipse_lines(center, width, height, angle, ctx);
        lines.extend(ellipse_lines(center, width, height, angle + 90.0, ctx));
        render_lines(&lines, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rectangle_points;
    use crate::rng::Rng;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Vec<Point> {
        rectangle_points(x, y, w, h).to_vec()
    }

    #[test]
    fn rectangle_line_count_at_zero_degrees() {
        let lines = hachure_lines(&[rect(0.0, 0.0, 100.0, 50.0)], 0.0, 10.0, None);
        let expected = (100.0f64 / 10.0).ceil() as i64 - 1;
        assert!((lines.len() as i64 - expected).abs() <= 1, "got {} lines", lines.len());
        for line in &lines {
            assert!((line.start.x - line.end.x).abs() < 1e-9, "not vertical");
            assert!((line.length() - 50.0).abs() < 1e-9);
        }
    }

    #[test]
    fn horizontal_lines_at_ninety_degrees() {
        let lines = hachure_lines(&[rect(0.0, 0.0, 100.0, 50.0)], 90.0, 10.0, None);
        assert_eq!(lines.len(), 4);
        for line in &lines {
            assert!((line.start.y - line.end.y).abs() < 1e-9);
            assert!((line.length() - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn angled_lines_stay_inside() {
        let square = rect(0.0, 0.0, 100.0, 100.0);
        let lines = hachure_lines(&[square], -41.0, 5.0, None);
        assert!(lines.len() > 20);
        for line in &lines {
            for p in [line.start, line.end] {
                assert!((-1e-6..=100.0 + 1e-6).contains(&p.x));
                assert!((-1e-6..=100.0 + 1e-6).contains(&p.y));
            }
        }
    }

    #[test]
    fn holes_are_skipped() {
        let outer = rect(0.0, 0.0, 100.0, 100.0);
        let hole = rect(30.0, 30.0, 40.0, 40.0);
        let lines = hachure_lines(&[outer, hole], 90.0, 10.0, None);
        // Rows through the hole split in two
        let split_rows = lines.iter().filter(|l| l.length() < 50.0).count();
        assert!(split_rows >= 6, "only {split_rows} short segments");
        for line in &lines {
            let mid = line.start.midpoint(line.end);
            assert!(!(mid.x > 30.0 && mid.x < 70.0 && mid.y > 30.0 && mid.y < 70.0));
        }
    }

    #[test]
    fn concave_shape_gives_disjoint_segments() {
        // A "U": scan lines across the arms cross four edges
        let u = vec![
            Point::new(0.0, 0.0),
            Point::new(30.0, 0.0),
            Point::new(30.0, 70.0),
            Point::new(70.0, 70.0),
            Point::new(70.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ];
        let lines = hachure_lines(&[u], 90.0, 10.0, None);
        let row_40: Vec<_> = lines.iter().filter(|l| (l.start.y - 40.0).abs() < 1e-9).collect();
        assert_eq!(row_40.len(), 2);
    }

    #[test]
    fn spacing_pattern_changes_density() {
        let square = rect(0.0, 0.0, 100.0, 100.0);
        let uniform = hachure_lines(std::slice::from_ref(&square), 0.0, 4.0, None);
        let sparse_half = hachure_lines(&[square], 0.0, 4.0, Some(&[1.0, 3.0]));
        assert!(sparse_half.len() < uniform.len());
        let left = sparse_half.iter().filter(|l| l.start.x < 50.0).count();
        let right = sparse_half.len() - left;
        assert!(left > right * 2);
    }

    #[test]
    fn iterator_guards_tiny_gaps() {
        // A zero gap is raised to the minimum instead of looping forever
        let count = HachureIterator::new((0.0, 0.0, 1.0, 1.0), 0.0, 0.0, None).count();
        assert!((9..=10).contains(&count), "got {count}");
    }

    #[test]
    fn ellipse_heuristic_stays_inside() {
        let options = RenderOptions { roughness: 0.0, ..Default::default() };
        let mut rng = Rng::new(1);
        let mut ctx = RoughContext::new(&options, &mut rng);
        let lines = ellipse_hachure_lines(Point::new(0.0, 0.0), 200.0, 80.0, -41.0, 5.0, &mut ctx).unwrap();
        assert!(!lines.is_empty());
        for line in &lines {
            for p in [line.start, line.end] {
                let e = (p.x / 100.0).powi(2) + (p.y / 40.0).powi(2);
                assert!(e < 1.0 + 1e-6, "{p:?} outside the ellipse");
            }
        }
    }

    #[test]
    fn ellipse_heuristic_declines_horizontal_angle() {
        let options = RenderOptions::default();
        let mut rng = Rng::new(1);
        let mut ctx = RoughContext::new(&options, &mut rng);
        assert!(ellipse_hachure_lines(Point::new(0.0, 0.0), 100.0, 50.0, 90.0, 5.0, &mut ctx).is_none());
        // The filler still fills through the polygon path
        let options = RenderOptions::default().with_fill_angle(90.0);
        let mut rng = Rng::new(1);
        let mut ctx = RoughContext::new(&options, &mut rng);
        assert!(Hachure.fill_ellipse(Point::new(0.0, 0.0), 100.0, 50.0, &mut ctx).is_some());
    }

    #[test]
    fn cross_hatch_draws_both_directions() {
        let options = RenderOptions::default().with_fill_gap(10.0).with_fill_angle(0.0);
        let square = rect(0.0, 0.0, 100.0, 100.0);
        let mut rng = Rng::new(4);
        let mut ctx = RoughContext::new(&options, &mut rng);
        let hatch = Hachure.fill_polygon(&square, &mut ctx).unwrap();
        let mut rng = Rng::new(4);
        let mut ctx = RoughContext::new(&options, &mut rng);
        let cross = CrossHatch.fill_polygon(&square, &mut ctx).unwrap();
        assert_eq!(cross.operations.len(), hatch.operations.len() * 2);
    }
}
