//! Randomized strokes: the hand-drawn look.
//!
//! Every shape is drawn from perturbed cubic Beziers. Lines are drawn twice
//! with independent jitter, closed curves are traced twice at different
//! radial offsets with an overlapping seam. All randomness comes from the
//! `Rng` the context borrows, so a fixed seed reproduces a drawing exactly.
//!
//! ## Rust Lesson: Borrowing a context
//!
//! `RoughContext` holds `&RenderOptions` and `&mut Rng` instead of owning
//! them. Callers keep ownership and can reuse the generator afterwards; the
//! borrow checker guarantees nobody else touches the RNG mid-drawing.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::geometry::{EPSILON, Point, rectangle_points};
use crate::ops::Operation;
use crate::options::RenderOptions;
use crate::rng::Rng;

/// Drawing state for one generation call.
pub struct RoughContext<'a> {
    options: &'a RenderOptions,
    rng: &'a mut Rng,
}

impl<'a> RoughContext<'a> {
    /// `options` should already be sanitized.
    pub fn new(options: &'a RenderOptions, rng: &'a mut Rng) -> Self {
        Self { options, rng }
    }

    #[inline]
    pub fn options(&self) -> &'a RenderOptions {
        self.options
    }

    #[inline]
    pub fn rng(&mut self) -> &mut Rng {
        self.rng
    }

    #[inline]
    fn random(&mut self) -> f64 {
        self.rng.next_f64()
    }

    // ========================================================================
    // RANDOM OFFSETS
    // ========================================================================

    fn offset_in_range_with_gain(&mut self, min: f64, max: f64, gain: f64) -> f64 {
        self.options.roughness * gain * (self.random() * (max - min) + min)
    }

    fn offset_with_gain(&mut self, max: f64, gain: f64) -> f64 {
        self.offset_in_range_with_gain(-max, max, gain)
    }

    /// Uniform offset in `[-max, max)` scaled by roughness.
    #[inline]
    pub fn rand_offset(&mut self, max: f64) -> f64 {
        self.offset_with_gain(max, 1.0)
    }

    /// Uniform offset in `[min, max)` scaled by roughness.
    #[inline]
    pub fn rand_offset_in_range(&mut self, min: f64, max: f64) -> f64 {
        self.offset_in_range_with_gain(min, max, 1.0)
    }

    fn jitter(&mut self, p: Point, amount: f64) -> Point {
        let dx = self.rand_offset(amount);
        let dy = self.rand_offset(amount);
        Point::new(p.x + dx, p.y + dy)
    }

    fn jitter_with_gain(&mut self, p: Point, amount: f64, gain: f64) -> Point {
        let dx = self.offset_with_gain(amount, gain);
        let dy = self.offset_with_gain(amount, gain);
        Point::new(p.x + dx, p.y + dy)
    }

    // ========================================================================
    // LINES
    // ========================================================================

    /// One perturbed cubic from `a` to `b`, starting with a `Move`.
    ///
    /// The overlay pass uses half the wobble of the first pass.
    fn stroke_pass(&mut self, a: Point, b: Point, overlay: bool, ops: &mut Vec<Operation>) {
        let o = self.options;
        let length_sq = (b - a).dot(b - a);
        let length = length_sq.sqrt();

        // Long lines wobble less per unit of length
        let gain = if length < 200.0 {
            1.0
        } else if length > 500.0 {
            0.4
        } else {
            -0.0016668 * length + 1.233334
        };

        let mut offset = o.max_randomness_offset;
        if offset * offset * 100.0 > length_sq {
            offset = length / 10.0;
        }
        let wobble = if overlay { offset / 2.0 } else { offset };

        let diverge = 0.2 + self.random() * 0.2;
        let bow_x = o.bowing * o.max_randomness_offset * (b.y - a.y) / 200.0;
        let bow_y = o.bowing * o.max_randomness_offset * (a.x - b.x) / 200.0;
        let bow = Point::new(self.offset_with_gain(bow_x, gain), self.offset_with_gain(bow_y, gain));

        let start = if o.preserve_vertices { a } else { self.jitter_with_gain(a, wobble, gain) };
        ops.push(Operation::Move(start));

        let control1 = self.jitter_with_gain(bow + a + (b - a) * diverge, wobble, gain);
        let control2 = self.jitter_with_gain(bow + a + (b - a) * (2.0 * diverge), wobble, gain);
        let to = if o.preserve_vertices { b } else { self.jitter_with_gain(b, wobble, gain) };
        ops.push(Operation::CubicCurveTo { control1, control2, to });
    }

    fn double_line(&mut self, a: Point, b: Point, filling: bool) -> Vec<Operation> {
        if a.distance(b) < EPSILON || !a.is_finite() || !b.is_finite() {
            return Vec::new();
        }
        let single = if filling {
            self.options.disable_multi_stroke_fill
        } else {
            self.options.disable_multi_stroke
        };
        let mut ops = Vec::with_capacity(4);
        self.stroke_pass(a, b, false, &mut ops);
        if !single {
            self.stroke_pass(a, b, true, &mut ops);
        }
        ops
    }

    /// An outline stroke from `a` to `b`: two passes unless multi-stroke is disabled.
    pub fn line(&mut self, a: Point, b: Point) -> Vec<Operation> {
        self.double_line(a, b, false)
    }

    /// A fill stroke from `a` to `b`, drawn twice unless multi-stroke fill
    /// is disabled. Every pattern filler renders its segments with this.
    pub fn double_line_ops(&mut self, a: Point, b: Point) -> Vec<Operation> {
        self.double_line(a, b, true)
    }

    /// Rough strokes along consecutive points, closing back to the start
    /// when `closed` is set.
    pub fn linear_path(&mut self, points: &[Point], closed: bool) -> Vec<Operation> {
        match points.len() {
            0 | 1 => Vec::new(),
            2 => self.line(points[0], points[1]),
            n => {
                let mut ops = Vec::new();
                for w in points.windows(2) {
                    ops.extend(self.line(w[0], w[1]));
                }
                if closed {
                    ops.extend(self.line(points[n - 1], points[0]));
                }
                ops
            }
        }
    }

    pub fn polygon(&mut self, points: &[Point]) -> Vec<Operation> {
        self.linear_path(points, true)
    }

    pub fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) -> Vec<Operation> {
        self.polygon(&rectangle_points(x, y, width, height))
    }

    // ========================================================================
    // CURVES
    // ========================================================================

    /// Cubic Beziers through a Catmull-Rom point sequence.
    ///
    /// The first and last points act as the outer neighbours of the spline:
    /// the drawn curve runs from `points[1]` to `points[n - 2]`. Tension is
    /// `1 - curve_tightness`. Three points give a single cubic from the
    /// second to the third, two points give a fill stroke.
    pub fn bezier_from_points(&mut self, points: &[Point]) -> Vec<Operation> {
        let n = points.len();
        match n {
            0 | 1 => Vec::new(),
            2 => self.double_line_ops(points[0], points[1]),
            3 => vec![
                Operation::Move(points[1]),
                Operation::CubicCurveTo { control1: points[1], control2: points[2], to: points[2] },
            ],
            _ => {
                let s = 1.0 - self.options.curve_tightness;
                let mut ops = Vec::with_capacity(n - 2);
                ops.push(Operation::Move(points[1]));
                for i in 1..n - 2 {
                    let control1 = points[i] + (points[i + 1] - points[i - 1]) * (s / 6.0);
                    let control2 = points[i + 1] + (points[i] - points[i + 2]) * (s / 6.0);
                    ops.push(Operation::CubicCurveTo { control1, control2, to: points[i + 1] });
                }
                ops
            }
        }
    }

    fn curve_with_offset(&mut self, points: &[Point], offset: f64) -> Vec<Operation> {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Vec::new();
        };
        let mut ps = Vec::with_capacity(points.len() + 2);
        ps.push(self.jitter(*first, offset));
        for p in points {
            ps.push(self.jitter(*p, offset));
        }
        ps.push(self.jitter(*last, offset));
        self.bezier_from_points(&ps)
    }

    /// A smooth rough curve through `points`, traced twice.
    pub fn curve(&mut self, points: &[Point]) -> Vec<Operation> {
        if points.len() < 2 {
            return Vec::new();
        }
        let roughness = self.options.roughness;
        let mut ops = self.curve_with_offset(points, 1.0 + roughness * 0.2);
        if !self.options.disable_multi_stroke {
            ops.extend(self.curve_with_offset(points, 1.5 * (1.0 + roughness * 0.22)));
        }
        ops
    }

    // ========================================================================
    // CLOSED SHAPES
    // ========================================================================

    /// Points for one pass around a closed boundary.
    ///
    /// `boundary` maps an angle to a point on the outline. The pass starts
    /// at a random angle near the top, begins slightly inside the outline,
    /// and runs past the start by `overlap` so the seam is hidden.
    fn closed_pass(
        &mut self,
        center: Point,
        boundary: &dyn Fn(f64) -> Point,
        increment: f64,
        offset: f64,
        overlap: f64,
    ) -> Vec<Point> {
        let inset = |k: f64, angle: f64| center + (boundary(angle) - center) * k;
        let mut points = Vec::new();

        if self.options.roughness == 0.0 {
            let increment = increment / 4.0;
            let steps = (TAU / increment).floor() as usize;
            points.push(boundary(-increment));
            points.extend((0..=steps).map(|i| boundary(i as f64 * increment)));
            points.push(boundary(0.0));
            points.push(boundary(increment));
            return points;
        }

        let start = self.rand_offset(0.5) - FRAC_PI_2;
        let lead_in = inset(0.9, start - increment);
        points.push(self.jitter(lead_in, offset));

        let end = TAU + start - 0.01;
        let mut i = 0usize;
        loop {
            let angle = start + i as f64 * increment;
            if angle >= end {
                break;
            }
            let p = boundary(angle);
            points.push(self.jitter(p, offset));
            i += 1;
        }

        let seam = boundary(start + TAU + overlap * 0.5);
        points.push(self.jitter(seam, offset));
        let seam_in = inset(0.98, start + overlap);
        points.push(self.jitter(seam_in, offset));
        let tail = inset(0.9, start + overlap * 0.5);
        points.push(self.jitter(tail, offset));
        points
    }

    fn closed_shape(&mut self, center: Point, boundary: &dyn Fn(f64) -> Point, increment: f64) -> Vec<Operation> {
        if !(increment > 0.0) || !increment.is_finite() {
            return Vec::new();
        }
        let spread = self.rand_offset_in_range(0.4, 1.0);
        let overlap = increment * self.rand_offset_in_range(0.1, spread);

        let first = self.closed_pass(center, boundary, increment, 1.0, overlap);
        let mut ops = self.bezier_from_points(&first);
        if !self.options.disable_multi_stroke && self.options.roughness != 0.0 {
            let second = self.closed_pass(center, boundary, increment, 1.5, 0.0);
            ops.extend(self.bezier_from_points(&second));
        }
        ops
    }

    /// Angular step and randomly fitted radii for an ellipse.
    fn ellipse_params(&mut self, width: f64, height: f64) -> Option<(f64, f64, f64)> {
        let (half_w, half_h) = (width.abs() / 2.0, height.abs() / 2.0);
        if !(half_w > EPSILON && half_h > EPSILON) || !half_w.is_finite() || !half_h.is_finite() {
            return None;
        }
        let steps = self.options.curve_step_count;
        let psq = (TAU * ((half_w * half_w + half_h * half_h) / 2.0).sqrt()).sqrt();
        let step_count = steps.max(steps / 200f64.sqrt() * psq).ceil();
        let increment = TAU / step_count;

        let fit = 1.0 - self.options.curve_fitting;
        let rx = half_w + self.rand_offset(half_w * fit);
        let ry = half_h + self.rand_offset(half_h * fit);
        Some((increment, rx, ry))
    }

    /// Rough ellipse centred on `center`.
    pub fn ellipse(&mut self, center: Point, width: f64, height: f64) -> Vec<Operation> {
        self.egg(center, width, height, 0.0)
    }

    /// An ellipse whose x-radius shrinks by `1 - tilt * sin(angle)`, making
    /// one end blunter than the other. `tilt` is clamped to [-1, 1].
    pub fn egg(&mut self, center: Point, width: f64, height: f64, tilt: f64) -> Vec<Operation> {
        let Some((increment, rx, ry)) = self.ellipse_params(width, height) else {
            return Vec::new();
        };
        let tilt = if tilt.is_finite() { tilt.clamp(-1.0, 1.0) } else { 0.0 };
        let boundary = move |angle: f64| {
            let (sin, cos) = angle.sin_cos();
            Point::new(center.x + rx * (1.0 - tilt * sin) * cos, center.y + ry * sin)
        };
        self.closed_shape(center, &boundary, increment)
    }

    /// Rough rectangle with circular corners of `radius`.
    ///
    /// The outline is traced as one closed parametric curve, the same way
    /// ellipses are, so corners and edges share the seam treatment.
    pub fn rounded_rectangle(&mut self, x: f64, y: f64, width: f64, height: f64, radius: f64) -> Vec<Operation> {
        let (w, h) = (width.abs(), height.abs());
        if !(w > EPSILON && h > EPSILON) || !w.is_finite() || !h.is_finite() {
            return Vec::new();
        }
        let r = if radius.is_finite() { radius.clamp(0.0, w.min(h) / 2.0) } else { 0.0 };
        if r < 0.5 {
            return self.rectangle(x, y, w, h);
        }

        let outline = RoundedRectOutline { x, y, w, h, r };
        let perimeter = outline.perimeter();
        let min_steps = self.options.curve_step_count * 4.0;
        let step_count = (perimeter / (0.5 * r).max(1.0)).ceil().clamp(min_steps, 200f64.max(min_steps));
        let increment = TAU / step_count;
        let center = Point::new(x + w / 2.0, y + h / 2.0);
        let boundary = move |angle: f64| outline.point_at(angle / TAU);
        self.closed_shape(center, &boundary, increment)
    }

    // ========================================================================
    // ARCS
    // ========================================================================

    fn arc_pass(&mut self, center: Point, rx: f64, ry: f64, start: f64, stop: f64, increment: f64, offset: f64) -> Vec<Operation> {
        let on_ellipse = |angle: f64| Point::new(center.x + rx * angle.cos(), center.y + ry * angle.sin());
        let from = start + self.rand_offset(0.1);

        let mut points = Vec::new();
        let lead_in = Point::new(
            center.x + 0.9 * rx * (from - increment).cos(),
            center.y + 0.9 * ry * (from - increment).sin(),
        );
        points.push(self.jitter(lead_in, offset));
        let mut i = 0usize;
        loop {
            let angle = from + i as f64 * increment;
            if angle > stop {
                break;
            }
            let p = on_ellipse(angle);
            points.push(self.jitter(p, offset));
            i += 1;
        }
        points.push(on_ellipse(stop));
        points.push(on_ellipse(stop));
        self.bezier_from_points(&points)
    }

    /// Rough elliptical arc from `start` to `stop` radians.
    ///
    /// A closed arc is a pie slice: two rough strokes join the ends to the centre.
    pub fn arc(&mut self, center: Point, width: f64, height: f64, start: f64, stop: f64, closed: bool) -> Vec<Operation> {
        if !start.is_finite() || !stop.is_finite() {
            return Vec::new();
        }
        let (half_w, half_h) = (width.abs() / 2.0, height.abs() / 2.0);
        if !(half_w > EPSILON && half_h > EPSILON) {
            return Vec::new();
        }
        let rx = half_w + self.rand_offset(half_w * 0.01);
        let ry = half_h + self.rand_offset(half_h * 0.01);

        let mut from = start;
        let mut to = stop;
        if from < 0.0 {
            let turns = (-from / TAU).ceil();
            from += turns * TAU;
            to += turns * TAU;
        }
        if to - from > TAU {
            from = 0.0;
            to = TAU;
        }

        let ellipse_increment = TAU / self.options.curve_step_count;
        let increment = (ellipse_increment / 2.0).min((to - from) / 2.0);
        let mut ops = Vec::new();
        if increment > EPSILON {
            ops.extend(self.arc_pass(center, rx, ry, from, to, increment, 1.0));
            if !self.options.disable_multi_stroke {
                ops.extend(self.arc_pass(center, rx, ry, from, to, increment, 1.5));
            }
        }
        if closed {
            let from_point = Point::new(center.x + rx * from.cos(), center.y + ry * from.sin());
            let to_point = Point::new(center.x + rx * to.cos(), center.y + ry * to.sin());
            ops.extend(self.line(center, from_point));
            ops.extend(self.line(center, to_point));
        }
        ops
    }

    // ========================================================================
    // ARBITRARY PATHS
    // ========================================================================

    fn bezier_to(&mut self, current: Point, control1: Point, control2: Point, to: Point) -> Vec<Operation> {
        let o = self.options;
        let base = if o.max_randomness_offset > 0.0 { o.max_randomness_offset } else { 1.0 };
        let wobbles = [base, base + 0.3];
        let passes = if o.disable_multi_stroke { 1 } else { 2 };

        let mut ops = Vec::with_capacity(passes * 2);
        for wobble in wobbles.into_iter().take(passes) {
            let start = if ops.is_empty() || o.preserve_vertices {
                current
            } else {
                self.jitter(current, wobbles[0])
            };
            ops.push(Operation::Move(start));
            let end = if o.preserve_vertices { to } else { self.jitter(to, wobble) };
            let control1 = self.jitter(control1, wobble);
            let control2 = self.jitter(control2, wobble);
            ops.push(Operation::CubicCurveTo { control1, control2, to: end });
        }
        ops
    }

    /// Roughen an arbitrary path.
    ///
    /// Lines become double strokes; quadratics are raised to cubics and
    /// every cubic is drawn twice with jittered control points.
    pub fn path(&mut self, operations: &[Operation]) -> Vec<Operation> {
        let mut ops = Vec::new();
        let mut current = Point::default();
        for op in operations {
            match *op {
                Operation::Move(p) => current = p,
                Operation::LineTo(p) => {
                    ops.extend(self.line(current, p));
                    current = p;
                }
                Operation::QuadraticCurveTo { control, to } => {
                    let control1 = current + (control - current) * (2.0 / 3.0);
                    let control2 = to + (control - to) * (2.0 / 3.0);
                    ops.extend(self.bezier_to(current, control1, control2, to));
                    current = to;
                }
                Operation::CubicCurveTo { control1, control2, to } => {
                    ops.extend(self.bezier_to(current, control1, control2, to));
                    current = to;
                }
            }
        }
        ops
    }
}

/// Perimeter walk of a rounded rectangle, clockwise in screen space from
/// the end of the top-left corner.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RoundedRectOutline {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) w: f64,
    pub(crate) h: f64,
    pub(crate) r: f64,
}

impl RoundedRectOutline {
    /// `steps` points evenly spaced along the outline.
    pub(crate) fn points(&self, steps: usize) -> Vec<Point> {
        let steps = steps.max(4);
        (0..steps).map(|i| self.point_at(i as f64 / steps as f64)).collect()
    }

    fn perimeter(&self) -> f64 {
        2.0 * (self.w - 2.0 * self.r) + 2.0 * (self.h - 2.0 * self.r) + TAU * self.r
    }

    /// Point at fraction `u` of the perimeter (wrapping).
    fn point_at(&self, u: f64) -> Point {
        let RoundedRectOutline { x, y, w, h, r } = *self;
        let straight_w = w - 2.0 * r;
        let straight_h = h - 2.0 * r;
        let corner = FRAC_PI_2 * r;
        let mut d = u.rem_euclid(1.0) * self.perimeter();

        let corner_point = |cx: f64, cy: f64, from: f64, along: f64| {
            let angle = from + along / r;
            Point::new(cx + r * angle.cos(), cy + r * angle.sin())
        };

        // top edge, then each corner/edge pair clockwise
        if d <= straight_w {
            return Point::new(x + r + d, y);
        }
        d -= straight_w;
        if d <= corner {
            return corner_point(x + w - r, y + r, -FRAC_PI_2, d);
        }
        d -= corner;
        if d <= straight_h {
            return Point::new(x + w, y + r + d);
        }
        d -= straight_h;
        if d <= corner {
            return corner_point(x + w - r, y + h - r, 0.0, d);
        }
        d -= corner;
        if d <= straight_w {
            return Point::new(x + w - r - d, y + h);
        }
        d -= straight_w;
        if d <= corner {
            return corner_point(x + r, y + h - r, FRAC_PI_2, d);
        }
        d -= corner;
        if d <= straight_h {
            return Point::new(x, y + h - r - d);
        }
        d -= straight_h;
        corner_point(x + r, y + r, PI, d.min(corner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::all_points;

    fn smooth() -> RenderOptions {
        RenderOptions { roughness: 0.0, max_randomness_offset: 0.0, ..Default::default() }
    }

    #[test]
    fn zero_roughness_double_line_is_straight() {
        let options = smooth();
        let mut rng = Rng::new(1);
        let mut ctx = RoughContext::new(&options, &mut rng);
        let ops = ctx.double_line_ops(Point::new(0.0, 0.0), Point::new(100.0, 0.0));

        assert_eq!(ops.iter().filter(|op| op.is_move()).count(), 2);
        for p in all_points(&ops) {
            assert!(p.y.abs() < 1e-9, "point off the line: {p:?}");
            assert!((-1e-9..=100.0 + 1e-9).contains(&p.x));
        }
        // Both strokes coincide
        assert_eq!(ops[0], ops[2]);
        assert_eq!(ops[1].end_point(), ops[3].end_point());
    }

    #[test]
    fn two_point_bezier_is_a_fill_stroke() {
        let options = RenderOptions::default();
        let (a, b) = (Point::new(3.0, 4.0), Point::new(80.0, -20.0));

        let mut rng1 = Rng::new(99);
        let from_curve = RoughContext::new(&options, &mut rng1).bezier_from_points(&[a, b]);
        let mut rng2 = Rng::new(99);
        let from_line = RoughContext::new(&options, &mut rng2).double_line_ops(a, b);

        assert_eq!(from_curve, from_line);
        assert!(!from_curve.is_empty());
    }

    #[test]
    fn degenerate_input_draws_nothing() {
        let options = RenderOptions::default();
        let mut rng = Rng::new(3);
        let mut ctx = RoughContext::new(&options, &mut rng);
        let p = Point::new(5.0, 5.0);
        assert!(ctx.line(p, p).is_empty());
        assert!(ctx.bezier_from_points(&[p]).is_empty());
        assert!(ctx.curve(&[]).is_empty());
        assert!(ctx.linear_path(&[p], false).is_empty());
        assert!(ctx.ellipse(p, 0.0, 10.0).is_empty());
        assert!(ctx.rounded_rectangle(0.0, 0.0, 0.0, 0.0, 4.0).is_empty());
        assert!(ctx.arc(p, 10.0, 10.0, 1.0, 1.0, false).is_empty());
    }

    #[test]
    fn same_seed_same_drawing() {
        let options = RenderOptions::default();
        let draw = |seed| {
            let mut rng = Rng::new(seed);
            RoughContext::new(&options, &mut rng).rectangle(10.0, 10.0, 80.0, 40.0)
        };
        assert_eq!(draw(5), draw(5));
        assert_ne!(draw(5), draw(6));
    }

    #[test]
    fn rectangle_draws_each_edge_twice() {
        let options = RenderOptions::default();
        let mut rng = Rng::new(11);
        let ops = RoughContext::new(&options, &mut rng).rectangle(0.0, 0.0, 100.0, 50.0);
        assert_eq!(ops.iter().filter(|op| op.is_move()).count(), 8);

        let single = RenderOptions { disable_multi_stroke: true, ..Default::default() };
        let mut rng = Rng::new(11);
        let ops = RoughContext::new(&single, &mut rng).rectangle(0.0, 0.0, 100.0, 50.0);
        assert_eq!(ops.iter().filter(|op| op.is_move()).count(), 4);
    }

    #[test]
    fn smooth_ellipse_passes_through_the_outline() {
        let options = RenderOptions { curve_fitting: 1.0, ..smooth() };
        let mut rng = Rng::new(8);
        let ops = RoughContext::new(&options, &mut rng).ellipse(Point::new(50.0, 50.0), 80.0, 40.0);
        assert!(!ops.is_empty());
        // A single pass when roughness is zero
        assert_eq!(ops.iter().filter(|op| op.is_move()).count(), 1);
        for op in &ops {
            let p = op.end_point();
            let e = ((p.x - 50.0) / 40.0).powi(2) + ((p.y - 50.0) / 20.0).powi(2);
            assert!((e - 1.0).abs() < 1e-9, "{p:?} is off the ellipse");
        }
    }

    #[test]
    fn rough_ellipse_stays_near_the_outline() {
        let options = RenderOptions::default();
        let mut rng = Rng::new(21);
        let ops = RoughContext::new(&options, &mut rng).ellipse(Point::new(0.0, 0.0), 200.0, 100.0);
        assert_eq!(ops.iter().filter(|op| op.is_move()).count(), 2);
        for op in &ops {
            let p = op.end_point();
            assert!(p.x.abs() < 100.0 * 1.06 + 2.0);
            assert!(p.y.abs() < 50.0 * 1.06 + 2.0);
        }
    }

    #[test]
    fn egg_is_wider_at_the_top() {
        let options = RenderOptions { curve_fitting: 1.0, ..smooth() };
        let mut rng = Rng::new(2);
        let ops = RoughContext::new(&options, &mut rng).egg(Point::new(0.0, 0.0), 100.0, 140.0, 0.3);
        // Compare the same band of heights above and below the centre
        let widest = |upper: bool| {
            ops.iter()
                .map(|op| op.end_point())
                .filter(|p| (p.y < 0.0) == upper && (25.0..45.0).contains(&p.y.abs()))
                .map(|p| p.x.abs())
                .fold(0.0, f64::max)
        };
        assert!(widest(true) > widest(false) + 5.0);
    }

    #[test]
    fn smooth_rounded_rectangle_stays_in_bounds() {
        let options = smooth();
        let mut rng = Rng::new(4);
        let ops = RoughContext::new(&options, &mut rng).rounded_rectangle(10.0, 20.0, 100.0, 60.0, 12.0);
        assert!(!ops.is_empty());
        for op in &ops {
            let p = op.end_point();
            assert!((10.0 - 1e-6..=110.0 + 1e-6).contains(&p.x));
            assert!((20.0 - 1e-6..=80.0 + 1e-6).contains(&p.y));
        }
    }

    #[test]
    fn rounded_outline_walks_the_perimeter() {
        let outline = RoundedRectOutline { x: 0.0, y: 0.0, w: 100.0, h: 50.0, r: 10.0 };
        assert_eq!(outline.point_at(0.0), Point::new(10.0, 0.0));
        let back = outline.point_at(0.999_999);
        assert!(back.distance(Point::new(10.0, 0.0)) < 0.01);
    }

    #[test]
    fn closed_arc_adds_spokes() {
        let options = RenderOptions::default();
        let mut rng = Rng::new(17);
        let open = RoughContext::new(&options, &mut rng).arc(Point::new(0.0, 0.0), 100.0, 100.0, 0.0, PI, false);
        let mut rng = Rng::new(17);
        let closed = RoughContext::new(&options, &mut rng).arc(Point::new(0.0, 0.0), 100.0, 100.0, 0.0, PI, true);
        assert!(!open.is_empty());
        assert_eq!(
            closed.iter().filter(|op| op.is_move()).count(),
            open.iter().filter(|op| op.is_move()).count() + 4
        );
    }

    #[test]
    fn path_roughens_every_segment() {
        let options = RenderOptions::default();
        let mut rng = Rng::new(12);
        let input = vec![
            Operation::Move(Point::new(0.0, 0.0)),
            Operation::LineTo(Point::new(50.0, 0.0)),
            Operation::QuadraticCurveTo { control: Point::new(75.0, 25.0), to: Point::new(50.0, 50.0) },
            Operation::CubicCurveTo {
                control1: Point::new(30.0, 60.0),
                control2: Point::new(10.0, 40.0),
                to: Point::new(0.0, 0.0),
            },
        ];
        let ops = RoughContext::new(&options, &mut rng).path(&input);
        // Two passes for each of the three drawing segments
        assert_eq!(ops.iter().filter(|op| op.is_move()).count(), 6);
        assert!(ops.iter().all(|op| !matches!(op, Operation::QuadraticCurveTo { .. })));
    }

    #[test]
    fn curve_through_points() {
        let options = RenderOptions::default();
        let mut rng = Rng::new(30);
        let pts = [Point::new(0.0, 0.0), Point::new(30.0, 20.0), Point::new(60.0, 0.0), Point::new(90.0, 20.0)];
        let ops = RoughContext::new(&options, &mut rng).curve(&pts);
        assert_eq!(ops.iter().filter(|op| op.is_move()).count(), 2);
        assert_eq!(
            ops.iter().filter(|op| matches!(op, Operation::CubicCurveTo { .. })).count(),
            2 * (pts.len() - 1)
        );
    }
}
