//! Path segments and curve flattening.
//!
//! Scribble ray casting, stroke sampling and pattern fills of arbitrary
//! paths all need the same view of an operation stream: a list of segments
//! per subpath that can be evaluated, measured and subdivided. Bezier math
//! is delegated to lyon_geom.

use lyon_geom::{CubicBezierSegment, QuadraticBezierSegment, point};

use crate::geometry::{EPSILON, Point};
use crate::ops::{Operation, split_subpaths};

/// Tolerance for adaptive flattening and arc length estimation.
pub const CURVE_TOLERANCE: f64 = 0.1;

/// Segment counts used when curves are subdivided for intersection tests.
pub const MIN_CURVE_SUBDIVISIONS: usize = 10;
pub const MAX_CURVE_SUBDIVISIONS: usize = 15;

/// Curviness reported for curves whose chord collapses to a point.
const MAX_CURVINESS: f64 = 8.0;

/// One drawable piece of a subpath, with its start point resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    Line { from: Point, to: Point },
    Quadratic { from: Point, control: Point, to: Point },
    Cubic { from: Point, control1: Point, control2: Point, to: Point },
}

#[inline]
fn lp(p: Point) -> lyon_geom::Point<f64> {
    point(p.x, p.y)
}

#[inline]
fn sp(p: lyon_geom::Point<f64>) -> Point {
    Point::new(p.x, p.y)
}

impl PathSegment {
    /// Build the segment an operation draws from `current`. `Move` draws nothing.
    pub fn from_operation(current: Point, op: &Operation) -> Option<PathSegment> {
        match *op {
            Operation::Move(_) => None,
            Operation::LineTo(to) => Some(PathSegment::Line { from: current, to }),
            Operation::QuadraticCurveTo { control, to } => {
                Some(PathSegment::Quadratic { from: current, control, to })
            }
            Operation::CubicCurveTo { control1, control2, to } => {
                Some(PathSegment::Cubic { from: current, control1, control2, to })
            }
        }
    }

    #[inline]
    pub fn start(&self) -> Point {
        match *self {
            PathSegment::Line { from, .. }
            | PathSegment::Quadratic { from, .. }
            | PathSegment::Cubic { from, .. } => from,
        }
    }

    #[inline]
    pub fn end(&self) -> Point {
        match *self {
            PathSegment::Line { to, .. }
            | PathSegment::Quadratic { to, .. }
            | PathSegment::Cubic { to, .. } => to,
        }
    }

    #[inline]
    pub fn is_line(&self) -> bool {
        matches!(self, PathSegment::Line { .. })
    }

    fn as_cubic(&self) -> Option<CubicBezierSegment<f64>> {
        match *self {
            PathSegment::Line { .. } => None,
            PathSegment::Quadratic { from, control, to } => Some(
                QuadraticBezierSegment { from: lp(from), ctrl: lp(control), to: lp(to) }.to_cubic(),
            ),
            PathSegment::Cubic { from, control1, control2, to } => Some(CubicBezierSegment {
                from: lp(from),
                ctrl1: lp(control1),
                ctrl2: lp(control2),
                to: lp(to),
            }),
        }
    }

    /// Position at parameter `t` in [0, 1].
    pub fn sample(&self, t: f64) -> Point {
        match *self {
            PathSegment::Line { from, to } => from.lerp(to, t),
            PathSegment::Quadratic { from, control, to } => {
                sp(QuadraticBezierSegment { from: lp(from), ctrl: lp(control), to: lp(to) }.sample(t))
            }
            PathSegment::Cubic { .. } => match self.as_cubic() {
                Some(cubic) => sp(cubic.sample(t)),
                None => self.start(),
            },
        }
    }

    /// First derivative at parameter `t`.
    pub fn derivative(&self, t: f64) -> Point {
        match *self {
            PathSegment::Line { from, to } => to - from,
            PathSegment::Quadratic { from, control, to } => {
                let d = QuadraticBezierSegment { from: lp(from), ctrl: lp(control), to: lp(to) }.derivative(t);
                Point::new(d.x, d.y)
            }
            PathSegment::Cubic { .. } => match self.as_cubic() {
                Some(cubic) => {
                    let d = cubic.derivative(t);
                    Point::new(d.x, d.y)
                }
                None => Point::default(),
            },
        }
    }

    /// Unit tangent at `t`.
    ///
    /// Curves can have a zero derivative where a control point coincides
    /// with an endpoint; the direction towards the next distinct point is
    /// used there, then the chord.
    pub fn tangent(&self, t: f64) -> Option<Point> {
        if let Some(dir) = self.derivative(t).normalized() {
            return Some(dir);
        }
        let probe = if t < 0.5 { (t + 1e-3).min(1.0) } else { (t - 1e-3).max(0.0) };
        let towards = if t < 0.5 {
            self.sample(probe) - self.sample(t)
        } else {
            self.sample(t) - self.sample(probe)
        };
        towards
            .normalized()
            .or_else(|| (self.end() - self.start()).normalized())
    }

    /// Arc length of the segment.
    pub fn length(&self) -> f64 {
        match self.as_cubic() {
            None => self.chord_length(),
            Some(cubic) => cubic.approximate_length(CURVE_TOLERANCE),
        }
    }

    #[inline]
    pub fn chord_length(&self) -> f64 {
        self.start().distance(self.end())
    }

    /// Length of the polygon through start, control points and end.
    pub fn control_polygon_length(&self) -> f64 {
        match *self {
            PathSegment::Line { from, to } => from.distance(to),
            PathSegment::Quadratic { from, control, to } => from.distance(control) + control.distance(to),
            PathSegment::Cubic { from, control1, control2, to } => {
                from.distance(control1) + control1.distance(control2) + control2.distance(to)
            }
        }
    }

    /// Control polygon length over chord length: 1 for a straight segment,
    /// larger the more the curve bends.
    pub fn curviness(&self) -> f64 {
        let chord = self.chord_length();
        let control = self.control_polygon_length();
        if chord < EPSILON {
            return if control < EPSILON { 1.0 } else { MAX_CURVINESS };
        }
        (control / chord).clamp(1.0, MAX_CURVINESS)
    }

    /// `n` evenly spaced points by parameter, excluding the start point.
    pub fn subdivide(&self, n: usize) -> Vec<Point> {
        if self.is_line() {
            return vec![self.end()];
        }
        let n = n.max(1);
        (1..=n).map(|i| self.sample(i as f64 / n as f64)).collect()
    }

    /// Subdivision used for boundary intersection tests: lines stay whole,
    /// curves get 10 to 15 pieces depending on their length.
    pub fn intersection_points(&self) -> Vec<Point> {
        let pieces = ((self.length() / 8.0).round() as usize)
            .clamp(MIN_CURVE_SUBDIVISIONS, MAX_CURVE_SUBDIVISIONS);
        self.subdivide(pieces)
    }

    /// Adaptive flattening within `tolerance`, excluding the start point.
    pub fn flatten(&self, tolerance: f64) -> Vec<Point> {
        let Some(cubic) = self.as_cubic() else {
            return vec![self.end()];
        };
        let mut points = Vec::new();
        cubic.for_each_flattened(tolerance, &mut |segment| {
            points.push(sp(segment.to));
        });
        points
    }
}

/// Segments of every subpath of `operations`.
///
/// Each subpath is closed with a final line back to its start when
/// `close` is set and the last point differs from the first.
pub fn path_segments(operations: &[Operation], close: bool) -> Vec<Vec<PathSegment>> {
    split_subpaths(operations)
        .into_iter()
        .filter_map(|sub| {
            let (first, rest) = sub.split_first()?;
            let start = first.end_point();
            let drawing = if first.is_move() { rest } else { sub };
            let mut current = start;
            let mut segments = Vec::with_capacity(drawing.len() + 1);
            for op in drawing {
                if let Some(segment) = PathSegment::from_operation(current, op) {
                    segments.push(segment);
                }
                current = op.end_point();
            }
            if close && current.distance(start) > EPSILON {
                segments.push(PathSegment::Line { from: current, to: start });
            }
            (!segments.is_empty()).then_some(segments)
        })
        .collect()
}

/// Flatten every subpath into a polyline using `flatten_segment`.
fn flatten_with(
    operations: &[Operation],
    close: bool,
    flatten_segment: impl Fn(&PathSegment) -> Vec<Point>,
) -> Vec<Vec<Point>> {
    path_segments(operations, close)
        .into_iter()
        .map(|segments| {
            let mut points = vec![segments[0].start()];
            for segment in &segments {
                points.extend(flatten_segment(segment));
            }
            points.dedup_by(|a, b| a.distance(*b) < 1e-6);
            points
        })
        .filter(|points| points.len() >= 2)
        .collect()
}

/// Closed rings for boundary intersection tests (curves in 10–15 pieces).
pub fn flatten_for_intersection(operations: &[Operation]) -> Vec<Vec<Point>> {
    flatten_with(operations, true, PathSegment::intersection_points)
}

/// Polylines within `tolerance` of the true path.
pub fn flatten_path(operations: &[Operation], tolerance: f64, close: bool) -> Vec<Vec<Point>> {
    flatten_with(operations, close, |segment| segment.flatten(tolerance))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quarter_circle() -> PathSegment {
        // Standard cubic approximation of a quarter circle of radius 100
        let k = 0.552_284_749_8 * 100.0;
        PathSegment::Cubic {
            from: Point::new(100.0, 0.0),
            control1: Point::new(100.0, k),
            control2: Point::new(k, 100.0),
            to: Point::new(0.0, 100.0),
        }
    }

    #[test]
    fn line_length_and_curviness() {
        let line = PathSegment::Line { from: Point::new(0.0, 0.0), to: Point::new(30.0, 40.0) };
        assert_eq!(line.length(), 50.0);
        assert_eq!(line.curviness(), 1.0);
    }

    #[test]
    fn quarter_circle_length() {
        let arc = quarter_circle();
        let expected = std::f64::consts::FRAC_PI_2 * 100.0;
        assert!((arc.length() - expected).abs() < 0.5, "got {}", arc.length());
        assert!(arc.curviness() > 1.0);
    }

    #[test]
    fn cubic_with_collapsed_control_has_tangent() {
        let seg = PathSegment::Cubic {
            from: Point::new(0.0, 0.0),
            control1: Point::new(0.0, 0.0),
            control2: Point::new(10.0, 0.0),
            to: Point::new(10.0, 0.0),
        };
        let t = seg.tangent(0.0).unwrap();
        assert!((t.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn intersection_subdivision_is_bounded() {
        let arc = quarter_circle();
        let pts = arc.intersection_points();
        assert!((MIN_CURVE_SUBDIVISIONS..=MAX_CURVE_SUBDIVISIONS).contains(&pts.len()));
        let line = PathSegment::Line { from: Point::new(0.0, 0.0), to: Point::new(1.0, 0.0) };
        assert_eq!(line.intersection_points().len(), 1);
    }

    #[test]
    fn subpaths_are_closed_on_request() {
        let ops = vec![
            Operation::Move(Point::new(0.0, 0.0)),
            Operation::LineTo(Point::new(10.0, 0.0)),
            Operation::LineTo(Point::new(10.0, 10.0)),
        ];
        let open = path_segments(&ops, false);
        let closed = path_segments(&ops, true);
        assert_eq!(open[0].len(), 2);
        assert_eq!(closed[0].len(), 3);
    }

    #[test]
    fn lone_move_has_no_segments() {
        let ops = vec![Operation::Move(Point::new(1.0, 1.0))];
        assert!(path_segments(&ops, true).is_empty());
        assert!(flatten_for_intersection(&ops).is_empty());
    }

    #[test]
    fn adaptive_flattening_follows_curve() {
        let ops = vec![
            Operation::Move(Point::new(100.0, 0.0)),
            match quarter_circle() {
                PathSegment::Cubic { control1, control2, to, .. } => {
                    Operation::CubicCurveTo { control1, control2, to }
                }
                _ => unreachable!(),
            },
        ];
        let rings = flatten_path(&ops, 0.1, false);
        assert_eq!(rings.len(), 1);
        assert!(rings[0].len() > 5);
        for p in &rings[0] {
            assert!((p.length() - 100.0).abs() < 0.5);
        }
    }
}
