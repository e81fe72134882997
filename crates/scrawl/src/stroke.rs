//! Stroke-to-fill: turn a centerline and a brush into a filled outline.
//!
//! The centerline is sampled adaptively (more samples on tighter curves),
//! each sample is pushed out to both sides by the brush width at that point,
//! and the two rails are joined by caps into one closed outline per subpath.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::brush::{BrushProfile, LineCap, LineJoin};
use crate::flatten::{PathSegment, path_segments};
use crate::geometry::{EPSILON, Point};
use crate::ops::{Operation, OperationSet};

/// Cubic control distance for a quarter circle of radius 1.
const KAPPA: f64 = 0.5523;

/// Miter length over half width beyond which a miter becomes a bevel.
pub const MITER_LIMIT: f64 = 4.0;

/// Direction change (radians) between segments that counts as a corner.
const CORNER_ANGLE: f64 = 0.01;

/// Largest arc step of a round join.
const ROUND_JOIN_STEP: f64 = PI / 8.0;

/// Adaptive sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Target distance between samples.
    pub spacing: f64,
    pub min_samples: usize,
    pub max_samples: usize,
    /// Extra samples per unit of curviness above 1.
    pub curviness_weight: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self { spacing: 4.0, min_samples: 4, max_samples: 64, curviness_weight: 20.0 }
    }
}

impl SamplingConfig {
    /// Number of pieces `segment` is cut into.
    ///
    /// Lines go by length alone; curves also get extra samples for how much
    /// they bend, within `min_samples..=max_samples`.
    pub fn pieces(&self, segment: &PathSegment) -> usize {
        let by_length = segment.length() / self.spacing.max(0.1);
        if segment.is_line() {
            return (by_length.ceil() as usize).max(1);
        }
        let max = self.max_samples.max(self.min_samples).max(1);
        let min = self.min_samples.clamp(1, max);
        let wanted = by_length + (segment.curviness() - 1.0) * self.curviness_weight;
        if !wanted.is_finite() {
            return min;
        }
        (wanted.ceil() as usize).clamp(min, max)
    }
}

/// A point on the centerline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeSample {
    pub position: Point,
    /// Unit direction of travel.
    pub direction: Point,
    /// Normalized arc length along the subpath, 0 to 1.
    pub t: f64,
}

impl StrokeSample {
    #[inline]
    pub fn angle(&self) -> f64 {
        self.direction.angle()
    }
}

/// Sample one subpath.
///
/// Where two segments meet at a corner the shared point is sampled twice,
/// once with each direction, so the outline can place a join there.
pub fn sample_path(segments: &[PathSegment], config: &SamplingConfig) -> Vec<StrokeSample> {
    let lengths: Vec<f64> = segments.iter().map(PathSegment::length).collect();
    let total: f64 = lengths.iter().sum();
    if !(total > EPSILON) {
        return Vec::new();
    }

    let mut samples: Vec<StrokeSample> = Vec::new();
    let mut travelled = 0.0;
    for (segment, &length) in segments.iter().zip(&lengths) {
        if length < EPSILON {
            continue;
        }
        let pieces = config.pieces(segment);
        let fallback = (segment.end() - segment.start()).normalized();
        for i in 0..=pieces {
            let u = i as f64 / pieces as f64;
            let Some(direction) = segment
                .tangent(u)
                .or(fallback)
                .or_else(|| samples.last().map(|s| s.direction))
            else {
                continue;
            };
            let sample = StrokeSample {
                position: segment.sample(u),
                direction,
                t: ((travelled + length * u) / total).clamp(0.0, 1.0),
            };
            if i == 0 {
                // Smooth continuation: the previous segment's end already covers this point
                if let Some(prev) = samples.last() {
                    let turn = prev.direction.cross(direction).atan2(prev.direction.dot(direction));
                    if turn.abs() < CORNER_ANGLE {
                        continue;
                    }
                }
            }
            samples.push(sample);
        }
        travelled += length;
    }
    samples
}

/// The two offset sides of a stroke, in travel order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rails {
    pub left: Vec<Point>,
    pub right: Vec<Point>,
}

/// Points after `a` that carry one side of the outline around a corner at
/// `center`, ending at `b`.
fn join_points(
    join: LineJoin,
    center: Point,
    a: Point,
    b: Point,
    incoming: Point,
    outgoing: Point,
    half: f64,
) -> Vec<Point> {
    match join {
        LineJoin::Bevel => vec![b],
        LineJoin::Miter => {
            let denom = incoming.cross(outgoing);
            if denom.abs() < EPSILON || half < EPSILON {
                return vec![b];
            }
            let s = (b - a).cross(outgoing) / denom;
            let tip = a + incoming * s;
            if tip.distance(center) / half > MITER_LIMIT {
                vec![b]
            } else {
                vec![tip, b]
            }
        }
        LineJoin::Round => {
            let (ra, rb) = (a.distance(center), b.distance(center));
            let start = (a - center).angle();
            let mut sweep = (b - center).angle() - start;
            if sweep > PI {
                sweep -= 2.0 * PI;
            } else if sweep <= -PI {
                sweep += 2.0 * PI;
            }
            let steps = ((sweep.abs() / ROUND_JOIN_STEP - 1e-9).ceil() as usize).max(1);
            let mut points: Vec<Point> = (1..steps)
                .map(|i| {
                    let f = i as f64 / steps as f64;
                    let r = ra + (rb - ra) * f;
                    center + Point::from_angle(start + sweep * f) * r
                })
                .collect();
            points.push(b);
            points
        }
    }
}

/// Offset rails for a sampled subpath, with joins on the outer side of corners.
pub fn rails(samples: &[StrokeSample], brush: &BrushProfile, base_width: f64) -> Rails {
    let mut rails = Rails {
        left: Vec::with_capacity(samples.len() + 8),
        right: Vec::with_capacity(samples.len() + 8),
    };
    let half_width = |s: &StrokeSample| brush.width_at(base_width, s.t, s.angle()) / 2.0;

    for (i, sample) in samples.iter().enumerate() {
        let half = half_width(sample);
        let normal = sample.direction.perpendicular();
        let left = sample.position + normal * half;
        let right = sample.position - normal * half;

        let corner = i > 0 && samples[i - 1].position.distance(sample.position) < EPSILON;
        if !corner {
            rails.left.push(left);
            rails.right.push(right);
            continue;
        }

        let prev = &samples[i - 1];
        let prev_half = half_width(prev);
        let prev_normal = prev.direction.perpendicular();
        let bend = sample.direction.dot(prev_normal);
        let (incoming, outgoing) = (prev.direction, sample.direction);
        let widest = half.max(prev_half);

        if bend < 0.0 {
            let a = prev.position + prev_normal * prev_half;
            rails.left.extend(join_points(brush.join, sample.position, a, left, incoming, outgoing, widest));
        } else {
            rails.left.push(left);
        }
        if bend > 0.0 {
            let a = prev.position - prev_normal * prev_half;
            rails.right.extend(join_points(brush.join, sample.position, a, right, incoming, outgoing, widest));
        } else {
            rails.right.push(right);
        }
    }
    rails
}

/// Cap from `from` to `to` around `center`, bulging towards `outward`.
fn cap_operations(cap: LineCap, center: Point, from: Point, to: Point, outward: Point) -> Vec<Operation> {
    let half = from.distance(center);
    if half < EPSILON {
        return vec![Operation::LineTo(to)];
    }
    let side = (from - center) * (1.0 / half);
    let out = outward * half;
    match cap {
        LineCap::Butt => vec![Operation::LineTo(to)],
        LineCap::Square => vec![
            Operation::LineTo(from + out),
            Operation::LineTo(to + out),
            Operation::LineTo(to),
        ],
        LineCap::Round => {
            let tip = center + out;
            let k = half * KAPPA;
            vec![
                Operation::CubicCurveTo { control1: from + outward * k, control2: tip + side * k, to: tip },
                Operation::CubicCurveTo { control1: tip - side * k, control2: to + outward * k, to },
            ]
        }
    }
}

/// Closed outline of one sampled subpath.
///
/// Left rail forward, end cap, right rail backward, start cap back to the
/// first point.
fn outline_operations(samples: &[StrokeSample], brush: &BrushProfile, base_width: f64) -> Vec<Operation> {
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return Vec::new();
    };
    let Rails { left, right } = rails(samples, brush, base_width);
    let (Some(&left_start), Some(&left_end)) = (left.first(), left.last()) else {
        return Vec::new();
    };
    let (Some(&right_start), Some(&right_end)) = (right.first(), right.last()) else {
        return Vec::new();
    };

    let mut ops = Vec::with_capacity(left.len() + right.len() + 8);
    ops.push(Operation::Move(left_start));
    ops.extend(left[1..].iter().map(|p| Operation::LineTo(*p)));
    ops.extend(cap_operations(brush.cap, last.position, left_end, right_end, last.direction));
    ops.extend(right.iter().rev().skip(1).map(|p| Operation::LineTo(*p)));
    ops.extend(cap_operations(brush.cap, first.position, right_start, left_start, -first.direction));
    ops
}

/// Convert a stroked path into a filled outline.
///
/// Every subpath with at least two samples contributes one closed outline
/// to a single `FillSolid` set. Returns `None` when nothing survives.
pub fn stroke_to_fill(
    operations: &[Operation],
    brush: &BrushProfile,
    base_width: f64,
    config: &SamplingConfig,
) -> Option<OperationSet> {
    if !(base_width > 0.0) || !base_width.is_finite() {
        trace!(base_width, "stroke width not positive");
        return None;
    }
    let brush = brush.sanitized();
    let mut ops = Vec::new();
    let mut outlines = 0;
    for segments in path_segments(operations, false) {
        let samples = sample_path(&segments, config);
        if samples.len() < 2 {
            trace!(samples = samples.len(), "skipping degenerate subpath");
            continue;
        }
        ops.extend(outline_operations(&samples, &brush, base_width));
        outlines += 1;
    }
    if ops.is_empty() {
        return None;
    }
    debug!(outlines, operations = ops.len(), "stroke converted to fill");
    Some(OperationSet::fill_solid(ops))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::{BrushTip, ThicknessProfile};
    use crate::ops::all_points;

    fn line(a: (f64, f64), b: (f64, f64)) -> Vec<PathSegment> {
        vec![PathSegment::Line { from: a.into(), to: b.into() }]
    }

    fn corner_ops() -> Vec<Operation> {
        vec![
            Operation::Move(Point::new(0.0, 0.0)),
            Operation::LineTo(Point::new(100.0, 0.0)),
            Operation::LineTo(Point::new(100.0, 100.0)),
        ]
    }

    fn contains(points: &[Point], target: Point) -> bool {
        points.iter().any(|p| p.distance(target) < 1e-6)
    }

    #[test]
    fn straight_line_has_constant_width() {
        let samples = sample_path(&line((0.0, 0.0), (100.0, 0.0)), &SamplingConfig::default());
        assert_eq!(samples.len(), 26);
        let rails = rails(&samples, &BrushProfile::round(), 8.0);
        assert_eq!(rails.left.len(), samples.len());
        for (l, r) in rails.left.iter().zip(&rails.right) {
            assert!((l.distance(*r) - 8.0).abs() < 1e-9);
        }
    }

    #[test]
    fn arc_length_runs_zero_to_one() {
        let samples = sample_path(&line((0.0, 0.0), (50.0, 0.0)), &SamplingConfig::default());
        assert_eq!(samples.first().map(|s| s.t), Some(0.0));
        assert_eq!(samples.last().map(|s| s.t), Some(1.0));
        assert!(samples.windows(2).all(|w| w[0].t < w[1].t));
    }

    #[test]
    fn curves_get_more_samples_when_they_bend() {
        let config = SamplingConfig::default();
        let flat = PathSegment::Cubic {
            from: Point::new(0.0, 0.0),
            control1: Point::new(30.0, 0.0),
            control2: Point::new(60.0, 0.0),
            to: Point::new(90.0, 0.0),
        };
        let bent = PathSegment::Cubic {
            from: Point::new(0.0, 0.0),
            control1: Point::new(0.0, 60.0),
            control2: Point::new(90.0, 60.0),
            to: Point::new(90.0, 0.0),
        };
        assert!(config.pieces(&bent) > config.pieces(&flat));
        assert!(config.pieces(&bent) <= config.max_samples);
        assert_eq!(config.pieces(&PathSegment::Line { from: Point::new(0.0, 0.0), to: Point::new(10.0, 0.0) }), 3);
    }

    #[test]
    fn taper_closes_the_ends() {
        let brush = BrushProfile::tapered();
        let samples = sample_path(&line((0.0, 0.0), (100.0, 0.0)), &SamplingConfig::default());
        let rails = rails(&samples, &brush, 8.0);
        assert!(rails.left[0].distance(rails.right[0]) < 1e-9);
        let mid = samples.len() / 2;
        assert!((rails.left[mid].distance(rails.right[mid]) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn flat_tip_changes_width_with_direction() {
        let brush = BrushProfile { tip: BrushTip::flat(0.25, 0.0), ..BrushProfile::default() };
        let config = SamplingConfig::default();
        let horizontal = rails(&sample_path(&line((0.0, 0.0), (40.0, 0.0)), &config), &brush, 8.0);
        let vertical = rails(&sample_path(&line((0.0, 0.0), (0.0, 40.0)), &config), &brush, 8.0);
        assert!((horizontal.left[1].distance(horizontal.right[1]) - 8.0).abs() < 1e-9);
        assert!((vertical.left[1].distance(vertical.right[1]) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn butt_outline_is_closed() {
        let brush = BrushProfile::round().with_cap(LineCap::Butt);
        let ops = vec![Operation::Move(Point::new(0.0, 0.0)), Operation::LineTo(Point::new(100.0, 0.0))];
        let set = stroke_to_fill(&ops, &brush, 8.0, &SamplingConfig::default()).unwrap();
        assert_eq!(set.kind, crate::ops::PathKind::FillSolid);
        assert_eq!(set.operations.len(), 53);
        assert_eq!(set.operations.first().map(Operation::end_point), set.operations.last().map(Operation::end_point));
    }

    #[test]
    fn round_cap_reaches_past_the_end() {
        let ops = vec![Operation::Move(Point::new(0.0, 0.0)), Operation::LineTo(Point::new(100.0, 0.0))];
        let set = stroke_to_fill(&ops, &BrushProfile::round(), 8.0, &SamplingConfig::default()).unwrap();
        let points = all_points(&set.operations);
        assert!(contains(&points, Point::new(104.0, 0.0)));
        assert!(contains(&points, Point::new(-4.0, 0.0)));
        let curves = set.operations.iter().filter(|op| matches!(op, Operation::CubicCurveTo { .. })).count();
        assert_eq!(curves, 4);
    }

    #[test]
    fn square_cap_extends_by_half_width() {
        let brush = BrushProfile::round().with_cap(LineCap::Square);
        let ops = vec![Operation::Move(Point::new(0.0, 0.0)), Operation::LineTo(Point::new(100.0, 0.0))];
        let set = stroke_to_fill(&ops, &brush, 8.0, &SamplingConfig::default()).unwrap();
        let points = all_points(&set.operations);
        assert!(contains(&points, Point::new(104.0, 4.0)));
        assert!(contains(&points, Point::new(104.0, -4.0)));
    }

    #[test]
    fn joins_shape_the_outer_corner() {
        let config = SamplingConfig::default();
        let outer_tip = Point::new(104.0, -4.0);

        let miter = BrushProfile::round().with_join(LineJoin::Miter);
        let set = stroke_to_fill(&corner_ops(), &miter, 8.0, &config).unwrap();
        assert!(contains(&all_points(&set.operations), outer_tip));

        let bevel = BrushProfile::round().with_join(LineJoin::Bevel);
        let set = stroke_to_fill(&corner_ops(), &bevel, 8.0, &config).unwrap();
        assert!(!contains(&all_points(&set.operations), outer_tip));

        let round = BrushProfile::round().with_join(LineJoin::Round);
        let set = stroke_to_fill(&corner_ops(), &round, 8.0, &config).unwrap();
        let diagonal = Point::new(100.0, 0.0) + Point::from_angle(-PI / 4.0) * 4.0;
        assert!(contains(&all_points(&set.operations), diagonal));
    }

    #[test]
    fn sharp_miter_falls_back_to_bevel() {
        let ops = vec![
            Operation::Move(Point::new(0.0, 0.0)),
            Operation::LineTo(Point::new(100.0, 0.0)),
            Operation::LineTo(Point::new(0.0, 5.0)),
        ];
        let brush = BrushProfile::round().with_join(LineJoin::Miter);
        let set = stroke_to_fill(&ops, &brush, 8.0, &SamplingConfig::default()).unwrap();
        let far = all_points(&set.operations).iter().map(|p| p.x).fold(f64::MIN, f64::max);
        assert!(far < 100.0 + 4.0 * MITER_LIMIT);
    }

    #[test]
    fn degenerate_input_gives_none() {
        let config = SamplingConfig::default();
        assert!(stroke_to_fill(&[], &BrushProfile::round(), 8.0, &config).is_none());
        let dot = vec![Operation::Move(Point::new(5.0, 5.0)), Operation::LineTo(Point::new(5.0, 5.0))];
        assert!(stroke_to_fill(&dot, &BrushProfile::round(), 8.0, &config).is_none());
        let ops = vec![Operation::Move(Point::new(0.0, 0.0)), Operation::LineTo(Point::new(10.0, 0.0))];
        assert!(stroke_to_fill(&ops, &BrushProfile::round(), 0.0, &config).is_none());
    }

    #[test]
    fn each_subpath_gets_an_outline() {
        let ops = vec![
            Operation::Move(Point::new(0.0, 0.0)),
            Operation::LineTo(Point::new(50.0, 0.0)),
            Operation::Move(Point::new(0.0, 20.0)),
            Operation::LineTo(Point::new(50.0, 20.0)),
        ];
        let brush = BrushProfile::round().with_thickness(ThicknessProfile::Uniform);
        let set = stroke_to_fill(&ops, &brush, 4.0, &SamplingConfig::default()).unwrap();
        let moves = set.operations.iter().filter(|op| op.is_move()).count();
        assert_eq!(moves, 2);
    }
}
