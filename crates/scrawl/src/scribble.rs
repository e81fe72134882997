//! Scribble fill: a continuous zigzag stroke across a shape.
//!
//! Rays are cast across the shape at evenly spaced positions along the
//! traversal axis (perpendicular to the scribble direction). Each ray's
//! inside intervals give the zigzag its turning points, alternating between
//! the far and near edge. Concave shapes split into several strokes: when
//! the inside of the shape forks (the legs of a star), each branch gets its
//! own stroke instead of one line jumping across empty space.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::flatten::flatten_for_intersection;
use crate::geometry::{EPSILON, Point};
use crate::ops::{Operation, OperationSet, polygon_operations};
use crate::options::{MAX_SCRIBBLE_CURVATURE, RenderOptions};
use crate::rough::RoughContext;
use crate::fill::FillGenerator;

/// How far vertices stay inside the boundary.
pub const EDGE_PADDING: f64 = 3.0;

/// Fraction of a span the edge padding may take.
const MAX_PADDING_FRACTION: f64 = 0.35;

/// Extra distance, in scan spacings, a step may cover before it counts as a jump.
const JUMP_SPACINGS: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScribbleParams {
    /// Direction of the strokes, in degrees.
    pub origin_angle: f64,
    /// Number of vertices across the shape.
    pub tightness: usize,
    /// Per-section vertex counts; the traversal is split into equal sections.
    pub tightness_pattern: Option<Vec<usize>>,
    /// Corner rounding, 0 (sharp) to 0.5.
    pub curvature: f64,
}

impl Default for ScribbleParams {
    fn default() -> Self {
        Self { origin_angle: 0.0, tightness: 10, tightness_pattern: None, curvature: 0.0 }
    }
}

impl ScribbleParams {
    pub fn from_options(options: &RenderOptions) -> Self {
        Self {
            origin_angle: options.scribble_origin,
            tightness: options.scribble_tightness,
            tightness_pattern: options.scribble_tightness_pattern.clone(),
            curvature: options.scribble_curvature,
        }
    }

    /// Scan positions along the traversal axis, each with its local spacing.
    ///
    /// Curvature lowers the density so rounded corners have room.
    fn positions(&self, lo: f64, hi: f64) -> Vec<(f64, f64)> {
        let extent = hi - lo;
        let density = 1.0 / (1.0 + self.curvature.clamp(0.0, MAX_SCRIBBLE_CURVATURE));
        let count = |n: usize| ((n as f64 * density).round() as usize).max(1);

        match self.tightness_pattern.as_deref() {
            Some(pattern) if !pattern.is_empty() => {
                let section = extent / pattern.len() as f64;
                let mut positions = Vec::new();
                for (j, n) in pattern.iter().enumerate() {
                    let n = count(*n);
                    let spacing = section / n as f64;
                    let start = lo + j as f64 * section;
                    positions.extend((0..n).map(|i| (start + spacing * (i as f64 + 0.5), spacing)));
                }
                positions
            }
            _ => {
                let n = count(self.tightness).max(2);
                let spacing = extent / n as f64;
                (0..n).map(|i| (lo + spacing * (i as f64 + 0.5), spacing)).collect()
            }
        }
    }
}

/// One stroke being built.
struct Stroke {
    vertices: Vec<Point>,
    /// Inside interval, along the ray direction, of the last vertex.
    interval: (f64, f64),
    next_far: bool,
}

/// Inside intervals of the line `axis . p = pos`, as parameters along `dir`.
///
/// Crossings use the half-open rule and are paired even/odd, so holes and
/// separate parts of the shape produce separate intervals.
fn ray_intervals(rings: &[Vec<Point>], dir: Point, axis: Point, pos: f64) -> Vec<(f64, f64)> {
    let mut hits = Vec::new();
    for ring in rings {
        let n = ring.len();
        for i in 0..n {
            let p = ring[i];
            let q = ring[(i + 1) % n];
            let sp = axis.dot(p) - pos;
            let sq = axis.dot(q) - pos;
            if (sp > 0.0) != (sq > 0.0) {
                let hit = p + (q - p) * (sp / (sp - sq));
                hits.push(hit.dot(dir));
            }
        }
    }
    hits.sort_by(f64::total_cmp);
    hits.chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .filter(|(a, b)| b - a > EPSILON)
        .collect()
}

#[inline]
fn overlaps(a: (f64, f64), b: (f64, f64)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

/// Turning point inside `interval`, near its far or near end.
fn vertex(axis: Point, dir: Point, pos: f64, interval: (f64, f64), far: bool) -> Point {
    let width = interval.1 - interval.0;
    let inset = EDGE_PADDING.min(MAX_PADDING_FRACTION * width);
    let along = if far { interval.1 - inset } else { interval.0 + inset };
    axis * pos + dir * along
}

/// Straight or corner-rounded operations through `vertices`.
fn stroke_operations(vertices: &[Point], curvature: f64) -> Vec<Operation> {
    let mut ops = Vec::with_capacity(vertices.len() * 2);
    let Some((first, _)) = vertices.split_first() else {
        return ops;
    };
    ops.push(Operation::Move(*first));
    let c = curvature.clamp(0.0, MAX_SCRIBBLE_CURVATURE);
    let n = vertices.len();
    for i in 1..n {
        let v = vertices[i];
        if c > 0.0 && i + 1 < n {
            let entry = v + (vertices[i - 1] - v) * c;
            let exit = v + (vertices[i + 1] - v) * c;
            ops.push(Operation::LineTo(entry));
            ops.push(Operation::QuadraticCurveTo { control: v, to: exit });
        } else {
            ops.push(Operation::LineTo(v));
        }
    }
    ops
}

/// Scribble-fill the closed path `operations`.
///
/// Returns one `FillSketch` set per stroke; strokes with fewer than two
/// vertices are dropped.
pub fn scribble(operations: &[Operation], params: &ScribbleParams) -> Vec<OperationSet> {
    let rings = flatten_for_intersection(operations);
    if rings.is_empty() {
        return Vec::new();
    }

    let origin = params.origin_angle.to_radians();
    let dir = Point::from_angle(origin);
    let axis = Point::from_angle(origin + std::f64::consts::FRAC_PI_2);

    let projected = rings.iter().flatten().map(|p| axis.dot(*p));
    let (lo, hi) = projected.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !(hi - lo > EPSILON) {
        return Vec::new();
    }

    let mut active: Vec<Stroke> = Vec::new();
    let mut finished: Vec<Vec<Point>> = Vec::new();

    for (pos, spacing) in params.positions(lo, hi) {
        let intervals = ray_intervals(&rings, dir, axis, pos);
        let mut slots: Vec<Option<Stroke>> = active.drain(..).map(Some).collect();
        let mut next = Vec::with_capacity(intervals.len());

        for interval in intervals {
            // The first unclaimed stroke that reaches this interval continues
            // into it; a fork leaves later intervals to new strokes
            let claimed = slots
                .iter()
                .position(|slot| slot.as_ref().is_some_and(|s| overlaps(s.interval, interval)))
                .and_then(|k| slots[k].take());

            let Some(mut stroke) = claimed else {
                next.push(Stroke {
                    vertices: vec![vertex(axis, dir, pos, interval, false)],
                    interval,
                    next_far: true,
                });
                continue;
            };

            let v = vertex(axis, dir, pos, interval, stroke.next_far);
            let union = interval.1.max(stroke.interval.1) - interval.0.min(stroke.interval.0);
            let jumped = stroke
                .vertices
                .last()
                .is_some_and(|prev| prev.distance(v) > union + JUMP_SPACINGS * spacing);
            if jumped {
                finished.push(std::mem::take(&mut stroke.vertices));
                stroke.vertices.push(vertex(axis, dir, pos, interval, false));
                stroke.next_far = true;
            } else {
                stroke.vertices.push(v);
                stroke.next_far = !stroke.next_far;
            }
            stroke.interval = interval;
            next.push(stroke);
        }

        finished.extend(slots.into_iter().flatten().map(|s| s.vertices));
        active = next;
    }
    finished.extend(active.into_iter().map(|s| s.vertices));

    let sets: Vec<OperationSet> = finished
        .into_iter()
        .filter(|vertices| vertices.len() >= 2)
        .map(|vertices| OperationSet::fill_sketch(stroke_operations(&vertices, params.curvature)))
        .collect();
    debug!(strokes = sets.len(), "scribble fill");
    sets
}

/// [`FillGenerator`] adapter: all strokes merged into one set.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScribbleFill;

impl FillGenerator for ScribbleFill {
    fn fill_polygon(&self, points: &[Point], ctx: &mut RoughContext<'_>) -> Option<OperationSet> {
        if points.len() < 3 {
            return None;
        }
        self.fill_rings(&[points.to_vec()], ctx)
    }

    fn fill_rings(&self, rings: &[Vec<Point>], ctx: &mut RoughContext<'_>) -> Option<OperationSet> {
        let ops: Vec<Operation> = rings
            .iter()
            .filter(|ring| ring.len() >= 3)
            .flat_map(|ring| polygon_operations(ring))
            .collect();
        let params = ScribbleParams::from_options(ctx.options());
        crate::fill::merge_sets(scribble(&ops, &params))
    }
}
