//! Deterministic per-frame jitter for animation.
//!
//! Unlike the rough strokes, nothing here draws from an `Rng`: the offset of
//! a point is a pure function of (seed, step, point index), so frame 3 is
//! the same frame 3 on every run and on every machine.

use serde::Serialize;

use crate::geometry::Point;
use crate::ops::{Operation, OperationSet};

/// 2^64 / φ, spreads consecutive step seeds across the whole u64 range.
const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

const MIX_X: u64 = 0xBF58_476D_1CE4_E5B9;
const MIX_Y: u64 = 0x94D0_49BB_1331_11EB;

/// Smallest coordinate magnitude used to scale the jitter.
const MIN_SCALE: f64 = 10.0;

/// Hash `seed` and `index` to a value in `[-1, 1)`.
#[inline]
fn unit_hash(seed: u64, index: u64, multiplier: u64) -> f64 {
    let mut h = (seed ^ index.wrapping_mul(GOLDEN_GAMMA)).wrapping_mul(multiplier);
    h ^= h >> 31;
    let unit = (h >> 11) as f64 / (1u64 << 53) as f64;
    unit * 2.0 - 1.0
}

/// A table of per-step seeds, built once per animation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathVariance {
    seeds: Vec<u64>,
    variance: f64,
}

impl PathVariance {
    /// `steps` frames (at least one) jittering by `variance`, a fraction of
    /// each point's coordinate magnitude.
    pub fn new(seed: u64, steps: usize, variance: f64) -> Self {
        let seeds = (0..steps.max(1) as u64)
            .map(|i| seed.wrapping_add(i.wrapping_mul(GOLDEN_GAMMA)))
            .collect();
        let variance = if variance.is_finite() { variance.abs() } else { 0.0 };
        Self { seeds, variance }
    }

    #[inline]
    pub fn steps(&self) -> usize {
        self.seeds.len()
    }

    #[inline]
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Jittered copy of `point`, the `index`th point of a path, at `step`.
    ///
    /// Steps wrap around, so an animation loops.
    pub fn apply(&self, step: usize, index: usize, point: Point) -> Point {
        let seed = self.seeds[step % self.seeds.len()];
        let scale = self.variance * point.x.abs().max(point.y.abs()).max(MIN_SCALE);
        let dx = unit_hash(seed, index as u64, MIX_X);
        let dy = unit_hash(seed, index as u64, MIX_Y);
        Point::new(point.x + dx * scale, point.y + dy * scale)
    }

    /// Jitter every point of a path; control points count as points.
    pub fn vary_operations(&self, step: usize, operations: &[Operation]) -> Vec<Operation> {
        let mut index = 0;
        operations
            .iter()
            .map(|op| {
                op.map_points(|p| {
                    let varied = self.apply(step, index, p);
                    index += 1;
                    varied
                })
            })
            .collect()
    }

    pub fn vary_set(&self, step: usize, set: &OperationSet) -> OperationSet {
        OperationSet {
            operations: self.vary_operations(step, &set.operations),
            ..set.clone()
        }
    }

    /// Every frame of the animation, precomputed.
    pub fn frames(&self, operations: &[Operation]) -> Vec<Vec<Operation>> {
        (0..self.steps()).map(|step| self.vary_operations(step, operations)).collect()
    }
}
