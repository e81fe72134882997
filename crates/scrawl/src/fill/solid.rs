//! Solid fill: the exact outline, for the renderer to fill.

use crate::geometry::Point;
use crate::ops::{OperationSet, polygon_operations};
use crate::rough::RoughContext;

use super::{FillGenerator, usable_rings};

#[derive(Debug, Clone, Copy, Default)]
pub struct Solid;

impl FillGenerator for Solid {
    fn fill_polygon(&self, points: &[Point], _ctx: &mut RoughContext<'_>) -> Option<OperationSet> {
        if points.len() < 3 {
            return None;
        }
        Some(OperationSet::fill_solid(polygon_operations(points)))
    }

    fn fill_rings(&self, rings: &[Vec<Point>], _ctx: &mut RoughContext<'_>) -> Option<OperationSet> {
        let ops: Vec<_> = usable_rings(rings)
            .into_iter()
            .flat_map(polygon_operations)
            .collect();
        (!ops.is_empty()).then(|| OperationSet::fill_solid(ops))
    }
}
