//! The drawing-operation vocabulary every component produces.
//!
//! An ordered `Vec<Operation>` is a path: each `Move` starts a new subpath and
//! the following operations continue it. An [`OperationSet`] tags a path with
//! how the consumer should render it.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Size, bounding_box};

/// One drawing command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Move(Point),
    LineTo(Point),
    QuadraticCurveTo { control: Point, to: Point },
    CubicCurveTo { control1: Point, control2: Point, to: Point },
}

/// How the consumer renders an [`OperationSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathKind {
    /// Stroke the path with the shape's stroke width.
    Outline,
    /// Stroke the path with the fill weight (hachure lines, dots, scribbles).
    FillSketch,
    /// Fill the path exactly.
    FillSolid,
    /// Fill the exact original path, `raw_path` carries its source markup.
    RawFillPath,
    /// Stroke a fill pattern that belongs to the raw path in `raw_path`.
    RawFillPattern,
}

/// An ordered operation stream plus its rendering classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationSet {
    pub kind: PathKind,
    pub operations: Vec<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint_size: Option<Size>,
}

impl Operation {
    /// The point the pen ends at after this operation.
    #[inline]
    pub fn end_point(&self) -> Point {
        match *self {
            Operation::Move(p) | Operation::LineTo(p) => p,
            Operation::QuadraticCurveTo { to, .. } => to,
            Operation::CubicCurveTo { to, .. } => to,
        }
    }

    /// Every point referenced by the operation, control points first.
    pub fn points(&self) -> Vec<Point> {
        match *self {
            Operation::Move(p) | Operation::LineTo(p) => vec![p],
            Operation::QuadraticCurveTo { control, to } => vec![control, to],
            Operation::CubicCurveTo { control1, control2, to } => vec![control1, control2, to],
        }
    }

    /// Apply `f` to every point of the operation, keeping its shape.
    pub fn map_points(&self, mut f: impl FnMut(Point) -> Point) -> Operation {
        match *self {
            Operation::Move(p) => Operation::Move(f(p)),
            Operation::LineTo(p) => Operation::LineTo(f(p)),
            Operation::QuadraticCurveTo { control, to } => Operation::QuadraticCurveTo {
                control: f(control),
                to: f(to),
            },
            Operation::CubicCurveTo { control1, control2, to } => Operation::CubicCurveTo {
                control1: f(control1),
                control2: f(control2),
                to: f(to),
            },
        }
    }

    #[inline]
    pub fn is_move(&self) -> bool {
        matches!(self, Operation::Move(_))
    }
}

impl OperationSet {
    pub fn new(kind: PathKind, operations: Vec<Operation>) -> Self {
        Self { kind, operations, raw_path: None, hint_size: None }
    }

    pub fn outline(operations: Vec<Operation>) -> Self {
        Self::new(PathKind::Outline, operations)
    }

    pub fn fill_sketch(operations: Vec<Operation>) -> Self {
        Self::new(PathKind::FillSketch, operations)
    }

    pub fn fill_solid(operations: Vec<Operation>) -> Self {
        Self::new(PathKind::FillSolid, operations)
    }

    pub fn with_raw_path(mut self, raw: impl Into<String>) -> Self {
        self.raw_path = Some(raw.into());
        self
    }

    pub fn with_hint_size(mut self, size: Size) -> Self {
        self.hint_size = Some(size);
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Bounding box of every point in the set, control points included.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        bounding_box(&all_points(&self.operations))
    }
}

/// Every point referenced by a path, in order.
pub fn all_points(operations: &[Operation]) -> Vec<Point> {
    operations.iter().flat_map(|op| op.points()).collect()
}

/// Split a path into subpaths at each `Move`.
///
/// A path that does not start with `Move` yields a leading subpath without
/// one; consumers treat its first end point as the start.
pub fn split_subpaths(operations: &[Operation]) -> Vec<&[Operation]> {
    let mut subpaths = Vec::new();
    let mut start = 0;
    for (i, op) in operations.iter().enumerate() {
        if op.is_move() && i > start {
            subpaths.push(&operations[start..i]);
            start = i;
        }
    }
    if start < operations.len() {
        subpaths.push(&operations[start..]);
    }
    subpaths
}

/// Closed move/line-to outline through `points`.
pub fn polygon_operations(points: &[Point]) -> Vec<Operation> {
    let Some((first, rest)) = points.split_first() else {
        return Vec::new();
    };
    let mut ops = Vec::with_capacity(points.len() + 1);
    ops.push(Operation::Move(*first));
    ops.extend(rest.iter().map(|p| Operation::LineTo(*p)));
    ops.push(Operation::LineTo(*first));
    ops
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_point_of_each_variant() {
        let p = Point::new(1.0, 2.0);
        let q = Point::new(3.0, 4.0);
        assert_eq!(Operation::Move(p).end_point(), p);
        assert_eq!(Operation::LineTo(p).end_point(), p);
        assert_eq!(Operation::QuadraticCurveTo { control: p, to: q }.end_point(), q);
        assert_eq!(
            Operation::CubicCurveTo { control1: p, control2: p, to: q }.end_point(),
            q
        );
    }

    #[test]
    fn split_at_moves() {
        let ops = vec![
            Operation::Move(Point::new(0.0, 0.0)),
            Operation::LineTo(Point::new(1.0, 0.0)),
            Operation::Move(Point::new(5.0, 5.0)),
            Operation::LineTo(Point::new(6.0, 5.0)),
            Operation::LineTo(Point::new(6.0, 6.0)),
        ];
        let parts = split_subpaths(&ops);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].len(), 2);
        assert_eq!(parts[1].len(), 3);
    }

    #[test]
    fn polygon_operations_close_the_ring() {
        let pts = [Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, 1.0)];
        let ops = polygon_operations(&pts);
        assert_eq!(ops.len(), 4);
        assert_eq!(ops.last().unwrap().end_point(), pts[0]);
        assert!(polygon_operations(&[]).is_empty());
    }

    #[test]
    fn map_points_translates_controls() {
        let op = Operation::CubicCurveTo {
            control1: Point::new(0.0, 0.0),
            control2: Point::new(1.0, 1.0),
            to: Point::new(2.0, 2.0),
        };
        let moved = op.map_points(|p| p + Point::new(10.0, 0.0));
        assert_eq!(moved.points()[0], Point::new(10.0, 0.0));
        assert_eq!(moved.end_point(), Point::new(12.0, 2.0));
    }
}
