//! Shape descriptors.
//!
//! A [`Shape`] is plain data: everything needed to draw it is in its fields.
//! Some shapes only make sense once the canvas size is known ("fill the
//! whole canvas with an egg"); those are described by a [`ShapeSpec`] and
//! resolved to a `Shape` before drawing.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::geometry::{EPSILON, Point, Size, ellipse_points, rectangle_points};
use crate::ops::Operation;
use crate::rough::RoundedRectOutline;

/// Points used to approximate curved outlines for pattern fills.
const OUTLINE_STEPS: usize = 96;

/// A drawable primitive. Angles are in radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Shape {
    Line { from: Point, to: Point },
    Rectangle { x: f64, y: f64, width: f64, height: f64 },
    Ellipse { center: Point, width: f64, height: f64 },
    Circle { center: Point, diameter: f64 },
    Arc {
        center: Point,
        width: f64,
        height: f64,
        start: f64,
        stop: f64,
        #[serde(default)]
        closed: bool,
    },
    Polygon { points: Vec<Point> },
    LinearPath { points: Vec<Point> },
    Curve { points: Vec<Point> },
    RoundedRectangle { x: f64, y: f64, width: f64, height: f64, radius: f64 },
    Egg {
        center: Point,
        width: f64,
        height: f64,
        #[serde(default)]
        tilt: f64,
    },
    /// An arbitrary path, with its source `d` string when there is one.
    Path {
        operations: Vec<Operation>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        raw: Option<String>,
    },
}

impl Shape {
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Line { .. } => "line",
            Shape::Rectangle { .. } => "rectangle",
            Shape::Ellipse { .. } => "ellipse",
            Shape::Circle { .. } => "circle",
            Shape::Arc { .. } => "arc",
            Shape::Polygon { .. } => "polygon",
            Shape::LinearPath { .. } => "linear-path",
            Shape::Curve { .. } => "curve",
            Shape::RoundedRectangle { .. } => "rounded-rectangle",
            Shape::Egg { .. } => "egg",
            Shape::Path { .. } => "path",
        }
    }

    /// Whether the shape encloses an area that can be filled.
    pub fn is_fillable(&self) -> bool {
        match self {
            Shape::Line { .. } | Shape::LinearPath { .. } => false,
            Shape::Arc { closed, .. } => *closed,
            _ => true,
        }
    }

    /// Polygon approximation of the filled area, for shapes without a
    /// dedicated fill path. `None` for shapes that cannot be filled.
    pub fn fill_outline(&self) -> Option<Vec<Point>> {
        match self {
            Shape::Rectangle { x, y, width, height } => Some(rectangle_points(*x, *y, *width, *height).to_vec()),
            Shape::Polygon { points } | Shape::Curve { points } => Some(points.clone()),
            Shape::Ellipse { center, width, height } => {
                Some(ellipse_points(*center, width.abs() / 2.0, height.abs() / 2.0, OUTLINE_STEPS))
            }
            Shape::Circle { center, diameter } => {
                let r = diameter.abs() / 2.0;
                Some(ellipse_points(*center, r, r, OUTLINE_STEPS))
            }
            Shape::Egg { center, width, height, tilt } => Some(egg_points(*center, *width, *height, *tilt)),
            Shape::RoundedRectangle { x, y, width, height, radius } => {
                let (w, h) = (width.abs(), height.abs());
                let r = if radius.is_finite() { radius.clamp(0.0, w.min(h) / 2.0) } else { 0.0 };
                if r < EPSILON {
                    return Some(rectangle_points(*x, *y, w, h).to_vec());
                }
                Some(RoundedRectOutline { x: *x, y: *y, w, h, r }.points(OUTLINE_STEPS))
            }
            Shape::Line { .. } | Shape::LinearPath { .. } | Shape::Arc { .. } | Shape::Path { .. } => None,
        }
    }
}

/// Outline of an egg, matching the rough egg's boundary.
fn egg_points(center: Point, width: f64, height: f64, tilt: f64) -> Vec<Point> {
    let (rx, ry) = (width.abs() / 2.0, height.abs() / 2.0);
    let tilt = if tilt.is_finite() { tilt.clamp(-1.0, 1.0) } else { 0.0 };
    (0..OUTLINE_STEPS)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / OUTLINE_STEPS as f64;
            let (sin, cos) = angle.sin_cos();
            Point::new(center.x + rx * (1.0 - tilt * sin) * cos, center.y + ry * sin)
        })
        .collect()
}

/// Shapes that cover the whole canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FullBleed {
    Rectangle,
    /// The largest circle centred on the canvas.
    Circle,
    Egg {
        #[serde(default)]
        tilt: f64,
    },
    RoundedRectangle { radius: f64 },
}

impl FullBleed {
    pub fn resolve(&self, size: Size) -> Shape {
        let (width, height) = (size.width.max(0.0), size.height.max(0.0));
        let center = Point::new(width / 2.0, height / 2.0);
        match *self {
            FullBleed::Rectangle => Shape::Rectangle { x: 0.0, y: 0.0, width, height },
            FullBleed::Circle => Shape::Circle { center, diameter: width.min(height) },
            FullBleed::Egg { tilt } => Shape::Egg { center, width, height, tilt },
            FullBleed::RoundedRectangle { radius } => {
                Shape::RoundedRectangle { x: 0.0, y: 0.0, width, height, radius }
            }
        }
    }
}

/// A shape that may depend on the canvas size.
#[derive(Clone)]
pub enum ShapeSpec {
    Fixed(Shape),
    FullBleed(FullBleed),
    Sized(Arc<dyn Fn(Size) -> Shape + Send + Sync>),
}

impl ShapeSpec {
    /// A shape computed from the canvas size.
    pub fn sized(build: impl Fn(Size) -> Shape + Send + Sync + 'static) -> Self {
        ShapeSpec::Sized(Arc::new(build))
    }

    /// The concrete shape for a canvas of `size`.
    pub fn resolve(&self, size: Size) -> Shape {
        match self {
            ShapeSpec::Fixed(shape) => shape.clone(),
            ShapeSpec::FullBleed(bleed) => bleed.resolve(size),
            ShapeSpec::Sized(build) => build(size),
        }
    }
}

impl fmt::Debug for ShapeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeSpec::Fixed(shape) => f.debug_tuple("Fixed").field(shape).finish(),
            ShapeSpec::FullBleed(bleed) => f.debug_tuple("FullBleed").field(bleed).finish(),
            ShapeSpec::Sized(_) => f.write_str("Sized(..)"),
        }
    }
}

impl From<Shape> for ShapeSpec {
    fn from(shape: Shape) -> Self {
        ShapeSpec::Fixed(shape)
    }
}

impl From<FullBleed> for ShapeSpec {
    fn from(bleed: FullBleed) -> Self {
        ShapeSpec::FullBleed(bleed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::bounding_box;

    #[test]
    fn full_bleed_covers_the_canvas() {
        let size = Size::new(200.0, 100.0);
        assert_eq!(
            FullBleed::Rectangle.resolve(size),
            Shape::Rectangle { x: 0.0, y: 0.0, width: 200.0, height: 100.0 }
        );
        assert_eq!(
            FullBleed::Circle.resolve(size),
            Shape::Circle { center: Point::new(100.0, 50.0), diameter: 100.0 }
        );
        let egg = ShapeSpec::from(FullBleed::Egg { tilt: 0.2 }).resolve(size);
        assert_eq!(egg.name(), "egg");
    }

    #[test]
    fn sized_specs_see_the_size() {
        let spec = ShapeSpec::sized(|size| Shape::Line {
            from: Point::new(0.0, 0.0),
            to: Point::new(size.width, size.height),
        });
        match spec.resolve(Size::new(30.0, 40.0)) {
            Shape::Line { to, .. } => assert_eq!(to, Point::new(30.0, 40.0)),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(format!("{spec:?}"), "Sized(..)");
    }

    #[test]
    fn fixed_specs_ignore_the_size() {
        let shape = Shape::Polygon { points: vec![Point::new(1.0, 2.0)] };
        assert_eq!(ShapeSpec::from(shape.clone()).resolve(Size::new(5.0, 5.0)), shape);
    }

    #[test]
    fn fill_outlines_match_the_shape() {
        let circle = Shape::Circle { center: Point::new(0.0, 0.0), diameter: 20.0 };
        let (min_x, _, max_x, _) = bounding_box(&circle.fill_outline().unwrap()).unwrap();
        assert!((max_x - min_x - 20.0).abs() < 1e-9);

        let rounded = Shape::RoundedRectangle { x: 0.0, y: 0.0, width: 100.0, height: 50.0, radius: 10.0 };
        let outline = rounded.fill_outline().unwrap();
        let (min_x, min_y, max_x, max_y) = bounding_box(&outline).unwrap();
        assert!(min_x >= -1e-9 && min_y >= -1e-9 && max_x <= 100.0 + 1e-9 && max_y <= 50.0 + 1e-9);
        // Corners are cut
        assert!(outline.iter().all(|p| p.distance(Point::new(0.0, 0.0)) > 2.0));

        assert!(Shape::Line { from: Point::default(), to: Point::new(1.0, 1.0) }.fill_outline().is_none());
    }

    #[test]
    fn open_shapes_are_not_fillable() {
        let arc = |closed| Shape::Arc {
            center: Point::default(),
            width: 10.0,
            height: 10.0,
            start: 0.0,
            stop: 1.0,
            closed,
        };
        assert!(!arc(false).is_fillable());
        assert!(arc(true).is_fillable());
        assert!(!Shape::LinearPath { points: vec![] }.is_fillable());
    }

    #[test]
    fn shapes_deserialize_from_tagged_maps() {
        let json = r#"{"type":"egg","center":{"x":1.0,"y":2.0},"width":10.0,"height":12.0}"#;
        let shape: Shape = serde_json::from_str(json).unwrap();
        assert_eq!(shape, Shape::Egg { center: Point::new(1.0, 2.0), width: 10.0, height: 12.0, tilt: 0.0 });
    }
}
