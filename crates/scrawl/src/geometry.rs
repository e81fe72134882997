//! Core geometry types for scrawl.
//!
//! Everything here is a plain value type. Functions take borrowed slices
//! (`&[Point]`) so callers can pass a `Vec`, an array, or part of one.

use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Tolerance used when deciding whether a length or denominator is zero.
pub const EPSILON: f64 = 1e-9;

/// A 2D point (or vector) with x,y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A width/height pair, used for canvas sizes and hint sizes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// One segment of a fill pattern.
///
/// Every hachure-based filler produces these first and renders them later,
/// so post-processing (dashes, zigzags, dots) can work on plain geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillLine {
    pub start: Point,
    pub end: Point,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing at `angle` radians.
    #[inline]
    pub fn from_angle(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        (*self - other).length()
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn dot(&self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z component of the 3D cross product.
    #[inline]
    pub fn cross(&self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// The vector rotated 90° counter-clockwise (in y-up terms).
    #[inline]
    pub fn perpendicular(&self) -> Point {
        Point::new(-self.y, self.x)
    }

    /// Unit vector in the same direction, or `None` for a zero vector.
    #[inline]
    pub fn normalized(&self) -> Option<Point> {
        let len = self.length();
        if len < EPSILON {
            None
        } else {
            Some(Point::new(self.x / len, self.y / len))
        }
    }

    #[inline]
    pub fn lerp(&self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    #[inline]
    pub fn midpoint(&self, other: Point) -> Point {
        self.lerp(other, 0.5)
    }

    /// Angle of the vector in radians.
    #[inline]
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Rotate around `center` by `angle` radians.
    #[inline]
    pub fn rotate_around(&self, center: Point, angle: f64) -> Point {
        let (sin_a, cos_a) = angle.sin_cos();
        let d = *self - center;
        Point::new(
            center.x + d.x * cos_a - d.y * sin_a,
            center.y + d.x * sin_a + d.y * cos_a,
        )
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    #[inline]
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Point;

    #[inline]
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

impl Size {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl FillLine {
    #[inline]
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Unit direction from start to end, `None` for a zero-length line.
    #[inline]
    pub fn direction(&self) -> Option<Point> {
        (self.end - self.start).normalized()
    }

    /// The same line with its endpoints ordered left to right (then top to bottom).
    pub fn left_to_right(&self) -> FillLine {
        let swap = self.start.x > self.end.x
            || (self.start.x == self.end.x && self.start.y > self.end.y);
        if swap {
            FillLine::new(self.end, self.start)
        } else {
            *self
        }
    }
}

/// Get the bounding box as (min_x, min_y, max_x, max_y).
pub fn bounding_box(points: &[Point]) -> Option<(f64, f64, f64, f64)> {
    if points.is_empty() {
        return None;
    }

    let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_x = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    Some((min_x, min_y, max_x, max_y))
}

/// Calculate signed area of a point sequence using the shoelace formula.
///
/// Returns:
/// - Positive value for counter-clockwise winding (y-up)
/// - Negative value for clockwise winding
pub fn signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y;
        area -= points[j].x * points[i].y;
    }
    area / 2.0
}

/// Area centroid of a polygon.
///
/// Falls back to the vertex average when the polygon has (near) zero area.
pub fn polygon_centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }

    let n = points.len();
    let mut cx = 0.0;
    let mut cy = 0.0;
    let mut area = 0.0;

    for i in 0..n {
        let j = (i + 1) % n;
        let a = points[i].x * points[j].y - points[j].x * points[i].y;
        area += a;
        cx += (points[i].x + points[j].x) * a;
        cy += (points[i].y + points[j].y) * a;
    }

    area *= 0.5;

    if area.abs() < 1e-10 {
        let sum_x: f64 = points.iter().map(|p| p.x).sum();
        let sum_y: f64 = points.iter().map(|p| p.y).sum();
        return Some(Point::new(sum_x / n as f64, sum_y / n as f64));
    }

    Some(Point::new(cx / (6.0 * area), cy / (6.0 * area)))
}

/// Sample `steps` points around an ellipse (no randomness).
pub fn ellipse_points(center: Point, rx: f64, ry: f64, steps: usize) -> Vec<Point> {
    let steps = steps.max(3);
    let increment = std::f64::consts::TAU / steps as f64;
    (0..steps)
        .map(|i| {
            let angle = i as f64 * increment;
            Point::new(center.x + rx * angle.cos(), center.y + ry * angle.sin())
        })
        .collect()
}

/// Four corners of an axis-aligned rectangle, clockwise in screen space.
pub fn rectangle_points(x: f64, y: f64, width: f64, height: f64) -> [Point; 4] {
    [
        Point::new(x, y),
        Point::new(x + width, y),
        Point::new(x + width, y + height),
        Point::new(x, y + height),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert_eq!(p1.distance(p2), 5.0);
    }

    #[test]
    fn fill_line_length() {
        let line = FillLine::new(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        assert_eq!(line.length(), 5.0);
    }

    #[test]
    fn zero_vector_has_no_direction() {
        assert!(Point::new(0.0, 0.0).normalized().is_none());
        let same = FillLine::new(Point::new(2.0, 2.0), Point::new(2.0, 2.0));
        assert!(same.direction().is_none());
    }

    #[test]
    fn polygon_bbox() {
        let pts = rectangle_points(0.0, 0.0, 10.0, 5.0);
        assert_eq!(bounding_box(&pts), Some((0.0, 0.0, 10.0, 5.0)));
        assert_eq!(bounding_box(&[]), None);
    }

    #[test]
    fn centroid_of_square() {
        let pts = rectangle_points(0.0, 0.0, 100.0, 100.0);
        let c = polygon_centroid(&pts).unwrap();
        assert!((c.x - 50.0).abs() < 1e-9);
        assert!((c.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn centroid_of_degenerate_polygon_is_average() {
        let pts = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(20.0, 0.0)];
        let c = polygon_centroid(&pts).unwrap();
        assert!((c.x - 10.0).abs() < 1e-9);
        assert!(c.y.abs() < 1e-9);
    }

    #[test]
    fn signed_area_winding() {
        let ccw = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!((signed_area(&ccw) - 100.0).abs() < 1e-10);

        let mut cw = ccw;
        cw.reverse();
        assert!((signed_area(&cw) + 100.0).abs() < 1e-10);
    }

    #[test]
    fn rotate_quarter_turn() {
        let p = Point::new(100.0, 50.0).rotate_around(Point::new(50.0, 50.0), std::f64::consts::FRAC_PI_2);
        assert!((p.x - 50.0).abs() < 1e-9);
        assert!((p.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn left_to_right_orders_endpoints() {
        let line = FillLine::new(Point::new(10.0, 0.0), Point::new(0.0, 5.0));
        let ordered = line.left_to_right();
        assert_eq!(ordered.start, Point::new(0.0, 5.0));
        assert_eq!(ordered.end, Point::new(10.0, 0.0));
    }
}
