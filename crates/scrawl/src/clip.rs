//! Intersection tests against polygon boundaries.
//!
//! This is the hot path for the burst fillers: every ray is tested against
//! every edge, so the functions here stay allocation-light.

use crate::geometry::{EPSILON, Point};

// ============================================================================
// POINT IN POLYGON (Ray Casting Algorithm)
// ============================================================================

/// Test if a point is inside a polygon using ray casting.
///
/// Casts a ray to the right and counts edge crossings.
/// Odd crossings = inside, even = outside.
#[inline]
pub fn point_in_polygon(p: Point, polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;

    for i in 0..n {
        let (xi, yi) = (polygon[i].x, polygon[i].y);
        let (xj, yj) = (polygon[j].x, polygon[j].y);

        if ((yi > p.y) != (yj > p.y)) && (p.x < (xj - xi) * (p.y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }

        j = i;
    }

    inside
}

/// All points where a ray from `origin` along `direction` crosses the
/// closed polygon boundary, sorted by distance from the origin.
///
/// `direction` does not need to be normalized; the returned distances are
/// in units of its length.
pub fn ray_polygon_intersections(origin: Point, direction: Point, polygon: &[Point]) -> Vec<(Point, f64)> {
    let n = polygon.len();
    if n < 2 || direction.length() < EPSILON {
        return Vec::new();
    }

    let mut hits = Vec::with_capacity(4);

    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let edge = b - a;
        let denom = direction.cross(edge);
        if denom.abs() < 1e-10 {
            continue;
        }

        let rel = a - origin;
        let t = rel.cross(edge) / denom;
        let u = rel.cross(direction) / denom;
        if t >= 0.0 && (0.0..=1.0).contains(&u) {
            hits.push((origin + direction * t, t));
        }
    }

    hits.sort_by(|a, b| a.1.total_cmp(&b.1));
    hits
}

/// Remove points closer than `tolerance` to a point already kept.
pub fn dedup_points(points: &[Point], tolerance: f64) -> Vec<Point> {
    let mut kept: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if !kept.iter().any(|k| k.distance(*p) < tolerance) {
            kept.push(*p);
        }
    }
    kept
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rectangle_points;

    #[test]
    fn point_inside_square() {
        let sq = rectangle_points(0.0, 0.0, 10.0, 10.0);
        assert!(point_in_polygon(Point::new(5.0, 5.0), &sq));
        assert!(!point_in_polygon(Point::new(15.0, 5.0), &sq));
        assert!(!point_in_polygon(Point::new(-1.0, 5.0), &sq));
    }

    #[test]
    fn degenerate_polygon_contains_nothing() {
        let line = [Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        assert!(!point_in_polygon(Point::new(5.0, 5.0), &line));
    }

    #[test]
    fn ray_from_center_hits_square_once() {
        let sq = rectangle_points(0.0, 0.0, 10.0, 10.0);
        let hits = ray_polygon_intersections(Point::new(5.0, 5.0), Point::new(1.0, 0.0), &sq);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].0.x - 10.0).abs() < 1e-10);
        assert!((hits[0].1 - 5.0).abs() < 1e-10);
    }

    #[test]
    fn ray_through_corner_reports_near_duplicates() {
        let sq = rectangle_points(0.0, 0.0, 10.0, 10.0);
        let hits = ray_polygon_intersections(Point::new(5.0, 5.0), Point::new(1.0, 1.0), &sq);
        let points: Vec<Point> = hits.iter().map(|h| h.0).collect();
        assert_eq!(dedup_points(&points, 0.5).len(), 1);
    }
}
