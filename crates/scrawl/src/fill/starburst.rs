//! Sun and star bursts: rays from the centroid to the boundary.

use std::f64::consts::{PI, TAU};

use crate::clip::{dedup_points, ray_polygon_intersections};
use crate::geometry::{EPSILON, Point, polygon_centroid, signed_area};
use crate::ops::OperationSet;
use crate::rough::RoughContext;

use super::{FillGenerator, sketch, usable_rings};

/// Intersections closer than this are the same crossing (a ray through a vertex).
const DEDUP_TOLERANCE: f64 = 0.5;

/// Fraction of the full length kept by the short rays of a star burst.
const STAR_SHORT_RAY: f64 = 0.6;

const MAX_RAYS: usize = 1440;

/// Radial fill. With `star` set every other ray stops short.
#[derive(Debug, Clone, Copy, Default)]
pub struct Burst {
    pub star: bool,
}

impl Burst {
    /// Number of rays for a shape whose farthest vertex is `max_radius` away.
    pub fn ray_count(max_radius: f64, gap: f64) -> usize {
        ((PI * max_radius / gap).ceil() as usize).clamp(3, MAX_RAYS)
    }
}

impl FillGenerator for Burst {
    fn fill_polygon(&self, points: &[Point], ctx: &mut RoughContext<'_>) -> Option<OperationSet> {
        if points.len() < 3 {
            return None;
        }
        let centre = polygon_centroid(points)?;
        let max_radius = points.iter().map(|p| p.distance(centre)).fold(0.0, f64::max);
        if max_radius < EPSILON {
            return None;
        }

        let options = ctx.options();
        let rays = Self::ray_count(max_radius, options.fill_gap());
        let base = options.fill_angle.to_radians();

        let mut ops = Vec::new();
        for i in 0..rays {
            let dir = Point::from_angle(base + TAU * i as f64 / rays as f64);
            let hits: Vec<Point> = ray_polygon_intersections(centre, dir, points)
                .into_iter()
                .map(|(p, _)| p)
                .collect();
            for hit in dedup_points(&hits, DEDUP_TOLERANCE) {
                let end = if self.star && i % 2 == 1 { centre.lerp(hit, STAR_SHORT_RAY) } else { hit };
                ops.extend(ctx.double_line_ops(centre, end));
            }
        }
        sketch(ops)
    }

    /// Rays from the outer ring's centroid, kept only where they run inside
    /// the shape under the even-odd rule, so holes stay empty.
    fn fill_rings(&self, rings: &[Vec<Point>], ctx: &mut RoughContext<'_>) -> Option<OperationSet> {
        let shape = usable_rings(rings);
        let outer = shape
            .iter()
            .copied()
            .max_by(|a, b| signed_area(a).abs().total_cmp(&signed_area(b).abs()))?;
        if shape.len() == 1 {
            return self.fill_polygon(outer, ctx);
        }
        let centre = polygon_centroid(outer)?;
        let max_radius = outer.iter().map(|p| p.distance(centre)).fold(0.0, f64::max);
        if max_radius < EPSILON {
            return None;
        }

        let options = ctx.options();
        let rays = Self::ray_count(max_radius, options.fill_gap());
        let base = options.fill_angle.to_radians();

        let mut ops = Vec::new();
        let mut hits: Vec<(Point, f64)> = Vec::new();
        for i in 0..rays {
            let dir = Point::from_angle(base + TAU * i as f64 / rays as f64);
            hits.clear();
            for ring in &shape {
                hits.extend(ray_polygon_intersections(centre, dir, ring));
            }
            hits.sort_by(|a, b| a.1.total_cmp(&b.1));
            let points: Vec<Point> = hits.iter().map(|(p, _)| *p).collect();
            let crossings = dedup_points(&points, DEDUP_TOLERANCE);

            // An odd number of crossings ahead means the centre is inside
            let mut stops = Vec::with_capacity(crossings.len() + 1);
            if crossings.len() % 2 == 1 {
                stops.push(centre);
            }
            stops.extend(crossings);
            for span in stops.chunks_exact(2) {
                let (start, end) = (span[0], span[1]);
                let end = if self.star && i % 2 == 1 { start.lerp(end, STAR_SHORT_RAY) } else { end };
                ops.extend(ctx.double_line_ops(start, end));
            }
        }
        sketch(ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rectangle_points;
    use crate::options::RenderOptions;
    use crate::rng::Rng;

    fn smooth() -> RenderOptions {
        RenderOptions { roughness: 0.0, max_randomness_offset: 0.0, ..Default::default() }.with_fill_gap(10.0)
    }

    #[test]
    fn one_ray_per_direction_in_a_square() {
        let options = smooth();
        let square = rectangle_points(0.0, 0.0, 100.0, 100.0);
        let mut rng = Rng::new(3);
        let mut ctx = RoughContext::new(&options, &mut rng);
        let set = Burst { star: false }.fill_polygon(&square, &mut ctx).unwrap();
        let rays = Burst::ray_count(50.0 * 2f64.sqrt(), 10.0);
        assert_eq!(rays, 23);
        assert_eq!(set.operations.iter().filter(|op| op.is_move()).count(), rays * 2);
    }

    fn endpoints(set: &OperationSet) -> Vec<Point> {
        set.operations.iter().map(|op| op.end_point()).collect()
    }

    fn strictly_inside_hole(p: Point) -> bool {
        let inner = 30.0 + 1e-6..70.0 - 1e-6;
        inner.contains(&p.x) && inner.contains(&p.y)
    }

    #[test]
    fn holes_stay_empty() {
        let options = smooth();
        let rings = vec![
            rectangle_points(0.0, 0.0, 100.0, 100.0).to_vec(),
            rectangle_points(30.0, 30.0, 40.0, 40.0).to_vec(),
        ];
        for star in [false, true] {
            let mut rng = Rng::new(3);
            let mut ctx = RoughContext::new(&options, &mut rng);
            let set = Burst { star }.fill_rings(&rings, &mut ctx).unwrap();
            let inside: Vec<Point> = endpoints(&set).into_iter().filter(|p| strictly_inside_hole(*p)).collect();
            assert!(inside.is_empty(), "star={star}: {inside:?}");
            // Rays still reach the outer boundary
            assert!(endpoints(&set).iter().any(|p| p.x.abs() < 1e-6 || (p.x - 100.0).abs() < 1e-6));
        }
    }

    #[test]
    fn single_ring_matches_the_polygon_fill() {
        let options = smooth();
        let square = rectangle_points(0.0, 0.0, 100.0, 100.0);
        let mut rng = Rng::new(3);
        let mut ctx = RoughContext::new(&options, &mut rng);
        let by_polygon = Burst { star: false }.fill_polygon(&square, &mut ctx).unwrap();
        let mut rng = Rng::new(3);
        let mut ctx = RoughContext::new(&options, &mut rng);
        let by_rings = Burst { star: false }.fill_rings(&[square.to_vec()], &mut ctx).unwrap();
        assert_eq!(by_polygon, by_rings);
    }

    #[test]
    fn star_rays_alternate_in_length() {
        let options = smooth();
        let square = rectangle_points(0.0, 0.0, 100.0, 100.0);
        let mut rng = Rng::new(3);
        let mut ctx = RoughContext::new(&options, &mut rng);
        let set = Burst { star: true }.fill_polygon(&square, &mut ctx).unwrap();
        let centre = Point::new(50.0, 50.0);
        // Each ray is a move and a cubic, drawn twice
        let ends: Vec<f64> = set
            .operations
            .chunks(4)
            .map(|ray| ray[1].end_point().distance(centre))
            .collect();
        for (i, length) in ends.iter().enumerate() {
            if i % 2 == 1 {
                assert!(*length <= 50.0 * 2f64.sqrt() * STAR_SHORT_RAY + 1e-6);
            } else {
                assert!(*length >= 50.0 - 1e-6);
            }
        }
    }
}
