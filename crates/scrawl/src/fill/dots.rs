//! Dot fill: small rough circles on a grid of vertical guides.

use crate::geometry::{FillLine, Point};
use crate::ops::OperationSet;
use crate::rng::Rng;
use crate::rough::RoughContext;

use super::hachure::option_lines;
use super::{FillGenerator, sketch};

#[derive(Debug, Clone, Copy, Default)]
pub struct Dots;

/// Dot centres every `gap` along each guide, centred, before jitter.
///
/// Each centre comes with the unit normal of its guide.
pub(crate) fn dot_centres(lines: &[FillLine], gap: f64) -> Vec<(Point, Point)> {
    let mut centres = Vec::new();
    if !(gap > 0.0) {
        return centres;
    }
    for line in lines {
        let line = line.left_to_right();
        let Some(dir) = line.direction() else {
            continue;
        };
        let normal = dir.perpendicular();
        let length = line.length();
        let count = ((length / gap).ceil() as usize).saturating_sub(1);
        if count == 0 {
            centres.push((line.start.midpoint(line.end), normal));
            continue;
        }
        let lead = (length - (count - 1) as f64 * gap) / 2.0;
        for i in 0..count {
            centres.push((line.start + dir * (lead + i as f64 * gap), normal));
        }
    }
    centres
}

/// Dot centres pushed off their guide by up to `spread`, never along it.
pub(crate) fn jittered_centres(lines: &[FillLine], gap: f64, spread: f64, rng: &mut Rng) -> Vec<Point> {
    dot_centres(lines, gap)
        .into_iter()
        .map(|(centre, normal)| centre + normal * (rng.next_signed() * spread))
        .collect()
}

impl FillGenerator for Dots {
    fn fill_polygon(&self, points: &[Point], ctx: &mut RoughContext<'_>) -> Option<OperationSet> {
        if points.len() < 3 {
            return None;
        }
        self.fill_rings(&[points.to_vec()], ctx)
    }

    fn fill_rings(&self, rings: &[Vec<Point>], ctx: &mut RoughContext<'_>) -> Option<OperationSet> {
        let options = ctx.options();
        let gap = options.fill_gap();
        // Guides always run at 0 degrees so the dots form a grid
        let guides = option_lines(rings, options, 0.0, gap);
        let diameter = options.fill_weight * 2.0;
        let spread = gap / 4.0;

        let mut ops = Vec::new();
        for centre in jittered_centres(&guides, gap, spread, ctx.rng()) {
            ops.extend(ctx.ellipse(centre, diameter, diameter));
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

    #[test]
    fn centres_are_evenly_spaced() {
        let guide = FillLine::new(Point::new(10.0, 0.0), Point::new(10.0, 50.0));
        let centres = dot_centres(&[guide], 10.0);
        assert_eq!(centres.len(), 4);
        assert!((centres[0].0.y - 10.0).abs() < 1e-9);
        assert!((centres[3].0.y - 40.0).abs() < 1e-9);
        assert!(centres[0].1.dot(Point::new(0.0, 1.0)).abs() < 1e-12);
    }

    #[test]
    fn jitter_moves_dots_across_their_guide_only() {
        let guides = [
            FillLine::new(Point::new(10.0, 0.0), Point::new(10.0, 50.0)),
            FillLine::new(Point::new(20.0, 0.0), Point::new(20.0, 50.0)),
        ];
        let exact = dot_centres(&guides, 10.0);
        let jittered = jittered_centres(&guides, 10.0, 2.5, &mut Rng::new(4));
        assert_eq!(jittered.len(), exact.len());
        let mut moved = false;
        for ((centre, _), dot) in exact.iter().zip(&jittered) {
            // Spacing along the guide is untouched
            assert!((dot.y - centre.y).abs() < 1e-12);
            assert!((dot.x - centre.x).abs() <= 2.5 + 1e-12);
            moved |= (dot.x - centre.x).abs() > 1e-9;
        }
        assert!(moved);
    }

    #[test]
    fn dots_stay_near_the_shape() {
        let options = RenderOptions::default().with_fill_gap(10.0);
        let square = rectangle_points(0.0, 0.0, 100.0, 100.0);
        let mut rng = Rng::new(9);
        let mut ctx = RoughContext::new(&options, &mut rng);
        let set = Dots.fill_polygon(&square, &mut ctx).unwrap();
        let (min_x, min_y, max_x, max_y) = set.bounds().unwrap();
        assert!(min_x > -10.0 && min_y > -10.0);
        assert!(max_x < 110.0 && max_y < 110.0);
    }
}
