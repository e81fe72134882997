//! The generator: shapes in, drawings out.
//!
//! A [`Generator`] owns sanitized options and a seeded [`Rng`]. Each call to
//! [`Generator::generate`] produces a [`Drawing`]: the fill set (if the
//! shape has one) followed by the outline set.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::fill::filler_for;
use crate::flatten::flatten_path;
use crate::geometry::{Point, Size};
use crate::ops::{Operation, OperationSet, PathKind, all_points};
use crate::options::{FillStyle, RenderOptions};
use crate::rng::Rng;
use crate::rough::RoughContext;
use crate::scribble::{ScribbleParams, scribble};
use crate::shape::{Shape, ShapeSpec};
use crate::stroke::{SamplingConfig, stroke_to_fill};

/// Flattening tolerance for pattern fills of arbitrary paths.
const PATTERN_TOLERANCE: f64 = 0.25;

/// Everything needed to render one shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub shape_name: String,
    pub sets: Vec<OperationSet>,
    pub options: RenderOptions,
}

impl Drawing {
    pub fn is_empty(&self) -> bool {
        self.sets.iter().all(OperationSet::is_empty)
    }

    /// Bounds of every set, as `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let points: Vec<Point> = self.sets.iter().flat_map(|s| all_points(&s.operations)).collect();
        crate::geometry::bounding_box(&points)
    }
}

#[derive(Debug)]
pub struct Generator {
    options: RenderOptions,
    rng: Rng,
}

impl Generator {
    /// Sanitizes `options` and seeds from `options.seed`, or the clock.
    pub fn new(options: RenderOptions) -> Self {
        let options = options.sanitized();
        let rng = Rng::from_seed_or_clock(options.seed);
        Self { options, rng }
    }

    pub fn with_rng(options: RenderOptions, rng: Rng) -> Self {
        Self { options: options.sanitized(), rng }
    }

    #[inline]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Draw `shape` with the generator's options.
    pub fn generate(&mut self, shape: &Shape) -> Drawing {
        let sets = draw(shape, &self.options, &mut self.rng);
        finish(shape, sets, self.options.clone())
    }

    /// Draw `shape` with other options, still using this generator's random stream.
    pub fn generate_with(&mut self, shape: &Shape, options: &RenderOptions) -> Drawing {
        let options = options.sanitized();
        let sets = draw(shape, &options, &mut self.rng);
        finish(shape, sets, options)
    }

    /// Resolve `spec` against `size` and draw it.
    pub fn generate_spec(&mut self, spec: &ShapeSpec, size: Size) -> Drawing {
        self.generate(&spec.resolve(size))
    }
}

fn finish(shape: &Shape, sets: Vec<OperationSet>, options: RenderOptions) -> Drawing {
    debug!(shape = shape.name(), sets = sets.len(), "generated drawing");
    Drawing { shape_name: shape.name().to_string(), sets, options }
}

/// Fill set first, then the outline (rough or brush-stroked).
fn draw(shape: &Shape, options: &RenderOptions, rng: &mut Rng) -> Vec<OperationSet> {
    let mut sets = Vec::with_capacity(2);
    let mut ctx = RoughContext::new(options, rng);

    if shape.is_fillable() {
        match fill_set(shape, &mut ctx) {
            Some(fill) => sets.push(fill),
            None => trace!(shape = shape.name(), "nothing to fill"),
        }
    }

    match &options.brush_profile {
        None => {
            let outline = outline_operations(shape, &mut ctx);
            if !outline.is_empty() {
                sets.push(OperationSet::outline(outline));
            }
        }
        Some(brush) => {
            // A single rough pass; the brush supplies the weight
            let single = RenderOptions { disable_multi_stroke: true, ..options.clone() };
            let mut ctx = RoughContext::new(&single, rng);
            let centerline = outline_operations(shape, &mut ctx);
            if let Some(outline) = stroke_to_fill(&centerline, brush, options.stroke_width, &SamplingConfig::default()) {
                sets.push(outline);
            }
        }
    }
    sets
}

fn outline_operations(shape: &Shape, ctx: &mut RoughContext<'_>) -> Vec<Operation> {
    match shape {
        Shape::Line { from, to } => ctx.line(*from, *to),
        Shape::Rectangle { x, y, width, height } => ctx.rectangle(*x, *y, *width, *height),
        Shape::Ellipse { center, width, height } => ctx.ellipse(*center, *width, *height),
        Shape::Circle { center, diameter } => ctx.ellipse(*center, *diameter, *diameter),
        Shape::Arc { center, width, height, start, stop, closed } => {
            ctx.arc(*center, *width, *height, *start, *stop, *closed)
        }
        Shape::Polygon { points } => ctx.polygon(points),
        Shape::LinearPath { points } => ctx.linear_path(points, false),
        Shape::Curve { points } => ctx.curve(points),
        Shape::RoundedRectangle { x, y, width, height, radius } => {
            ctx.rounded_rectangle(*x, *y, *width, *height, *radius)
        }
        Shape::Egg { center, width, height, tilt } => ctx.egg(*center, *width, *height, *tilt),
        Shape::Path { operations, .. } => ctx.path(operations),
    }
}

fn fill_set(shape: &Shape, ctx: &mut RoughContext<'_>) -> Option<OperationSet> {
    let style = ctx.options().fill_style;
    let filler = filler_for(style);
    match shape {
        Shape::Path { operations, raw } => path_fill(operations, raw.as_deref(), ctx),
        Shape::Ellipse { center, width, height } => filler.fill_ellipse(*center, *width, *height, ctx),
        Shape::Circle { center, diameter } => filler.fill_ellipse(*center, *diameter, *diameter, ctx),
        Shape::Arc { center, width, height, start, stop, .. } => {
            filler.fill_arc(*center, *width, *height, *start, *stop, ctx)
        }
        _ => {
            let outline = shape.fill_outline()?;
            filler.fill_polygon(&outline, ctx)
        }
    }
}

/// Fill an arbitrary path.
///
/// A solid fill keeps the exact path. Patterns are computed over the
/// flattened path and keep the source path and size alongside, for
/// consumers that mask the pattern with it.
fn path_fill(operations: &[Operation], raw: Option<&str>, ctx: &mut RoughContext<'_>) -> Option<OperationSet> {
    let (min_x, min_y, max_x, max_y) = crate::geometry::bounding_box(&all_points(operations))?;
    let hint = Size::new(max_x - min_x, max_y - min_y);
    let with_raw = |set: OperationSet| match raw {
        Some(raw) => set.with_raw_path(raw),
        None => set,
    };

    let options = ctx.options();
    let pattern = match options.fill_style {
        FillStyle::Solid => {
            return Some(with_raw(OperationSet::new(PathKind::RawFillPath, operations.to_vec())));
        }
        FillStyle::Scribble => {
            let strokes = scribble(operations, &ScribbleParams::from_options(options));
            crate::fill::merge_sets(strokes)?
        }
        style => {
            let rings = flatten_path(operations, PATTERN_TOLERANCE, true);
            filler_for(style).fill_rings(&rings, ctx)?
        }
    };
    let set = OperationSet::new(PathKind::RawFillPattern, pattern.operations).with_hint_size(hint);
    Some(with_raw(set))
}
