//! Animate command: boil a rendered recipe over a loop of jittered frames.
//!
//! Every set of every drawing is precomputed for each frame, so a player
//! only has to cycle through them.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use serde::Serialize;
use tracing::{debug, info};

use scrawl::{Drawing, OperationSet, PathVariance};

use super::common::{drawing_to_svg, svg_document, write_text};
use super::recipe::{Recipe, RenderedRecipe};

#[derive(Debug, Clone, Args)]
pub struct AnimateArgs {
    /// Recipe YAML file
    pub recipe: PathBuf,

    /// Number of frames in the loop
    #[arg(short = 'n', long, default_value_t = 8)]
    pub frames: usize,

    /// Jitter as a fraction of each coordinate's magnitude
    #[arg(long, default_value_t = 0.01)]
    pub variance: f64,

    /// Seed for both the drawing and the jitter (random when omitted and
    /// the recipe has none)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory for frame-NNN.svg files; JSON goes to stdout without it
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,
}

/// One frame: every drawing with its points jittered.
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub index: usize,
    pub drawings: Vec<Drawing>,
}

#[derive(Debug, Serialize)]
struct Animation<'a> {
    name: &'a str,
    frames: &'a [Frame],
}

/// Precompute `variance.steps()` frames of a rendered recipe.
pub fn build_frames(rendered: &RenderedRecipe, variance: &PathVariance) -> Vec<Frame> {
    let steps = variance.steps();
    let mut frames: Vec<Frame> = (0..steps).map(|index| Frame { index, drawings: Vec::new() }).collect();

    for shape in &rendered.shapes {
        let drawing = &shape.drawing;
        let per_set: Vec<Vec<_>> = drawing.sets.iter().map(|set| variance.frames(&set.operations)).collect();
        for (step, frame) in frames.iter_mut().enumerate() {
            let sets = drawing
                .sets
                .iter()
                .zip(&per_set)
                .map(|(set, ops)| OperationSet { operations: ops[step].clone(), ..set.clone() })
                .collect();
            frame.drawings.push(Drawing { sets, ..drawing.clone() });
        }
    }
    frames
}

fn frame_to_svg(rendered: &RenderedRecipe, frame: &Frame, total: usize) -> String {
    let body: String = frame
        .drawings
        .iter()
        .zip(&rendered.shapes)
        .enumerate()
        .map(|(i, (drawing, shape))| drawing_to_svg(drawing, &shape.palette, &format!("shape-{i}")))
        .collect();
    let title = format!("{} ({}/{})", rendered.name, frame.index + 1, total);
    svg_document(rendered.canvas.size(), Some(&rendered.canvas.background), Some(&title), &body)
}

/// Execute the animate command.
pub fn cmd_animate(args: &AnimateArgs) -> Result<()> {
    if args.frames == 0 {
        bail!("an animation needs at least one frame");
    }
    if !args.variance.is_finite() || args.variance < 0.0 {
        bail!("variance must be a non-negative number, got {}", args.variance);
    }

    let recipe = Recipe::load(&args.recipe)?;
    let seed = args.seed.or(recipe.defaults.seed).unwrap_or_else(rand::random);
    debug!(seed, "animation seed");

    let rendered = recipe.render(Some(seed))?;
    let variance = PathVariance::new(seed, args.frames, args.variance);
    let frames = build_frames(&rendered, &variance);
    info!(frames = frames.len(), shapes = rendered.shapes.len(), "animation built");

    match &args.out_dir {
        Some(dir) => {
            fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
            for frame in &frames {
                let path = dir.join(format!("frame-{:03}.svg", frame.index));
                fs::write(&path, frame_to_svg(&rendered, frame, frames.len()))
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
            info!(dir = %dir.display(), "wrote frames");
            Ok(())
        }
        None => {
            let animation = Animation { name: &rendered.name, frames: &frames };
            let json = serde_json::to_string_pretty(&animation).context("failed to encode JSON")?;
            write_text(None, &json)
        }
    }
}
