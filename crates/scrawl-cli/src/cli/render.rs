//! Render command: recipe to SVG, JSON or PNG.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use tracing::info;

use super::common::{OutputArgs, write_text};
use super::recipe::{EXAMPLE_RECIPE, Recipe};

#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    /// Recipe YAML file
    #[arg(required_unless_present = "example")]
    pub recipe: Option<PathBuf>,

    /// Seed overriding the recipe's own
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print an example recipe and exit
    #[arg(long)]
    pub example: bool,

    #[command(flatten)]
    pub out: OutputArgs,
}

/// Execute the render command.
pub fn cmd_render(args: &RenderArgs) -> Result<()> {
    if args.example {
        return write_text(args.out.path(), EXAMPLE_RECIPE);
    }
    let Some(path) = &args.recipe else {
        bail!("no recipe given (try --example for a starting point)");
    };

    let recipe = Recipe::load(path)?;
    let rendered = recipe.render(args.seed)?;
    info!(
        recipe = %rendered.name,
        sets = rendered.shapes.iter().map(|s| s.drawing.sets.len()).sum::<usize>(),
        "render complete"
    );
    args.out.write(|| rendered.to_svg(), &rendered, recipe.canvas.size())
}
