//! scrawl - hand-drawn shapes from the command line
//!
//! Usage:
//!   scrawl render <recipe.yaml> [-o out.svg] [-f svg|json|png]
//!   scrawl render --example           Print a starter recipe
//!   scrawl styles                     List fill styles
//!   scrawl scribble --d "M0 0 ..."    Scribble-fill a path
//!   scrawl stroke --svg in.svg        Brush-stroke every path of a file
//!   scrawl animate <recipe.yaml> -n 8 Jittered animation frames

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{
    AnimateArgs, RenderArgs, ScribbleArgs, StrokeArgs, StylesArgs, cmd_animate, cmd_render, cmd_scribble,
    cmd_stroke, cmd_styles,
};

#[derive(Parser)]
#[command(name = "scrawl")]
#[command(author, version, about = "Sketchy, hand-drawn geometry", long_about = None)]
struct Cli {
    /// Log more (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw a recipe
    Render(RenderArgs),

    /// List the fill styles
    Styles(StylesArgs),

    /// Scribble-fill SVG paths
    Scribble(ScribbleArgs),

    /// Convert SVG paths into filled brush strokes
    Stroke(StrokeArgs),

    /// Precompute jittered frames of a recipe
    Animate(AnimateArgs),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render(args) => cmd_render(&args),
        Commands::Styles(args) => cmd_styles(&args),
        Commands::Scribble(args) => cmd_scribble(&args),
        Commands::Stroke(args) => cmd_stroke(&args),
        Commands::Animate(args) => cmd_animate(&args),
    }
}
