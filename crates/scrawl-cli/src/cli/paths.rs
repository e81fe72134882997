//! Scribble and stroke commands: operate on paths given as SVG.

use anyhow::{Context, Result, bail};
use clap::{Args, ValueEnum};
use tracing::{debug, info};

use scrawl::{
    BrushProfile, LineCap, LineJoin, Operation, OperationSet, RenderOptions, SamplingConfig, ScribbleParams,
    ThicknessProfile, scribble, stroke_to_fill,
};

use super::common::{OutputArgs, Palette, fitted_size, set_to_svg, svg_document};
use super::input::load_paths;

/// Margin around path output, which has no canvas of its own.
const MARGIN: f64 = 10.0;

/// Where the input path comes from.
#[derive(Debug, Clone, Args)]
pub struct PathInput {
    /// SVG path data, e.g. "M10 10 L90 10 L50 80 Z"
    #[arg(long, value_name = "PATH_DATA", allow_hyphen_values = true)]
    pub d: Option<String>,

    /// SVG file whose paths are used (- for stdin)
    #[arg(long, value_name = "FILE")]
    pub svg: Option<std::path::PathBuf>,
}

impl PathInput {
    fn load(&self) -> Result<Vec<Vec<Operation>>> {
        load_paths(self.d.as_deref(), self.svg.as_deref())
    }
}

#[derive(Debug, Clone, Args)]
pub struct ScribbleArgs {
    #[command(flatten)]
    pub input: PathInput,

    /// Stroke direction in degrees (0 sweeps left to right)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub origin: f64,

    /// Number of vertices across the shape
    #[arg(short, long, default_value_t = 10)]
    pub tightness: usize,

    /// Per-section vertex counts, comma separated (overrides --tightness)
    #[arg(long, value_delimiter = ',')]
    pub pattern: Vec<usize>,

    /// Corner rounding, 0 to 0.5
    #[arg(short, long, default_value_t = 0.0)]
    pub curvature: f64,

    /// Also draw the source path
    #[arg(long)]
    pub show_path: bool,

    #[command(flatten)]
    pub out: OutputArgs,
}

/// Execute the scribble command.
pub fn cmd_scribble(args: &ScribbleArgs) -> Result<()> {
    let options = RenderOptions {
        scribble_origin: args.origin,
        scribble_tightness: args.tightness,
        scribble_curvature: args.curvature,
        scribble_tightness_pattern: (!args.pattern.is_empty()).then(|| args.pattern.clone()),
        ..RenderOptions::default()
    };
    options.validate().context("invalid scribble settings")?;
    let params = ScribbleParams::from_options(&options);

    let paths = args.input.load()?;
    let mut sets = Vec::new();
    for (i, path) in paths.iter().enumerate() {
        let strokes = scribble(path, &params);
        debug!(path = i, strokes = strokes.len(), "scribbled path");
        sets.extend(strokes);
    }
    if sets.is_empty() {
        bail!("nothing to scribble: the input encloses no area");
    }
    info!(paths = paths.len(), strokes = sets.len(), "scribble complete");

    if args.show_path {
        sets.extend(paths.into_iter().map(OperationSet::outline));
    }
    let size = fitted_size(&sets, MARGIN);
    args.out.write(|| sets_to_document(&sets, size, 1.0), &sets, size)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BrushPreset {
    /// Uniform round brush
    Round,
    /// Flat nib held at --angle
    Calligraphy,
    /// Round brush fading in and out
    Tapered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CapArg {
    Butt,
    Round,
    Square,
}

impl From<CapArg> for LineCap {
    fn from(cap: CapArg) -> Self {
        match cap {
            CapArg::Butt => LineCap::Butt,
            CapArg::Round => LineCap::Round,
            CapArg::Square => LineCap::Square,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum JoinArg {
    Miter,
    Round,
    Bevel,
}

impl From<JoinArg> for LineJoin {
    fn from(join: JoinArg) -> Self {
        match join {
            JoinArg::Miter => LineJoin::Miter,
            JoinArg::Round => LineJoin::Round,
            JoinArg::Bevel => LineJoin::Bevel,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct StrokeArgs {
    #[command(flatten)]
    pub input: PathInput,

    /// Base stroke width
    #[arg(short, long, default_value_t = 6.0)]
    pub width: f64,

    /// Brush preset
    #[arg(short, long, value_enum, default_value_t = BrushPreset::Round)]
    pub brush: BrushPreset,

    /// Nib angle in degrees, for the calligraphy brush
    #[arg(long, default_value_t = 30.0, allow_hyphen_values = true)]
    pub angle: f64,

    /// Taper in and out over these fractions of the stroke, e.g. 0.2,0.4
    #[arg(long, value_delimiter = ',', num_args = 1..=2)]
    pub taper: Vec<f64>,

    /// End cap (defaults to the brush's own)
    #[arg(long, value_enum)]
    pub cap: Option<CapArg>,

    /// Corner join (defaults to the brush's own)
    #[arg(long, value_enum)]
    pub join: Option<JoinArg>,

    /// Distance between width samples along the path
    #[arg(long, default_value_t = 4.0)]
    pub spacing: f64,

    /// Also draw the centerline
    #[arg(long)]
    pub show_path: bool,

    #[command(flatten)]
    pub out: OutputArgs,
}

impl StrokeArgs {
    fn brush(&self) -> BrushProfile {
        let mut brush = match self.brush {
            BrushPreset::Round => BrushProfile::round(),
            BrushPreset::Calligraphy => BrushProfile::calligraphy(self.angle),
            BrushPreset::Tapered => BrushProfile::tapered(),
        };
        match self.taper[..] {
            [] => {}
            [both] => brush = brush.with_thickness(ThicknessProfile::TaperBoth(both, both)),
            [start, end, ..] => brush = brush.with_thickness(ThicknessProfile::TaperBoth(start, end)),
        }
        if let Some(cap) = self.cap {
            brush = brush.with_cap(cap.into());
        }
        if let Some(join) = self.join {
            brush = brush.with_join(join.into());
        }
        brush
    }

    fn sampling(&self) -> SamplingConfig {
        SamplingConfig { spacing: self.spacing, ..SamplingConfig::default() }
    }
}

/// Execute the stroke command.
pub fn cmd_stroke(args: &StrokeArgs) -> Result<()> {
    if !(args.width > 0.0) || !args.width.is_finite() {
        bail!("stroke width must be positive, got {}", args.width);
    }
    if !(args.spacing > 0.0) || !args.spacing.is_finite() {
        bail!("sample spacing must be positive, got {}", args.spacing);
    }
    let brush = args.brush().sanitized();
    let config = args.sampling();

    let paths = args.input.load()?;
    let mut sets: Vec<OperationSet> = Vec::with_capacity(paths.len());
    for (i, path) in paths.iter().enumerate() {
        match stroke_to_fill(path, &brush, args.width, &config) {
            Some(set) => sets.push(set),
            None => debug!(path = i, "path too short to stroke"),
        }
    }
    if sets.is_empty() {
        bail!("nothing to stroke: every input path is degenerate");
    }
    info!(paths = paths.len(), outlines = sets.len(), "stroke complete");

    if args.show_path {
        sets.extend(paths.into_iter().map(OperationSet::outline));
    }
    let size = fitted_size(&sets, MARGIN + args.width);
    args.out.write(|| sets_to_document(&sets, size, 0.5), &sets, size)
}

fn sets_to_document(sets: &[OperationSet], size: scrawl::Size, weight: f64) -> String {
    let palette = Palette::default();
    let mut body = String::from("  <g stroke-linecap=\"round\" stroke-linejoin=\"round\">\n");
    for (i, set) in sets.iter().enumerate() {
        body.push_str(&set_to_svg(set, weight, weight, &palette, &format!("clip-{i}")));
    }
    body.push_str("  </g>\n");
    svg_document(size, Some("white"), None, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        stroke: StrokeArgs,
    }

    fn stroke_args(extra: &[&str]) -> StrokeArgs {
        let mut argv = vec!["test", "--d", "M0 0 L100 0"];
        argv.extend_from_slice(extra);
        Harness::parse_from(argv).stroke
    }

    #[test]
    fn presets_pick_their_brush() {
        assert_eq!(stroke_args(&[]).brush(), BrushProfile::round());
        assert_eq!(stroke_args(&["--brush", "tapered"]).brush(), BrushProfile::tapered());
        assert_eq!(
            stroke_args(&["--brush", "calligraphy", "--angle", "45"]).brush(),
            BrushProfile::calligraphy(45.0)
        );
    }

    #[test]
    fn overrides_apply_on_top_of_the_preset() {
        let brush = stroke_args(&["--brush", "calligraphy", "--cap", "round", "--join", "miter", "--taper", "0.1,0.3"])
            .brush();
        assert_eq!(brush.cap, LineCap::Round);
        assert_eq!(brush.join, LineJoin::Miter);
        assert_eq!(brush.thickness, ThicknessProfile::TaperBoth(0.1, 0.3));

        let single = stroke_args(&["--taper", "0.2"]).brush();
        assert_eq!(single.thickness, ThicknessProfile::TaperBoth(0.2, 0.2));
    }

    #[test]
    fn document_contains_every_set() {
        let paths = load_paths(Some("M0 0 L100 0 L100 100 Z"), None).unwrap();
        let sets = scribble(&paths[0], &ScribbleParams::default());
        let size = fitted_size(&sets, MARGIN);
        let svg = sets_to_document(&sets, size, 1.0);
        assert_eq!(svg.matches("<path").count(), sets.len());
    }
}
