//! Common utilities shared across CLI commands: SVG and PNG output.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tracing::info;

use scrawl::{Drawing, Operation, OperationSet, PathKind, Size};

/// Output format for generated operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Svg,
    Json,
    Png,
}

/// Where and how a command writes its result.
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output file (- or omitted for stdout; required for PNG)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Svg)]
    pub format: OutputFormat,

    /// PNG pixels per canvas unit
    #[arg(long, default_value_t = 2.0)]
    pub png_scale: f64,
}

impl OutputArgs {
    #[inline]
    pub fn path(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// Write an SVG document, or its JSON counterpart, in the requested format.
    pub fn write<T: serde::Serialize + ?Sized>(&self, svg: impl FnOnce() -> String, json: &T, size: Size) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                let text = serde_json::to_string_pretty(json).context("failed to encode JSON")?;
                write_text(self.path(), &text)
            }
            format => write_svg_or_png(format, self.path(), &svg(), size, self.png_scale),
        }
    }
}

/// Colours used when writing a drawing as SVG.
#[derive(Debug, Clone)]
pub struct Palette {
    pub stroke: String,
    pub fill: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self { stroke: "#222222".to_string(), fill: "#cc4433".to_string() }
    }
}

/// Convert operations to SVG path data.
pub fn path_data(operations: &[Operation]) -> String {
    let mut d = String::with_capacity(operations.len() * 24);
    for op in operations {
        let _ = match op {
            Operation::Move(p) => write!(d, "M{:.2} {:.2} ", p.x, p.y),
            Operation::LineTo(p) => write!(d, "L{:.2} {:.2} ", p.x, p.y),
            Operation::QuadraticCurveTo { control, to } => {
                write!(d, "Q{:.2} {:.2} {:.2} {:.2} ", control.x, control.y, to.x, to.y)
            }
            Operation::CubicCurveTo { control1, control2, to } => write!(
                d,
                "C{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} ",
                control1.x, control1.y, control2.x, control2.y, to.x, to.y
            ),
        };
    }
    d.truncate(d.trim_end().len());
    d
}

/// Escape text for use in SVG attribute values and element content.
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// One `<path>` element for an operation set.
///
/// Sketched sets are stroked, solid sets are filled. A pattern fill with a
/// source path is clipped to it; `clip_id` names the clip path.
pub fn set_to_svg(set: &OperationSet, stroke_width: f64, fill_weight: f64, palette: &Palette, clip_id: &str) -> String {
    if set.is_empty() {
        return String::new();
    }
    let d = path_data(&set.operations);
    let stroke = escape_xml(&palette.stroke);
    let fill = escape_xml(&palette.fill);
    match set.kind {
        PathKind::Outline => {
            format!("    <path d=\"{d}\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\" fill=\"none\"/>\n")
        }
        PathKind::FillSketch => {
            format!("    <path d=\"{d}\" stroke=\"{fill}\" stroke-width=\"{fill_weight}\" fill=\"none\"/>\n")
        }
        PathKind::FillSolid | PathKind::RawFillPath => {
            format!("    <path d=\"{d}\" fill=\"{fill}\" fill-rule=\"evenodd\" stroke=\"none\"/>\n")
        }
        PathKind::RawFillPattern => match &set.raw_path {
            Some(raw) => format!(
                "    <clipPath id=\"{clip_id}\"><path d=\"{}\"/></clipPath>\n    <path d=\"{d}\" stroke=\"{fill}\" stroke-width=\"{fill_weight}\" fill=\"none\" clip-path=\"url(#{clip_id})\"/>\n",
                escape_xml(raw)
            ),
            None => {
                format!("    <path d=\"{d}\" stroke=\"{fill}\" stroke-width=\"{fill_weight}\" fill=\"none\"/>\n")
            }
        },
    }
}

/// A `<g>` holding every set of a drawing.
pub fn drawing_to_svg(drawing: &Drawing, palette: &Palette, id: &str) -> String {
    let mut svg = format!("  <g id=\"{id}\" stroke-linecap=\"round\" stroke-linejoin=\"round\">\n");
    for (i, set) in drawing.sets.iter().enumerate() {
        svg.push_str(&set_to_svg(
            set,
            drawing.options.stroke_width,
            drawing.options.fill_weight,
            palette,
            &format!("{id}-clip-{i}"),
        ));
    }
    svg.push_str("  </g>\n");
    svg
}

/// Wrap body elements in an SVG document of `size`.
pub fn svg_document(size: Size, background: Option<&str>, title: Option<&str>, body: &str) -> String {
    let mut svg = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
"#,
        w = size.width,
        h = size.height
    );
    if let Some(title) = title {
        svg.push_str(&format!("  <title>{}</title>\n", escape_xml(title)));
    }
    if let Some(background) = background {
        svg.push_str(&format!("  <rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n", escape_xml(background)));
    }
    svg.push_str(body);
    svg.push_str("</svg>\n");
    svg
}

/// Canvas size that fits every set, with a margin, for drawings without a canvas.
pub fn fitted_size(sets: &[OperationSet], margin: f64) -> Size {
    let bounds = sets.iter().filter_map(OperationSet::bounds).fold(None, |acc, (x0, y0, x1, y1)| match acc {
        None => Some((x0, y0, x1, y1)),
        Some((a0, b0, a1, b1)) => Some((f64::min(a0, x0), f64::min(b0, y0), f64::max(a1, x1), f64::max(b1, y1))),
    });
    match bounds {
        Some((_, _, max_x, max_y)) => Size::new((max_x + margin).ceil().max(1.0), (max_y + margin).ceil().max(1.0)),
        None => Size::new(100.0, 100.0),
    }
}

/// Rasterize SVG content to a PNG file using resvg.
pub fn svg_to_png(svg_content: &str, png_path: &Path, scale: f64, size: Size) -> Result<()> {
    use resvg::usvg;
    use tiny_skia::Pixmap;

    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg_content, &options).context("rendered SVG did not parse")?;

    let pixmap_width = (size.width * scale).ceil().max(1.0) as u32;
    let pixmap_height = (size.height * scale).ceil().max(1.0) as u32;
    let mut pixmap = Pixmap::new(pixmap_width, pixmap_height)
        .with_context(|| format!("could not create a {pixmap_width}x{pixmap_height} pixmap"))?;
    pixmap.fill(tiny_skia::Color::WHITE);

    let transform = tiny_skia::Transform::from_scale(scale as f32, scale as f32);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap
        .save_png(png_path)
        .with_context(|| format!("failed to write {}", png_path.display()))?;
    info!(path = %png_path.display(), width = pixmap_width, height = pixmap_height, "wrote PNG");
    Ok(())
}

/// Write text to `output`, or stdout when there is none or it is `-`.
pub fn write_text(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) if path != Path::new("-") => {
            fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote output");
        }
        _ => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes()).context("failed to write to stdout")?;
            stdout.flush().context("failed to flush stdout")?;
        }
    }
    Ok(())
}

/// Write an SVG document in the requested format.
///
/// PNG needs a file path; JSON is produced by the caller.
pub fn write_svg_or_png(format: OutputFormat, output: Option<&Path>, svg: &str, size: Size, scale: f64) -> Result<()> {
    match format {
        OutputFormat::Png => {
            let path = output
                .filter(|p| *p != Path::new("-"))
                .context("PNG output needs a file path (-o out.png)")?;
            svg_to_png(svg, path, scale, size)
        }
        _ => write_text(output, svg),
    }
}
