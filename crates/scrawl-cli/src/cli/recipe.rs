//! Recipe system for declarative sketchy compositions.
//!
//! Recipes are YAML files that list shapes on a canvas. Each shape is drawn
//! with the recipe's default render options, merged with its own overrides.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

use scrawl::{Drawing, FullBleed, Generator, RenderOptions, Shape, ShapeSpec, Size};

use super::common::{Palette, drawing_to_svg, svg_document};

/// A complete recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Recipe name/title
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Canvas configuration
    pub canvas: Canvas,

    /// Render options applied to every shape (can be overridden per shape)
    #[serde(default)]
    pub defaults: RenderOptions,

    /// Shapes, drawn in order (first at the bottom)
    pub shapes: Vec<RecipeShape>,
}

/// Canvas/output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,

    /// Background color (default: white)
    #[serde(default = "default_background")]
    pub background: String,
}

fn default_background() -> String {
    "white".to_string()
}

impl Canvas {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// One shape entry: either a fixed shape or a full-bleed one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Shape>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_bleed: Option<FullBleed>,

    /// Render option overrides, merged over the recipe defaults
    #[serde(default)]
    pub style: Mapping,

    /// Outline color
    #[serde(default)]
    pub stroke: Option<String>,

    /// Fill color
    #[serde(default)]
    pub fill: Option<String>,

    /// Whether this shape is drawn
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl RecipeShape {
    pub fn spec(&self) -> Result<ShapeSpec> {
        match (&self.shape, &self.full_bleed) {
            (Some(shape), None) => Ok(ShapeSpec::from(shape.clone())),
            (None, Some(bleed)) => Ok(ShapeSpec::from(*bleed)),
            (Some(_), Some(_)) => bail!("a recipe shape has both `shape` and `full_bleed`"),
            (None, None) => bail!("a recipe shape needs `shape` or `full_bleed`"),
        }
    }

    /// Recipe defaults with this shape's style overrides applied.
    pub fn options(&self, defaults: &RenderOptions) -> Result<RenderOptions> {
        if self.style.is_empty() {
            return Ok(defaults.clone());
        }
        let mut merged = match serde_yaml::to_value(defaults).context("failed to encode default options")? {
            Value::Mapping(map) => map,
            _ => Mapping::new(),
        };
        for (key, value) in &self.style {
            merged.insert(key.clone(), value.clone());
        }
        serde_yaml::from_value(Value::Mapping(merged)).context("invalid shape style")
    }

    pub fn palette(&self) -> Palette {
        let default = Palette::default();
        Palette {
            stroke: self.stroke.clone().unwrap_or(default.stroke),
            fill: self.fill.clone().unwrap_or(default.fill),
        }
    }
}

/// A drawn shape with its colors.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedShape {
    pub drawing: Drawing,
    #[serde(skip)]
    pub palette: Palette,
}

/// Result of rendering a recipe.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedRecipe {
    pub name: String,
    pub canvas: Canvas,
    pub shapes: Vec<RenderedShape>,
}

impl Recipe {
    /// Load a recipe from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).with_context(|| format!("failed to read recipe {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("failed to parse recipe {}", path.display()))
    }

    pub fn parse(yaml: &str) -> Result<Self> {
        let recipe: Recipe = serde_yaml::from_str(yaml)?;
        recipe.defaults.validate().context("invalid recipe defaults")?;
        Ok(recipe)
    }

    /// Draw every enabled shape. `seed` overrides the recipe's seed.
    pub fn render(&self, seed: Option<u64>) -> Result<RenderedRecipe> {
        let mut defaults = self.defaults.clone();
        if seed.is_some() {
            defaults.seed = seed;
        }
        let size = self.canvas.size();
        let mut generator = Generator::new(defaults.clone());

        let mut shapes = Vec::with_capacity(self.shapes.len());
        for (i, entry) in self.shapes.iter().enumerate() {
            if !entry.enabled {
                debug!(index = i, "skipping disabled shape");
                continue;
            }
            let shape = entry.spec().with_context(|| format!("shape #{}", i + 1))?.resolve(size);
            let options = entry.options(&defaults).with_context(|| format!("shape #{}", i + 1))?;
            let drawing = generator.generate_with(&shape, &options);
            shapes.push(RenderedShape { drawing, palette: entry.palette() });
        }

        info!(recipe = %self.name, shapes = shapes.len(), "rendered recipe");
        Ok(RenderedRecipe { name: self.name.clone(), canvas: self.canvas.clone(), shapes })
    }
}

impl RenderedRecipe {
    /// Export to SVG string.
    pub fn to_svg(&self) -> String {
        let body: String = self
            .shapes
            .iter()
            .enumerate()
            .map(|(i, shape)| drawing_to_svg(&shape.drawing, &shape.palette, &format!("shape-{i}")))
            .collect();
        svg_document(self.canvas.size(), Some(&self.canvas.background), Some(&self.name), &body)
    }

    pub fn drawings(&self) -> Vec<&Drawing> {
        self.shapes.iter().map(|s| &s.drawing).collect()
    }
}

/// An example recipe, printed by `render --example`.
pub const EXAMPLE_RECIPE: &str = r##"# Example scrawl recipe
name: "Sketchbook"
description: "A few hand-drawn shapes"

canvas:
  width: 400
  height: 300
  background: "#fdfaf3"

defaults:
  roughness: 1.5
  fill_weight: 0.75
  seed: 42

shapes:
  - full_bleed: { type: rounded-rectangle, radius: 24 }
    style: { fill_style: dots, fill_spacing: 12 }
    fill: "#e0d8c8"

  - shape: { type: circle, center: { x: 110, y: 120 }, diameter: 140 }
    style: { fill_style: zigzag, fill_angle: 30 }
    fill: "#cc4433"

  - shape: { type: egg, center: { x: 280, y: 140 }, width: 110, height: 150, tilt: 0.25 }
    style: { fill_style: scribble, scribble_tightness: 18, scribble_curvature: 0.3 }
    fill: "#3366aa"

  - shape:
      type: polygon
      points: [{ x: 60, y: 260 }, { x: 200, y: 220 }, { x: 340, y: 270 }]
    style: { fill_style: cross-hatch }
"##;
