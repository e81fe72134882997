//! Rendering configuration.
//!
//! `RenderOptions` is the one record every generator reads. It deserializes
//! with defaults for every missing field, so a recipe only needs to name the
//! values it changes.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::brush::BrushProfile;

/// Smallest scan-line gap any filler will use.
pub const MIN_FILL_GAP: f64 = 0.1;

/// Largest corner rounding the scribble generator accepts.
pub const MAX_SCRIBBLE_CURVATURE: f64 = 0.5;

/// How the interior of a shape is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillStyle {
    #[default]
    Hachure,
    Solid,
    Zigzag,
    CrossHatch,
    Dots,
    Dashed,
    ZigzagLine,
    SunBurst,
    StarBurst,
    Scribble,
}

impl FillStyle {
    pub const ALL: [FillStyle; 10] = [
        FillStyle::Hachure,
        FillStyle::Solid,
        FillStyle::Zigzag,
        FillStyle::CrossHatch,
        FillStyle::Dots,
        FillStyle::Dashed,
        FillStyle::ZigzagLine,
        FillStyle::SunBurst,
        FillStyle::StarBurst,
        FillStyle::Scribble,
    ];

    /// Kebab-case name, as used in recipes and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            FillStyle::Hachure => "hachure",
            FillStyle::Solid => "solid",
            FillStyle::Zigzag => "zigzag",
            FillStyle::CrossHatch => "cross-hatch",
            FillStyle::Dots => "dots",
            FillStyle::Dashed => "dashed",
            FillStyle::ZigzagLine => "zigzag-line",
            FillStyle::SunBurst => "sun-burst",
            FillStyle::StarBurst => "star-burst",
            FillStyle::Scribble => "scribble",
        }
    }

    /// Parse a name as produced by [`FillStyle::name`]. Underscores and case are ignored.
    pub fn from_name(name: &str) -> Option<FillStyle> {
        let wanted = name.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL.into_iter().find(|style| style.name() == wanted)
    }

    pub fn description(&self) -> &'static str {
        match self {
            FillStyle::Hachure => "Parallel rough lines at the fill angle",
            FillStyle::Solid => "Exact filled polygon",
            FillStyle::Zigzag => "Hachure lines joined end to end",
            FillStyle::CrossHatch => "Hachure plus a second pass at 90 degrees",
            FillStyle::Dots => "Rough dots placed along horizontal guides",
            FillStyle::Dashed => "Hachure lines broken into dashes",
            FillStyle::ZigzagLine => "Each hachure line drawn as a zigzag",
            FillStyle::SunBurst => "Rays from the centroid to the boundary",
            FillStyle::StarBurst => "Sun burst with every other ray shortened",
            FillStyle::Scribble => "Continuous zigzag stroke across the shape",
        }
    }
}

impl std::fmt::Display for FillStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration problems reported by [`RenderOptions::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptionsError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("curve_step_count must be at least 1, got {0}")]
    CurveStepCount(f64),

    #[error("scribble_curvature must be within 0..={max}, got {value}", max = MAX_SCRIBBLE_CURVATURE)]
    ScribbleCurvature { value: f64 },

    #[error("brush tip roundness must be in (0, 1], got {0}")]
    BrushRoundness(f64),

    #[error("{field} must not be empty")]
    EmptyPattern { field: &'static str },
}

/// Every knob of the sketchy renderer.
///
/// Angles are in degrees. Defaults follow rough.js.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Amount of random displacement. 0 draws exact geometry.
    pub roughness: f64,
    /// How much straight lines arc.
    pub bowing: f64,
    pub max_randomness_offset: f64,
    pub stroke_width: f64,
    /// 0 gives loose Catmull-Rom curves, 1 gives straight segments.
    pub curve_tightness: f64,
    /// Base number of points per ellipse pass.
    pub curve_step_count: f64,
    /// How closely rough ellipses follow the true radius.
    pub curve_fitting: f64,

    pub fill_style: FillStyle,
    /// Stroke width of fill lines.
    pub fill_weight: f64,
    /// Scan-line angle.
    pub fill_angle: f64,
    /// Gap between fill lines, in multiples of `fill_weight`.
    pub fill_spacing: f64,
    /// Per-section multipliers of `fill_spacing`, spread evenly across the shape.
    pub fill_spacing_pattern: Option<Vec<f64>>,
    /// Dash length; defaults to the fill gap.
    pub dash_offset: Option<f64>,
    /// Space between dashes; defaults to the fill gap.
    pub dash_gap: Option<f64>,
    /// Zigzag amplitude for `zigzag-line`; defaults to the fill gap.
    pub zigzag_offset: Option<f64>,

    /// Direction of scribble strokes.
    pub scribble_origin: f64,
    /// Number of scribble vertices across the shape.
    pub scribble_tightness: usize,
    /// Corner rounding, 0 to 0.5.
    pub scribble_curvature: f64,
    /// Per-section vertex counts, overriding `scribble_tightness`.
    pub scribble_tightness_pattern: Option<Vec<usize>>,

    /// Draw the outline as a filled brush stroke instead of rough lines.
    pub brush_profile: Option<BrushProfile>,

    /// Fixed seed for reproducible drawings; the clock is used when absent.
    pub seed: Option<u64>,
    pub disable_multi_stroke: bool,
    pub disable_multi_stroke_fill: bool,
    /// Keep polygon and path vertices where they are; only the lines between wobble.
    pub preserve_vertices: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            roughness: 1.0,
            bowing: 1.0,
            max_randomness_offset: 2.0,
            stroke_width: 1.0,
            curve_tightness: 0.0,
            curve_step_count: 9.0,
            curve_fitting: 0.95,
            fill_style: FillStyle::Hachure,
            fill_weight: 0.5,
            fill_angle: -41.0,
            fill_spacing: 8.0,
            fill_spacing_pattern: None,
            dash_offset: None,
            dash_gap: None,
            zigzag_offset: None,
            scribble_origin: 0.0,
            scribble_tightness: 10,
            scribble_curvature: 0.0,
            scribble_tightness_pattern: None,
            brush_profile: None,
            seed: None,
            disable_multi_stroke: false,
            disable_multi_stroke_fill: false,
            preserve_vertices: false,
        }
    }
}

impl RenderOptions {
    pub fn with_roughness(mut self, roughness: f64) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn with_bowing(mut self, bowing: f64) -> Self {
        self.bowing = bowing;
        self
    }

    pub fn with_fill_style(mut self, style: FillStyle) -> Self {
        self.fill_style = style;
        self
    }

    pub fn with_fill_angle(mut self, degrees: f64) -> Self {
        self.fill_angle = degrees;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set `fill_weight` and `fill_spacing` so the scan-line gap equals `gap`.
    pub fn with_fill_gap(mut self, gap: f64) -> Self {
        self.fill_weight = 1.0;
        self.fill_spacing = gap;
        self
    }

    pub fn with_brush(mut self, brush: BrushProfile) -> Self {
        self.brush_profile = Some(brush);
        self
    }

    /// Distance between scan lines.
    #[inline]
    pub fn fill_gap(&self) -> f64 {
        (self.fill_weight * self.fill_spacing).max(MIN_FILL_GAP)
    }

    pub fn dash_offset_or_gap(&self) -> f64 {
        self.dash_offset.filter(|v| *v > 0.0).unwrap_or_else(|| self.fill_gap())
    }

    pub fn dash_gap_or_gap(&self) -> f64 {
        self.dash_gap.filter(|v| *v > 0.0).unwrap_or_else(|| self.fill_gap())
    }

    pub fn zigzag_offset_or_gap(&self) -> f64 {
        self.zigzag_offset.filter(|v| *v > 0.0).unwrap_or_else(|| self.fill_gap())
    }

    /// Check every field, reporting the first problem found.
    pub fn validate(&self) -> Result<(), OptionsError> {
        let numbers = [
            ("roughness", self.roughness),
            ("bowing", self.bowing),
            ("max_randomness_offset", self.max_randomness_offset),
            ("stroke_width", self.stroke_width),
            ("curve_tightness", self.curve_tightness),
            ("curve_step_count", self.curve_step_count),
            ("curve_fitting", self.curve_fitting),
            ("fill_weight", self.fill_weight),
            ("fill_angle", self.fill_angle),
            ("fill_spacing", self.fill_spacing),
            ("scribble_origin", self.scribble_origin),
            ("scribble_curvature", self.scribble_curvature),
        ];
        for (field, value) in numbers {
            if !value.is_finite() {
                return Err(OptionsError::NotFinite { field, value });
            }
        }

        for (field, value) in [
            ("roughness", self.roughness),
            ("max_randomness_offset", self.max_randomness_offset),
            ("stroke_width", self.stroke_width),
        ] {
            if value < 0.0 {
                return Err(OptionsError::Negative { field, value });
            }
        }
        for (field, value) in [("fill_weight", self.fill_weight), ("fill_spacing", self.fill_spacing)] {
            if value <= 0.0 {
                return Err(OptionsError::NotPositive { field, value });
            }
        }
        for (field, value) in [
            ("dash_offset", self.dash_offset),
            ("dash_gap", self.dash_gap),
            ("zigzag_offset", self.zigzag_offset),
        ] {
            if let Some(value) = value {
                if !value.is_finite() || value <= 0.0 {
                    return Err(OptionsError::NotPositive { field, value });
                }
            }
        }

        if self.curve_step_count < 1.0 {
            return Err(OptionsError::CurveStepCount(self.curve_step_count));
        }
        if !(0.0..=MAX_SCRIBBLE_CURVATURE).contains(&self.scribble_curvature) {
            return Err(OptionsError::ScribbleCurvature { value: self.scribble_curvature });
        }
        if self.scribble_tightness == 0 {
            return Err(OptionsError::NotPositive { field: "scribble_tightness", value: 0.0 });
        }

        if let Some(pattern) = &self.fill_spacing_pattern {
            if pattern.is_empty() {
                return Err(OptionsError::EmptyPattern { field: "fill_spacing_pattern" });
            }
            if let Some(bad) = pattern.iter().find(|v| !v.is_finite() || **v <= 0.0) {
                return Err(OptionsError::NotPositive { field: "fill_spacing_pattern", value: *bad });
            }
        }
        if let Some(pattern) = &self.scribble_tightness_pattern {
            if pattern.is_empty() {
                return Err(OptionsError::EmptyPattern { field: "scribble_tightness_pattern" });
            }
        }

        if let Some(brush) = &self.brush_profile {
            let roundness = brush.tip.roundness;
            if !(roundness > 0.0 && roundness <= 1.0) {
                return Err(OptionsError::BrushRoundness(roundness));
            }
        }

        Ok(())
    }

    /// A copy with every out-of-range value clamped into range.
    ///
    /// Generators call this once on entry, so downstream code can rely on
    /// `roughness >= 0`, `curve_step_count >= 1`, positive spacing and a
    /// brush roundness in (0, 1].
    pub fn sanitized(&self) -> RenderOptions {
        let mut o = self.clone();

        fn clamp_field(name: &str, value: &mut f64, min: f64, max: f64, fallback: f64) {
            let fixed = if value.is_finite() { value.clamp(min, max) } else { fallback };
            if fixed != *value {
                debug!(field = name, from = *value, to = fixed, "clamped render option");
                *value = fixed;
            }
        }

        clamp_field("roughness", &mut o.roughness, 0.0, f64::MAX, 1.0);
        clamp_field("bowing", &mut o.bowing, f64::MIN, f64::MAX, 1.0);
        clamp_field("max_randomness_offset", &mut o.max_randomness_offset, 0.0, f64::MAX, 2.0);
        clamp_field("stroke_width", &mut o.stroke_width, 0.0, f64::MAX, 1.0);
        clamp_field("curve_tightness", &mut o.curve_tightness, f64::MIN, f64::MAX, 0.0);
        clamp_field("curve_step_count", &mut o.curve_step_count, 1.0, f64::MAX, 9.0);
        clamp_field("curve_fitting", &mut o.curve_fitting, 0.0, 1.0, 0.95);
        clamp_field("fill_weight", &mut o.fill_weight, 0.01, f64::MAX, 0.5);
        clamp_field("fill_angle", &mut o.fill_angle, f64::MIN, f64::MAX, -41.0);
        clamp_field("fill_spacing", &mut o.fill_spacing, 0.01, f64::MAX, 8.0);
        clamp_field("scribble_origin", &mut o.scribble_origin, f64::MIN, f64::MAX, 0.0);
        clamp_field("scribble_curvature", &mut o.scribble_curvature, 0.0, MAX_SCRIBBLE_CURVATURE, 0.0);

        if o.scribble_tightness == 0 {
            debug!("scribble_tightness of 0 raised to 1");
            o.scribble_tightness = 1;
        }

        if let Some(pattern) = &mut o.fill_spacing_pattern {
            pattern.retain(|v| v.is_finite() && *v > 0.0);
            if pattern.is_empty() {
                debug!("dropping fill_spacing_pattern without usable entries");
                o.fill_spacing_pattern = None;
            }
        }
        if o.scribble_tightness_pattern.as_ref().is_some_and(|p| p.is_empty()) {
            debug!("dropping empty scribble_tightness_pattern");
            o.scribble_tightness_pattern = None;
        }
        for (name, value) in [
            ("dash_offset", &mut o.dash_offset),
            ("dash_gap", &mut o.dash_gap),
            ("zigzag_offset", &mut o.zigzag_offset),
        ] {
            if value.is_some_and(|v| !v.is_finite() || v <= 0.0) {
                debug!(field = name, "ignoring non-positive value, the fill gap is used instead");
                *value = None;
            }
        }

        if let Some(brush) = &mut o.brush_profile {
            *brush = brush.sanitized();
        }

        o
    }
}
