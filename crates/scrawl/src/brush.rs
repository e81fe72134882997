//! Brush profiles for variable-width strokes.
//!
//! A brush has a tip (an ellipse held at an angle, which makes the stroke
//! width depend on direction) and a thickness profile (which makes it depend
//! on position along the stroke).

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Shape of the brush tip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushTip {
    /// Minor over major axis, in (0, 1]. 1 is a round tip.
    pub roundness: f64,
    /// Angle of the major axis in degrees.
    pub angle: f64,
    /// When false the tip behaves as round regardless of `roundness`.
    pub direction_sensitive: bool,
}

impl Default for BrushTip {
    fn default() -> Self {
        Self { roundness: 1.0, angle: 0.0, direction_sensitive: false }
    }
}

/// Width multiplier along the stroke, by normalized arc length `t`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "kebab-case")]
pub enum ThicknessProfile {
    #[default]
    Uniform,
    /// Ramp up from zero over the first fraction of the stroke.
    TaperIn(f64),
    /// Ramp down to zero over the last fraction of the stroke.
    TaperOut(f64),
    /// Taper in over the first fraction and out over the second.
    TaperBoth(f64, f64),
    /// Pen pressure samples, evenly spaced along the stroke, in [0, 1].
    Pressure(Vec<f64>),
    /// Arbitrary multipliers, evenly spaced along the stroke.
    Custom(Vec<f64>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineJoin {
    Miter,
    #[default]
    Round,
    Bevel,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushProfile {
    pub tip: BrushTip,
    pub thickness: ThicknessProfile,
    pub cap: LineCap,
    pub join: LineJoin,
}

/// Roundness at or above this is treated as a circular tip.
const ROUND_TIP: f64 = 0.999;

fn ramp(t: f64, fraction: f64) -> f64 {
    if fraction <= 0.0 {
        1.0
    } else {
        (t / fraction).clamp(0.0, 1.0)
    }
}

/// Linear interpolation through evenly spaced samples.
fn interpolate(values: &[f64], t: f64) -> f64 {
    match values {
        [] => 1.0,
        [only] => *only,
        _ => {
            let pos = t.clamp(0.0, 1.0) * (values.len() - 1) as f64;
            let i = (pos.floor() as usize).min(values.len() - 2);
            let frac = pos - i as f64;
            values[i] + (values[i + 1] - values[i]) * frac
        }
    }
}

impl ThicknessProfile {
    /// Width multiplier at normalized arc length `t` in [0, 1].
    pub fn multiplier(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            ThicknessProfile::Uniform => 1.0,
            ThicknessProfile::TaperIn(f) => ramp(t, *f),
            ThicknessProfile::TaperOut(f) => ramp(1.0 - t, *f),
            ThicknessProfile::TaperBoth(fin, fout) => ramp(t, *fin).min(ramp(1.0 - t, *fout)),
            ThicknessProfile::Pressure(values) => interpolate(values, t).clamp(0.0, 1.0),
            ThicknessProfile::Custom(values) => interpolate(values, t).max(0.0),
        }
    }
}

impl BrushTip {
    /// A round tip: width never depends on direction.
    pub fn round() -> Self {
        Self::default()
    }

    /// A flat nib held at `angle` degrees.
    pub fn flat(roundness: f64, angle: f64) -> Self {
        Self { roundness, angle, direction_sensitive: true }
    }

    #[inline]
    pub fn is_round(&self) -> bool {
        !self.direction_sensitive || self.roundness >= ROUND_TIP
    }

    /// Width the tip paints when moving along `tangent_angle` (radians).
    ///
    /// The tip is an ellipse with semi-axes `a = width / 2` along the brush
    /// angle and `b = a * roundness`; the result is the ellipse's diameter
    /// in the direction of travel.
    pub fn effective_width(&self, width: f64, tangent_angle: f64) -> f64 {
        if self.is_round() {
            return width;
        }
        let a = width / 2.0;
        let b = a * self.roundness;
        let theta = tangent_angle - self.angle.to_radians();
        let denom = ((b * theta.cos()).powi(2) + (a * theta.sin()).powi(2)).sqrt();
        if denom < 1e-12 {
            return width;
        }
        2.0 * a * b / denom
    }
}

impl BrushProfile {
    /// Uniform round brush.
    pub fn round() -> Self {
        Self::default()
    }

    /// Flat nib at `angle` degrees, the classic broad-edge pen.
    pub fn calligraphy(angle: f64) -> Self {
        Self {
            tip: BrushTip::flat(0.25, angle),
            cap: LineCap::Butt,
            join: LineJoin::Bevel,
            ..Self::default()
        }
    }

    /// Round brush that fades in and out over a quarter of the stroke each.
    pub fn tapered() -> Self {
        Self { thickness: ThicknessProfile::TaperBoth(0.25, 0.25), ..Self::default() }
    }

    pub fn with_thickness(mut self, thickness: ThicknessProfile) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    pub fn with_join(mut self, join: LineJoin) -> Self {
        self.join = join;
        self
    }

    /// Width at normalized position `t` moving along `tangent_angle` radians.
    pub fn width_at(&self, base_width: f64, t: f64, tangent_angle: f64) -> f64 {
        let width = base_width * self.thickness.multiplier(t);
        self.tip.effective_width(width, tangent_angle)
    }

    /// A copy with the tip roundness forced into (0, 1].
    pub fn sanitized(&self) -> BrushProfile {
        let mut brush = self.clone();
        let r = brush.tip.roundness;
        let fixed = if r.is_finite() { r.clamp(0.01, 1.0) } else { 1.0 };
        if fixed != r {
            debug!(from = r, to = fixed, "clamped brush tip roundness");
            brush.tip.roundness = fixed;
        }
        if !brush.tip.angle.is_finite() {
            brush.tip.angle = 0.0;
        }
        brush
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn uniform_is_one_everywhere() {
        for t in [0.0, 0.3, 1.0] {
            assert_eq!(ThicknessProfile::Uniform.multiplier(t), 1.0);
        }
    }

    #[test]
    fn tapers_ramp_linearly() {
        let taper_in = ThicknessProfile::TaperIn(0.2);
        assert_eq!(taper_in.multiplier(0.0), 0.0);
        assert!((taper_in.multiplier(0.1) - 0.5).abs() < 1e-12);
        assert_eq!(taper_in.multiplier(0.5), 1.0);

        let taper_out = ThicknessProfile::TaperOut(0.2);
        assert_eq!(taper_out.multiplier(1.0), 0.0);
        assert_eq!(taper_out.multiplier(0.5), 1.0);

        let both = ThicknessProfile::TaperBoth(0.5, 0.5);
        assert!((both.multiplier(0.5) - 1.0).abs() < 1e-12);
        assert!((both.multiplier(0.25) - 0.5).abs() < 1e-12);
        assert!((both.multiplier(0.75) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn pressure_interpolates_and_clamps() {
        let p = ThicknessProfile::Pressure(vec![0.0, 1.0, 3.0]);
        assert!((p.multiplier(0.25) - 0.5).abs() < 1e-12);
        assert_eq!(p.multiplier(1.0), 1.0);
        assert_eq!(ThicknessProfile::Custom(vec![]).multiplier(0.4), 1.0);
        assert_eq!(ThicknessProfile::Custom(vec![2.0]).multiplier(0.4), 2.0);
    }

    #[test]
    fn round_tip_keeps_width() {
        let tip = BrushTip::round();
        assert_eq!(tip.effective_width(8.0, 1.234), 8.0);
        let insensitive = BrushTip { roundness: 0.2, angle: 30.0, direction_sensitive: false };
        assert_eq!(insensitive.effective_width(8.0, 1.234), 8.0);
    }

    #[test]
    fn flat_tip_width_depends_on_direction() {
        let tip = BrushTip::flat(0.25, 0.0);
        let along = tip.effective_width(8.0, 0.0);
        let across = tip.effective_width(8.0, FRAC_PI_2);
        assert!((along - 8.0).abs() < 1e-9, "got {along}");
        assert!((across - 2.0).abs() < 1e-9, "got {across}");
    }

    #[test]
    fn sanitized_fixes_roundness() {
        let mut brush = BrushProfile::calligraphy(45.0);
        brush.tip.roundness = 0.0;
        assert_eq!(brush.sanitized().tip.roundness, 0.01);
        brush.tip.roundness = 7.0;
        assert_eq!(brush.sanitized().tip.roundness, 1.0);
    }
}
