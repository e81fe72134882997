//! CLI command implementations.
//!
//! - `render` - Draw a recipe as SVG, JSON or PNG
//! - `styles` - List the fill styles
//! - `scribble` - Scribble-fill SVG paths
//! - `stroke` - Turn SVG paths into brush-stroked outlines
//! - `animate` - Precompute jittered frames of a recipe

pub mod animate;
pub mod common;
pub mod input;
pub mod paths;
pub mod recipe;
pub mod render;
pub mod styles;

pub use animate::{AnimateArgs, cmd_animate};
pub use paths::{ScribbleArgs, StrokeArgs, cmd_scribble, cmd_stroke};
pub use render::{RenderArgs, cmd_render};
pub use styles::{StylesArgs, cmd_styles};
