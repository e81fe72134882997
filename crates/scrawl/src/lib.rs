//! # scrawl
//!
//! Hand-drawn geometry: rough strokes, pattern fills, scribbles and
//! brush-stroked outlines, produced as plain drawing operations.
//!
//! ```
//! use scrawl::{Generator, RenderOptions, Shape, Point};
//!
//! let mut generator = Generator::new(RenderOptions::default().with_seed(1));
//! let drawing = generator.generate(&Shape::Circle { center: Point::new(50.0, 50.0), diameter: 80.0 });
//! assert_eq!(drawing.sets.len(), 2); // hachure fill, then the outline
//! ```
//!
//! ## Rust Lesson #7: Modules
//!
//! Rust modules are declared, not discovered:
//! - `mod foo;` = load from `foo.rs` or `foo/mod.rs`
//! - `pub mod foo;` = also export it publicly
//! - `pub use foo::Bar;` = re-export Bar at this level
//!
//! The leaves (`geometry`, `rng`, `ops`) know nothing about the modules
//! that use them; `generator` at the top knows about everything.

pub mod brush;
pub mod clip;
pub mod fill;
pub mod flatten;
pub mod generator;
pub mod geometry;
pub mod ops;
pub mod options;
pub mod rng;
pub mod rough;
pub mod scribble;
pub mod shape;
pub mod stroke;
pub mod variance;

// Re-export common types at crate root for convenience.
pub use brush::{BrushProfile, BrushTip, LineCap, LineJoin, ThicknessProfile};
pub use fill::{FillGenerator, filler_for};
pub use generator::{Drawing, Generator};
pub use geometry::{FillLine, Point, Size};
pub use ops::{Operation, OperationSet, PathKind};
pub use options::{FillStyle, OptionsError, RenderOptions};
pub use rng::Rng;
pub use rough::RoughContext;
pub use scribble::{ScribbleParams, scribble};
pub use shape::{FullBleed, Shape, ShapeSpec};
pub use stroke::{SamplingConfig, stroke_to_fill};
pub use variance::PathVariance;
