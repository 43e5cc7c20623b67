//! Fractal geometry and escape-time field generation for plotters and
//! rasterizers.
//!
//! This library grows three families of fractals from declarative
//! definitions: L-system turtle figures, affine iterated-function-system
//! (IFS) attractors, and generalized escape-time sets ("TEA": any
//! user-written recurrence over a complex-plane grid, with Mandelbrot and
//! Julia as the familiar special cases). It deliberately stops at geometry
//! and numbers: the outputs are segment lists, point-figures and iteration
//! grids (plus hex color ramps for the grids), ready to hand to whatever
//! draws or exports them.
//!
//! Everything is built on [`geo_types`] geometry, so output drops straight
//! into the geo ecosystem.

/// Hex color conversion, Lagrange interpolation and color ramps for
/// escape-time fields
pub mod color;

/// Definition records, JSON key-set classification and the generate dispatch
pub mod definition;

/// Error types for every fallible corner of the crate
pub mod errors;

/// Vector helpers over geo_types points, plus a running bounding box
pub mod geometry;

/// Iterated function systems: affine maps iterated over point-figures
pub mod ifs;

/// L-system implementation, with expansion/recursion
pub mod l_system;

/// LIFO stack with an error (not a default) on empty pop
pub mod stack;

/// Escape-time grid evaluator and its recurrence-expression engine
pub mod tea;

/// Turtle graphics implementation, including integration with L-systems
pub mod turtle;

/// Make your life easy! Just import prelude::* and ignore all the warnings!
/// One stop shopping at the expense of a slightly more complex dependency graph.
pub mod prelude {
    pub use crate::color::{hsv_to_hex, lagrange_interpolate, ColorRamp};
    pub use crate::definition::{FractalDef, FractalOutput, GenerateParams};
    pub use crate::geometry::{Bounds, VectorOps};
    pub use crate::ifs::{Ifs, Transformable};
    pub use crate::l_system::LSystem;
    pub use crate::stack::Stack;
    pub use crate::tea::Tea;
    pub use crate::turtle::{degrees, Turtle};
}
