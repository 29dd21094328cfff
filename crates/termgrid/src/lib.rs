#![forbid(unsafe_code)]
//! termgrid public facade crate.
//!
//! # Role in termgrid
//! This crate is the user-facing entry point for the ecosystem. It
//! re-exports the commonly used types from the internal crates
//! (core/style/render/layout/text) so application code does not need to
//! wire each crate individually.
//!
//! # What belongs here
//! - Stable public surface area (re-exports).
//! - A lightweight prelude for day-to-day use.
//!
//! If you only depend on one crate, it should be `termgrid`.

// --- Core re-exports --------------------------------------------------------

pub use termgrid_core::{Axis, CoreError, GraphemeCluster, Margin, Point, Rect, Wcwidth, WidthMethod};

// --- Style re-exports --------------------------------------------------------

pub use termgrid_style::{Attributes, Color, Link, NamedColor, Rgb, Style, UnderlineStyle};

// --- Render re-exports -------------------------------------------------------

pub use termgrid_render::{Cell, DiffRenderer, GraphemeBuf, Lru, RenderError, ScreenBuffer};

// --- Layout re-exports -------------------------------------------------------

pub use termgrid_layout::{
    CassowaryConstraint, Constraint, Flex, LayoutEngine, LayoutError, LayoutRequest, RelOp,
    Solver, SolverError, Spacing, Symbol,
};

// --- Text re-exports ---------------------------------------------------------

pub use termgrid_text::{wrap_text, wrap_with_options, Paragraph, StyledString, WrapMode, WrapOptions};

pub use termgrid_core as core;
pub use termgrid_layout as layout;
pub use termgrid_render as render;
pub use termgrid_style as style;
pub use termgrid_text as text;

/// Commonly used types for a `use termgrid::prelude::*;` import.
pub mod prelude {
    pub use crate::{
        Cell, Color, Constraint, DiffRenderer, Flex, LayoutEngine, LayoutRequest, Link, Margin,
        Paragraph, Point, Rect, ScreenBuffer, Style, StyledString, WidthMethod,
    };
}
