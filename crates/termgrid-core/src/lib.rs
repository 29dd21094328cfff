#![forbid(unsafe_code)]
//! Geometry, width measurement, and grapheme iteration shared by the rest
//! of the termgrid workspace.

pub mod error;
pub mod geometry;
pub mod grapheme;
pub mod width;

pub use error::CoreError;
pub use geometry::{Axis, Margin, Point, Rect};
pub use grapheme::graphemes;
pub use width::{GraphemeCluster, Wcwidth, WidthMethod};
