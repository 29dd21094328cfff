#![forbid(unsafe_code)]
//! Color, style, and hyperlink types used by `termgrid-render` cells.

pub mod color;
pub mod link;
pub mod style;

pub use color::{Color, NamedColor, Rgb};
pub use link::Link;
pub use style::{Attributes, Style, UnderlineStyle};
