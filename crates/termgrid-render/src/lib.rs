#![forbid(unsafe_code)]
//! The cell grid, diffing renderer, ANSI byte emitter, and bounded LRU
//! cache at the core of termgrid.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod diff;
pub mod error;
pub mod lru;

pub use buffer::ScreenBuffer;
pub use cell::{Cell, GraphemeBuf};
pub use diff::DiffRenderer;
pub use error::RenderError;
pub use lru::Lru;
