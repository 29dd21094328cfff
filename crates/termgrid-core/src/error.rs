//! Error kinds shared across crate boundaries.
//!
//! Per-crate errors (`termgrid_layout::LayoutError`,
//! `termgrid_render::RenderError`) wrap or parallel these where a kind is
//! shared; `CoreError` itself only covers the geometry-level failure that
//! every higher layer can hit: an invalid resize request.

use thiserror::Error;

/// Errors surfaced directly by geometry/resize operations.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum CoreError {
    /// A resize was requested with a negative width or height.
    #[error("invalid dimension: width and height must be nonnegative")]
    InvalidDimension,
}
