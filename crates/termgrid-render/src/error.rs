//! Error kinds surfaced by `termgrid-render`.

use thiserror::Error;

/// Errors the diff renderer can surface. Buffer primitives never error
/// (spec §7) — only the renderer's interaction with its output sink can
/// fail.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The output sink returned an error mid-emission. The renderer's
    /// `previous` buffer is not advanced, so retrying `commit` with the
    /// same `current` produces a consistent diff again.
    #[error("output sink write failed: {0}")]
    WriteError(#[from] std::io::Error),
}
