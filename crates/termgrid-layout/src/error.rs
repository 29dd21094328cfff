use crate::cassowary::SolverError;

/// Errors surfaced by `LayoutEngine::split`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The request's constraints have no solution even after the solver's
    /// priority-weighted relaxation (only possible under `REQUIRED`-tier
    /// conflicts, e.g. two required equalities pinning the same axis to
    /// different values).
    #[error("layout constraints have no solution")]
    Unsatisfiable,
    /// A constraint built internally referenced a symbol with an invalid
    /// coefficient; indicates a bug in `LayoutEngine::split` itself rather
    /// than a malformed `LayoutRequest`.
    #[error("invalid constraint term built during layout solving")]
    BadTerm,
}

impl From<SolverError> for LayoutError {
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::Unsatisfiable => LayoutError::Unsatisfiable,
            SolverError::BadTerm => LayoutError::BadTerm,
        }
    }
}
