#![forbid(unsafe_code)]
//! The Cassowary constraint solver and the flex layout engine built on it.

pub mod cassowary;
pub mod error;
pub mod layout;

pub use cassowary::{Constraint as CassowaryConstraint, RelOp, Solver, SolverError, Symbol};
pub use error::LayoutError;
pub use layout::{Constraint, Flex, LayoutEngine, LayoutRequest, Spacing};
