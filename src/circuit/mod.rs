//! Circuit graph representation and validation.
//!
//! The [`CircuitGraph`] is a pure, identifier-based view over a caller-owned
//! branch list: junctions are addressed by [`JunctionId`], branches by index
//! into the caller's slice. No editor, geometry, or rendering state reaches
//! this module.

mod graph;
mod types;
mod validate;

pub use graph::{CircuitGraph, Incidence};
pub use types::{BranchId, JunctionId};
pub use validate::validate_branches;
