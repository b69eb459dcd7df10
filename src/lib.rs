//! # Kirchhoff Core
//!
//! A linear resistive circuit solver.
//!
//! This library provides:
//! - A branch-list circuit model (resistors, ideal voltage sources, wires)
//! - Mesh (loop current) analysis over a fundamental cycle basis
//! - Node (voltage) analysis with supernode handling for ideal sources
//! - A small netlist format for describing circuits as text
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`components`] - Branch descriptions (resistors, sources, wires)
//! - [`circuit`] - Circuit graph representation and validation
//! - [`solver`] - Equation assembly and the linear solve
//! - [`netlist`] - Parser for the text netlist format
//!
//! ## Usage
//!
//! ```
//! use kirchhoff_core::{netlist, solve, AnalysisMode};
//!
//! let parsed = netlist::parse(
//!     "V1 in gnd 10\n\
//!      R1 in out 2\n\
//!      R2 out gnd 3\n",
//! )?;
//! let analysis = solve(&parsed.branches, AnalysisMode::Node)?;
//! for unknown in &analysis.unknowns {
//!     println!("{} = {:.4}", unknown.quantity, unknown.value);
//! }
//! # Ok::<(), kirchhoff_core::CircuitError>(())
//! ```
//!
//! ## Method
//!
//! Both analysis modes reduce the circuit to a dense linear system solved by
//! LU factorization with partial pivoting:
//!
//! 1. Mesh mode walks a DFS spanning tree; each non-tree branch closes one
//!    fundamental mesh, and KVL around the meshes gives a resistance matrix
//!    over the loop currents.
//! 2. Node mode picks the highest-degree junction as ground and writes KCL
//!    in conductance form at the rest; ideal sources and wires become
//!    voltage constraints (substitution rows or supernodes).
//!
//! Branch currents use one sign convention throughout: positive means
//! conventional current from terminal A to terminal B.

pub mod circuit;
pub mod components;
pub mod error;
pub mod netlist;
pub mod solver;

// Re-export main types for convenience
pub use circuit::{BranchId, CircuitGraph, JunctionId};
pub use components::{Branch, BranchKind};
pub use error::{CircuitError, Result};
pub use solver::{solve, Analysis, AnalysisMode, BranchCurrent, Quantity, Unknown};
