//! Circuit solving: equation assembly and the linear solve.
//!
//! [`solve`] is the one entry point. It validates the branch list, builds
//! the connectivity graph, assembles a linear system in the requested
//! [`AnalysisMode`], and returns an [`Analysis`] carrying both the solved
//! unknowns (mesh currents or node voltages) and the per-branch currents
//! derived from them.
//!
//! Branch currents follow one convention in both modes: a positive value
//! means conventional current flowing from terminal A to terminal B.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::circuit::{BranchId, CircuitGraph, JunctionId};
use crate::components::Branch;
use crate::error::Result;

mod linear;
mod mesh;
mod nodal;
mod topology;

pub use linear::LinearSystem;
pub use topology::{Mesh, MeshStep};

/// Threshold below which the absolute determinant of the system matrix is
/// treated as zero and the circuit reported as singular.
pub const SINGULAR_TOLERANCE: f64 = 1e-9;

/// Which formulation of Kirchhoff's laws to assemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Loop currents from KVL around a fundamental cycle basis.
    Mesh,
    /// Junction voltages from KCL in conductance form.
    Node,
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisMode::Mesh => write!(f, "mesh"),
            AnalysisMode::Node => write!(f, "node"),
        }
    }
}

/// What a solved unknown measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    /// Current circulating around the i-th fundamental mesh, in amperes.
    MeshCurrent(usize),
    /// Potential of a junction relative to ground, in volts.
    NodeVoltage(JunctionId),
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::MeshCurrent(i) => write!(f, "I(mesh {i})"),
            Quantity::NodeVoltage(j) => write!(f, "V({j})"),
        }
    }
}

/// One entry of the solution vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Unknown {
    pub quantity: Quantity,
    pub value: f64,
}

/// Current through one branch, positive when flowing A to B.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BranchCurrent {
    pub branch: BranchId,
    pub value: f64,
}

/// The full result of a solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub mode: AnalysisMode,
    /// Solved unknowns, in assembly order.
    pub unknowns: Vec<Unknown>,
    /// One entry per branch, in input order.
    pub branch_currents: Vec<BranchCurrent>,
}

impl Analysis {
    /// Current through the branch with the given id, if it was solved.
    pub fn current(&self, branch: BranchId) -> Option<f64> {
        self.branch_currents
            .iter()
            .find(|bc| bc.branch == branch)
            .map(|bc| bc.value)
    }
}

/// Solve a circuit given as a flat branch list.
pub fn solve(branches: &[Branch], mode: AnalysisMode) -> Result<Analysis> {
    let graph = CircuitGraph::build(branches)?;
    debug!(
        "solving {} branches over {} junctions in {} mode",
        graph.branch_count(),
        graph.junction_count(),
        mode
    );
    match mode {
        AnalysisMode::Mesh => mesh::analyze(&graph),
        AnalysisMode::Node => nodal::analyze(&graph),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::CircuitError;

    fn j(n: usize) -> JunctionId {
        JunctionId(n)
    }

    /// Bridge-free two-mesh circuit used across the solver tests.
    fn two_mesh() -> Vec<Branch> {
        vec![
            Branch::voltage_source(BranchId(0), "V1", j(0), j(2), 10.0),
            Branch::resistor(BranchId(1), "R1", j(0), j(1), 2.0),
            Branch::resistor(BranchId(2), "Rs", j(1), j(2), 1.0),
            Branch::resistor(BranchId(3), "R2", j(1), j(2), 3.0),
        ]
    }

    #[test]
    fn test_modes_agree_on_branch_currents() {
        let branches = two_mesh();
        let by_mesh = solve(&branches, AnalysisMode::Mesh).unwrap();
        let by_node = solve(&branches, AnalysisMode::Node).unwrap();
        assert_eq!(by_mesh.branch_currents.len(), branches.len());
        for (m, n) in by_mesh.branch_currents.iter().zip(&by_node.branch_currents) {
            assert_eq!(m.branch, n.branch);
            assert_relative_eq!(m.value, n.value, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_ohms_law_in_both_modes() {
        // One resistor across one source, wire return: I = V/R either way.
        let branches = vec![
            Branch::voltage_source(BranchId(0), "V1", j(1), j(0), 10.0),
            Branch::resistor(BranchId(1), "R1", j(1), j(2), 5.0),
            Branch::wire(BranchId(2), "W1", j(2), j(0)),
        ];
        for mode in [AnalysisMode::Mesh, AnalysisMode::Node] {
            let analysis = solve(&branches, mode).unwrap();
            assert_relative_eq!(
                analysis.current(BranchId(1)).unwrap(),
                2.0,
                max_relative = 1e-12
            );
            assert_relative_eq!(
                analysis.current(BranchId(0)).unwrap(),
                -2.0,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_solve_is_deterministic() {
        let branches = two_mesh();
        let first = solve(&branches, AnalysisMode::Mesh).unwrap();
        let second = solve(&branches, AnalysisMode::Mesh).unwrap();
        assert_eq!(first, second);
        let first = solve(&branches, AnalysisMode::Node).unwrap();
        let second = solve(&branches, AnalysisMode::Node).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_tree_circuit_mesh_vs_node() {
        // No loops: mesh analysis has nothing to solve, node analysis
        // reports zero current everywhere.
        let branches = vec![
            Branch::voltage_source(BranchId(0), "V1", j(1), j(0), 9.0),
            Branch::resistor(BranchId(1), "R1", j(1), j(2), 100.0),
        ];
        assert_eq!(
            solve(&branches, AnalysisMode::Mesh).unwrap_err(),
            CircuitError::NoCycles
        );
        let analysis = solve(&branches, AnalysisMode::Node).unwrap();
        for bc in &analysis.branch_currents {
            assert_relative_eq!(bc.value, 0.0);
        }
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = solve(&[], AnalysisMode::Mesh).unwrap_err();
        assert!(matches!(err, CircuitError::EmptyCircuit { .. }));
    }

    #[test]
    fn test_disconnected_rejected_in_both_modes() {
        let branches = vec![
            Branch::resistor(BranchId(0), "R1", j(0), j(1), 1.0),
            Branch::resistor(BranchId(1), "R2", j(0), j(1), 1.0),
            Branch::resistor(BranchId(2), "R3", j(2), j(3), 1.0),
        ];
        for mode in [AnalysisMode::Mesh, AnalysisMode::Node] {
            assert_eq!(
                solve(&branches, mode).unwrap_err(),
                CircuitError::Unconnected { parts: 2 }
            );
        }
    }

    #[test]
    fn test_current_lookup() {
        let analysis = solve(&two_mesh(), AnalysisMode::Mesh).unwrap();
        assert!(analysis.current(BranchId(1)).is_some());
        assert_eq!(analysis.current(BranchId(99)), None);
    }

    #[test]
    fn test_quantity_display() {
        assert_eq!(Quantity::MeshCurrent(2).to_string(), "I(mesh 2)");
        assert_eq!(Quantity::NodeVoltage(j(3)).to_string(), "V(J3)");
    }
}
