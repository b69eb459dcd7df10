//! Mesh (loop) analysis: KVL equations over the fundamental cycle basis.
//!
//! Sign convention: each mesh current is positive along its defining chord's
//! A→B direction. A resistor shared by meshes i and j contributes
//! `R * d_i * d_j` to `A[i][j]`, where d is each mesh's traversal direction
//! over the branch relative to its A→B orientation; a source traversed
//! through the rise (B→A) adds its EMF to the right-hand side. Branch
//! currents are the signed sums of the mesh currents flowing through them,
//! reported positive in the A→B direction.

use log::debug;

use crate::circuit::CircuitGraph;
use crate::components::BranchKind;
use crate::error::Result;

use super::linear::LinearSystem;
use super::topology::{self, Mesh};
use super::{Analysis, AnalysisMode, BranchCurrent, Quantity, Unknown};

/// For each branch, the meshes traversing it and their directions.
type Membership = Vec<Vec<(usize, f64)>>;

fn membership(graph: &CircuitGraph, meshes: &[Mesh]) -> Membership {
    let mut map: Membership = vec![Vec::new(); graph.branch_count()];
    for (i, mesh) in meshes.iter().enumerate() {
        for step in &mesh.steps {
            map[step.branch].push((i, step.direction(graph)));
        }
    }
    map
}

/// Assemble the mesh system `A I = b`.
pub(crate) fn assemble(graph: &CircuitGraph, meshes: &[Mesh]) -> (LinearSystem, Membership) {
    let map = membership(graph, meshes);
    let mut system = LinearSystem::new(meshes.len());

    for (idx, branch) in graph.branches().iter().enumerate() {
        match branch.kind {
            BranchKind::Resistor { resistance } => {
                for &(i, di) in &map[idx] {
                    for &(j, dj) in &map[idx] {
                        system.add(i, j, resistance * di * dj);
                    }
                }
            }
            BranchKind::VoltageSource { emf } => {
                // Traversed B->A (through the rise) the EMF drives the mesh
                // current forward; A->B it opposes it.
                for &(i, di) in &map[idx] {
                    system.add_rhs(i, -emf * di);
                }
            }
            BranchKind::Wire => {}
        }
    }

    (system, map)
}

/// Run mesh analysis over a validated graph.
pub(crate) fn analyze(graph: &CircuitGraph) -> Result<Analysis> {
    let meshes = topology::fundamental_meshes(graph)?;
    debug!(
        "mesh analysis: {} junctions, {} branches, {} meshes",
        graph.junction_count(),
        graph.branch_count(),
        meshes.len()
    );

    let (system, map) = assemble(graph, &meshes);
    let mesh_currents = system.solve()?;

    let unknowns = mesh_currents
        .iter()
        .enumerate()
        .map(|(i, &value)| Unknown {
            quantity: Quantity::MeshCurrent(i),
            value,
        })
        .collect();

    let branch_currents = graph
        .branches()
        .iter()
        .enumerate()
        .map(|(idx, branch)| BranchCurrent {
            branch: branch.id,
            value: map[idx]
                .iter()
                .map(|&(i, d)| d * mesh_currents[i])
                .sum(),
        })
        .collect();

    Ok(Analysis {
        mode: AnalysisMode::Mesh,
        unknowns,
        branch_currents,
    })
}
