//! Adjacency representation of a circuit.

use std::collections::HashMap;

use crate::circuit::JunctionId;
use crate::components::Branch;
use crate::error::Result;

use super::validate::validate_branches;

/// One entry in a junction's incidence list: a branch (by index into the
/// caller's branch list) and the junction at its far end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Incidence {
    pub branch: usize,
    pub other: JunctionId,
}

/// The circuit graph: junctions as nodes, branches as edges.
///
/// The graph borrows the caller's branch list for the duration of one solve
/// and never mutates it. Connectivity is undirected, but every branch keeps
/// its A→B terminal identity for polarity bookkeeping.
///
/// Incidence lists are sorted by (other junction, branch index) and the
/// junction list is sorted ascending, so traversals over the graph are
/// deterministic and repeated solves on identical input are reproducible.
#[derive(Debug)]
pub struct CircuitGraph<'a> {
    branches: &'a [Branch],
    junctions: Vec<JunctionId>,
    adjacency: HashMap<JunctionId, Vec<Incidence>>,
}

impl<'a> CircuitGraph<'a> {
    /// Build the adjacency structure from a branch list.
    ///
    /// Fails with `EmptyCircuit` or `InvalidComponent` per
    /// [`validate_branches`]; a valid list always produces a graph.
    pub fn build(branches: &'a [Branch]) -> Result<Self> {
        validate_branches(branches)?;

        let mut adjacency: HashMap<JunctionId, Vec<Incidence>> = HashMap::new();
        for (idx, branch) in branches.iter().enumerate() {
            adjacency.entry(branch.a()).or_default().push(Incidence {
                branch: idx,
                other: branch.b(),
            });
            adjacency.entry(branch.b()).or_default().push(Incidence {
                branch: idx,
                other: branch.a(),
            });
        }

        let mut junctions: Vec<JunctionId> = adjacency.keys().copied().collect();
        junctions.sort_unstable();
        for list in adjacency.values_mut() {
            list.sort_unstable_by_key(|inc| (inc.other, inc.branch));
        }

        Ok(Self {
            branches,
            junctions,
            adjacency,
        })
    }

    /// The caller's branch list.
    pub fn branches(&self) -> &'a [Branch] {
        self.branches
    }

    /// Branch by index into the caller's list.
    pub fn branch(&self, idx: usize) -> &'a Branch {
        &self.branches[idx]
    }

    /// Number of branches.
    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    /// All junction identifiers, sorted ascending.
    pub fn junctions(&self) -> &[JunctionId] {
        &self.junctions
    }

    /// Number of junctions.
    pub fn junction_count(&self) -> usize {
        self.junctions.len()
    }

    /// Incident (branch, other-terminal) pairs of a junction, in
    /// deterministic order.
    pub fn incidences(&self, junction: JunctionId) -> &[Incidence] {
        self.adjacency
            .get(&junction)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of branches incident to a junction.
    pub fn degree(&self, junction: JunctionId) -> usize {
        self.incidences(junction).len()
    }

    /// Terminal junctions (A, B) of a branch.
    pub fn endpoints(&self, idx: usize) -> (JunctionId, JunctionId) {
        let branch = &self.branches[idx];
        (branch.a(), branch.b())
    }
}
