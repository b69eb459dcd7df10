//! Cycle and partition extraction.
//!
//! Mesh analysis needs a fundamental cycle basis: a spanning tree is grown
//! by depth-first traversal, and every branch left out of the tree (a chord)
//! closes exactly one fundamental cycle through the tree path between its
//! endpoints. Node analysis needs a ground junction and the connectivity
//! check only.
//!
//! All traversals start from the smallest junction identifier and visit
//! incidences in the graph's sorted order, so the extracted structure is
//! identical across repeated solves on the same input.

use std::collections::{HashMap, HashSet};

use crate::circuit::{CircuitGraph, JunctionId};
use crate::error::{CircuitError, Result};

/// One directed traversal step in a mesh walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshStep {
    /// Branch index into the caller's branch list.
    pub branch: usize,
    pub from: JunctionId,
    pub to: JunctionId,
}

impl MeshStep {
    /// +1 when the step follows the branch's A→B orientation, -1 otherwise.
    pub fn direction(&self, graph: &CircuitGraph) -> f64 {
        if self.from == graph.branch(self.branch).a() {
            1.0
        } else {
            -1.0
        }
    }
}

/// A fundamental loop: an ordered closed walk of branches. The first step is
/// always the defining chord, traversed A→B; that direction is the mesh
/// current's positive sense.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub steps: Vec<MeshStep>,
}

/// Number of connected components in the graph.
pub fn connected_parts(graph: &CircuitGraph) -> usize {
    let mut visited: HashSet<JunctionId> = HashSet::new();
    let mut parts = 0;

    for &start in graph.junctions() {
        if visited.contains(&start) {
            continue;
        }
        parts += 1;
        let mut stack = vec![start];
        visited.insert(start);
        while let Some(junction) = stack.pop() {
            for inc in graph.incidences(junction) {
                if visited.insert(inc.other) {
                    stack.push(inc.other);
                }
            }
        }
    }

    parts
}

/// Fail with `Unconnected` unless the graph is a single component.
pub fn require_connected(graph: &CircuitGraph) -> Result<()> {
    let parts = connected_parts(graph);
    if parts > 1 {
        return Err(CircuitError::Unconnected { parts });
    }
    Ok(())
}

/// Pick the ground junction for node analysis: maximum incident-branch
/// degree, ties broken by smallest identifier.
pub fn pick_ground(graph: &CircuitGraph) -> JunctionId {
    let mut ground = graph.junctions()[0];
    let mut best = graph.degree(ground);
    for &junction in &graph.junctions()[1..] {
        let degree = graph.degree(junction);
        if degree > best {
            best = degree;
            ground = junction;
        }
    }
    ground
}

struct SpanningTree {
    /// junction -> (parent junction, connecting branch index)
    parent: HashMap<JunctionId, (JunctionId, usize)>,
    depth: HashMap<JunctionId, usize>,
    tree_branches: HashSet<usize>,
}

/// Grow a spanning tree by depth-first traversal from the smallest junction.
fn spanning_tree(graph: &CircuitGraph) -> SpanningTree {
    let root = graph.junctions()[0];
    let mut parent = HashMap::new();
    let mut depth = HashMap::from([(root, 0usize)]);
    let mut tree_branches = HashSet::new();
    let mut visited = HashSet::from([root]);

    // Explicit stack of (junction, next incidence offset), equivalent to
    // recursive DFS in sorted incidence order.
    let mut stack = vec![(root, 0usize)];
    while let Some((junction, next)) = stack.last().copied() {
        let incs = graph.incidences(junction);
        if next >= incs.len() {
            stack.pop();
            continue;
        }
        if let Some(top) = stack.last_mut() {
            top.1 += 1;
        }
        let inc = incs[next];
        if visited.insert(inc.other) {
            tree_branches.insert(inc.branch);
            parent.insert(inc.other, (junction, inc.branch));
            depth.insert(inc.other, depth[&junction] + 1);
            stack.push((inc.other, 0));
        }
    }

    SpanningTree {
        parent,
        depth,
        tree_branches,
    }
}

/// Walk the tree path from `from` to `to`, returned as ordered steps.
fn tree_path(tree: &SpanningTree, from: JunctionId, to: JunctionId) -> Vec<MeshStep> {
    let mut head = Vec::new();
    let mut tail = Vec::new();
    let mut u = from;
    let mut v = to;

    while tree.depth[&u] > tree.depth[&v] {
        let (p, branch) = tree.parent[&u];
        head.push(MeshStep {
            branch,
            from: u,
            to: p,
        });
        u = p;
    }
    while tree.depth[&v] > tree.depth[&u] {
        let (p, branch) = tree.parent[&v];
        tail.push(MeshStep {
            branch,
            from: p,
            to: v,
        });
        v = p;
    }
    while u != v {
        let (pu, bu) = tree.parent[&u];
        head.push(MeshStep {
            branch: bu,
            from: u,
            to: pu,
        });
        u = pu;
        let (pv, bv) = tree.parent[&v];
        tail.push(MeshStep {
            branch: bv,
            from: pv,
            to: v,
        });
        v = pv;
    }

    tail.reverse();
    head.extend(tail);
    head
}

/// Extract the fundamental cycle basis of a connected graph.
///
/// Fails with `Unconnected` when the graph has more than one component and
/// `NoCycles` when the graph is a tree. For a connected graph the basis
/// satisfies `#meshes == #branches - #junctions + 1`.
pub fn fundamental_meshes(graph: &CircuitGraph) -> Result<Vec<Mesh>> {
    require_connected(graph)?;

    let tree = spanning_tree(graph);
    let chords: Vec<usize> = (0..graph.branch_count())
        .filter(|idx| !tree.tree_branches.contains(idx))
        .collect();

    if chords.is_empty() {
        return Err(CircuitError::NoCycles);
    }

    let mut meshes = Vec::with_capacity(chords.len());
    for chord in chords {
        let (a, b) = graph.endpoints(chord);
        let mut steps = vec![MeshStep {
            branch: chord,
            from: a,
            to: b,
        }];
        steps.extend(tree_path(&tree, b, a));
        meshes.push(Mesh { steps });
    }

    Ok(meshes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{BranchId, CircuitGraph, JunctionId};
    use crate::components::Branch;

    fn j(n: usize) -> JunctionId {
        JunctionId(n)
    }

    fn single_loop() -> Vec<Branch> {
        vec![
            Branch::voltage_source(BranchId(0), "V1", j(1), j(0), 10.0),
            Branch::resistor(BranchId(1), "R1", j(1), j(2), 5.0),
            Branch::wire(BranchId(2), "W1", j(2), j(0)),
        ]
    }

    fn two_mesh() -> Vec<Branch> {
        // V from g=J2 up to a=J0, R1 across the top, Rs and R2 in parallel
        // on the right: two independent loops.
        vec![
            Branch::voltage_source(BranchId(0), "V1", j(0), j(2), 10.0),
            Branch::resistor(BranchId(1), "R1", j(0), j(1), 2.0),
            Branch::resistor(BranchId(2), "Rs", j(1), j(2), 1.0),
            Branch::resistor(BranchId(3), "R2", j(1), j(2), 3.0),
        ]
    }

    #[test]
    fn test_connected_parts() {
        let branches = single_loop();
        let graph = CircuitGraph::build(&branches).unwrap();
        assert_eq!(connected_parts(&graph), 1);

        let islands = vec![
            Branch::resistor(BranchId(0), "R1", j(0), j(1), 1.0),
            Branch::resistor(BranchId(1), "R2", j(2), j(3), 1.0),
        ];
        let graph = CircuitGraph::build(&islands).unwrap();
        assert_eq!(connected_parts(&graph), 2);
    }

    #[test]
    fn test_cycle_basis_size_law() {
        // #meshes == #branches - #junctions + 1 for a connected graph.
        for branches in [single_loop(), two_mesh()] {
            let graph = CircuitGraph::build(&branches).unwrap();
            let meshes = fundamental_meshes(&graph).unwrap();
            assert_eq!(
                meshes.len(),
                graph.branch_count() - graph.junction_count() + 1
            );
        }
    }

    #[test]
    fn test_single_loop_walk_is_deterministic() {
        let branches = single_loop();
        let graph = CircuitGraph::build(&branches).unwrap();
        let meshes = fundamental_meshes(&graph).unwrap();
        assert_eq!(meshes.len(), 1);

        // DFS from J0 takes V1 then R1 into the tree; the wire is the chord
        // and the walk runs chord A->B first, then back through the tree.
        let steps = &meshes[0].steps;
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].branch, 2);
        assert_eq!((steps[0].from, steps[0].to), (j(2), j(0)));
        assert_eq!(steps[1].branch, 0);
        assert_eq!((steps[1].from, steps[1].to), (j(0), j(1)));
        assert_eq!(steps[2].branch, 1);
        assert_eq!((steps[2].from, steps[2].to), (j(1), j(2)));
    }

    #[test]
    fn test_walks_are_closed() {
        let branches = two_mesh();
        let graph = CircuitGraph::build(&branches).unwrap();
        for mesh in fundamental_meshes(&graph).unwrap() {
            let steps = &mesh.steps;
            assert_eq!(steps.last().unwrap().to, steps[0].from);
            for pair in steps.windows(2) {
                assert_eq!(pair[0].to, pair[1].from);
            }
        }
    }

    #[test]
    fn test_tree_topology_has_no_cycles() {
        let branches = vec![
            Branch::voltage_source(BranchId(0), "V1", j(0), j(1), 9.0),
            Branch::resistor(BranchId(1), "R1", j(1), j(2), 100.0),
        ];
        let graph = CircuitGraph::build(&branches).unwrap();
        assert_eq!(fundamental_meshes(&graph).unwrap_err(), CircuitError::NoCycles);
    }

    #[test]
    fn test_disconnected_graph_rejected() {
        let branches = vec![
            Branch::resistor(BranchId(0), "R1", j(0), j(1), 1.0),
            Branch::resistor(BranchId(1), "R2", j(0), j(1), 1.0),
            Branch::resistor(BranchId(2), "R3", j(2), j(3), 1.0),
        ];
        let graph = CircuitGraph::build(&branches).unwrap();
        assert_eq!(
            fundamental_meshes(&graph).unwrap_err(),
            CircuitError::Unconnected { parts: 2 }
        );
    }

    #[test]
    fn test_ground_pick_prefers_degree_then_id() {
        let branches = two_mesh();
        let graph = CircuitGraph::build(&branches).unwrap();
        // J1 and J2 both have degree 3; the smaller id wins.
        assert_eq!(pick_ground(&graph), j(1));

        let star = vec![
            Branch::resistor(BranchId(0), "R1", j(5), j(0), 1.0),
            Branch::resistor(BranchId(1), "R2", j(5), j(1), 1.0),
            Branch::resistor(BranchId(2), "R3", j(5), j(2), 1.0),
        ];
        let graph = CircuitGraph::build(&star).unwrap();
        assert_eq!(pick_ground(&graph), j(5));
    }
}
