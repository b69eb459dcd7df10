//! Node (voltage) analysis: KCL equations in conductance form.
//!
//! Ground is the junction of maximum degree (ties broken by smallest id);
//! every other junction contributes one unknown voltage. Resistors stamp
//! conductances; zero-impedance branches (ideal sources and wires) fix
//! voltage differences directly and are handled structurally:
//!
//! Zero-impedance branches are first grouped into constraint clusters
//! (connected components of the source/wire subgraph). A cluster containing
//! ground pins every member voltage, so each member gets a substitution row.
//! A floating cluster is a supernode: its smallest member keeps one combined
//! KCL row summed over all members (the internal source currents cancel),
//! and the remaining members get voltage-difference constraint rows.
//! Clustering happens before any KCL assembly, which fixes the elimination
//! order deterministically.
//!
//! A cycle among zero-impedance branches (parallel sources, a source shorted
//! by a wire, parallel wires) leaves the current split through the loop
//! undefined, so it is rejected as `SingularSystem` up front.
//!
//! Source and wire currents do not appear in the solution vector; they are
//! recovered afterwards by Kirchhoff's current law, repeatedly resolving any
//! junction with exactly one undetermined incident branch. Once cycles are
//! rejected the undetermined subgraph is a forest, so this always completes.

use std::collections::HashMap;

use log::debug;

use crate::circuit::{CircuitGraph, JunctionId};
use crate::components::BranchKind;
use crate::error::{CircuitError, Result};

use super::linear::LinearSystem;
use super::topology;
use super::{Analysis, AnalysisMode, BranchCurrent, Quantity, Unknown};

/// A connected component of the zero-impedance (source/wire) subgraph.
struct Cluster {
    /// Member junctions, sorted ascending; the first is the representative.
    members: Vec<JunctionId>,
    /// Potential of each member relative to the cluster representative.
    offset: HashMap<JunctionId, f64>,
}

impl Cluster {
    fn representative(&self) -> JunctionId {
        self.members[0]
    }
}

/// The EMF enforced A→B by a zero-impedance branch (`V[A] - V[B]`).
fn constraint_emf(kind: &BranchKind) -> Option<f64> {
    match kind {
        BranchKind::VoltageSource { emf } => Some(*emf),
        BranchKind::Wire => Some(0.0),
        BranchKind::Resistor { .. } => None,
    }
}

/// Group zero-impedance branches into constraint clusters, failing on any
/// zero-impedance cycle.
fn build_clusters(graph: &CircuitGraph) -> Result<Vec<Cluster>> {
    let mut clusters = Vec::new();
    let mut assigned: HashMap<JunctionId, usize> = HashMap::new();
    let mut used_branch = vec![false; graph.branch_count()];

    for &root in graph.junctions() {
        if assigned.contains_key(&root) {
            continue;
        }
        let has_constraint = graph
            .incidences(root)
            .iter()
            .any(|inc| graph.branch(inc.branch).is_zero_impedance());
        if !has_constraint {
            continue;
        }

        let cluster_idx = clusters.len();
        let mut offset = HashMap::from([(root, 0.0f64)]);
        assigned.insert(root, cluster_idx);
        let mut stack = vec![root];

        while let Some(junction) = stack.pop() {
            for inc in graph.incidences(junction) {
                let branch = graph.branch(inc.branch);
                let Some(emf) = constraint_emf(&branch.kind) else {
                    continue;
                };
                if used_branch[inc.branch] {
                    continue;
                }
                if offset.contains_key(&inc.other) {
                    // A second zero-impedance path between two junctions:
                    // the current split through the loop is not unique.
                    return Err(CircuitError::singular(format!(
                        "zero-impedance loop through '{}' (parallel sources or shorted wires)",
                        branch.name
                    )));
                }
                used_branch[inc.branch] = true;
                let delta = if junction == branch.a() { -emf } else { emf };
                offset.insert(inc.other, offset[&junction] + delta);
                assigned.insert(inc.other, cluster_idx);
                stack.push(inc.other);
            }
        }

        let mut members: Vec<JunctionId> = offset.keys().copied().collect();
        members.sort_unstable();
        clusters.push(Cluster { members, offset });
    }

    Ok(clusters)
}

/// Dense KCL row (resistor conductances only) for every junction.
fn kcl_rows(
    graph: &CircuitGraph,
    col: &HashMap<JunctionId, usize>,
    n: usize,
) -> HashMap<JunctionId, Vec<f64>> {
    let mut rows: HashMap<JunctionId, Vec<f64>> = graph
        .junctions()
        .iter()
        .map(|&j| (j, vec![0.0; n]))
        .collect();

    for branch in graph.branches() {
        if let BranchKind::Resistor { resistance } = branch.kind {
            let g = 1.0 / resistance;
            let (a, b) = (branch.a(), branch.b());
            for (from, to) in [(a, b), (b, a)] {
                if let Some(row) = rows.get_mut(&from) {
                    if let Some(&ci) = col.get(&from) {
                        row[ci] += g;
                    }
                    if let Some(&cj) = col.get(&to) {
                        row[cj] -= g;
                    }
                }
            }
        }
    }

    rows
}

/// Recover source and wire currents by KCL closure over the junctions.
fn close_currents(graph: &CircuitGraph, values: &mut [Option<f64>]) -> Result<()> {
    loop {
        let mut progressed = false;
        for &junction in graph.junctions() {
            let incs = graph.incidences(junction);
            let mut pending = None;
            let mut pending_count = 0;
            let mut known_sum = 0.0;
            for inc in incs {
                let sign = if graph.branch(inc.branch).a() == junction {
                    1.0
                } else {
                    -1.0
                };
                match values[inc.branch] {
                    Some(current) => known_sum += sign * current,
                    None => {
                        pending = Some((inc.branch, sign));
                        pending_count += 1;
                    }
                }
            }
            if let Some((branch, sign)) = pending {
                if pending_count == 1 {
                    values[branch] = Some(-known_sum / sign);
                    progressed = true;
                }
            }
        }
        if !progressed {
            break;
        }
    }

    if values.iter().any(Option::is_none) {
        // Unreachable once zero-impedance cycles are rejected, but a typed
        // failure beats a wrong number.
        return Err(CircuitError::singular(
            "branch currents are not uniquely determined by node voltages",
        ));
    }
    Ok(())
}

/// Run node analysis over a validated graph.
pub(crate) fn analyze(graph: &CircuitGraph) -> Result<Analysis> {
    topology::require_connected(graph)?;
    let ground = topology::pick_ground(graph);

    let unknown_junctions: Vec<JunctionId> = graph
        .junctions()
        .iter()
        .copied()
        .filter(|&j| j != ground)
        .collect();
    let n = unknown_junctions.len();
    let col: HashMap<JunctionId, usize> = unknown_junctions
        .iter()
        .enumerate()
        .map(|(i, &j)| (j, i))
        .collect();

    let clusters = build_clusters(graph)?;
    debug!(
        "node analysis: ground {}, {} unknowns, {} constraint clusters",
        ground,
        n,
        clusters.len()
    );

    let cluster_of: HashMap<JunctionId, usize> = clusters
        .iter()
        .enumerate()
        .flat_map(|(i, c)| c.members.iter().map(move |&j| (j, i)))
        .collect();
    let rows = kcl_rows(graph, &col, n);

    let mut system = LinearSystem::new(n);
    for (r, &junction) in unknown_junctions.iter().enumerate() {
        match cluster_of.get(&junction) {
            None => system.set_row(r, &rows[&junction], 0.0),
            Some(&ci) => {
                let cluster = &clusters[ci];
                if cluster.offset.contains_key(&ground) {
                    // Every voltage in a grounded cluster is known outright.
                    let mut coeffs = vec![0.0; n];
                    coeffs[r] = 1.0;
                    let rhs = cluster.offset[&junction] - cluster.offset[&ground];
                    system.set_row(r, &coeffs, rhs);
                } else if junction == cluster.representative() {
                    // Supernode: combined KCL over the whole cluster.
                    let mut combined = vec![0.0; n];
                    for &member in &cluster.members {
                        for (ci, v) in rows[&member].iter().enumerate() {
                            combined[ci] += v;
                        }
                    }
                    system.set_row(r, &combined, 0.0);
                } else {
                    let rep = cluster.representative();
                    let mut coeffs = vec![0.0; n];
                    coeffs[r] = 1.0;
                    coeffs[col[&rep]] -= 1.0;
                    let rhs = cluster.offset[&junction] - cluster.offset[&rep];
                    system.set_row(r, &coeffs, rhs);
                }
            }
        }
    }

    let solution = system.solve()?;
    let voltage = |j: JunctionId| -> f64 {
        if j == ground {
            0.0
        } else {
            solution[col[&j]]
        }
    };

    let mut currents: Vec<Option<f64>> = graph
        .branches()
        .iter()
        .map(|branch| match branch.kind {
            BranchKind::Resistor { resistance } => {
                Some((voltage(branch.a()) - voltage(branch.b())) / resistance)
            }
            _ => None,
        })
        .collect();
    close_currents(graph, &mut currents)?;

    let unknowns = unknown_junctions
        .iter()
        .map(|&j| Unknown {
            quantity: Quantity::NodeVoltage(j),
            value: voltage(j),
        })
        .collect();
    let branch_currents = graph
        .branches()
        .iter()
        .zip(&currents)
        .map(|(branch, current)| BranchCurrent {
            branch: branch.id,
            value: current.unwrap_or(0.0),
        })
        .collect();

    Ok(Analysis {
        mode: AnalysisMode::Node,
        unknowns,
        branch_currents,
    })
}
