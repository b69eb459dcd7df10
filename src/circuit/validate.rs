//! Branch list validation.
//!
//! The editor in front of the engine rejects bad values before they get
//! here, but the engine re-checks everything it depends on.

use std::collections::BTreeSet;

use crate::components::{Branch, BranchKind};
use crate::error::{CircuitError, Result};

/// Validate a branch list for analysis.
///
/// Checks:
/// - at least one branch and at least two junctions exist
/// - no branch connects a terminal to itself
/// - resistances are finite and strictly positive
/// - source EMFs are finite and nonzero
pub fn validate_branches(branches: &[Branch]) -> Result<()> {
    if branches.is_empty() {
        return Err(CircuitError::empty("circuit has no branches"));
    }

    for branch in branches {
        if branch.a() == branch.b() {
            return Err(CircuitError::invalid_component(
                &branch.name,
                format!("both terminals connect to junction {}", branch.a()),
            ));
        }

        match branch.kind {
            BranchKind::Resistor { resistance } => {
                if !resistance.is_finite() || resistance <= 0.0 {
                    return Err(CircuitError::invalid_component(
                        &branch.name,
                        format!("resistance must be finite and > 0, got {resistance}"),
                    ));
                }
            }
            BranchKind::VoltageSource { emf } => {
                if !emf.is_finite() || emf == 0.0 {
                    return Err(CircuitError::invalid_component(
                        &branch.name,
                        format!("EMF must be finite and nonzero, got {emf}"),
                    ));
                }
            }
            BranchKind::Wire => {}
        }
    }

    let junctions: BTreeSet<_> = branches
        .iter()
        .flat_map(|b| b.terminals.iter().copied())
        .collect();
    if junctions.len() < 2 {
        return Err(CircuitError::empty(
            "circuit has fewer than two junctions",
        ));
    }

    Ok(())
}
