//! Branch (component) model.
//!
//! A circuit is a flat list of [`Branch`] values. Each branch is a
//! two-terminal component between two junctions, with terminal identity kept
//! for polarity bookkeeping: `terminals[0]` is terminal A, `terminals[1]` is
//! terminal B, and for a voltage source terminal A is the positive pole.
//! Polarity is a data attribute fixed at construction; no geometry enters
//! the engine.

use serde::{Deserialize, Serialize};

use crate::circuit::{BranchId, JunctionId};

/// The closed set of supported component kinds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BranchKind {
    /// A resistor with resistance in ohms (strictly positive).
    Resistor { resistance: f64 },
    /// An ideal voltage source with EMF in volts (nonzero).
    /// Terminal A is the positive pole.
    VoltageSource { emf: f64 },
    /// A zero-impedance connection, present purely for connectivity.
    Wire,
}

/// A two-terminal component instance between two junctions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: BranchId,
    pub name: String,
    pub kind: BranchKind,
    /// [terminal A, terminal B]; A is the positive pole for a source.
    pub terminals: [JunctionId; 2],
}

impl Branch {
    /// Create a resistor branch.
    pub fn resistor(
        id: BranchId,
        name: impl Into<String>,
        a: JunctionId,
        b: JunctionId,
        resistance: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind: BranchKind::Resistor { resistance },
            terminals: [a, b],
        }
    }

    /// Create an ideal voltage source branch; `a` is the positive pole.
    pub fn voltage_source(
        id: BranchId,
        name: impl Into<String>,
        a: JunctionId,
        b: JunctionId,
        emf: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind: BranchKind::VoltageSource { emf },
            terminals: [a, b],
        }
    }

    /// Create a wire branch.
    pub fn wire(id: BranchId, name: impl Into<String>, a: JunctionId, b: JunctionId) -> Self {
        Self {
            id,
            name: name.into(),
            kind: BranchKind::Wire,
            terminals: [a, b],
        }
    }

    /// Terminal A.
    pub fn a(&self) -> JunctionId {
        self.terminals[0]
    }

    /// Terminal B.
    pub fn b(&self) -> JunctionId {
        self.terminals[1]
    }

    /// The opposite terminal of `junction`.
    ///
    /// Callers only pass junctions obtained from this branch's own
    /// endpoints, so any other argument is a programming error.
    pub fn other(&self, junction: JunctionId) -> JunctionId {
        if junction == self.terminals[0] {
            self.terminals[1]
        } else {
            self.terminals[0]
        }
    }

    /// Whether this branch has zero impedance (wire or ideal source).
    ///
    /// Zero-impedance branches constrain node voltages directly instead of
    /// contributing conductance terms.
    pub fn is_zero_impedance(&self) -> bool {
        matches!(
            self.kind,
            BranchKind::VoltageSource { .. } | BranchKind::Wire
        )
    }
}
