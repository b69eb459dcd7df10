//! Error types for the circuit equation engine.
//!
//! Every failure the engine can produce is a typed [`CircuitError`] variant;
//! nothing panics on bad input. Presentation layers are expected to show the
//! `Display` text verbatim.

use thiserror::Error;

/// Result type alias using [`CircuitError`].
pub type Result<T> = std::result::Result<T, CircuitError>;

/// Unified error type for circuit construction and analysis.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CircuitError {
    /// The branch list is empty, or it describes fewer than two junctions.
    #[error("Empty circuit: {message}")]
    EmptyCircuit { message: String },

    /// A branch carries an unusable value or connects a terminal to itself.
    #[error("Invalid component '{name}': {message}")]
    InvalidComponent { name: String, message: String },

    /// The graph splits into more than one connected component.
    #[error("Circuit is not fully connected: found {parts} separate parts")]
    Unconnected { parts: usize },

    /// Mesh analysis was requested on a tree topology.
    #[error("Circuit contains no closed loops; mesh analysis requires at least one")]
    NoCycles,

    /// The assembled system has no unique solution.
    #[error("Singular system: {message}")]
    SingularSystem { message: String },

    /// A netlist line could not be parsed.
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// A netlist file could not be read.
    #[error("Failed to read netlist file '{path}': {message}")]
    FileReadError { path: String, message: String },
}

impl CircuitError {
    /// Create an empty-circuit error.
    pub fn empty(message: impl Into<String>) -> Self {
        Self::EmptyCircuit {
            message: message.into(),
        }
    }

    /// Create an invalid-component error.
    pub fn invalid_component(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidComponent {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a singular-system error.
    pub fn singular(message: impl Into<String>) -> Self {
        Self::SingularSystem {
            message: message.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }
}
