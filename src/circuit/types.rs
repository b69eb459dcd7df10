//! Core identifier types for circuit representation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A unique identifier for a junction (electrical connection point).
///
/// Identifiers are opaque and caller-assigned; the engine never interprets
/// them beyond equality and ordering (ordering is used for deterministic
/// traversal tie-breaks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JunctionId(pub usize);

impl fmt::Display for JunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "J{}", self.0)
    }
}

/// A unique identifier for a branch (two-terminal component instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BranchId(pub usize);

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(JunctionId(3).to_string(), "J3");
        assert_eq!(BranchId(0).to_string(), "B0");
    }

    #[test]
    fn test_ordering_is_by_raw_id() {
        assert!(JunctionId(1) < JunctionId(2));
        assert!(BranchId(9) > BranchId(4));
    }
}
