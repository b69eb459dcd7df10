//! A small line-oriented netlist format.
//!
//! One component per line: a name, two junction names, and a value where the
//! component takes one. The first letter of the component name picks the
//! kind, SPICE style:
//!
//! ```text
//! # 9V battery driving a divider
//! V1 in gnd 9
//! R1 in out 4.7k
//! R2 out gnd 10k
//! W1 gnd 0
//! ```
//!
//! `V` is a voltage source (first junction is the positive pole), `R` a
//! resistor, `W` an ideal wire. Values accept the engineering suffixes
//! `G`, `M`, `k`, `m`, `u`, `n`. Blank lines and `#` comments are skipped.
//!
//! Junction names are interned in order of first appearance, so a netlist
//! maps to the same [`JunctionId`]s every time it is parsed.

use std::collections::HashMap;

use crate::circuit::{BranchId, JunctionId};
use crate::components::Branch;
use crate::error::{CircuitError, Result};

/// A parsed netlist: the branch list plus the junction naming.
#[derive(Debug, Clone, PartialEq)]
pub struct Netlist {
    pub branches: Vec<Branch>,
    /// Junction names indexed by `JunctionId`.
    pub junction_names: Vec<String>,
}

impl Netlist {
    /// The name a junction id was interned from.
    pub fn junction_name(&self, junction: JunctionId) -> Option<&str> {
        self.junction_names.get(junction.0).map(String::as_str)
    }
}

/// Parse a numeric value with an optional engineering suffix.
fn parse_value(token: &str, line: usize) -> Result<f64> {
    let (digits, scale) = match token.char_indices().last() {
        Some((i, 'G')) => (&token[..i], 1e9),
        Some((i, 'M')) => (&token[..i], 1e6),
        Some((i, 'k')) => (&token[..i], 1e3),
        Some((i, 'm')) => (&token[..i], 1e-3),
        Some((i, 'u')) => (&token[..i], 1e-6),
        Some((i, 'n')) => (&token[..i], 1e-9),
        _ => (token, 1.0),
    };
    let base: f64 = digits
        .parse()
        .map_err(|_| CircuitError::parse(line, format!("invalid value '{token}'")))?;
    Ok(base * scale)
}

/// Parse a complete netlist from text.
pub fn parse(input: &str) -> Result<Netlist> {
    let mut branches = Vec::new();
    let mut junction_names = Vec::new();
    let mut junction_ids: HashMap<String, JunctionId> = HashMap::new();

    let mut intern = |name: &str| -> JunctionId {
        if let Some(&id) = junction_ids.get(name) {
            return id;
        }
        let id = JunctionId(junction_names.len());
        junction_names.push(name.to_string());
        junction_ids.insert(name.to_string(), id);
        id
    };

    for (index, raw) in input.lines().enumerate() {
        let line = index + 1;
        let text = raw.split('#').next().unwrap_or("").trim();
        if text.is_empty() {
            continue;
        }

        let tokens: Vec<&str> = text.split_whitespace().collect();
        let [name, a, b, rest @ ..] = tokens.as_slice() else {
            return Err(CircuitError::parse(
                line,
                format!("expected 'NAME A B [VALUE]', got '{text}'"),
            ));
        };
        if a == b {
            return Err(CircuitError::parse(
                line,
                format!("'{name}' connects junction '{a}' to itself"),
            ));
        }

        let kind = name
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or_default();
        let value = match (kind, rest) {
            ('V' | 'R', [token]) => Some(parse_value(token, line)?),
            ('V' | 'R', []) => {
                return Err(CircuitError::parse(line, format!("'{name}' needs a value")));
            }
            ('W', []) => None,
            ('V' | 'R' | 'W', _) => {
                return Err(CircuitError::parse(
                    line,
                    format!("too many fields after '{name}'"),
                ));
            }
            _ => {
                return Err(CircuitError::parse(
                    line,
                    format!("unknown component type '{name}' (expected V, R or W prefix)"),
                ));
            }
        };

        let id = BranchId(branches.len());
        let (a, b) = (intern(a), intern(b));
        branches.push(match (kind, value) {
            ('V', Some(emf)) => Branch::voltage_source(id, *name, a, b, emf),
            ('R', Some(resistance)) => Branch::resistor(id, *name, a, b, resistance),
            _ => Branch::wire(id, *name, a, b),
        });
    }

    Ok(Netlist {
        branches,
        junction_names,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::components::BranchKind;

    #[test]
    fn test_parse_divider() {
        let netlist = parse(
            "# divider\n\
             V1 in gnd 9\n\
             R1 in out 4.7k\n\
             \n\
             R2 out gnd 10k  # load\n",
        )
        .unwrap();

        assert_eq!(netlist.junction_names, vec!["in", "gnd", "out"]);
        assert_eq!(netlist.branches.len(), 3);
        assert_eq!(netlist.branches[0].kind, BranchKind::VoltageSource { emf: 9.0 });
        assert_eq!(netlist.branches[0].terminals, [JunctionId(0), JunctionId(1)]);
        assert_eq!(
            netlist.branches[1].kind,
            BranchKind::Resistor { resistance: 4700.0 }
        );
        assert_eq!(netlist.branches[2].name, "R2");
        assert_eq!(netlist.junction_name(JunctionId(2)), Some("out"));
    }

    #[test]
    fn test_engineering_suffixes() {
        assert_relative_eq!(parse_value("4.7k", 1).unwrap(), 4700.0);
        assert_relative_eq!(parse_value("2M", 1).unwrap(), 2e6);
        assert_relative_eq!(parse_value("1G", 1).unwrap(), 1e9);
        assert_relative_eq!(parse_value("330m", 1).unwrap(), 0.33);
        assert_relative_eq!(parse_value("47u", 1).unwrap(), 4.7e-5);
        assert_relative_eq!(parse_value("10n", 1).unwrap(), 1e-8);
        assert_relative_eq!(parse_value("12", 1).unwrap(), 12.0);
        assert_relative_eq!(parse_value("-5", 1).unwrap(), -5.0);
    }

    #[test]
    fn test_wire_takes_no_value() {
        let netlist = parse("W1 a b\n").unwrap();
        assert_eq!(netlist.branches[0].kind, BranchKind::Wire);
        let err = parse("W1 a b 5\n").unwrap_err();
        assert!(matches!(err, CircuitError::ParseError { line: 1, .. }));
    }

    #[test]
    fn test_parse_errors_carry_line_numbers() {
        let err = parse("V1 in gnd 9\nR1 in out\n").unwrap_err();
        assert_eq!(
            err,
            CircuitError::parse(2, "'R1' needs a value".to_string())
        );

        let err = parse("X1 a b 5\n").unwrap_err();
        assert!(matches!(err, CircuitError::ParseError { line: 1, .. }));

        let err = parse("R1 a a 5\n").unwrap_err();
        assert!(matches!(err, CircuitError::ParseError { line: 1, .. }));

        let err = parse("R1 a b twelve\n").unwrap_err();
        assert!(matches!(err, CircuitError::ParseError { line: 1, .. }));
    }

    #[test]
    fn test_parsed_netlist_solves() {
        let netlist = parse(
            "V1 in gnd 10\n\
             R1 in out 2\n\
             R2 out gnd 3\n",
        )
        .unwrap();
        let analysis =
            crate::solver::solve(&netlist.branches, crate::solver::AnalysisMode::Mesh).unwrap();
        assert_relative_eq!(
            analysis.current(BranchId(1)).unwrap().abs(),
            2.0,
            max_relative = 1e-12
        );
    }
}
