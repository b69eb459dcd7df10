//! Kirchhoff - Linear Resistive Circuit Solver
//!
//! Solves a netlist for mesh currents or node voltages.
//!
//! # Usage
//!
//! ```bash
//! kirchhoff circuit.net --mode node
//! kirchhoff circuit.net --json
//! ```

use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use kirchhoff_core::{
    error::{CircuitError, Result},
    netlist::{self, Netlist},
    solve, Analysis, AnalysisMode, Quantity,
};

/// Linear resistive circuit solver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the netlist file
    #[arg(value_name = "NETLIST_FILE")]
    netlist_file: PathBuf,

    /// Analysis formulation
    #[arg(short, long, value_enum, default_value = "mesh")]
    mode: Mode,

    /// Emit the analysis as JSON instead of a text report
    #[arg(long)]
    json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Mode {
    /// Loop currents around fundamental meshes
    Mesh,
    /// Junction voltages relative to ground
    Node,
}

impl From<Mode> for AnalysisMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Mesh => AnalysisMode::Mesh,
            Mode::Node => AnalysisMode::Node,
        }
    }
}

/// Name an unknown using the netlist's junction names where possible.
fn describe(quantity: Quantity, netlist: &Netlist) -> String {
    match quantity {
        Quantity::NodeVoltage(j) => match netlist.junction_name(j) {
            Some(name) => format!("V({name})"),
            None => quantity.to_string(),
        },
        Quantity::MeshCurrent(_) => quantity.to_string(),
    }
}

fn print_report(netlist: &Netlist, analysis: &Analysis) {
    println!("{} analysis", analysis.mode);
    for unknown in &analysis.unknowns {
        let unit = match unknown.quantity {
            Quantity::MeshCurrent(_) => "A",
            Quantity::NodeVoltage(_) => "V",
        };
        println!(
            "  {} = {:.6} {}",
            describe(unknown.quantity, netlist),
            unknown.value,
            unit
        );
    }
    println!("branch currents (positive A -> B)");
    for bc in &analysis.branch_currents {
        let name = &netlist.branches[bc.branch.0].name;
        println!("  I({name}) = {:.6} A", bc.value);
    }
}

fn print_json(netlist: &Netlist, analysis: &Analysis) {
    let unknowns: Vec<_> = analysis
        .unknowns
        .iter()
        .map(|u| {
            serde_json::json!({
                "quantity": describe(u.quantity, netlist),
                "value": u.value,
            })
        })
        .collect();
    let currents: Vec<_> = analysis
        .branch_currents
        .iter()
        .map(|bc| {
            serde_json::json!({
                "branch": netlist.branches[bc.branch.0].name,
                "value": bc.value,
            })
        })
        .collect();
    let report = serde_json::json!({
        "mode": analysis.mode,
        "unknowns": unknowns,
        "branch_currents": currents,
    });
    println!("{report:#}");
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let text = fs::read_to_string(&args.netlist_file).map_err(|e| CircuitError::FileReadError {
        path: args.netlist_file.display().to_string(),
        message: e.to_string(),
    })?;
    let netlist = netlist::parse(&text)?;
    let analysis = solve(&netlist.branches, args.mode.into())?;

    if args.json {
        print_json(&netlist, &analysis);
    } else {
        print_report(&netlist, &analysis);
    }

    Ok(())
}
