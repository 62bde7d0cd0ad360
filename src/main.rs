//! Pulse - module circuit simulator
//!
//! Presses the button of a pulse circuit and reports pulse counts.
//!
//! # Usage
//!
//! ```bash
//! pulse circuit.txt --presses 1000
//! pulse circuit.txt --until-low rx --predecessors rx
//! ```

use std::path::PathBuf;

use clap::Parser;
use pulse_circuit::{
    circuit::Circuit,
    dsl,
    error::Result,
    Simulator, SimulatorConfig, DEFAULT_PRESSES,
};
use tracing_subscriber::EnvFilter;

/// Pulse circuit simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the circuit description file
    #[arg(value_name = "CIRCUIT_FILE")]
    circuit_file: PathBuf,

    /// Number of button presses
    #[arg(short, long, default_value_t = DEFAULT_PRESSES)]
    presses: u64,

    /// Wave ceiling for a single press
    #[arg(long, default_value_t = pulse_circuit::engine::DEFAULT_MAX_WAVES)]
    max_waves: usize,

    /// Also report the first press at which this module receives a low pulse
    #[arg(long, value_name = "MODULE")]
    until_low: Option<String>,

    /// Press ceiling for --until-low
    #[arg(long, default_value_t = pulse_circuit::engine::DEFAULT_MAX_PRESSES)]
    max_presses: u64,

    /// List every module that can reach this one
    #[arg(long, value_name = "MODULE")]
    predecessors: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Parse and build the circuit
    let ast = dsl::parse_file(&args.circuit_file)?;
    let circuit = Circuit::from_ast(ast)?;

    if let Some(target) = &args.predecessors {
        let names = circuit.predecessor_names(target)?;
        println!("predecessors of {}: {}", target, names.join(", "));
    }

    let config = SimulatorConfig::new()
        .with_max_waves(args.max_waves)
        .with_max_presses(args.max_presses);
    let mut simulator = Simulator::with_config(circuit, config)?;

    let stats = simulator.press_n(args.presses)?;
    println!("presses: {}", args.presses);
    println!("low pulses: {}", stats.low_pulses);
    println!("high pulses: {}", stats.high_pulses);
    println!("product: {}", stats.pulse_product());

    if let Some(target) = &args.until_low {
        if simulator.circuit().find_module(target).is_none() {
            return Err(pulse_circuit::PulseError::unknown_module(target.clone()));
        }
        simulator.reset();
        match simulator.press_until(|state| state.received_low_last_press(target))? {
            Some(press) => println!("{} first receives low on press {}", target, press),
            None => println!(
                "{} received no low pulse within {} presses",
                target, args.max_presses
            ),
        }
    }

    Ok(())
}
