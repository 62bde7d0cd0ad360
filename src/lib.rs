//! # Pulse Circuit
//!
//! A discrete-event simulator for circuits of pulse-passing modules.
//!
//! This library provides:
//! - A line-oriented DSL for describing module circuits
//! - An immutable module graph with forward and backward edges
//! - A level-synchronous pulse propagation engine ("button presses")
//! - Repeated-press queries and read-only graph analysis
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`dsl`] - Parser for the circuit description language
//! - [`circuit`] - Module graph representation and validation
//! - [`engine`] - Simulation state, button presses and queries
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! pulse circuit.txt --presses 1000
//! ```
//!
//! ### Library
//!
//! ```
//! use pulse_circuit::{dsl, Circuit, Simulator};
//!
//! let ast = dsl::parse("broadcaster -> a, b, c\n%a -> b\n%b -> c\n%c -> inv\n&inv -> a")?;
//! let mut sim = Simulator::new(Circuit::from_ast(ast)?);
//! let stats = sim.press_n(1000)?;
//! assert_eq!(stats.pulse_product(), 32_000_000);
//! # Ok::<(), pulse_circuit::PulseError>(())
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmPulseSim } from 'pulse_circuit';
//!
//! const sim = new WasmPulseSim(circuitDsl);
//! sim.press_n(1000);
//! console.log(sim.low_pulses() * sim.high_pulses());
//! ```

pub mod circuit;
pub mod dsl;
pub mod engine;
pub mod error;

// Re-export main types for convenience
pub use circuit::Circuit;
pub use engine::{Level, SimulationState, Simulator, SimulatorConfig, Statistics};
pub use error::{PulseError, Result};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmPulseSim;

/// Number of presses in the classic pulse-count query.
pub const DEFAULT_PRESSES: u64 = 1000;
