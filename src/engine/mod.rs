//! Pulse propagation engine.
//!
//! One button press sends a low pulse to the broadcaster and then drains
//! every pulse it causes, wave by wave:
//!
//! ```text
//! wave 0: button -low-> broadcaster
//! wave 1: broadcaster -low-> every destination
//! wave n: everything sent during wave n-1
//! ```
//!
//! The press ends when a wave sends nothing. Module behavior:
//!
//! - Broadcaster: sends low to every destination
//! - Flip-flop: on low, toggles and sends its new bit; on high, does nothing
//! - Conjunction: sends low iff the last value on every input edge is high
//! - Sink: absorbs
//!
//! The circuit is never mutated; flip-flop bits, per-edge input memory and
//! pulse counters live in a [`SimulationState`].

mod pulse;
mod query;
mod simulator;
mod state;

pub use pulse::{Level, Pulse};
pub use simulator::{press_button, Simulator, SimulatorConfig};
pub use state::{InputStates, ModuleStates, PressReport, SimulationState, Statistics};

/// Default ceiling on waves within a single press.
pub const DEFAULT_MAX_WAVES: usize = 10_000;

/// Default ceiling on presses for open-ended searches.
pub const DEFAULT_MAX_PRESSES: u64 = 1_000_000;
