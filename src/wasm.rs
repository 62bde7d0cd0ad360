//! WASM bindings for Pulse Circuit.
//!
//! This module provides JavaScript-friendly bindings for use in web browsers.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmPulseSim } from 'pulse_circuit';
//!
//! await init();
//!
//! const circuitDsl = `
//!   broadcaster -> a
//!   %a -> inv, con
//!   &inv -> b
//!   %b -> con
//!   &con -> output
//! `;
//!
//! const sim = new WasmPulseSim(circuitDsl);
//! sim.press_n(1000);
//! console.log(sim.low_pulses(), sim.high_pulses());
//! ```

use wasm_bindgen::prelude::*;

use crate::circuit::Circuit;
use crate::dsl;
use crate::engine::{Simulator, SimulatorConfig};

fn to_js(err: crate::PulseError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// WASM-compatible pulse circuit simulator.
///
/// This struct wraps the native `Simulator` and provides a JavaScript-friendly API.
#[wasm_bindgen]
pub struct WasmPulseSim {
    simulator: Simulator,
}

#[wasm_bindgen]
impl WasmPulseSim {
    /// Create a new simulator from a circuit DSL string.
    ///
    /// # Returns
    /// A new `WasmPulseSim` instance or an error if the circuit is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(circuit_dsl: &str) -> Result<WasmPulseSim, JsValue> {
        Self::with_config(circuit_dsl, crate::engine::DEFAULT_MAX_WAVES)
    }

    /// Create a new simulator with a custom per-press wave ceiling.
    #[wasm_bindgen]
    pub fn with_config(circuit_dsl: &str, max_waves: usize) -> Result<WasmPulseSim, JsValue> {
        let ast = dsl::parse(circuit_dsl).map_err(to_js)?;
        let circuit = Circuit::from_ast(ast).map_err(to_js)?;
        let config = SimulatorConfig::new().with_max_waves(max_waves);
        let simulator = Simulator::with_config(circuit, config).map_err(to_js)?;

        Ok(WasmPulseSim { simulator })
    }

    /// Press the button once. Returns the number of waves it took.
    #[wasm_bindgen]
    pub fn press(&mut self) -> Result<usize, JsValue> {
        self.simulator.press().map(|report| report.waves).map_err(to_js)
    }

    /// Press the button `n` times.
    #[wasm_bindgen]
    pub fn press_n(&mut self, n: u32) -> Result<(), JsValue> {
        self.simulator.press_n(n as u64).map(|_| ()).map_err(to_js)
    }

    /// Total low pulses sent, button pulses included.
    #[wasm_bindgen]
    pub fn low_pulses(&self) -> f64 {
        self.simulator.statistics().low_pulses as f64
    }

    /// Total high pulses sent.
    #[wasm_bindgen]
    pub fn high_pulses(&self) -> f64 {
        self.simulator.statistics().high_pulses as f64
    }

    /// Number of presses since construction or the last reset.
    #[wasm_bindgen(getter)]
    pub fn presses(&self) -> f64 {
        self.simulator.state().presses() as f64
    }

    /// Whether the named module received a low pulse in the last press.
    #[wasm_bindgen]
    pub fn received_low(&self, module: &str) -> bool {
        self.simulator.state().received_low_last_press(module)
    }

    /// Forget all state.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.simulator.reset();
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
