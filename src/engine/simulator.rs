//! Button-press propagation engine.

use crate::circuit::{Circuit, Module, ModuleKind};
use crate::error::{PulseError, Result};

use super::pulse::{Level, Pulse};
use super::state::{PressReport, SimulationState, Statistics};
use super::{DEFAULT_MAX_PRESSES, DEFAULT_MAX_WAVES};

/// Configuration for the simulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Maximum waves a single press may take before it is declared divergent.
    pub max_waves: usize,
    /// Press ceiling for open-ended searches such as [`Simulator::press_until`].
    pub max_presses: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_waves: DEFAULT_MAX_WAVES,
            max_presses: DEFAULT_MAX_PRESSES,
        }
    }
}

impl SimulatorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-press wave ceiling.
    pub fn with_max_waves(mut self, max_waves: usize) -> Self {
        self.max_waves = max_waves;
        self
    }

    /// Set the press ceiling for searches.
    pub fn with_max_presses(mut self, max_presses: u64) -> Self {
        self.max_presses = max_presses;
        self
    }

    /// Reject values no circuit could run under.
    pub fn validate(&self) -> Result<()> {
        if self.max_waves == 0 {
            return Err(PulseError::InvalidSimulationParam {
                message: "max_waves must be at least 1".to_string(),
            });
        }
        if self.max_presses == 0 {
            return Err(PulseError::InvalidSimulationParam {
                message: "max_presses must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Press the button once: send a low pulse to the broadcaster and drain
/// every pulse it causes.
///
/// Waves are level-synchronous. All pulses of one wave are delivered in
/// order, and everything they send forms the next wave. The value sent on
/// an edge is recorded in `state` as soon as it is sent, so a conjunction
/// later in the same wave already sees it.
///
/// A press is all or nothing: the drain runs against a copy of `state`
/// that replaces it only once the frontier empties. On error `state` is
/// left exactly as it was before the press.
pub fn press_button(
    circuit: &Circuit,
    state: &mut SimulationState,
    config: &SimulatorConfig,
) -> Result<PressReport> {
    let mut next = state.clone();
    let report = drain(circuit, &mut next, config)?;
    *state = next;
    Ok(report)
}

fn drain(
    circuit: &Circuit,
    state: &mut SimulationState,
    config: &SimulatorConfig,
) -> Result<PressReport> {
    let mut report = PressReport::new(state.presses() + 1);

    // The button pulse does not travel an edge but is still counted
    state.statistics.record(Level::Low);
    report.statistics.record(Level::Low);

    let mut frontier = vec![Pulse {
        level: Level::Low,
        to: circuit.broadcaster().id,
    }];
    let mut waves = 0;

    while !frontier.is_empty() {
        if waves >= config.max_waves {
            return Err(PulseError::DivergentSimulation { waves });
        }
        waves += 1;

        let mut next = Vec::new();
        for pulse in &frontier {
            let module = circuit
                .module(pulse.to)
                .ok_or_else(|| PulseError::unknown_module(pulse.to.to_string()))?;
            tracing::trace!(to = %module.name, level = %pulse.level, "deliver pulse");
            report.note_received(&module.name, pulse.level);

            if let Some(level) = respond(circuit, state, module, pulse.level) {
                send(circuit, state, &mut report, module, level, &mut next)?;
            }
        }
        frontier = next;
    }

    report.waves = waves;
    tracing::debug!(
        press = report.press,
        waves,
        low = report.statistics.low_pulses,
        high = report.statistics.high_pulses,
        "press settled"
    );
    state.finish_press(report.clone());
    Ok(report)
}

/// Apply a module's behavior to an incoming pulse, returning what it sends.
fn respond(
    circuit: &Circuit,
    state: &mut SimulationState,
    module: &Module,
    level: Level,
) -> Option<Level> {
    match module.kind {
        ModuleKind::Broadcaster => Some(Level::Low),
        ModuleKind::FlipFlop => match level {
            Level::High => None,
            Level::Low => {
                let flipped = !state.module_states.get(&module.name);
                state.module_states.set(&module.name, flipped);
                Some(flipped)
            }
        },
        ModuleKind::Conjunction => {
            let all_high = circuit.inputs(module.id).iter().all(|src| {
                circuit.module(*src).map_or(false, |src| {
                    state.input_states.get(&module.name, &src.name).is_high()
                })
            });
            Some(if all_high { Level::Low } else { Level::High })
        }
        ModuleKind::Sink => None,
    }
}

/// Send `level` on every outgoing edge of `module`.
fn send(
    circuit: &Circuit,
    state: &mut SimulationState,
    report: &mut PressReport,
    module: &Module,
    level: Level,
    next: &mut Vec<Pulse>,
) -> Result<()> {
    for &dest in circuit.outputs(module.id) {
        let dest_name = &circuit
            .module(dest)
            .ok_or_else(|| PulseError::unknown_module(dest.to_string()))?
            .name;
        state.input_states.set(dest_name, &module.name, level);
        state.statistics.record(level);
        report.statistics.record(level);
        next.push(Pulse { level, to: dest });
    }
    Ok(())
}

/// A circuit together with the state it is being pressed through.
pub struct Simulator {
    /// The circuit being simulated
    circuit: Circuit,
    /// Limits
    config: SimulatorConfig,
    /// Accumulated state
    state: SimulationState,
}

impl Simulator {
    /// Create a new simulator for the given circuit with default configuration.
    pub fn new(circuit: Circuit) -> Self {
        Self {
            circuit,
            config: SimulatorConfig::default(),
            state: SimulationState::new(),
        }
    }

    /// Create a new simulator for the given circuit with custom configuration.
    pub fn with_config(circuit: Circuit, config: SimulatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            circuit,
            config,
            state: SimulationState::new(),
        })
    }

    /// Continue from an existing state.
    pub fn with_state(mut self, state: SimulationState) -> Self {
        self.state = state;
        self
    }

    /// Press the button once.
    pub fn press(&mut self) -> Result<PressReport> {
        press_button(&self.circuit, &mut self.state, &self.config)
    }

    /// Discard all state, as if the simulator were freshly built.
    pub fn reset(&mut self) {
        self.state = SimulationState::new();
    }

    /// Counters accumulated since the last reset.
    pub fn statistics(&self) -> Statistics {
        self.state.statistics
    }

    /// Get a reference to the circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Limits this simulator runs under.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Current state.
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Mutable access to the state, e.g. to force an input edge.
    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    /// Consume the simulator, keeping its state for a later
    /// [`Simulator::with_state`].
    pub fn into_state(self) -> SimulationState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::parse;

    const SIMPLE: &str = "broadcaster -> a, b, c
%a -> b
%b -> c
%c -> inv
&inv -> a";

    const INTERESTING: &str = "broadcaster -> a
%a -> inv, con
&inv -> b
%b -> con
&con -> output";

    fn simulator(input: &str) -> Simulator {
        Simulator::new(Circuit::from_ast(parse(input).unwrap()).unwrap())
    }

    fn counts(sim: &Simulator) -> (u64, u64) {
        let stats = sim.statistics();
        (stats.low_pulses, stats.high_pulses)
    }

    #[test]
    fn test_simple_example_single_press() {
        let mut sim = simulator(SIMPLE);
        let report = sim.press().unwrap();
        assert_eq!(report.press, 1);
        assert_eq!(counts(&sim), (8, 4));
        assert_eq!(sim.state().module_states.get("a"), Level::Low);
        assert_eq!(sim.state().input_states.get("a", "inv"), Level::High);

        sim.press().unwrap();
        assert_eq!(counts(&sim), (16, 8));
        assert_eq!(sim.state().module_states.get("a"), Level::Low);
        assert_eq!(sim.state().input_states.get("a", "inv"), Level::High);
        assert_eq!(sim.state().presses(), 2);
    }

    #[test]
    fn test_interesting_example_press_by_press() {
        let mut sim = simulator(INTERESTING);
        let expected = [
            (Level::High, Level::High, (4, 4)),
            (Level::Low, Level::High, (8, 6)),
            (Level::High, Level::Low, (13, 9)),
            (Level::Low, Level::Low, (17, 11)),
        ];
        for (a, b, totals) in expected {
            sim.press().unwrap();
            assert_eq!(sim.state().module_states.get("a"), a);
            assert_eq!(sim.state().module_states.get("b"), b);
            assert_eq!(counts(&sim), totals);
        }
        assert_eq!(sim.state().input_states.get("output", "con"), Level::High);
    }

    #[test]
    fn test_single_input_conjunction_sends_high() {
        let mut sim = simulator("broadcaster -> a\n&a -> b");
        sim.press().unwrap();
        assert_eq!(sim.state().input_states.get("b", "a"), Level::High);
        assert_eq!(counts(&sim), (2, 1));
    }

    #[test]
    fn test_flip_flop_toggles_on_low() {
        let mut sim = simulator("broadcaster -> a\n%a -> b");
        sim.press().unwrap();
        assert_eq!(sim.state().input_states.get("b", "a"), Level::High);
        assert_eq!(counts(&sim), (2, 1));

        sim.press().unwrap();
        assert_eq!(sim.state().input_states.get("b", "a"), Level::Low);
        assert_eq!(counts(&sim), (5, 1));
        // Two lows restore the starting bit
        assert_eq!(sim.state().module_states.get("a"), Level::Low);
    }

    #[test]
    fn test_flip_flop_ignores_high() {
        let mut sim = simulator("broadcaster -> inv\n&inv -> ff\n%ff -> out");
        for _ in 0..10 {
            let report = sim.press().unwrap();
            assert!(report.received_high("ff"));
            assert_eq!(report.statistics.low_pulses, 2);
            assert_eq!(report.statistics.high_pulses, 1);
        }
        assert_eq!(sim.state().module_states.get("ff"), Level::Low);
        assert!(sim.state().input_states.get_all("out").is_empty());
    }

    #[test]
    fn test_conjunction_is_nand_of_inputs() {
        let mut sim = simulator("broadcaster -> x, y\n%x -> c\n%y -> c\n&c -> out");

        // Both inputs high
        let report = sim.press().unwrap();
        assert!(report.received_low("out"));
        assert!(!report.received_high("out"));

        // Both inputs low again
        let report = sim.press().unwrap();
        assert!(report.received_high("out"));
        assert!(!report.received_low("out"));
    }

    #[test]
    fn test_conjunction_output_flips_when_one_input_drops() {
        // x is declared but never triggered, so its edge into c reads low
        let mut sim = simulator("broadcaster -> k\n&k -> c\n%x -> c\n&c -> out");
        let report = sim.press().unwrap();
        assert!(report.received_high("out"));

        sim.state_mut().input_states.set("c", "x", Level::High);
        assert!(sim.press().unwrap().received_low("out"));

        sim.state_mut().input_states.set("c", "x", Level::Low);
        let report = sim.press().unwrap();
        assert!(report.received_high("out"));
        assert!(!report.received_low("out"));
    }

    #[test]
    fn test_every_press_counts_button() {
        let mut sim = simulator(SIMPLE);
        let mut last = 0;
        for _ in 0..20 {
            sim.press().unwrap();
            let low = sim.statistics().low_pulses;
            assert!(low > last);
            last = low;
        }
    }

    #[test]
    fn test_divergent_press() {
        let circuit = Circuit::from_ast(parse("broadcaster -> inv\n&inv -> inv").unwrap()).unwrap();
        let config = SimulatorConfig::new().with_max_waves(100);
        let mut sim = Simulator::with_config(circuit, config).unwrap();
        match sim.press() {
            Err(PulseError::DivergentSimulation { waves }) => assert_eq!(waves, 100),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_failed_press_leaves_state_unchanged() {
        let circuit =
            Circuit::from_ast(parse("broadcaster -> a, inv\n%a -> out\n&inv -> inv").unwrap())
                .unwrap();
        let config = SimulatorConfig::new().with_max_waves(5);
        let mut sim = Simulator::with_config(circuit, config).unwrap();
        let before = sim.state().clone();

        assert!(matches!(
            sim.press(),
            Err(PulseError::DivergentSimulation { waves: 5 })
        ));
        assert_eq!(sim.state(), &before);
        assert_eq!(sim.statistics(), Statistics::default());
        assert_eq!(sim.state().presses(), 0);
        assert!(sim.state().last_press().is_none());
        assert_eq!(sim.state().module_states.get("a"), Level::Low);
        assert!(sim.state().input_states.get_all("out").is_empty());
    }

    #[test]
    fn test_received_last_press() {
        let mut sim = simulator("broadcaster -> inv\n&inv -> ff\n%ff -> out");
        assert!(!sim.state().received_high_last_press("ff"));

        sim.press().unwrap();
        assert!(sim.state().received_high_last_press("ff"));
        assert!(!sim.state().received_low_last_press("ff"));
        assert!(sim.state().received_low_last_press("inv"));
        assert!(!sim.state().received_high_last_press("out"));
    }

    #[test]
    fn test_state_carries_over_between_simulators() {
        let mut sim = simulator(SIMPLE);
        sim.press().unwrap();
        sim.press().unwrap();
        let state = sim.into_state();
        assert_eq!(state.presses(), 2);

        let mut resumed = simulator(SIMPLE).with_state(state);
        let report = resumed.press().unwrap();
        assert_eq!(report.press, 3);
        assert_eq!(counts(&resumed), (24, 12));
        assert_eq!(resumed.state().presses(), 3);
    }

    #[test]
    fn test_invalid_config() {
        let circuit = Circuit::from_ast(parse(SIMPLE).unwrap()).unwrap();
        let config = SimulatorConfig::new().with_max_waves(0);
        assert!(matches!(
            Simulator::with_config(circuit, config),
            Err(PulseError::InvalidSimulationParam { .. })
        ));
    }

    #[test]
    fn test_external_state_matches_simulator() {
        let circuit = Circuit::from_ast(parse(INTERESTING).unwrap()).unwrap();
        let config = SimulatorConfig::default();
        let mut state = SimulationState::new();
        for _ in 0..4 {
            press_button(&circuit, &mut state, &config).unwrap();
        }

        let mut sim = Simulator::new(circuit);
        for _ in 0..4 {
            sim.press().unwrap();
        }
        assert_eq!(sim.state(), &state);
    }

    #[test]
    fn test_reset() {
        let mut sim = simulator(SIMPLE);
        sim.press().unwrap();
        sim.reset();
        assert_eq!(sim.statistics(), Statistics::default());
        assert_eq!(sim.state().presses(), 0);
        assert!(sim.state().last_press().is_none());
    }
}
