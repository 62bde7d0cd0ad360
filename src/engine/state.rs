//! Mutable simulation state.
//!
//! Both memories are sparse: a flip-flop or input edge that has never been
//! written reads as [`Level::Low`].

use indexmap::{IndexMap, IndexSet};

use super::pulse::Level;

/// Stored bit of every flip-flop, keyed by module name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleStates(IndexMap<String, Level>);

impl ModuleStates {
    /// Create an empty memory; every flip-flop reads low.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current bit of a module, low if never set.
    pub fn get(&self, module: &str) -> Level {
        self.0.get(module).copied().unwrap_or_default()
    }

    /// Overwrite the bit of a module.
    pub fn set(&mut self, module: &str, level: Level) {
        if let Some(slot) = self.0.get_mut(module) {
            *slot = level;
        } else {
            self.0.insert(module.to_string(), level);
        }
    }
}

/// Last value seen on every input edge, keyed by (module, source).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputStates(IndexMap<String, IndexMap<String, Level>>);

impl InputStates {
    /// Create an empty memory; every edge reads low.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value `source` sent to `module`, low if nothing was sent yet.
    pub fn get(&self, module: &str, source: &str) -> Level {
        self.0
            .get(module)
            .and_then(|inputs| inputs.get(source))
            .copied()
            .unwrap_or_default()
    }

    /// Every recorded input value of `module`, in first-recorded order.
    ///
    /// Empty for a module that never received anything.
    pub fn get_all(&self, module: &str) -> Vec<Level> {
        self.0
            .get(module)
            .map(|inputs| inputs.values().copied().collect())
            .unwrap_or_default()
    }

    /// Record that `source` sent `level` to `module`.
    pub fn set(&mut self, module: &str, source: &str, level: Level) {
        if !self.0.contains_key(module) {
            self.0.insert(module.to_string(), IndexMap::new());
        }
        if let Some(inputs) = self.0.get_mut(module) {
            if let Some(slot) = inputs.get_mut(source) {
                *slot = level;
            } else {
                inputs.insert(source.to_string(), level);
            }
        }
    }
}

/// Running pulse counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Low pulses sent, including one button pulse per press
    pub low_pulses: u64,
    pub high_pulses: u64,
}

impl Statistics {
    /// Count one sent pulse.
    pub fn record(&mut self, level: Level) {
        match level {
            Level::Low => self.low_pulses += 1,
            Level::High => self.high_pulses += 1,
        }
    }

    /// Total pulses of both kinds.
    pub fn total(&self) -> u64 {
        self.low_pulses + self.high_pulses
    }

    /// Low count multiplied by high count, widened so it cannot overflow.
    pub fn pulse_product(&self) -> u128 {
        u128::from(self.low_pulses) * u128::from(self.high_pulses)
    }
}

/// What happened during a single press.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PressReport {
    /// 1-based press number within its state
    pub press: u64,
    /// Waves drained before the frontier emptied
    pub waves: usize,
    /// Pulses sent during this press only
    pub statistics: Statistics,
    /// Modules that received at least one low pulse
    pub low_received: IndexSet<String>,
    /// Modules that received at least one high pulse
    pub high_received: IndexSet<String>,
}

impl PressReport {
    pub(crate) fn new(press: u64) -> Self {
        Self {
            press,
            ..Self::default()
        }
    }

    pub(crate) fn note_received(&mut self, module: &str, level: Level) {
        let set = match level {
            Level::Low => &mut self.low_received,
            Level::High => &mut self.high_received,
        };
        if !set.contains(module) {
            set.insert(module.to_string());
        }
    }

    /// Whether `module` received a low pulse during this press.
    pub fn received_low(&self, module: &str) -> bool {
        self.low_received.contains(module)
    }

    /// Whether `module` received a high pulse during this press.
    pub fn received_high(&self, module: &str) -> bool {
        self.high_received.contains(module)
    }
}

/// Everything that changes while a circuit is pressed.
///
/// A fresh instance is the only way to reset; counters accumulate across
/// presses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationState {
    /// Flip-flop memory
    pub module_states: ModuleStates,
    /// Conjunction input memory
    pub input_states: InputStates,
    /// Counters accumulated over every press
    pub statistics: Statistics,
    presses: u64,
    last_press: Option<PressReport>,
}

impl SimulationState {
    /// Create the state of a circuit that was never pressed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed presses.
    pub fn presses(&self) -> u64 {
        self.presses
    }

    /// Report of the most recent completed press.
    pub fn last_press(&self) -> Option<&PressReport> {
        self.last_press.as_ref()
    }

    /// Whether `module` received a low pulse during the most recent press.
    pub fn received_low_last_press(&self, module: &str) -> bool {
        self.last_press
            .as_ref()
            .map_or(false, |report| report.received_low(module))
    }

    /// Whether `module` received a high pulse during the most recent press.
    pub fn received_high_last_press(&self, module: &str) -> bool {
        self.last_press
            .as_ref()
            .map_or(false, |report| report.received_high(module))
    }

    pub(crate) fn finish_press(&mut self, report: PressReport) {
        self.presses = report.press;
        self.last_press = Some(report);
    }
}
