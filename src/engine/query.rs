//! Repeated-press queries.

use crate::error::Result;

use super::simulator::Simulator;
use super::state::{SimulationState, Statistics};

impl Simulator {
    /// Press the button `n` times and return the accumulated counters.
    pub fn press_n(&mut self, n: u64) -> Result<Statistics> {
        for _ in 0..n {
            self.press()?;
        }
        Ok(self.statistics())
    }

    /// Press until `predicate` holds on the state after a press.
    ///
    /// Returns the press number (within this simulator's state) at which it
    /// first held, or `None` once `max_presses` presses were made without
    /// success.
    pub fn press_until<F>(&mut self, mut predicate: F) -> Result<Option<u64>>
    where
        F: FnMut(&SimulationState) -> bool,
    {
        for _ in 0..self.config().max_presses {
            let report = self.press()?;
            if predicate(self.state()) {
                return Ok(Some(report.press));
            }
        }
        tracing::warn!(
            max_presses = self.config().max_presses,
            "press ceiling reached before predicate held"
        );
        Ok(None)
    }

    /// Press `horizon` times and collect every press number after which
    /// `predicate` held.
    pub fn presses_where<F>(&mut self, horizon: u64, mut predicate: F) -> Result<Vec<u64>>
    where
        F: FnMut(&SimulationState) -> bool,
    {
        let mut hits = Vec::new();
        for _ in 0..horizon {
            let report = self.press()?;
            if predicate(self.state()) {
                hits.push(report.press);
            }
        }
        Ok(hits)
    }
}
