//! Error types for the pulse circuit simulator.
//!
//! This module provides a unified error type [`PulseError`] that covers
//! all error conditions that can occur during DSL parsing, circuit
//! construction, and simulation.

use thiserror::Error;

/// Result type alias using [`PulseError`].
pub type Result<T> = std::result::Result<T, PulseError>;

/// Unified error type for all pulse circuit operations.
#[derive(Error, Debug)]
pub enum PulseError {
    // ============ DSL Parsing Errors ============
    /// A definition line does not have the `<prefix><name> -> <dest>, ...` shape
    #[error("Malformed line {line}: {message}")]
    MalformedLine { line: usize, message: String },

    // ============ Circuit Construction Errors ============
    /// No un-prefixed `broadcaster` line was found
    #[error("Circuit has no broadcaster (declare 'broadcaster -> ...')")]
    MissingBroadcaster,

    /// Two lines declare the same module name
    #[error("Duplicate module name '{name}'")]
    DuplicateModule { name: String },

    /// A module name that is not part of the circuit
    #[error("Module '{name}' not found in circuit")]
    UnknownModule { name: String },

    // ============ Simulation Errors ============
    /// A single press did not settle within the wave ceiling
    #[error("Simulation did not settle after {waves} waves")]
    DivergentSimulation { waves: usize },

    /// Invalid simulation parameter
    #[error("Invalid simulation parameter: {message}")]
    InvalidSimulationParam { message: String },

    // ============ I/O Errors ============
    /// Error reading circuit file
    #[error("Failed to read circuit file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl PulseError {
    /// Create a malformed line error
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedLine {
            line,
            message: message.into(),
        }
    }

    /// Create an unknown module error
    pub fn unknown_module(name: impl Into<String>) -> Self {
        Self::UnknownModule { name: name.into() }
    }
}
