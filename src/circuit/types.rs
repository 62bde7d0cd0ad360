//! Core types for circuit representation.

use std::fmt;

use crate::dsl::DeclaredKind;

/// A unique identifier for a module in the circuit.
/// Indexes into the circuit's module arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub usize);

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.0)
    }
}

/// Behavior of a module when it receives a pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    /// Forwards a low pulse to every destination
    Broadcaster,
    /// One bit of memory, toggled by low pulses
    FlipFlop,
    /// NAND over the last value seen on each input edge
    Conjunction,
    /// Undeclared destination; absorbs pulses
    Sink,
}

impl From<DeclaredKind> for ModuleKind {
    fn from(kind: DeclaredKind) -> Self {
        match kind {
            DeclaredKind::Broadcaster => Self::Broadcaster,
            DeclaredKind::FlipFlop => Self::FlipFlop,
            DeclaredKind::Conjunction => Self::Conjunction,
        }
    }
}

/// A node in the module graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub id: ModuleId,
    pub name: String,
    pub kind: ModuleKind,
}

impl Module {
    /// Whether the module was synthesized rather than declared.
    pub fn is_sink(&self) -> bool {
        self.kind == ModuleKind::Sink
    }
}
