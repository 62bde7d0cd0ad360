//! Pulse values.

use std::fmt;
use std::ops::Not;

use crate::circuit::ModuleId;

/// A binary pulse value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Level {
    /// 0
    #[default]
    Low,
    /// 1
    High,
}

impl Level {
    /// Whether this is a high pulse.
    pub fn is_high(self) -> bool {
        self == Self::High
    }
}

impl Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => f.write_str("low"),
            Self::High => f.write_str("high"),
        }
    }
}

/// A pulse in flight during one wave of a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub level: Level,
    /// Destination module
    pub to: ModuleId,
}
