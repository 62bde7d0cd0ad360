//! Abstract Syntax Tree types for the circuit DSL.

use std::fmt;

/// Name of the unique entry-point module.
pub const BROADCASTER: &str = "broadcaster";

/// Complete AST representation of a parsed circuit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CircuitAst {
    /// Module declarations in source order
    pub modules: Vec<ModuleDef>,
}

impl CircuitAst {
    /// Create a new empty circuit AST.
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Display for CircuitAst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, module) in self.modules.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", module)?;
        }
        Ok(())
    }
}

/// A single `<prefix><name> -> <dest>, ...` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDef {
    /// Declared module type
    pub kind: DeclaredKind,
    /// Module name (without prefix)
    pub name: String,
    /// Destination names, in declaration order (duplicates kept)
    pub destinations: Vec<String>,
    /// Source line number for error reporting
    pub line: usize,
}

impl fmt::Display for ModuleDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} -> {}",
            self.kind.prefix(),
            self.name,
            self.destinations.join(", ")
        )
    }
}

/// Module types that can be declared in the DSL.
///
/// Sinks are never declared; the graph builder synthesizes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredKind {
    /// The un-prefixed `broadcaster`
    Broadcaster,
    /// `%name`
    FlipFlop,
    /// `&name`
    Conjunction,
}

impl DeclaredKind {
    /// Parse a module type from its DSL prefix.
    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            '%' => Some(Self::FlipFlop),
            '&' => Some(Self::Conjunction),
            _ => None,
        }
    }

    /// The DSL prefix for this type (empty for the broadcaster).
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Broadcaster => "",
            Self::FlipFlop => "%",
            Self::Conjunction => "&",
        }
    }
}
