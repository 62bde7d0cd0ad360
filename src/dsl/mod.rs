//! DSL parser for pulse circuit descriptions.
//!
//! The DSL is line-oriented: every line declares one module and the
//! modules it sends pulses to.
//!
//! # Grammar Overview
//!
//! ```text
//! circuit     = { line }
//! line        = [ declaration ] [ comment ] newline
//! declaration = [ prefix ] name '->' name { ',' name }
//! comment     = '#' { any_char }
//!
//! prefix      = '%' | '&'
//! name        = (letter | digit | '_') { letter | digit | '_' }
//! ```
//!
//! # Module Types
//!
//! | Prefix | Type | Behavior |
//! |--------|------|----------|
//! | (none) | Broadcaster | Only valid for the name `broadcaster`; forwards low pulses |
//! | `%` | Flip-flop | Toggles on a low pulse, ignores high pulses |
//! | `&` | Conjunction | Sends low iff every input last sent high |
//!
//! Names that appear only as destinations become sinks.
//!
//! # Example
//!
//! ```text
//! broadcaster -> a
//! %a -> inv, con
//! &inv -> b
//! %b -> con
//! &con -> output
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::error::Result;

/// Parse a circuit DSL string into an AST.
pub fn parse(input: &str) -> Result<CircuitAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer)?;
    let ast = parser.parse()?;
    tracing::debug!(modules = ast.modules.len(), "parsed circuit description");
    Ok(ast)
}

/// Parse a circuit DSL file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<CircuitAst> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::error::PulseError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}
