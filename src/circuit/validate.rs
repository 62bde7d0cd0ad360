//! Circuit description validation.

use std::collections::HashSet;

use crate::dsl::{CircuitAst, DeclaredKind, BROADCASTER};
use crate::error::{PulseError, Result};

/// Validate a parsed description before building a graph from it.
///
/// Checks:
/// - Every module name is declared at most once
/// - An un-prefixed `broadcaster` is declared
pub fn validate_ast(ast: &CircuitAst) -> Result<()> {
    let mut seen = HashSet::with_capacity(ast.modules.len());
    for def in &ast.modules {
        if !seen.insert(def.name.as_str()) {
            return Err(PulseError::DuplicateModule {
                name: def.name.clone(),
            });
        }
    }

    let has_broadcaster = ast
        .modules
        .iter()
        .any(|def| def.kind == DeclaredKind::Broadcaster && def.name == BROADCASTER);
    if !has_broadcaster {
        return Err(PulseError::MissingBroadcaster);
    }

    Ok(())
}
