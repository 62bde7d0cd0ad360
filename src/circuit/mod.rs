//! Module graph representation and validation.
//!
//! This module provides the internal representation of a circuit after parsing.
//! The [`Circuit`] struct holds every module and both edge directions in a
//! form suitable for simulation and for read-only graph queries.

mod graph;
mod types;
mod validate;

pub use graph::Circuit;
pub use types::*;
pub use validate::validate_ast;
