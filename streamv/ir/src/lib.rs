//! Backend-agnostic circuit representation for streamv formulas.
//!
//! The representation is generated from the frontend formula AST. The key
//! differences between the AST and the IR are:
//! 1. Durations are normalized: every period and unit becomes a plain
//!    seconds constant during lowering, so no downstream consumer ever
//!    sees a magnitude+unit pair.
//! 2. Operators are reduced to a fixed opcode set over ordered children,
//!    with an [`IrOp::Opaque`] escape hatch for hand-assembled circuits.

mod node;

pub use node::{IrNode, IrOp};

// Re-export the value types circuits are built from.
pub use streamv_utils::{Id, Value};

/// Module to lower formula trees into IR.
pub mod from_formula;

pub use from_formula::compile;
