//! Surface representation for streamv monitoring formulas.
//!
//! Defines time units, stream schema declarations, and the formula AST
//! built by combinators. Formula trees are lowered into the circuit
//! representation defined in the `streamv-ir` crate.

pub mod ast;
pub mod schema;
pub mod time;

pub use ast::{
    BinOp, Formula, MAX_HISTORY, always, external, global_time,
    multiplex_by_id,
};
pub use schema::{FieldType, InputStream, SchemaRef, StreamSchema};
pub use time::{Period, Unit};
