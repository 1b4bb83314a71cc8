//! Backend translation for streamv circuits.
//!
//! Retargets the backend-agnostic IR onto an execution engine through the
//! [`Backend`] node factories and a [`ResolveSource`] hook. The engine
//! itself — scheduling, threading, per-key instance storage — lives
//! outside this workspace; this crate only produces the engine's nodes
//! and specifies the fan-out lifecycle those nodes must honor.

pub mod fanout;
mod source_map;
mod term;
mod traits;
mod translate;

pub use source_map::SourceMap;
pub use term::{Term, TermBackend};
pub use traits::{BACKEND_OPCODES, Backend, ResolveSource};
pub use translate::translate;
