use crate::Id;
use thiserror::Error;

/// Convenience alias for results produced by the compiler crates.
pub type StreamvResult<T> = Result<T, Error>;

/// Errors surfaced by formula construction and the two compiler stages.
///
/// Every variant is reported synchronously to the caller of the operation
/// that produced it; nothing is retried or swallowed internally.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed DSL usage detected while a formula is being built.
    #[error("malformed formula: {0}")]
    Construction(String),

    /// A formula node could not be lowered to the circuit IR. Unreachable
    /// for trees built through the combinators, which cover the closed
    /// operator set.
    #[error("cannot lower formula: {0}")]
    Compilation(String),

    /// No backend source is bound for a referenced (stream, field) pair.
    #[error("no backend source bound for `{stream}.{field}`")]
    Resolution { stream: Id, field: Id },

    /// A backend factory rejected an opcode it does not support.
    #[error("backend `{backend}` does not support opcode `{opcode}`")]
    BackendIntegration { backend: String, opcode: String },
}

impl Error {
    pub fn construction<S: ToString>(msg: S) -> Self {
        Error::Construction(msg.to_string())
    }

    pub fn compilation<S: ToString>(msg: S) -> Self {
        Error::Compilation(msg.to_string())
    }

    pub fn resolution(stream: Id, field: Id) -> Self {
        Error::Resolution { stream, field }
    }

    pub fn backend_integration<B, O>(backend: B, opcode: O) -> Self
    where
        B: ToString,
        O: ToString,
    {
        Error::BackendIntegration {
            backend: backend.to_string(),
            opcode: opcode.to_string(),
        }
    }
}
