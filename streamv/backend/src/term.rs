//! Reference backend producing plain, inspectable term trees.
use crate::traits::{BACKEND_OPCODES, Backend};
use itertools::Itertools;
use std::fmt;
use streamv_utils::{Error, Id, StreamvResult, Value};

/// Node produced by [`TermBackend`]: a name, an optional payload value,
/// and ordered children. Useful for tests and as a template for real
/// engine integrations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Term {
    pub name: Id,
    pub value: Option<Value>,
    pub args: Vec<Term>,
}

impl Term {
    pub fn leaf<S: Into<Id>>(name: S) -> Self {
        Term {
            name: name.into(),
            value: None,
            args: Vec::new(),
        }
    }

    pub fn call<S: Into<Id>>(name: S, args: Vec<Term>) -> Self {
        Term {
            name: name.into(),
            value: None,
            args,
        }
    }

    pub fn constant(value: Value) -> Self {
        Term {
            name: "const".into(),
            value: Some(value),
            args: Vec::new(),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.value, self.args.is_empty()) {
            (Some(value), _) => write!(f, "{}({})", self.name, value),
            (None, true) => write!(f, "{}", self.name),
            (None, false) => {
                write!(f, "{}({})", self.name, self.args.iter().join(", "))
            }
        }
    }
}

/// Reference [`Backend`] that enforces the fixed opcode vocabulary.
#[derive(Debug, Clone, Copy, Default)]
pub struct TermBackend;

impl Backend for TermBackend {
    type Node = Term;

    fn name(&self) -> &'static str {
        "term"
    }

    fn make_constant(&mut self, value: &Value) -> StreamvResult<Term> {
        Ok(Term::constant(value.clone()))
    }

    fn make_call(
        &mut self,
        opcode: &str,
        args: Vec<Term>,
    ) -> StreamvResult<Term> {
        if !BACKEND_OPCODES.contains(&opcode) {
            return Err(Error::backend_integration(self.name(), opcode));
        }
        Ok(Term::call(opcode, args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_compact() {
        let t = Term::call(
            "gt",
            vec![Term::leaf("probe_value"), Term::constant(Value::Int(10))],
        );
        assert_eq!(t.to_string(), "gt(probe_value, const(10))");
        assert_eq!(Term::leaf("global_time").to_string(), "global_time");
    }

    #[test]
    fn unknown_opcode_is_an_integration_error() {
        let mut backend = TermBackend;
        let err = backend.make_call("median", vec![]).unwrap_err();
        assert_eq!(
            err,
            Error::backend_integration("term", "median")
        );
        // Everything in the published vocabulary is accepted.
        for opcode in BACKEND_OPCODES {
            assert!(backend.make_call(opcode, vec![]).is_ok());
        }
    }
}
