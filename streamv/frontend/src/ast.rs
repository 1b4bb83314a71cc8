//! The formula AST and its construction combinators.
//!
//! Formulas are immutable trees: built once by the combinators below,
//! consumed read-only by the circuit compiler, never mutated afterwards.
//! Comparison operators cannot safely return non-`bool` values in Rust, so
//! `lt`/`gt` exist only as named combinators; subtraction additionally gets
//! the infix form through [`std::ops::Sub`].
use crate::schema::SchemaRef;
use crate::time::{Period, Unit};
use std::ops;
use streamv_utils::{Error, Id, StreamvResult, Value};

/// Deepest history offset accepted by [`Formula::index`]. Offsets count
/// backwards from `-1` (most recent value).
pub const MAX_HISTORY: i64 = 1024;

/// Binary operators usable inside formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum BinOp {
    Lt,
    Gt,
    Sub,
}

impl BinOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Lt => "lt",
            BinOp::Gt => "gt",
            BinOp::Sub => "sub",
        }
    }
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A monitoring formula over one or more input streams.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum Formula {
    /// A declared field on an input stream.
    FieldAccess { schema: SchemaRef, field: Id },
    /// `lt`, `gt` or `sub` over two operands.
    Binary {
        op: BinOp,
        left: Box<Formula>,
        right: Box<Formula>,
    },
    /// History access: `-1` is the most recent value, `-2` the one before,
    /// by decreasing recency.
    Index { target: Box<Formula>, offset: i64 },
    /// Re-evaluate `target` once per period rather than on every event.
    Every {
        target: Box<Formula>,
        period: Box<Formula>,
    },
    /// Most recently observed value of `target`.
    Last { target: Box<Formula> },
    /// `condition` must hold continuously across the trailing window of
    /// length `duration`.
    Always {
        duration: Box<Formula>,
        condition: Box<Formula>,
    },
    /// Instantiate `output` as an independent per-key template: one copy
    /// per distinct value seen on `id_source`, discarded when `eos_source`
    /// signals end-of-stream for that key.
    Multiplex {
        output: Box<Formula>,
        id_source: Box<Formula>,
        eos_source: Box<Formula>,
    },
    /// Evaluation-time wall clock.
    GlobalTime,
    /// Scalar literal.
    Literal(Value),
    /// Duration literal, normalized to seconds during lowering.
    PeriodRef(Period),
    /// Unit literal, lowered to its scale factor.
    UnitRef(Unit),
    /// Opaque host computation referenced by token; passed through to the
    /// backend without inspection.
    External(Id),
}

impl Formula {
    /// `self < rhs`
    pub fn lt<R: Into<Formula>>(self, rhs: R) -> Formula {
        Formula::binary(BinOp::Lt, self, rhs.into())
    }

    /// `self > rhs`
    pub fn gt<R: Into<Formula>>(self, rhs: R) -> Formula {
        Formula::binary(BinOp::Gt, self, rhs.into())
    }

    /// `self - rhs`
    pub fn sub<R: Into<Formula>>(self, rhs: R) -> Formula {
        Formula::binary(BinOp::Sub, self, rhs.into())
    }

    /// History access `self[offset]`. Only strictly negative offsets down
    /// to `-MAX_HISTORY` have defined semantics; anything else is rejected
    /// here rather than left to surprise the runtime.
    pub fn index(self, offset: i64) -> StreamvResult<Formula> {
        if offset >= 0 {
            return Err(Error::construction(format!(
                "history offset must be negative (`-1` is the most recent \
                 value), got {}",
                offset
            )));
        }
        if offset < -MAX_HISTORY {
            return Err(Error::construction(format!(
                "history offset {} exceeds the supported depth of {}",
                offset, MAX_HISTORY
            )));
        }
        Ok(Formula::Index {
            target: Box::new(self),
            offset,
        })
    }

    /// Periodic sampling: re-evaluate `self` once per `period`.
    pub fn every<P: Into<Formula>>(self, period: P) -> Formula {
        Formula::Every {
            target: Box::new(self),
            period: Box::new(period.into()),
        }
    }

    /// Most recently observed value of `self`.
    pub fn last(self) -> Formula {
        Formula::Last {
            target: Box::new(self),
        }
    }

    fn binary(op: BinOp, left: Formula, right: Formula) -> Formula {
        Formula::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// The trailing-window "H" operator: `condition` must hold continuously
/// across the window of length `duration` ending now.
pub fn always<D, C>(duration: D, condition: C) -> Formula
where
    D: Into<Formula>,
    C: Into<Formula>,
{
    Formula::Always {
        duration: Box::new(duration.into()),
        condition: Box::new(condition.into()),
    }
}

/// Per-key fan-out: treat `output` as a template and evaluate one
/// independent copy per distinct value seen on `id_source`; a copy's state
/// is discarded when `eos_source` evaluates true for its key.
pub fn multiplex_by_id<O, I, E>(output: O, id_source: I, eos_source: E) -> Formula
where
    O: Into<Formula>,
    I: Into<Formula>,
    E: Into<Formula>,
{
    Formula::Multiplex {
        output: Box::new(output.into()),
        id_source: Box::new(id_source.into()),
        eos_source: Box::new(eos_source.into()),
    }
}

/// Evaluation-time wall clock reference.
pub fn global_time() -> Formula {
    Formula::GlobalTime
}

/// Opaque host computation referenced by `token`. The compiler never
/// inspects it; backends receive it as an `external` call.
pub fn external<T: Into<Id>>(token: T) -> Formula {
    Formula::External(token.into())
}

/* =================== Operand conversions =================== */

impl From<Value> for Formula {
    fn from(v: Value) -> Self {
        Formula::Literal(v)
    }
}

impl From<Period> for Formula {
    fn from(p: Period) -> Self {
        Formula::PeriodRef(p)
    }
}

impl From<Unit> for Formula {
    fn from(u: Unit) -> Self {
        Formula::UnitRef(u)
    }
}

impl From<i64> for Formula {
    fn from(i: i64) -> Self {
        Formula::Literal(Value::Int(i))
    }
}

impl From<f64> for Formula {
    fn from(n: f64) -> Self {
        Formula::Literal(Value::Num(n))
    }
}

impl From<bool> for Formula {
    fn from(b: bool) -> Self {
        Formula::Literal(Value::Bool(b))
    }
}

impl From<&str> for Formula {
    fn from(s: &str) -> Self {
        Formula::Literal(Value::Str(s.to_string()))
    }
}

impl From<String> for Formula {
    fn from(s: String) -> Self {
        Formula::Literal(Value::Str(s))
    }
}

/// Construct a subtraction:
/// ```
/// use streamv_frontend::{global_time, external};
/// let lag = external("clock").last() - global_time();
/// ```
impl<R: Into<Formula>> ops::Sub<R> for Formula {
    type Output = Formula;

    fn sub(self, rhs: R) -> Formula {
        Formula::binary(BinOp::Sub, self, rhs.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldType, InputStream};

    fn probe() -> InputStream {
        InputStream::new("probe", [("value", FieldType::Float)]).unwrap()
    }

    #[test]
    fn comparison_combinators_build_binary_nodes() {
        let f = probe().field("value").unwrap().gt(5.0);
        match f {
            Formula::Binary { op, left, right } => {
                assert_eq!(op, BinOp::Gt);
                assert!(matches!(*left, Formula::FieldAccess { .. }));
                assert_eq!(*right, Formula::Literal(Value::Num(5.0)));
            }
            other => panic!("expected binary node, got {:?}", other),
        }
    }

    #[test]
    fn infix_sub_matches_the_named_combinator() {
        let a = probe().field("value").unwrap();
        let b = global_time();
        assert_eq!(a.clone() - b.clone(), a.sub(b));
    }

    #[test]
    fn index_accepts_recent_history_offsets() {
        let f = external("dist").index(-1).unwrap();
        assert!(matches!(f, Formula::Index { offset: -1, .. }));
        assert!(external("dist").index(-2).is_ok());
        assert!(external("dist").index(-MAX_HISTORY).is_ok());
    }

    #[test]
    fn index_rejects_undefined_offsets() {
        assert!(matches!(
            external("dist").index(0),
            Err(Error::Construction(_))
        ));
        assert!(external("dist").index(3).is_err());
        assert!(external("dist").index(-MAX_HISTORY - 1).is_err());
    }

    #[test]
    fn every_accepts_periods_scalars_and_units() {
        let base = probe().field("value").unwrap();
        match base.clone().every(10 * Unit::second()) {
            Formula::Every { period, .. } => {
                assert!(matches!(*period, Formula::PeriodRef(_)))
            }
            other => panic!("expected every node, got {:?}", other),
        }
        match base.clone().every(10.0) {
            Formula::Every { period, .. } => {
                assert_eq!(*period, Formula::Literal(Value::Num(10.0)))
            }
            other => panic!("expected every node, got {:?}", other),
        }
        match base.every(Unit::minute()) {
            Formula::Every { period, .. } => {
                assert!(matches!(*period, Formula::UnitRef(_)))
            }
            other => panic!("expected every node, got {:?}", other),
        }
    }

    #[test]
    fn multiplex_keeps_operand_order() {
        let stream = probe();
        let output = always(5 * Unit::second(), external("dist").lt(100.0));
        let id = stream.field("value").unwrap();
        let eos = global_time().gt(0);
        match multiplex_by_id(output.clone(), id.clone(), eos.clone()) {
            Formula::Multiplex {
                output: o,
                id_source,
                eos_source,
            } => {
                assert_eq!(*o, output);
                assert_eq!(*id_source, id);
                assert_eq!(*eos_source, eos);
            }
            other => panic!("expected multiplex node, got {:?}", other),
        }
    }
}
