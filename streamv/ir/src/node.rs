use itertools::Itertools;
use std::fmt;
use streamv_frontend::SchemaRef;
use streamv_utils::{Id, Value};

/// Opcode carried by a circuit call node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum IrOp {
    Lt,
    Gt,
    Sub,
    Index,
    Last,
    Every,
    Always,
    Multiplex,
    GlobalTime,
    /// Custom opcode on a hand-assembled circuit. The formula compiler
    /// never produces this; backends receive it as an `external` call.
    Opaque(Id),
}

impl IrOp {
    pub fn as_str(&self) -> &str {
        match self {
            IrOp::Lt => "lt",
            IrOp::Gt => "gt",
            IrOp::Sub => "sub",
            IrOp::Index => "index",
            IrOp::Last => "last",
            IrOp::Every => "every",
            IrOp::Always => "always",
            IrOp::Multiplex => "multiplex",
            IrOp::GlobalTime => "global_time",
            IrOp::Opaque(id) => id.as_str(),
        }
    }
}

impl fmt::Display for IrOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A node in the backend-agnostic circuit representation.
///
/// Produced fresh per compilation and never mutated afterwards. Children
/// keep the order of the formula operands they were lowered from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum IrNode {
    /// Operator application over ordered children.
    Call { op: IrOp, args: Vec<IrNode> },
    /// Data source: a declared field on an input stream.
    Source { schema: SchemaRef, field: Id },
    /// Scalar constant.
    Constant(Value),
    /// A duration, already normalized to seconds. Accepted from
    /// hand-assembled circuits only: the formula compiler lowers periods
    /// to [`IrNode::Constant`] directly.
    Period(f64),
    /// A unit scale factor in seconds. Hand-assembled circuits only.
    Unit(f64),
    /// Opaque host computation referenced by token.
    External(Id),
}

impl IrNode {
    pub fn call(op: IrOp, args: Vec<IrNode>) -> Self {
        IrNode::Call { op, args }
    }

    pub fn constant<V: Into<Value>>(value: V) -> Self {
        IrNode::Constant(value.into())
    }

    /// Ordered children; empty for leaves.
    pub fn args(&self) -> &[IrNode] {
        match self {
            IrNode::Call { args, .. } => args,
            _ => &[],
        }
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self, IrNode::Call { .. })
    }
}

impl fmt::Display for IrNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrNode::Call { op, args } => {
                if args.is_empty() {
                    write!(f, "{}", op)
                } else {
                    write!(f, "{}({})", op, args.iter().join(", "))
                }
            }
            IrNode::Source { schema, field } => {
                write!(f, "source({}.{})", schema.name(), field)
            }
            IrNode::Constant(v) => write!(f, "const({})", v),
            IrNode::Period(seconds) => write!(f, "period({})", seconds),
            IrNode::Unit(scale) => write!(f, "unit({})", scale),
            IrNode::External(token) => write!(f, "external({})", token),
        }
    }
}
