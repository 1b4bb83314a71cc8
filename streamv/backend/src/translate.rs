//! Retargets circuit IR onto an execution backend.
use crate::traits::{Backend, ResolveSource};
use log::debug;
use streamv_ir::{IrNode, IrOp};
use streamv_utils::{StreamvResult, Value};

/// Translate a circuit into engine-native nodes through the supplied hooks.
///
/// Leaves dispatch to the resolver and the constant factory; every other
/// node translates its children in their original order and hands them to
/// the call factory. `multiplex` is emitted structurally — its first child
/// is a per-key template whose lifecycle (see [`crate::fanout`]) the
/// engine must honor; no fan-out happens here. Opaque opcodes pass through
/// as `external` calls: translation never fails because an opcode is
/// unfamiliar to this stage, only a backend factory may reject one.
pub fn translate<R, B>(
    node: &IrNode,
    resolver: &R,
    backend: &mut B,
) -> StreamvResult<B::Node>
where
    B: Backend,
    R: ResolveSource<Node = B::Node>,
{
    match node {
        IrNode::Source { schema, field } => resolver.resolve(schema, field),
        IrNode::Constant(value) => backend.make_constant(value),
        IrNode::Period(seconds) => {
            backend.make_constant(&Value::Num(*seconds))
        }
        IrNode::Unit(scale) => backend.make_constant(&Value::Num(*scale)),
        IrNode::External(token) => {
            let payload =
                backend.make_constant(&Value::Str(token.to_string()))?;
            backend.make_call("external", vec![payload])
        }
        IrNode::Call { op, args } => {
            let children = args
                .iter()
                .map(|arg| translate(arg, resolver, backend))
                .collect::<StreamvResult<Vec<_>>>()?;
            match op {
                IrOp::Multiplex => {
                    debug!(
                        "emitting multiplex; first child runs under \
                         per-key fan-out"
                    );
                    backend.make_call(op.as_str(), children)
                }
                IrOp::Opaque(name) => {
                    debug!("passing opaque opcode `{}` through as external", name);
                    backend.make_call("external", children)
                }
                _ => backend.make_call(op.as_str(), children),
            }
        }
    }
}
