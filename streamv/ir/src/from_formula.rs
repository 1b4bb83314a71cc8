//! Lowering from formula trees to the circuit IR.
use crate::{IrNode, IrOp};
use log::trace;
use std::rc::Rc;
use streamv_frontend::{BinOp, Formula};
use streamv_utils::{StreamvResult, Value};

/// Lower a formula tree into the circuit IR.
///
/// Pure, total and deterministic: structurally equal formulas lower to
/// structurally equal circuits, children keep their operand order, and
/// duration normalization (magnitude × unit → seconds) happens here and
/// nowhere else. The error path is unreachable for combinator-built trees;
/// the closed operator set is matched exhaustively.
pub fn compile(formula: &Formula) -> StreamvResult<IrNode> {
    trace!("lowering formula tree to circuit IR");
    lower(formula)
}

fn lower(formula: &Formula) -> StreamvResult<IrNode> {
    let node = match formula {
        Formula::FieldAccess { schema, field } => IrNode::Source {
            schema: Rc::clone(schema),
            field: field.clone(),
        },
        Formula::Binary { op, left, right } => IrNode::call(
            bin_op(*op),
            vec![lower(left)?, lower(right)?],
        ),
        Formula::Index { target, offset } => IrNode::call(
            IrOp::Index,
            vec![lower(target)?, IrNode::Constant(Value::Int(*offset))],
        ),
        Formula::Every { target, period } => IrNode::call(
            IrOp::Every,
            vec![lower(target)?, lower(period)?],
        ),
        Formula::Last { target } => {
            IrNode::call(IrOp::Last, vec![lower(target)?])
        }
        Formula::Always {
            duration,
            condition,
        } => IrNode::call(
            IrOp::Always,
            vec![lower(duration)?, lower(condition)?],
        ),
        Formula::Multiplex {
            output,
            id_source,
            eos_source,
        } => IrNode::call(
            IrOp::Multiplex,
            vec![lower(output)?, lower(id_source)?, lower(eos_source)?],
        ),
        Formula::GlobalTime => IrNode::call(IrOp::GlobalTime, vec![]),
        Formula::Literal(v) => IrNode::Constant(v.clone()),
        Formula::PeriodRef(p) => {
            IrNode::Constant(Value::Num(p.to_seconds()))
        }
        Formula::UnitRef(u) => IrNode::Constant(Value::Num(u.scale())),
        Formula::External(token) => IrNode::External(token.clone()),
    };
    Ok(node)
}

fn bin_op(op: BinOp) -> IrOp {
    match op {
        BinOp::Lt => IrOp::Lt,
        BinOp::Gt => IrOp::Gt,
        BinOp::Sub => IrOp::Sub,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use streamv_frontend::{
        FieldType, InputStream, Period, Unit, always, external, global_time,
        multiplex_by_id,
    };

    fn track() -> InputStream {
        InputStream::new(
            "track",
            [("id", FieldType::Int), ("dist", FieldType::Float)],
        )
        .unwrap()
    }

    #[test]
    fn field_access_lowers_to_a_source_leaf() {
        let stream = track();
        let ir = compile(&stream.field("dist").unwrap()).unwrap();
        match ir {
            IrNode::Source { schema, field } => {
                assert!(Rc::ptr_eq(&schema, stream.schema()));
                assert_eq!(field, "dist");
            }
            other => panic!("expected source leaf, got {}", other),
        }
    }

    #[test]
    fn binary_shape_and_order_are_preserved() {
        let f = external("a").lt(external("b"));
        let ir = compile(&f).unwrap();
        match &ir {
            IrNode::Call { op, args } => {
                assert_eq!(*op, IrOp::Lt);
                assert_eq!(args.len(), 2);
                assert_eq!(args[0], IrNode::External("a".into()));
                assert_eq!(args[1], IrNode::External("b".into()));
            }
            other => panic!("expected call, got {}", other),
        }
    }

    #[test]
    fn index_offsets_become_integer_constants() {
        for offset in [-1i64, -2] {
            let ir =
                compile(&external("dist").index(offset).unwrap()).unwrap();
            let IrNode::Call { op, args } = &ir else {
                panic!("expected call, got {}", ir);
            };
            assert_eq!(*op, IrOp::Index);
            assert_eq!(args[1], IrNode::Constant(Value::Int(offset)));
        }
    }

    #[test]
    fn unvalidated_index_trees_pass_through_untouched() {
        let f = Formula::Index {
            target: Box::new(external("dist")),
            offset: 3,
        };
        let ir = compile(&f).unwrap();
        assert_eq!(ir.args()[1], IrNode::Constant(Value::Int(3)));
    }

    #[test]
    fn periods_normalize_to_seconds_exactly_once() {
        let base = external("dist");
        let ir = compile(&base.clone().every(10 * Unit::second())).unwrap();
        assert_eq!(ir.args()[1], IrNode::Constant(Value::Num(10.0)));

        let ir = compile(&base.clone().every(10 * Unit::minute())).unwrap();
        assert_eq!(ir.args()[1], IrNode::Constant(Value::Num(600.0)));

        let ir = compile(&base.every(Period::new(0.5, Unit::hour()))).unwrap();
        assert_eq!(ir.args()[1], IrNode::Constant(Value::Num(1800.0)));
    }

    #[test]
    fn units_lower_to_their_scale() {
        let ir = compile(&Formula::UnitRef(Unit::minute())).unwrap();
        assert_eq!(ir, IrNode::Constant(Value::Num(60.0)));
    }

    #[test]
    fn global_time_has_zero_children() {
        let ir = compile(&global_time()).unwrap();
        assert_eq!(ir, IrNode::call(IrOp::GlobalTime, vec![]));
        assert!(ir.args().is_empty());
    }

    #[test]
    fn multiplex_children_keep_order_and_template_structure() {
        let output = always(
            5 * Unit::second(),
            external("dist")
                .index(-1)
                .unwrap()
                .lt(external("dist").index(-2).unwrap()),
        );
        let id = track().field("id").unwrap();
        let eos = global_time().gt(10);
        let mux = multiplex_by_id(output.clone(), id.clone(), eos.clone());

        let ir = compile(&mux).unwrap();
        let IrNode::Call { op, args } = &ir else {
            panic!("expected call, got {}", ir);
        };
        assert_eq!(*op, IrOp::Multiplex);
        assert_eq!(args.len(), 3);
        // The template subtree is preserved unmodified as the first child.
        assert_eq!(args[0], compile(&output).unwrap());
        assert_eq!(args[1], compile(&id).unwrap());
        assert_eq!(args[2], compile(&eos).unwrap());
    }

    #[test]
    fn compilation_is_deterministic() {
        let stream = track().timestamped();
        let f = (stream.field("time").unwrap().last() - global_time())
            .gt(10)
            .every(10 * Unit::second());
        assert_eq!(compile(&f).unwrap(), compile(&f).unwrap());
    }

    fn formula_strategy() -> impl Strategy<Value = Formula> {
        let leaf = prop_oneof![
            any::<i64>().prop_map(|i| Formula::Literal(Value::Int(i))),
            (-1.0e6f64..1.0e6).prop_map(|n| Formula::Literal(Value::Num(n))),
            any::<bool>().prop_map(|b| Formula::Literal(Value::Bool(b))),
            Just(global_time()),
            "[a-z]{1,8}".prop_map(|t| external(t.as_str())),
            (0.001f64..1.0e4)
                .prop_map(|v| Formula::PeriodRef(Period::new(v, Unit::second()))),
        ];
        leaf.prop_recursive(4, 48, 3, |inner| {
            prop_oneof![
                (inner.clone(), inner.clone()).prop_map(|(a, b)| a.lt(b)),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| a.gt(b)),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| a - b),
                (inner.clone(), -64i64..=-1)
                    .prop_map(|(t, off)| t.index(off).unwrap()),
                inner.clone().prop_map(|t| t.last()),
                (inner.clone(), 1u32..3600)
                    .prop_map(|(t, s)| t.every(s as f64 * Unit::second())),
                (inner.clone(), inner.clone())
                    .prop_map(|(d, c)| always(d, c)),
                (inner.clone(), inner.clone(), inner.clone())
                    .prop_map(|(o, i, e)| multiplex_by_id(o, i, e)),
            ]
        })
    }

    proptest! {
        #[test]
        fn lowering_is_pure_and_deterministic(f in formula_strategy()) {
            prop_assert_eq!(compile(&f).unwrap(), compile(&f).unwrap());
        }

        #[test]
        fn every_formula_lowers_to_exactly_one_node(f in formula_strategy()) {
            // Totality: a well-formed tree always produces an IR tree.
            prop_assert!(compile(&f).is_ok());
        }
    }
}
