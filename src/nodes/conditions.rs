use tracing::warn;

use super::{method_header, NodeExporter};
use crate::{
    expr::Emitter,
    model::{Node, NodeKind},
    writer::CodeWriter,
};

/// `And`, `Or`, `True` and `False` need no code of their own.
pub struct ConditionBaseExporter;

impl NodeExporter for ConditionBaseExporter {}

pub struct ConditionExporter;

impl NodeExporter for ConditionExporter {
    fn should_declare_type(&self, node: &Node) -> bool {
        matches!(node.kind, NodeKind::Condition(_))
    }

    fn emit_methods(&self, node: &Node, class: &str, em: &mut Emitter, w: &mut CodeWriter) {
        let NodeKind::Condition(condition) = &node.kind else {
            return;
        };

        w.block(method_header(class, "Compare", "bool"), "}", |w| {
            let (Some(opl), Some(opr)) = (&condition.opl, &condition.opr) else {
                warn!(node = node.id, "Condition is missing an operand");
                w.line("return false");
                return;
            };
            let Some(op) = condition.operator.symbol() else {
                w.line("return false");
                return;
            };

            let (pre, expr) = em.right_value(opl, "opl").bind("oplRet");
            w.lines(pre);
            w.line(format!("opl := {}", expr));
            let (pre, expr) = em.right_value(opr, "opr").bind("oprRet");
            w.lines(pre);
            w.line(format!("opr := {}", expr));
            w.line(format!("return opl {} opr", op));
        });
        w.blank();
    }
}
