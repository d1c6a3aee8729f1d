use tracing::warn;

use super::{go_bool, method_header, write_getter, NodeExporter};
use crate::{
    catalog::ValueType,
    expr::{Emitter, SELF},
    model::{Node, NodeKind, Status},
    writer::CodeWriter,
};

pub struct ActionExporter;

impl NodeExporter for ActionExporter {
    fn should_declare_type(&self, node: &Node) -> bool {
        matches!(node.kind, NodeKind::Action(_))
    }

    fn emit_methods(&self, node: &Node, class: &str, em: &mut Emitter, w: &mut CodeWriter) {
        let NodeKind::Action(action) = &node.kind else {
            return;
        };
        let ctx = em.ctx();
        ctx.use_package("bt");

        w.block(method_header(class, "Execute", "bt.Status"), "}", |w| {
            let Some(method) = &action.method else {
                w.line(format!("return {}", action.result_option.go_constant()));
                return;
            };

            let call = em.method_call(method, "method");
            let return_type = ctx.classify(&method.return_type);
            if return_type == ValueType::Status {
                w.lines(call.pre);
                w.line(format!("result := {}", call.expr));
                w.lines(call.post);
                w.line("return result");
                return;
            }

            let use_functor = return_type != ValueType::Void
                && action.result_option == Status::Invalid
                && action.result_functor.is_some();
            w.lines(call.pre);
            if use_functor {
                w.line(format!("result := {}", call.expr));
            } else {
                w.line(call.expr);
            }
            w.lines(call.post);

            let status = match &action.result_functor {
                Some(functor) if action.result_option == Status::Invalid => {
                    if return_type == ValueType::Void {
                        let (pre, expr) = em.method_call(functor, "functor").bind("functor");
                        w.lines(pre);
                        expr
                    } else {
                        format!(
                            "{}.{}(result)",
                            ctx.agent_receiver(&functor.class_name),
                            ctx.member_name(&functor.name)
                        )
                    }
                }
                _ => action.result_option.go_constant().to_owned(),
            };
            w.line(format!("return {}", status));
        });
        w.blank();
    }
}

pub struct AssignmentExporter;

impl NodeExporter for AssignmentExporter {
    fn should_declare_type(&self, node: &Node) -> bool {
        matches!(node.kind, NodeKind::Assignment(_))
    }

    fn emit_methods(&self, node: &Node, class: &str, em: &mut Emitter, w: &mut CodeWriter) {
        let NodeKind::Assignment(assignment) = &node.kind else {
            return;
        };

        w.block(method_header(class, "Assign", ""), "}", |w| {
            let (Some(opl), Some(opr)) = (&assignment.opl, &assignment.opr) else {
                warn!(node = node.id, "Assignment is missing an operand");
                return;
            };
            let (pre, expr) = em.right_value(opr, "opr").bind("opr");
            w.lines(pre);
            let value = if assignment.casting {
                format!("{}({})", em.ctx().go_type(opl.native_type()), expr)
            } else {
                expr
            };
            let lines = em.assign(opl, &value, "opl");
            w.lines(lines);
        });
        w.blank();
    }
}

pub struct ComputeExporter;

impl NodeExporter for ComputeExporter {
    fn should_declare_type(&self, node: &Node) -> bool {
        matches!(node.kind, NodeKind::Compute(_))
    }

    fn emit_methods(&self, node: &Node, class: &str, em: &mut Emitter, w: &mut CodeWriter) {
        let NodeKind::Compute(compute) = &node.kind else {
            return;
        };

        w.block(method_header(class, "Calculate", ""), "}", |w| {
            let (Some(opl), Some(opr1), Some(opr2)) =
                (&compute.opl, &compute.opr1, &compute.opr2)
            else {
                warn!(node = node.id, "Compute is missing an operand");
                return;
            };
            let (pre1, expr1) = em.right_value(opr1, "opr1").bind("opr1");
            let (pre2, expr2) = em.right_value(opr2, "opr2").bind("opr2");
            w.lines(pre1);
            w.lines(pre2);
            let value = format!(
                "{}({} {} {})",
                em.ctx().go_type(opl.native_type()),
                expr1,
                compute.operator.symbol(),
                expr2
            );
            let lines = em.assign(opl, &value, "opl");
            w.lines(lines);
        });
        w.blank();
    }
}

pub struct WaitExporter;

impl NodeExporter for WaitExporter {
    fn should_declare_type(&self, node: &Node) -> bool {
        matches!(node.kind, NodeKind::Wait(_))
    }

    fn emit_methods(&self, node: &Node, class: &str, em: &mut Emitter, w: &mut CodeWriter) {
        if let NodeKind::Wait(wait) = &node.kind {
            if let Some(time) = &wait.time {
                let value = em.right_value(time, "time");
                write_getter(w, class, "GetTime", "int", value, Some("int"));
            }
        }
    }
}

pub struct WaitFramesExporter;

impl NodeExporter for WaitFramesExporter {
    fn should_declare_type(&self, node: &Node) -> bool {
        matches!(node.kind, NodeKind::WaitFrames(_))
    }

    fn emit_methods(&self, node: &Node, class: &str, em: &mut Emitter, w: &mut CodeWriter) {
        if let NodeKind::WaitFrames(wait) = &node.kind {
            if let Some(frames) = &wait.frames {
                let value = em.right_value(frames, "frames");
                write_getter(w, class, "GetFrames", "int", value, Some("int"));
            }
        }
    }
}

pub struct EndExporter;

impl NodeExporter for EndExporter {
    fn should_declare_type(&self, node: &Node) -> bool {
        matches!(node.kind, NodeKind::End(_))
    }

    fn emit_constructor(&self, node: &Node, _em: &mut Emitter, out: &mut Vec<String>) {
        if let NodeKind::End(end) = &node.kind {
            out.push(format!("{}.EndOutside = {}", SELF, go_bool(end.end_outside)));
        }
    }

    fn emit_methods(&self, node: &Node, class: &str, em: &mut Emitter, w: &mut CodeWriter) {
        if let NodeKind::End(end) = &node.kind {
            if let Some(status) = &end.status {
                let value = em.right_value(status, "status");
                write_getter(w, class, "GetStatus", "bt.Status", value, None);
            }
        }
    }
}

/// Leaves that are plain runtime types, such as `Noop`.
pub struct LeafExporter;

impl NodeExporter for LeafExporter {}
