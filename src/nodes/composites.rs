use tracing::warn;

use super::{method_header, NodeExporter};
use crate::{
    expr::{Emitter, SELF},
    model::{
        ChildFinishPolicy, ExitPolicy, FailurePolicy, Node, NodeKind, ReferencedBehavior,
        RightValueDef, SuccessPolicy, Value, VariableDef,
    },
    types::quote,
    writer::CodeWriter,
};

/// Composites built straight from their runtime type.
pub struct CompositeExporter;

impl NodeExporter for CompositeExporter {}

pub struct ParallelExporter;

impl ParallelExporter {
    fn failure(policy: FailurePolicy) -> &'static str {
        match policy {
            FailurePolicy::FailOnOne => "composites.ParallelFailureOnOne",
            FailurePolicy::FailOnAll => "composites.ParallelFailureOnAll",
            FailurePolicy::Unspecified => "",
        }
    }

    fn success(policy: SuccessPolicy) -> &'static str {
        match policy {
            SuccessPolicy::SucceedOnOne => "composites.ParallelSuccessOnOne",
            SuccessPolicy::SucceedOnAll => "composites.ParallelSuccessOnAll",
            SuccessPolicy::Unspecified => "",
        }
    }

    fn exit(policy: ExitPolicy) -> &'static str {
        match policy {
            ExitPolicy::ExitNone => "composites.ParallesExitNone",
            ExitPolicy::ExitAbortRunningSiblings => "composites.ParallesExitAbort",
            ExitPolicy::Unspecified => "",
        }
    }

    fn child_finish(policy: ChildFinishPolicy) -> &'static str {
        match policy {
            ChildFinishPolicy::ChildOnce => "composites.ParallelChildFinishOnce",
            ChildFinishPolicy::ChildLoop => "composites.ParallelChildFinishLoop",
            ChildFinishPolicy::Unspecified => "",
        }
    }
}

impl NodeExporter for ParallelExporter {
    fn should_declare_type(&self, node: &Node) -> bool {
        matches!(node.kind, NodeKind::Parallel(_))
    }

    fn emit_constructor(&self, node: &Node, _em: &mut Emitter, out: &mut Vec<String>) {
        let NodeKind::Parallel(parallel) = &node.kind else {
            return;
        };
        let policies = [
            ("FailurePolicy", Self::failure(parallel.failure)),
            ("SuccessPolicy", Self::success(parallel.success)),
            ("ExitPolicy", Self::exit(parallel.exit)),
            ("ChildFinishPolicy", Self::child_finish(parallel.child_finish)),
        ];
        for (field, value) in policies {
            // An unspecified policy is substituted as is, leaving the runtime default undecided.
            if value.is_empty() {
                warn!(node = node.id, field, "Parallel policy is unspecified");
            }
            out.push(format!("{}.{} = {}", SELF, field, value));
        }
    }
}

/// Subtree references. The referenced tree is generated on its own, so only the lookup of
/// its name is emitted here.
pub struct ReferencedBehaviorExporter;

impl ReferencedBehaviorExporter {
    fn constant_name(reference: &RightValueDef) -> Option<&str> {
        match reference {
            RightValueDef::Var(VariableDef::Const {
                value: Value::String(name),
                ..
            }) => Some(name),
            _ => None,
        }
    }
}

impl NodeExporter for ReferencedBehaviorExporter {
    fn should_declare_type(&self, node: &Node) -> bool {
        matches!(
            &node.kind,
            NodeKind::ReferencedBehavior(ReferencedBehavior {
                reference: Some(_),
                ..
            })
        )
    }

    fn emit_methods(&self, node: &Node, class: &str, em: &mut Emitter, w: &mut CodeWriter) {
        let NodeKind::ReferencedBehavior(ReferencedBehavior {
            reference: Some(value),
            ..
        }) = &node.kind
        else {
            return;
        };
        let ctx = em.ctx();

        w.block(method_header(class, "GetSubtree", "string"), "}", |w| {
            if let Some(name) = Self::constant_name(value) {
                if ctx.catalog.knows_behavior(name) {
                    w.line(format!("return {}", quote(name)));
                } else {
                    warn!(node = node.id, subtree = name, "referenced behavior not found");
                    w.line(format!(
                        "panic({})",
                        quote(&format!("subtree not found: {}", name))
                    ));
                }
                return;
            }

            let e = em.right_value(value, "subtree");
            w.block("if agent != nil {", "}", |w| {
                let (pre, expr) = e.bind("subtree");
                w.lines(pre);
                w.line(format!("return {}", expr));
            });
            w.line("panic(\"subtree not found\")");
        });
        w.blank();
    }
}
