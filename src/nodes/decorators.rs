use super::{go_bool, write_getter, NodeExporter};
use crate::{
    expr::{Emitter, SELF},
    model::{Node, NodeKind},
    types::quote,
    writer::CodeWriter,
};

/// Decorators without parameters still get a type of their own.
pub struct DecoratorExporter;

impl NodeExporter for DecoratorExporter {
    fn should_declare_type(&self, _node: &Node) -> bool {
        true
    }
}

/// The counting family: loop, repeat, count limit, failure until and success until.
pub struct DecoratorCountExporter;

impl NodeExporter for DecoratorCountExporter {
    fn should_declare_type(&self, _node: &Node) -> bool {
        true
    }

    fn emit_methods(&self, node: &Node, class: &str, em: &mut Emitter, w: &mut CodeWriter) {
        if let Some(count) = node.kind.count() {
            let value = em.variable(count, "count");
            write_getter(w, class, "GetCount", "int", value, Some("int"));
        }
    }
}

pub struct DecoratorLoopUntilExporter;

impl NodeExporter for DecoratorLoopUntilExporter {
    fn should_declare_type(&self, _node: &Node) -> bool {
        true
    }

    fn emit_constructor(&self, node: &Node, _em: &mut Emitter, out: &mut Vec<String>) {
        if let NodeKind::DecoratorLoopUntil(d) = &node.kind {
            out.push(format!("{}.Until = {}", SELF, go_bool(d.until)));
        }
    }

    fn emit_methods(&self, node: &Node, class: &str, em: &mut Emitter, w: &mut CodeWriter) {
        DecoratorCountExporter.emit_methods(node, class, em, w);
    }
}

pub struct DecoratorFramesExporter;

impl NodeExporter for DecoratorFramesExporter {
    fn should_declare_type(&self, _node: &Node) -> bool {
        true
    }

    fn emit_methods(&self, node: &Node, class: &str, em: &mut Emitter, w: &mut CodeWriter) {
        if let NodeKind::DecoratorFrames(d) = &node.kind {
            if let Some(frames) = &d.frames {
                let value = em.right_value(frames, "frames");
                write_getter(w, class, "GetFrames", "int", value, Some("int"));
            }
        }
    }
}

pub struct DecoratorLogExporter;

impl NodeExporter for DecoratorLogExporter {
    fn should_declare_type(&self, _node: &Node) -> bool {
        true
    }

    fn emit_constructor(&self, node: &Node, _em: &mut Emitter, out: &mut Vec<String>) {
        if let NodeKind::DecoratorLog(d) = &node.kind {
            out.push(format!("{}.Message = {}", SELF, quote(&d.message)));
        }
    }
}

/// The weight of a child of a probability selector. The runtime calls the weight through a
/// function field, so the constructor points it at the generated method.
pub struct DecoratorWeightExporter;

impl NodeExporter for DecoratorWeightExporter {
    fn should_declare_type(&self, _node: &Node) -> bool {
        true
    }

    fn emit_constructor(&self, node: &Node, _em: &mut Emitter, out: &mut Vec<String>) {
        if let NodeKind::DecoratorWeight(d) = &node.kind {
            if d.weight.is_some() {
                out.push(format!("{0}.GetWeight = {0}.doGetWeight", SELF));
            }
        }
    }

    fn emit_methods(&self, node: &Node, class: &str, em: &mut Emitter, w: &mut CodeWriter) {
        if let NodeKind::DecoratorWeight(d) = &node.kind {
            if let Some(weight) = &d.weight {
                let value = em.variable(weight, "weight");
                write_getter(w, class, "doGetWeight", "int", value, Some("int"));
            }
        }
    }
}
