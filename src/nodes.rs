//! Per-kind node exporters.
//!
//! An exporter decides whether a node gets a dedicated Go type, what that type's
//! constructor and methods contain, and how the node is instantiated in `NewTree`.

mod actions;
mod composites;
mod conditions;
mod decorators;

use crate::{
    context::ExportContext,
    expr::{Captures, Emission, Emitter, SELF},
    model::Node,
    writer::CodeWriter,
};

pub use self::{
    actions::{
        ActionExporter, AssignmentExporter, ComputeExporter, EndExporter, LeafExporter,
        WaitExporter, WaitFramesExporter,
    },
    composites::{CompositeExporter, ParallelExporter, ReferencedBehaviorExporter},
    conditions::{ConditionBaseExporter, ConditionExporter},
    decorators::{
        DecoratorCountExporter, DecoratorExporter, DecoratorFramesExporter, DecoratorLogExporter,
        DecoratorLoopUntilExporter, DecoratorWeightExporter,
    },
};

pub trait NodeExporter: Send + Sync {
    /// Whether the node needs a generated type. Kinds that reuse a runtime type answer false.
    fn should_declare_type(&self, _node: &Node) -> bool {
        false
    }

    /// Constructor statements setting the fixed fields of the type, in terms of [`SELF`].
    fn emit_constructor(&self, _node: &Node, _em: &mut Emitter, _out: &mut Vec<String>) {}

    /// The methods of the generated type.
    fn emit_methods(&self, _node: &Node, _class: &str, _em: &mut Emitter, _w: &mut CodeWriter) {}

    /// Writes the type declaration, its constructor and its methods.
    fn emit_declaration(&self, node: &Node, class: &str, ctx: &ExportContext, w: &mut CodeWriter) {
        if !self.should_declare_type(node) {
            return;
        }
        let (package, runtime_type) = node.runtime_type();
        ctx.use_package(package);

        let mut em = Emitter::new(ctx);
        let mut methods = CodeWriter::new();
        self.emit_methods(node, class, &mut em, &mut methods);
        let mut setup = vec![];
        self.emit_constructor(node, &mut em, &mut setup);

        write_class(
            w,
            class,
            &format!("{}.{}", package, runtime_type),
            setup,
            em.into_captures(),
            methods,
        );
    }

    /// Writes the statement creating the runtime node. `class` is the generated type, if any.
    fn emit_instantiation(
        &self,
        node: &Node,
        class: Option<&str>,
        ctx: &ExportContext,
        w: &mut CodeWriter,
    ) {
        let behavior = match class {
            Some(class) => format!("New{}()", class),
            None => {
                let (package, runtime_type) = node.runtime_type();
                ctx.use_package(package);
                format!("{}.New{}()", package, runtime_type)
            }
        };
        ctx.use_package("bt");
        w.line(format!("{} := bt.NewNode({}, {})", node.name(), node.id, behavior));
    }
}

/// Used for kinds without any registered exporter up their ancestry.
pub struct DefaultExporter;

impl NodeExporter for DefaultExporter {}

/// `{ExportClass}_{btClassName}_{nodeName}`
pub fn class_name(export_class: &str, bt_class: &str, node_name: &str) -> String {
    format!("{}_{}_{}", export_class, bt_class, node_name)
}

/// Writes a generated type: the struct embedding the runtime type, the `New` constructor
/// and the methods.
pub(crate) fn write_class(
    w: &mut CodeWriter,
    class: &str,
    embed: &str,
    setup: Vec<String>,
    captures: Captures,
    methods: CodeWriter,
) {
    w.block(format!("type {} struct {{", class), "}", |w| {
        w.line(embed);
        let width = captures
            .fields
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0);
        for (name, ty) in &captures.fields {
            w.line(format!("{:width$} {}", name, ty, width = width));
        }
    });
    w.blank();

    w.block(format!("func New{}() *{} {{", class, class), "}", |w| {
        w.line(format!("{} := new({})", SELF, class));
        w.lines(setup);
        w.lines(captures.init);
        w.line(format!("return {}", SELF));
    });
    w.blank();

    w.append(methods);
}

/// `func (n *Class) Name(agent bt.Agent) Ret {`
pub(crate) fn method_header(class: &str, name: &str, ret: &str) -> String {
    if ret.is_empty() {
        format!("func ({} *{}) {}(agent bt.Agent) {{", SELF, class, name)
    } else {
        format!("func ({} *{}) {}(agent bt.Agent) {} {{", SELF, class, name, ret)
    }
}

/// Writes a method returning one value, converted by `convert` when given.
pub(crate) fn write_getter(
    w: &mut CodeWriter,
    class: &str,
    name: &str,
    ret: &str,
    value: Emission,
    convert: Option<&str>,
) {
    w.block(method_header(class, name, ret), "}", |w| {
        let (pre, expr) = value.bind("ret");
        w.lines(pre);
        match convert {
            Some(ty) => w.line(format!("return {}({})", ty, expr)),
            None => w.line(format!("return {}", expr)),
        }
    });
    w.blank();
}

pub(crate) fn go_bool(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
mod test;
