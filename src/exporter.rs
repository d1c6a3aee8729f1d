//! The tree walker and the file assembler.
//!
//! A behavior is written in two passes over its enabled nodes: first the declarations of
//! the generated node and attachment types in pre-order, then the `NewTree` function that
//! instantiates every node inside its own `{ }` block and wires it to its parent.

use std::thread;

use tracing::{debug, info};

use crate::{
    attachments,
    catalog::TypeCatalog,
    config::{ExportConfig, FileMode},
    context::ExportContext,
    meta,
    model::{Attachment, Behavior, Node, NodeKind},
    nodes::{self, go_bool},
    registry::{Registry, DEFAULT_REGISTRY},
    types::quote,
    writer::{CodeWriter, OutputFile},
};

const RULE: &str = "// ---------------------------------------------------------------------";
pub const AUTO_GENERATED: &str =
    "// THIS FILE IS AUTO-GENERATED, SO PLEASE DON'T MODIFY IT BY YOURSELF!";

/// Called around the generation of every behavior.
pub trait BehaviorHooks: Send + Sync {
    fn pre_export(&self, _behavior: &Behavior) {}
    fn post_export(&self, _behavior: &Behavior) {}
}

/// Writes the declarations and the `NewTree` function of behaviors into one file.
pub struct BehaviorWriter<'c, 'a> {
    ctx: &'c ExportContext<'a>,
    registry: &'c Registry,
    bt_class: String,
}

impl<'c, 'a> BehaviorWriter<'c, 'a> {
    pub fn new(ctx: &'c ExportContext<'a>, registry: &'c Registry) -> Self {
        Self {
            ctx,
            registry,
            bt_class: String::new(),
        }
    }

    pub fn write_behavior(&mut self, behavior: &Behavior, w: &mut CodeWriter) {
        self.bt_class = behavior.class_name();
        self.ctx.use_package("bt");

        w.blank();
        w.line(format!("// Source file: {}", behavior.source_name()));
        w.blank();
        if !behavior.comment.is_empty() {
            w.line(format!("// {}", behavior.comment));
        }
        w.line(format!("type {} struct {{", behavior.name));
        w.line("}");
        w.blank();

        self.declare_attachments(&behavior.attachments, w);
        for child in &behavior.children {
            self.declare_node(child, w);
        }

        w.block(
            format!("func (_o *{}) NewTree() *bt.Tree {{", behavior.name),
            "}",
            |w| {
                w.line(format!("tree := bt.NewTree({})", quote(&behavior.name)));
                if !behavior.locals.is_empty() {
                    w.line("// locals");
                    for local in &behavior.locals {
                        w.line(format!(
                            "tree.AddLocal({}, {}, {}, {})",
                            quote(&behavior.agent_type),
                            quote(&self.ctx.mapper.generated_native_type(&local.native_type)),
                            quote(&local.name),
                            quote(&local.default_value)
                        ));
                    }
                }
                self.instantiate_attachments("tree", &behavior.attachments, w);
                w.line("// children");
                if behavior.fsm {
                    self.write_fsm("tree", behavior.initial_state_id, &behavior.children, w);
                } else {
                    for child in &behavior.children {
                        self.instantiate_node(child, "tree", w);
                    }
                }
                w.line("return tree");
            },
        );
    }

    fn node_class(&self, node: &Node) -> Option<String> {
        let exporter = self.registry.node_exporter(node.kind.tag());
        exporter
            .should_declare_type(node)
            .then(|| nodes::class_name(&node.export_class(), &self.bt_class, &node.name()))
    }

    fn attachment_class(&self, attachment: &Attachment) -> Option<String> {
        let exporter = self.registry.attachment_exporter(attachment.tag());
        exporter.should_declare_type(attachment).then(|| {
            attachments::class_name(
                &attachment.export_class(),
                &self.bt_class,
                &attachment.name(),
            )
        })
    }

    fn declare_node(&self, node: &Node, w: &mut CodeWriter) {
        if !node.enabled {
            debug!(node = node.id, "skipping disabled node");
            return;
        }
        if let Some(class) = self.node_class(node) {
            self.registry
                .node_exporter(node.kind.tag())
                .emit_declaration(node, &class, self.ctx, w);
        }
        self.declare_attachments(&node.attachments, w);

        // A referenced tree is generated on its own
        if matches!(node.kind, NodeKind::ReferencedBehavior(_)) {
            return;
        }
        for child in &node.children {
            self.declare_node(child, w);
        }
    }

    fn declare_attachments(&self, attachments: &[Attachment], w: &mut CodeWriter) {
        for attachment in attachments.iter().filter(|a| a.enabled) {
            if let Some(class) = self.attachment_class(attachment) {
                self.registry
                    .attachment_exporter(attachment.tag())
                    .emit_declaration(attachment, &class, self.ctx, w);
            }
        }
    }

    fn instantiate_node(&self, node: &Node, parent: &str, w: &mut CodeWriter) {
        if !node.enabled {
            return;
        }
        let name = node.name();
        let class = self.node_class(node);

        w.block("{", "}", |w| {
            self.registry.node_exporter(node.kind.tag()).emit_instantiation(
                node,
                class.as_deref(),
                self.ctx,
                w,
            );
            self.instantiate_attachments(&name, &node.attachments, w);
            if node.as_child {
                w.line(format!("{}.AddChild({})", parent, name));
            } else {
                w.line(format!("{}.SetCustomCondition({})", parent, name));
            }

            if matches!(node.kind, NodeKind::ReferencedBehavior(_)) {
                return;
            }
            if node.fsm {
                self.write_fsm(&name, node.initial_state_id, &node.children, w);
            } else {
                for child in &node.children {
                    self.instantiate_node(child, &name, w);
                }
            }
        });
    }

    fn instantiate_attachments(&self, parent: &str, attachments: &[Attachment], w: &mut CodeWriter) {
        let enabled: Vec<_> = attachments.iter().filter(|a| a.enabled).collect();
        if enabled.is_empty() {
            return;
        }
        w.line("// attachments");
        for attachment in enabled {
            let name = attachment.name();
            let class = self.attachment_class(attachment);
            w.block("{", "}", |w| {
                self.registry
                    .attachment_exporter(attachment.tag())
                    .emit_instantiation(attachment, class.as_deref(), self.ctx, w);
                let transition = attachment.is_transition;
                w.line(format!(
                    "{}.Attach({}, {}, {}, {})",
                    parent,
                    name,
                    go_bool(attachment.is_precondition() && !transition),
                    go_bool(attachment.is_effector() && !transition),
                    go_bool(transition)
                ));
                if attachment.is_event() {
                    w.line(format!("{}.SetHasEvents(true)", parent));
                }
            });
        }
    }

    /// States go into a state machine node, which is added to `parent`.
    fn write_fsm(&self, parent: &str, initial_state_id: Option<i32>, states: &[Node], w: &mut CodeWriter) {
        w.block("{", "}", |w| {
            w.line(format!(
                "fsm := bt.NewFSM(-1, {})",
                initial_state_id.unwrap_or(-1)
            ));
            for state in states {
                self.instantiate_node(state, "fsm", w);
            }
            w.line(format!("{}.AddChild(fsm)", parent));
        });
    }
}

/// Produces the output files of a workspace.
pub struct Generator<'a> {
    catalog: &'a TypeCatalog,
    config: &'a ExportConfig,
    registry: &'a Registry,
    hooks: Option<&'a dyn BehaviorHooks>,
}

impl<'a> Generator<'a> {
    pub fn new(catalog: &'a TypeCatalog, config: &'a ExportConfig) -> Self {
        Self {
            catalog,
            config,
            registry: &DEFAULT_REGISTRY,
            hooks: None,
        }
    }

    pub fn with_registry(mut self, registry: &'a Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_hooks(mut self, hooks: &'a dyn BehaviorHooks) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Tree files followed by type files.
    pub fn generate_all(&self, behaviors: &[Behavior]) -> Vec<OutputFile> {
        let mut ret = self.generate_behaviors(behaviors);
        ret.extend(self.generate_types());
        ret
    }

    /// Tree files, laid out by the configured file mode.
    pub fn generate_behaviors(&self, behaviors: &[Behavior]) -> Vec<OutputFile> {
        match self.config.file_mode {
            FileMode::Single => {
                let all: Vec<_> = behaviors.iter().collect();
                vec![self.generate_file(&self.single_file_path(), &all)]
            }
            FileMode::PerBehavior => behaviors
                .iter()
                .map(|behavior| self.generate_file(&self.behavior_file_path(behavior), &[behavior]))
                .collect(),
        }
    }

    /// Like [`Self::generate_behaviors`], with one thread per file in per-behavior mode.
    /// The files come back in input order.
    pub fn generate_behaviors_parallel(&self, behaviors: &[Behavior]) -> Vec<OutputFile> {
        if self.config.file_mode == FileMode::Single {
            return self.generate_behaviors(behaviors);
        }
        thread::scope(|scope| {
            let handles: Vec<_> = behaviors
                .iter()
                .map(|behavior| {
                    scope.spawn(move || {
                        self.generate_file(&self.behavior_file_path(behavior), &[behavior])
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                })
                .collect()
        })
    }

    /// Agent skeletons and customized types.
    pub fn generate_types(&self) -> Vec<OutputFile> {
        meta::generate(self.catalog, self.config)
    }

    /// Assembles one tree file from behaviors.
    pub fn generate_file(&self, path: &str, behaviors: &[&Behavior]) -> OutputFile {
        let mut ctx = ExportContext::new(self.catalog, self.config);
        let mut body = CodeWriter::new();
        for behavior in behaviors {
            if let Some(hooks) = self.hooks {
                hooks.pre_export(behavior);
            }
            ctx.set_agent_type(behavior.agent_type.clone());
            BehaviorWriter::new(&ctx, self.registry).write_behavior(behavior, &mut body);
            if let Some(hooks) = self.hooks {
                hooks.post_export(behavior);
            }
        }

        let mut w = CodeWriter::new();
        write_header(&mut w, path, &self.config.trees_package, &ctx.imports());
        w.append(body);
        info!(path, trees = behaviors.len(), "generated behaviors file");
        OutputFile::new(path, w.into_string())
    }

    fn single_file_path(&self) -> String {
        format!(
            "{}/{}",
            self.config.behaviors_dir(),
            self.config.single_file_name
        )
    }

    fn behavior_file_path(&self, behavior: &Behavior) -> String {
        format!(
            "{}/{}.go",
            self.config.behaviors_dir(),
            behavior.source_name()
        )
    }
}

/// The banner, the package clause and the import block.
pub fn write_header(w: &mut CodeWriter, path: &str, package: &str, imports: &[String]) {
    w.line(RULE);
    w.line(AUTO_GENERATED);
    w.line(format!("// Export file: {}", path));
    w.line(RULE);
    w.blank();
    w.line(format!("package {}", package));
    if !imports.is_empty() {
        w.blank();
        w.block("import (", ")", |w| w.lines(imports));
    }
}
