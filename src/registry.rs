//! Lookup of the exporter for a node or attachment kind.
//!
//! Exporters are registered per kind tag. A lookup walks the kind's ancestry, most specific
//! first, so a kind without an exporter of its own is exported by its nearest registered
//! base. Kinds with no registered base get the default exporter, which only instantiates
//! the runtime type.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::{
    attachments::{
        AttachActionExporter, AttachmentExporter, DefaultAttachmentExporter, EffectorExporter,
        EventExporter, PreconditionExporter,
    },
    model::{AttachmentTag, KindTag},
    nodes::{
        ActionExporter, AssignmentExporter, CompositeExporter, ComputeExporter,
        ConditionBaseExporter, ConditionExporter, DecoratorCountExporter, DecoratorExporter,
        DecoratorFramesExporter, DecoratorLogExporter, DecoratorLoopUntilExporter,
        DecoratorWeightExporter, DefaultExporter, EndExporter, LeafExporter, NodeExporter,
        ParallelExporter, ReferencedBehaviorExporter, WaitExporter, WaitFramesExporter,
    },
};

/// The registry with every built-in exporter, shared by all generations.
pub static DEFAULT_REGISTRY: Lazy<Registry> = Lazy::new(Registry::default);

static DEFAULT_EXPORTER: DefaultExporter = DefaultExporter;
static DEFAULT_ATTACHMENT_EXPORTER: DefaultAttachmentExporter = DefaultAttachmentExporter;

pub struct Registry {
    node_exporters: HashMap<KindTag, Box<dyn NodeExporter>>,
    attachment_exporters: HashMap<AttachmentTag, Box<dyn AttachmentExporter>>,
}

impl Default for Registry {
    fn default() -> Self {
        let mut ret = Self::empty();
        ret.register(KindTag::Composite, CompositeExporter);
        ret.register(KindTag::Parallel, ParallelExporter);
        ret.register(KindTag::ReferencedBehavior, ReferencedBehaviorExporter);
        ret.register(KindTag::Decorator, DecoratorExporter);
        ret.register(KindTag::DecoratorCount, DecoratorCountExporter);
        ret.register(KindTag::DecoratorLoopUntil, DecoratorLoopUntilExporter);
        ret.register(KindTag::DecoratorFrames, DecoratorFramesExporter);
        ret.register(KindTag::DecoratorLog, DecoratorLogExporter);
        ret.register(KindTag::DecoratorWeight, DecoratorWeightExporter);
        ret.register(KindTag::Leaf, LeafExporter);
        ret.register(KindTag::Action, ActionExporter);
        ret.register(KindTag::Assignment, AssignmentExporter);
        ret.register(KindTag::Compute, ComputeExporter);
        ret.register(KindTag::Wait, WaitExporter);
        ret.register(KindTag::WaitFrames, WaitFramesExporter);
        ret.register(KindTag::End, EndExporter);
        ret.register(KindTag::ConditionBase, ConditionBaseExporter);
        ret.register(KindTag::Condition, ConditionExporter);

        ret.register_attachment(AttachmentTag::AttachAction, AttachActionExporter);
        ret.register_attachment(AttachmentTag::Precondition, PreconditionExporter);
        ret.register_attachment(AttachmentTag::Effector, EffectorExporter);
        ret.register_attachment(AttachmentTag::Event, EventExporter);
        ret
    }
}

impl Registry {
    /// A registry with no exporters, where every kind falls back to the default exporter.
    pub fn empty() -> Self {
        Self {
            node_exporters: HashMap::new(),
            attachment_exporters: HashMap::new(),
        }
    }

    /// Registers an exporter for a kind, replacing the previous one.
    pub fn register(&mut self, tag: KindTag, exporter: impl NodeExporter + 'static) {
        self.node_exporters.insert(tag, Box::new(exporter));
    }

    pub fn register_attachment(
        &mut self,
        tag: AttachmentTag,
        exporter: impl AttachmentExporter + 'static,
    ) {
        self.attachment_exporters.insert(tag, Box::new(exporter));
    }

    pub fn node_exporter(&self, tag: KindTag) -> &dyn NodeExporter {
        for ancestor in tag.ancestry() {
            if let Some(exporter) = self.node_exporters.get(ancestor) {
                debug!(kind = ?tag, exporter = ?ancestor, "node exporter");
                return exporter.as_ref();
            }
        }
        warn!(kind = ?tag, "no node exporter, falling back to the default");
        &DEFAULT_EXPORTER
    }

    pub fn attachment_exporter(&self, tag: AttachmentTag) -> &dyn AttachmentExporter {
        for ancestor in tag.ancestry() {
            if let Some(exporter) = self.attachment_exporters.get(ancestor) {
                debug!(kind = ?tag, exporter = ?ancestor, "attachment exporter");
                return exporter.as_ref();
            }
        }
        warn!(kind = ?tag, "no attachment exporter, falling back to the default");
        &DEFAULT_ATTACHMENT_EXPORTER
    }
}
