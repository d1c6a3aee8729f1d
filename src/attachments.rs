//! Per-kind attachment exporters.
//!
//! Attachments mirror [`NodeExporter`](crate::nodes::NodeExporter): an optional generated
//! type, and an instantiation statement the walker wires to the owning node with `Attach`.

use tracing::warn;

use crate::{
    catalog::basic_name,
    context::ExportContext,
    expr::{Emitter, SELF},
    model::{
        AttachAction, AttachActionClass, Attachment, AttachmentKind, EffectorPhase,
        PreconditionPhase, RightValueDef, TriggerMode,
    },
    nodes::{go_bool, method_header, write_class},
    types::{pascal_case, quote},
    writer::CodeWriter,
};

pub trait AttachmentExporter: Send + Sync {
    fn should_declare_type(&self, _attachment: &Attachment) -> bool {
        false
    }

    /// Constructor statements following the `Id` assignment.
    fn emit_constructor(&self, _attachment: &Attachment, _em: &mut Emitter, _out: &mut Vec<String>) {
    }

    fn emit_methods(
        &self,
        _attachment: &Attachment,
        _class: &str,
        _em: &mut Emitter,
        _w: &mut CodeWriter,
    ) {
    }

    fn emit_declaration(
        &self,
        attachment: &Attachment,
        class: &str,
        ctx: &ExportContext,
        w: &mut CodeWriter,
    ) {
        if !self.should_declare_type(attachment) {
            return;
        }
        let (package, runtime_type) = attachment.runtime_type();
        ctx.use_package(package);

        let mut em = Emitter::new(ctx);
        let mut methods = CodeWriter::new();
        self.emit_methods(attachment, class, &mut em, &mut methods);
        let mut setup = vec![format!("{}.Id = {}", SELF, attachment.id)];
        self.emit_constructor(attachment, &mut em, &mut setup);

        write_class(
            w,
            class,
            &format!("{}.{}", package, runtime_type),
            setup,
            em.into_captures(),
            methods,
        );
    }

    fn emit_instantiation(
        &self,
        attachment: &Attachment,
        class: Option<&str>,
        ctx: &ExportContext,
        w: &mut CodeWriter,
    ) {
        let constructor = match class {
            Some(class) => format!("New{}()", class),
            None => {
                let (package, runtime_type) = attachment.runtime_type();
                ctx.use_package(package);
                format!("{}.New{}()", package, runtime_type)
            }
        };
        w.line(format!("{} := {}", attachment.name(), constructor));
    }
}

/// `PascalCase({ExportClass}_{btClassName}_{attachName})`
pub fn class_name(export_class: &str, bt_class: &str, attachment_name: &str) -> String {
    pascal_case(&format!(
        "{}_{}_{}",
        export_class, bt_class, attachment_name
    ))
}

pub struct DefaultAttachmentExporter;

impl AttachmentExporter for DefaultAttachmentExporter {}

/// Generic attached actions, and the base of preconditions and effectors.
pub struct AttachActionExporter;

impl AttachActionExporter {
    fn write_update(
        attachment: &Attachment,
        action: &AttachAction,
        class: &str,
        em: &mut Emitter,
        w: &mut CodeWriter,
    ) {
        em.ctx().use_package("bt");
        let id = attachment.id;

        w.block(method_header(class, "Update", "bt.Status"), "}", |w| {
            w.line("result := bt.Success");
            match action.classify() {
                AttachActionClass::Call => match &action.opl {
                    Some(RightValueDef::Method(method)) => {
                        w.lines(em.method_call(method, "opl").statement())
                    }
                    _ => warn!(attachment = id, "attached call has no method"),
                },
                AttachActionClass::Assign => match (&action.opl, &action.opr2) {
                    (Some(RightValueDef::Var(opl)), Some(opr2)) => {
                        let (pre, expr) = em.right_value(opr2, "opr2").bind("opr2");
                        w.lines(pre);
                        let lines = em.assign(opl, &expr, "opl");
                        w.lines(lines);
                    }
                    _ => warn!(attachment = id, "attached assignment is missing an operand"),
                },
                AttachActionClass::Compare => match (&action.opl, &action.opr2) {
                    (Some(opl), Some(opr2)) => {
                        let (pre, expr) = em.right_value(opl, "opl").bind("oplRet");
                        w.lines(pre);
                        w.line(format!("opl := {}", expr));
                        let (pre, expr) = em.right_value(opr2, "opr2").bind("opr2Ret");
                        w.lines(pre);
                        w.line(format!("opr2 := {}", expr));
                        match action.operator.symbol() {
                            Some(op) => w.line(format!("op := opl {} opr2", op)),
                            None => w.line("op := false"),
                        }
                        w.block("if !op {", "}", |w| w.line("result = bt.Failure"));
                    }
                    _ => warn!(attachment = id, "attached comparison is missing an operand"),
                },
                AttachActionClass::Compute => {
                    match (&action.opl, &action.opr1, &action.opr2, action.operator.symbol()) {
                        (Some(RightValueDef::Var(opl)), Some(opr1), Some(opr2), Some(op)) => {
                            let ty = em.ctx().go_type(opr1.native_type());
                            let (pre1, expr1) = em.right_value(opr1, "opr1").bind("opr1");
                            let (pre2, expr2) = em.right_value(opr2, "opr2").bind("opr2");
                            w.lines(pre1);
                            w.lines(pre2);
                            let value = format!("{}({} {} {})", ty, expr1, op, expr2);
                            let lines = em.assign(opl, &value, "opl");
                            w.lines(lines);
                        }
                        _ => warn!(attachment = id, "attached compute is missing an operand"),
                    }
                }
            }
            w.line("return result");
        });
        w.blank();
    }
}

impl AttachmentExporter for AttachActionExporter {
    fn should_declare_type(&self, attachment: &Attachment) -> bool {
        attachment.action().is_some()
    }

    fn emit_methods(
        &self,
        attachment: &Attachment,
        class: &str,
        em: &mut Emitter,
        w: &mut CodeWriter,
    ) {
        if let Some(action) = attachment.action() {
            Self::write_update(attachment, action, class, em, w);
        }
    }
}

pub struct PreconditionExporter;

impl AttachmentExporter for PreconditionExporter {
    fn should_declare_type(&self, attachment: &Attachment) -> bool {
        attachment.is_precondition()
    }

    fn emit_constructor(&self, attachment: &Attachment, em: &mut Emitter, out: &mut Vec<String>) {
        let AttachmentKind::Precondition(precondition) = &attachment.kind else {
            return;
        };
        em.ctx().use_package("bt");
        let phase = match precondition.phase {
            PreconditionPhase::Enter => "bt.PreconditionPhaseEnter",
            PreconditionPhase::Update => "bt.PreconditionPhaseUpdate",
            PreconditionPhase::Both => "bt.PreconditionPhaseBoth",
        };
        out.push(format!("{}.Phase = {}", SELF, phase));
        out.push(format!("{}.And = {}", SELF, go_bool(precondition.and)));
    }

    fn emit_methods(
        &self,
        attachment: &Attachment,
        class: &str,
        em: &mut Emitter,
        w: &mut CodeWriter,
    ) {
        AttachActionExporter.emit_methods(attachment, class, em, w);
    }
}

pub struct EffectorExporter;

impl AttachmentExporter for EffectorExporter {
    fn should_declare_type(&self, attachment: &Attachment) -> bool {
        attachment.is_effector()
    }

    fn emit_constructor(&self, attachment: &Attachment, em: &mut Emitter, out: &mut Vec<String>) {
        let AttachmentKind::Effector(effector) = &attachment.kind else {
            return;
        };
        em.ctx().use_package("bt");
        let phase = match effector.phase {
            EffectorPhase::Success => "bt.EffectorPhaseSuccess",
            EffectorPhase::Failure => "bt.EffectorPhaseFailure",
            EffectorPhase::Both => "bt.EffectorPhaseBoth",
        };
        out.push(format!("{}.Phase = {}", SELF, phase));
    }

    fn emit_methods(
        &self,
        attachment: &Attachment,
        class: &str,
        em: &mut Emitter,
        w: &mut CodeWriter,
    ) {
        AttachActionExporter.emit_methods(attachment, class, em, w);
    }
}

pub struct EventExporter;

impl AttachmentExporter for EventExporter {
    fn should_declare_type(&self, attachment: &Attachment) -> bool {
        attachment.is_event()
    }

    fn emit_constructor(&self, attachment: &Attachment, em: &mut Emitter, out: &mut Vec<String>) {
        let AttachmentKind::Event(event) = &attachment.kind else {
            return;
        };
        em.ctx().use_package("bt");
        let mode = match event.mode {
            TriggerMode::Transfer => "bt.EventModeTransfer",
            TriggerMode::Return => "bt.EventModeReturn",
        };
        out.push(format!("{}.Task = {}", SELF, quote(basic_name(&event.task))));
        out.push(format!("{}.Once = {}", SELF, go_bool(event.triggered_once)));
        out.push(format!("{}.Mode = {}", SELF, mode));
        out.push(format!("{}.Tree = {}", SELF, quote(&event.tree)));
    }
}

#[cfg(test)]
mod test;
