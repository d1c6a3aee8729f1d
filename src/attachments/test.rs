use super::*;
use crate::{
    catalog::{AgentType, MethodDef, PropertyDef, TypeCatalog},
    config::ExportConfig,
    model::{AttachOperator, Effector, Event, Precondition, Value, VariableDef},
};

fn declare(exporter: &dyn AttachmentExporter, attachment: &Attachment) -> String {
    let mut catalog = TypeCatalog {
        agents: vec![AgentType::new("Player").with_property(PropertyDef::member("", "hp", "int"))],
        ..TypeCatalog::default()
    };
    catalog.link();
    let config = ExportConfig::default();
    let ctx = ExportContext::new(&catalog, &config).with_agent_type("Player");
    let mut w = CodeWriter::new();
    let class = class_name(&attachment.export_class(), "ai_patrol", &attachment.name());
    exporter.emit_declaration(attachment, &class, &ctx, &mut w);
    w.into_string()
}

fn hp() -> RightValueDef {
    VariableDef::property(PropertyDef::member("Player", "hp", "int")).into()
}

fn int(i: i64) -> RightValueDef {
    VariableDef::constant("int", Value::Int(i)).into()
}

#[test]
fn test_class_name() {
    assert_eq!(
        class_name("Precondition", "ai_patrol", "attach3"),
        "PreconditionAiPatrolAttach3"
    );
}

#[test]
fn test_precondition_compare() {
    let attachment = Attachment::new(
        3,
        AttachmentKind::Precondition(Precondition {
            phase: PreconditionPhase::Update,
            and: true,
            action: AttachAction {
                opl: Some(hp()),
                operator: AttachOperator::Greater,
                opr2: Some(int(0)),
                ..AttachAction::default()
            },
        }),
    );
    assert_eq!(
        declare(&PreconditionExporter, &attachment),
        r#"type PreconditionAiPatrolAttach3 struct {
	bt.Precondition
}

func NewPreconditionAiPatrolAttach3() *PreconditionAiPatrolAttach3 {
	n := new(PreconditionAiPatrolAttach3)
	n.Id = 3
	n.Phase = bt.PreconditionPhaseUpdate
	n.And = true
	return n
}

func (n *PreconditionAiPatrolAttach3) Update(agent bt.Agent) bt.Status {
	result := bt.Success
	opl := agent.(*types.Player).Hp
	opr2 := 0
	op := opl > opr2
	if !op {
		result = bt.Failure
	}
	return result
}

"#
    );
}

#[test]
fn test_precondition_slice_constant() {
    let attachment = Attachment::new(
        4,
        AttachmentKind::Precondition(Precondition {
            phase: PreconditionPhase::Enter,
            and: true,
            action: AttachAction {
                opl: Some(
                    VariableDef::property(PropertyDef::member("Player", "items", "vector<int>"))
                        .into(),
                ),
                operator: AttachOperator::Equal,
                opr2: Some(
                    VariableDef::constant("vector<int>", Value::Array(vec![Value::Int(3)])).into(),
                ),
                ..AttachAction::default()
            },
        }),
    );
    let text = declare(&PreconditionExporter, &attachment);
    assert!(text.contains("\tbt.Precondition\n\topr2 []int\n}"));
    assert!(text.contains("\tn.Id = 4\n"));
    assert!(text.contains("\tn.opr2 = []int{3}\n\treturn n\n"));
    assert!(text.contains("\topl := agent.(*types.Player).Items\n\topr2 := n.opr2\n"));
    assert!(!text.contains("opr2 := opr2"));
}

#[test]
fn test_effector_assign() {
    let attachment = Attachment::new(
        4,
        AttachmentKind::Effector(Effector {
            phase: EffectorPhase::Both,
            action: AttachAction {
                opl: Some(hp()),
                operator: AttachOperator::Assign,
                opr2: Some(int(100)),
                ..AttachAction::default()
            },
        }),
    );
    let text = declare(&EffectorExporter, &attachment);
    assert!(text.contains("\tattachments.Effector\n"));
    assert!(text.contains("\tn.Phase = bt.EffectorPhaseBoth\n"));
    assert!(text.contains(
        "\tresult := bt.Success\n\tagent.(*types.Player).Hp = 100\n\treturn result\n"
    ));
}

#[test]
fn test_attach_action_call_and_compute() {
    let call = Attachment::new(
        5,
        AttachmentKind::AttachAction(AttachAction {
            opl: Some(MethodDef::new("Player", "heal", "void").into()),
            ..AttachAction::default()
        }),
    );
    let text = declare(&AttachActionExporter, &call);
    assert!(text.contains("\tresult := bt.Success\n\tagent.(*types.Player).Heal()\n\treturn result\n"));

    let compute = Attachment::new(
        6,
        AttachmentKind::AttachAction(AttachAction {
            opl: Some(hp()),
            operator: AttachOperator::Sub,
            opr1: Some(hp()),
            opr2: Some(int(1)),
        }),
    );
    let text = declare(&AttachActionExporter, &compute);
    assert!(text.contains("\tagent.(*types.Player).Hp = int(agent.(*types.Player).Hp - 1)\n"));
}

#[test]
fn test_attach_action_missing_operand() {
    let attachment = Attachment::new(
        7,
        AttachmentKind::AttachAction(AttachAction {
            opl: None,
            operator: AttachOperator::Equal,
            opr2: Some(int(1)),
            ..AttachAction::default()
        }),
    );
    let text = declare(&AttachActionExporter, &attachment);
    assert!(text.contains("\tresult := bt.Success\n\treturn result\n"));
}

#[test]
fn test_event() {
    let attachment = Attachment::new(
        8,
        AttachmentKind::Event(Event {
            task: "Player::on_hit".to_owned(),
            triggered_once: true,
            mode: TriggerMode::Return,
            tree: "ai/hurt".to_owned(),
        }),
    );
    let text = declare(&EventExporter, &attachment);
    assert!(text.contains(
        r#"	n.Id = 8
	n.Task = "on_hit"
	n.Once = true
	n.Mode = bt.EventModeReturn
	n.Tree = "ai/hurt"
"#
    ));
    assert!(!text.contains("Update"));
}

#[test]
fn test_instantiation() {
    let catalog = TypeCatalog::default();
    let config = ExportConfig::default();
    let ctx = ExportContext::new(&catalog, &config);
    let mut w = CodeWriter::new();

    let unknown = Attachment::new(9, AttachmentKind::Unknown("custom.Sensor".to_owned()));
    DefaultAttachmentExporter.emit_declaration(&unknown, "unused", &ctx, &mut w);
    DefaultAttachmentExporter.emit_instantiation(&unknown, None, &ctx, &mut w);
    EventExporter.emit_instantiation(
        &Attachment::new(10, AttachmentKind::Event(Event::default())),
        Some("EventAiPatrolAttach10"),
        &ctx,
        &mut w,
    );
    assert_eq!(
        w.into_string(),
        "attach9 := custom.NewSensor()\nattach10 := NewEventAiPatrolAttach10()\n"
    );
}
