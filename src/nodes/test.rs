use super::*;
use crate::{
    catalog::{AgentType, MethodDef, PropertyDef, TypeCatalog},
    config::ExportConfig,
    model::{
        Action, Assignment, CompareOperator, Compute, ComputeOperator, Condition, DecoratorCount,
        DecoratorLog, DecoratorWeight, ExitPolicy, FailurePolicy, NodeKind, Parallel,
        ReferencedBehavior, RightValueDef, Status, SuccessPolicy, Value, VariableDef,
    },
};

fn catalog() -> TypeCatalog {
    let mut catalog = TypeCatalog {
        agents: vec![AgentType::new("Player")
            .with_property(PropertyDef::member("", "hp", "int"))
            .with_property(PropertyDef::member("", "speed", "float"))
            .with_property(PropertyDef::member("", "next_tree", "behaviac::string"))],
        behaviors: vec!["ai/patrol".to_owned()],
        ..TypeCatalog::default()
    };
    catalog.link();
    catalog
}

fn declare(exporter: &dyn NodeExporter, node: &Node) -> String {
    let catalog = catalog();
    let config = ExportConfig::default();
    let ctx = ExportContext::new(&catalog, &config).with_agent_type("Player");
    let mut w = CodeWriter::new();
    let class = class_name(&node.export_class(), "ai_patrol", &node.name());
    exporter.emit_declaration(node, &class, &ctx, &mut w);
    w.into_string()
}

fn hp() -> VariableDef {
    VariableDef::property(PropertyDef::member("Player", "hp", "int"))
}

fn int(i: i64) -> VariableDef {
    VariableDef::constant("int", Value::Int(i))
}

#[test]
fn test_action_returning_status() {
    let node = Node::new(
        1,
        NodeKind::Action(Action {
            method: Some(MethodDef::new("Player", "attack", "behaviac::EBTStatus")),
            ..Action::default()
        }),
    );
    assert_eq!(
        declare(&ActionExporter, &node),
        r#"type Action_ai_patrol_node1 struct {
	performers.Action
}

func NewAction_ai_patrol_node1() *Action_ai_patrol_node1 {
	n := new(Action_ai_patrol_node1)
	return n
}

func (n *Action_ai_patrol_node1) Execute(agent bt.Agent) bt.Status {
	result := agent.(*types.Player).Attack()
	return result
}

"#
    );
}

#[test]
fn test_action_result_option() {
    let node = Node::new(
        2,
        NodeKind::Action(Action {
            method: Some(MethodDef::new("Player", "jump", "void")),
            result_option: Status::Success,
            ..Action::default()
        }),
    );
    let text = declare(&ActionExporter, &node);
    assert!(text.contains("\tagent.(*types.Player).Jump()\n\treturn bt.Success\n"));

    let node = Node::new(3, NodeKind::Action(Action::default()));
    assert!(declare(&ActionExporter, &node).contains("\treturn bt.Invalid\n"));
}

#[test]
fn test_action_result_functor() {
    let node = Node::new(
        4,
        NodeKind::Action(Action {
            method: Some(MethodDef::new("Player", "count", "int")),
            result_functor: Some(MethodDef::new("Player", "check", "behaviac::EBTStatus")),
            ..Action::default()
        }),
    );
    let text = declare(&ActionExporter, &node);
    assert!(text.contains(
        "\tresult := agent.(*types.Player).Count()\n\treturn agent.(*types.Player).Check(result)\n"
    ));
}

#[test]
fn test_condition() {
    let node = Node::new(
        5,
        NodeKind::Condition(Condition {
            opl: Some(int(5).into()),
            operator: CompareOperator::LessEqual,
            opr: Some(hp().into()),
        }),
    );
    let text = declare(&ConditionExporter, &node);
    assert!(text.starts_with("type Condition_ai_patrol_node5 struct {\n\tconditions.Condition\n}"));
    assert!(text.contains(
        r#"func (n *Condition_ai_patrol_node5) Compare(agent bt.Agent) bool {
	opl := 5
	opr := agent.(*types.Player).Hp
	return opl <= opr
}"#
    ));
}

#[test]
fn test_condition_slice_constant() {
    let targets = VariableDef::property(PropertyDef::member("Player", "targets", "vector<int>"));
    let node = Node::new(
        7,
        NodeKind::Condition(Condition {
            opl: Some(
                VariableDef::constant("vector<int>", Value::Array(vec![Value::Int(1), Value::Int(2)]))
                    .into(),
            ),
            operator: CompareOperator::Equal,
            opr: Some(targets.into()),
        }),
    );
    let text = declare(&ConditionExporter, &node);
    assert!(text.starts_with(
        "type Condition_ai_patrol_node7 struct {\n\tconditions.Condition\n\topl []int\n}"
    ));
    assert!(text.contains(
        "\tn := new(Condition_ai_patrol_node7)\n\tn.opl = []int{1, 2}\n\treturn n\n"
    ));
    assert!(text.contains("\topl := n.opl\n\topr := agent.(*types.Player).Targets\n"));
    assert!(!text.contains("opl := opl"));
}

#[test]
fn test_condition_invalid_operator() {
    let node = Node::new(
        6,
        NodeKind::Condition(Condition {
            opl: Some(int(5).into()),
            operator: CompareOperator::Invalid,
            opr: Some(hp().into()),
        }),
    );
    let text = declare(&ConditionExporter, &node);
    assert!(text.contains("Compare(agent bt.Agent) bool {\n\treturn false\n}"));
    assert!(!text.contains("opl :="));
}

#[test]
fn test_assignment_casting() {
    let node = Node::new(
        7,
        NodeKind::Assignment(Assignment {
            opl: Some(VariableDef::property(PropertyDef::member(
                "Player", "speed", "float",
            ))),
            opr: Some(int(3).into()),
            casting: true,
        }),
    );
    let text = declare(&AssignmentExporter, &node);
    assert!(text.contains(
        "func (n *Assignment_ai_patrol_node7) Assign(agent bt.Agent) {\n\tagent.(*types.Player).Speed = float32(3)\n}"
    ));
}

#[test]
fn test_assignment_missing_operand() {
    let node = Node::new(
        8,
        NodeKind::Assignment(Assignment {
            opl: Some(hp()),
            opr: None,
            casting: false,
        }),
    );
    let text = declare(&AssignmentExporter, &node);
    assert!(text.contains("Assign(agent bt.Agent) {\n}"));
}

#[test]
fn test_compute() {
    let node = Node::new(
        9,
        NodeKind::Compute(Compute {
            opl: Some(hp()),
            opr1: Some(hp().into()),
            operator: ComputeOperator::Mul,
            opr2: Some(int(2).into()),
        }),
    );
    let text = declare(&ComputeExporter, &node);
    assert!(text.contains(
        "\tagent.(*types.Player).Hp = int(agent.(*types.Player).Hp * 2)\n"
    ));
}

#[test]
fn test_parallel_policies() {
    let node = Node::new(
        10,
        NodeKind::Parallel(Parallel {
            failure: FailurePolicy::FailOnOne,
            success: SuccessPolicy::SucceedOnAll,
            exit: ExitPolicy::Unspecified,
            ..Parallel::default()
        }),
    );
    let text = declare(&ParallelExporter, &node);
    assert!(text.contains(
        "\tn.FailurePolicy = composites.ParallelFailureOnOne\n\tn.SuccessPolicy = composites.ParallelSuccessOnAll\n"
    ));
    // Unspecified policies are substituted empty
    assert!(text.contains("\tn.ExitPolicy = \n\tn.ChildFinishPolicy = \n\treturn n\n"));
}

#[test]
fn test_referenced_behavior() {
    let reference = |value: RightValueDef| {
        Node::new(
            11,
            NodeKind::ReferencedBehavior(ReferencedBehavior {
                reference: Some(value),
            }),
        )
    };
    let name = |s: &str| VariableDef::constant("behaviac::string", Value::String(s.to_owned()));

    let text = declare(&ReferencedBehaviorExporter, &reference(name("ai/patrol").into()));
    assert!(text.contains("GetSubtree(agent bt.Agent) string {\n\treturn \"ai/patrol\"\n}"));

    let text = declare(&ReferencedBehaviorExporter, &reference(name("ai/missing").into()));
    assert!(text.contains("\tpanic(\"subtree not found: ai/missing\")\n"));
    assert!(!text.contains("return \""));

    let dynamic = VariableDef::property(PropertyDef::member("Player", "next_tree", "behaviac::string"));
    let text = declare(&ReferencedBehaviorExporter, &reference(dynamic.into()));
    assert!(text.contains(
        r#"	if agent != nil {
		return agent.(*types.Player).NextTree
	}
	panic("subtree not found")
"#
    ));

    let node = Node::new(11, NodeKind::ReferencedBehavior(ReferencedBehavior::default()));
    assert!(!ReferencedBehaviorExporter.should_declare_type(&node));
    assert_eq!(declare(&ReferencedBehaviorExporter, &node), "");
}

#[test]
fn test_decorator_count() {
    let node = Node::new(
        12,
        NodeKind::DecoratorLoop(DecoratorCount {
            count: Some(int(3)),
        }),
    );
    let text = declare(&DecoratorCountExporter, &node);
    assert!(text.contains("\tdecorators.Loop\n"));
    assert!(text.contains(
        "func (n *DecoratorLoop_ai_patrol_node12) GetCount(agent bt.Agent) int {\n\treturn int(3)\n}"
    ));
}

#[test]
fn test_decorator_weight_and_log() {
    let node = Node::new(
        13,
        NodeKind::DecoratorWeight(DecoratorWeight {
            weight: Some(hp()),
        }),
    );
    let text = declare(&DecoratorWeightExporter, &node);
    assert!(text.contains("\tn.GetWeight = n.doGetWeight\n"));
    assert!(text.contains("doGetWeight(agent bt.Agent) int {\n\treturn int(agent.(*types.Player).Hp)\n}"));

    let node = Node::new(
        14,
        NodeKind::DecoratorLog(DecoratorLog {
            message: "tick \"a\"".to_owned(),
        }),
    );
    let text = declare(&DecoratorLogExporter, &node);
    assert!(text.contains("\tn.Message = \"tick \\\"a\\\"\"\n"));
}

#[test]
fn test_instantiation() {
    let catalog = catalog();
    let config = ExportConfig::default();
    let ctx = ExportContext::new(&catalog, &config);
    let mut w = CodeWriter::new();

    let sequence = Node::new(3, NodeKind::Sequence);
    CompositeExporter.emit_declaration(&sequence, "unused", &ctx, &mut w);
    assert_eq!(w.as_str(), "");

    CompositeExporter.emit_instantiation(&sequence, None, &ctx, &mut w);
    ActionExporter.emit_instantiation(
        &Node::new(4, NodeKind::Action(Action::default())),
        Some("Action_ai_patrol_node4"),
        &ctx,
        &mut w,
    );
    assert_eq!(
        w.into_string(),
        "node3 := bt.NewNode(3, composites.NewSequence())\nnode4 := bt.NewNode(4, NewAction_ai_patrol_node4())\n"
    );
    assert_eq!(
        ctx.imports(),
        vec!["\"behaviac/bt\"", "\"behaviac/composites\""]
    );
}

#[test]
fn test_default_exporter() {
    let catalog = catalog();
    let config = ExportConfig::default();
    let ctx = ExportContext::new(&catalog, &config);
    let mut w = CodeWriter::new();

    let node = Node::new(15, NodeKind::Unknown("custom.Blink".to_owned()));
    DefaultExporter.emit_declaration(&node, "unused", &ctx, &mut w);
    DefaultExporter.emit_instantiation(&node, None, &ctx, &mut w);
    assert_eq!(w.into_string(), "node15 := bt.NewNode(15, custom.NewBlink())\n");
}
