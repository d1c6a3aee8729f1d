use super::*;
use crate::{
    catalog::Owner,
    model::{AttachOperator, CompareOperator, ComputeOperator, SuccessPolicy, Value as Literal},
};

const CATALOG: &str = r#"
agents:
  - name: Player
    properties:
      - { name: hp, type: int }
      - { name: speed, type: float }
      - { name: items, type: "vector<int>" }
      - { name: target, type: Player }
    methods:
      - name: attack
        return: behaviac::EBTStatus
        params:
          - { name: power, type: int }
      - { name: idle, return: void }
  - name: Boss
    base: Player
"#;

fn catalog() -> TypeCatalog {
    let mut catalog: TypeCatalog = serde_yaml::from_str(CATALOG).unwrap();
    catalog.link();
    catalog
}

fn load(yaml: &str) -> LoadResult<Behavior> {
    let value: Value = serde_yaml::from_str(yaml).unwrap();
    Loader::new(&catalog()).behavior(&value)
}

fn root(yaml: &str) -> Node {
    let mut behavior = load(yaml).unwrap();
    behavior.children.remove(0)
}

#[test]
fn test_behavior() {
    let behavior = load(
        r#"
name: ai/patrol
agent: Player
comment: walks around
locals:
  - { name: count, type: int, default: 3 }
children:
  - type: Sequence
    id: 1
    children:
      - { type: Noop, id: 2, enabled: false }
      - { type: WaitForSignal, id: 3, as_child: false }
"#,
    )
    .unwrap();
    assert_eq!(behavior.relative_path, "ai/patrol.xml");
    assert_eq!(behavior.agent_type, "Player");
    assert_eq!(behavior.comment, "walks around");
    assert_eq!(behavior.locals, vec![ParInfo::new("count", "int", "3")]);

    let sequence = &behavior.children[0];
    assert_eq!(sequence.kind, NodeKind::Sequence);
    assert!(!sequence.children[0].enabled);
    assert!(sequence.children[1].enabled);
    assert!(!sequence.children[1].as_child);
}

#[test]
fn test_unknown_agent() {
    assert!(matches!(
        load("{ name: a, agent: Ghost }"),
        Err(LoadError::UnknownAgent(name)) if name == "Ghost"
    ));
    // The base agent needs no declaration
    assert_eq!(load("{ name: a }").unwrap().agent_type, AGENT_BASE);
}

#[test]
fn test_missing_id() {
    assert!(matches!(
        load("{ name: a, children: [{ type: Noop }] }"),
        Err(LoadError::MissingField { field: "id", .. })
    ));
}

#[test]
fn test_condition_typing() {
    let node = root(
        r#"
name: a
agent: Player
children:
  - { type: Condition, id: 1, opl: 5, operator: Less, opr: hp }
"#,
    );
    let NodeKind::Condition(condition) = node.kind else {
        panic!("not a condition");
    };
    assert_eq!(condition.operator, CompareOperator::Less);
    assert_eq!(
        condition.opl,
        Some(VariableDef::constant("int", Literal::Int(5)).into())
    );
    let opr = condition.opr.unwrap();
    assert!(!opr.is_const());
    assert!(!opr.is_method());
    assert_eq!(opr.native_type(), "int");
}

#[test]
fn test_operands() {
    let node = root(
        r#"
name: a
agent: Boss
locals:
  - { name: count, type: int, default: 0 }
children:
  - type: Assignment
    id: 1
    opl: { property: items, index: count }
    opr: { method: attack, owner: target, args: [hp] }
"#,
    );
    let NodeKind::Assignment(assignment) = node.kind else {
        panic!("not an assignment");
    };

    let Some(VariableDef::Property { property, index }) = assignment.opl else {
        panic!("not a property");
    };
    assert_eq!(property.native_type, "int");
    assert!(property.is_array_element);
    assert_eq!(property.class_name, "Player");
    let index = index.unwrap();
    assert!(index.as_property().unwrap().is_par);

    let Some(RightValueDef::Method(method)) = assignment.opr else {
        panic!("not a method");
    };
    assert_eq!(method.owner, Owner::Instance("target".to_owned()));
    let arg = method.params[0].value.as_ref().unwrap();
    assert_eq!(arg.native_type(), "int");
    assert!(method.params[0].is_property());
    assert!(!method.params[0].is_local_var());
}

#[test]
fn test_constants() {
    let node = root(
        r#"
name: a
agent: Player
children:
  - type: Compute
    id: 1
    opl: speed
    opr1: { const: 2 }
    operator: Mul
    opr2: "0.5"
"#,
    );
    let NodeKind::Compute(compute) = node.kind else {
        panic!("not a compute");
    };
    assert_eq!(compute.operator, ComputeOperator::Mul);
    assert_eq!(compute.opr1.unwrap().native_type(), "float");
    assert!(compute.opr2.unwrap().is_const());

    assert!(matches!(
        load("{ name: a, agent: Player, children: [{ type: Wait, id: 1, time: soon }] }"),
        Err(LoadError::MalformedLiteral { native_type, .. }) if native_type == "double"
    ));
}

#[test]
fn test_unresolved_names() {
    assert!(matches!(
        load("{ name: a, agent: Player, children: [{ type: Condition, id: 1, opl: mana }] }"),
        Err(LoadError::UnknownProperty { name, .. }) if name == "mana"
    ));
    assert!(matches!(
        load("{ name: a, agent: Player, children: [{ type: Action, id: 1, method: cast() }] }"),
        Err(LoadError::UnknownMethod { name, .. }) if name == "cast"
    ));
    assert!(matches!(
        load("{ name: a, agent: Player, children: [{ type: Action, id: 1, method: hp }] }"),
        Err(LoadError::NotAMethod { field: "method", .. })
    ));
    assert!(matches!(
        load("{ name: a, agent: Player, children: [{ type: DecoratorLoop, id: 1, count: idle() }] }"),
        Err(LoadError::NotAVariable { field: "count", .. })
    ));
}

#[test]
fn test_node_kinds() {
    let node = root(
        r#"
name: a
agent: Player
children:
  - type: Parallel
    id: 1
    success: SucceedOnAll
    children:
      - { type: DecoratorLoopUntil, id: 2, count: 3, until: true }
      - { type: Action, id: 3, method: idle(), result_option: BT_SUCCESS }
      - { type: Action, id: 4, method: "attack()", result_option: Running }
      - { type: ReferencedBehavior, id: 5, tree: ai/idle }
      - { type: DecoratorBlink, id: 6 }
      - { type: true, id: 7 }
"#,
    );
    let NodeKind::Parallel(parallel) = &node.kind else {
        panic!("not a parallel: {:?}", node.kind);
    };
    assert_eq!(parallel.success, SuccessPolicy::SucceedOnAll);

    let kinds: Vec<_> = node.children.iter().map(|c| &c.kind).collect();
    assert_eq!(
        kinds[0],
        &NodeKind::DecoratorLoopUntil(DecoratorLoopUntil {
            count: Some(VariableDef::constant("int", Literal::Int(3))),
            until: true,
        })
    );
    let NodeKind::Action(action) = kinds[1] else {
        panic!("not an action");
    };
    assert_eq!(action.result_option, Status::Success);
    assert_eq!(action.method.as_ref().unwrap().name, "idle");
    let NodeKind::Action(action) = kinds[2] else {
        panic!("not an action");
    };
    assert_eq!(action.result_option, Status::Running);
    let NodeKind::ReferencedBehavior(reference) = kinds[3] else {
        panic!("not a reference");
    };
    assert_eq!(
        reference.reference,
        Some(VariableDef::constant(STRING_TYPE, Literal::String("ai/idle".to_owned())).into())
    );
    assert_eq!(kinds[4], &NodeKind::Unknown("DecoratorBlink".to_owned()));
    assert_eq!(kinds[5], &NodeKind::True);
}

#[test]
fn test_attachments() {
    let node = root(
        r#"
name: a
agent: Player
children:
  - type: Noop
    id: 1
    attachments:
      - { type: Precondition, id: 2, phase: Update, and: true, opl: hp, operator: Greater, opr2: 0 }
      - { type: Effector, id: 3, opl: hp, operator: Assign, opr2: 100, enabled: false }
      - { type: Event, id: 4, task: "Player::onHit", once: true, tree: ai/hurt, transition: true }
      - { type: Precondition, id: 5, opl: "idle()", operator: Xor }
"#,
    );
    let attachments = &node.attachments;
    let AttachmentKind::Precondition(pre) = &attachments[0].kind else {
        panic!("not a precondition");
    };
    assert!(pre.and);
    assert_eq!(pre.action.operator, AttachOperator::Greater);
    assert_eq!(pre.action.opr2.as_ref().unwrap().native_type(), "int");

    assert!(!attachments[1].enabled);
    assert!(attachments[1].is_effector());

    let AttachmentKind::Event(event) = &attachments[2].kind else {
        panic!("not an event");
    };
    assert!(event.triggered_once);
    assert_eq!(event.tree, "ai/hurt");
    assert!(attachments[2].is_transition);

    // Unrecognized operators load as invalid
    assert_eq!(
        attachments[3].action().unwrap().operator,
        AttachOperator::Invalid
    );
}
