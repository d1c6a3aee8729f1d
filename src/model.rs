//! The frozen input model: behavior trees, their nodes and attachments, and the value
//! expressions bound into them.
//!
//! Nodes and attachments are closed sum types. Every [`NodeKind`] maps to a [`KindTag`]
//! whose [`KindTag::ancestry`] lists the kinds an exporter may be inherited from, most
//! specific first.

use serde::Deserialize;

use crate::catalog::{MethodDef, ParInfo, PropertyDef};

/// Execution status of a behavior node.
///
/// `Invalid` doubles as "no override" for an [`Action`]'s result option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum Status {
    #[default]
    Invalid,
    Success,
    Failure,
    Running,
}

impl Status {
    /// Maps a member of the status enum (`BT_SUCCESS` etc.) to a status.
    /// Anything unrecognized is `Invalid`.
    pub fn from_member(member: &str) -> Self {
        let member = member.rsplit("::").next().unwrap_or(member).trim();
        match member {
            "BT_SUCCESS" => Self::Success,
            "BT_FAILURE" => Self::Failure,
            "BT_RUNNING" => Self::Running,
            _ => Self::Invalid,
        }
    }

    pub fn go_constant(self) -> &'static str {
        match self {
            Self::Invalid => "bt.Invalid",
            Self::Success => "bt.Success",
            Self::Failure => "bt.Failure",
            Self::Running => "bt.Running",
        }
    }
}

/// A constant literal. Its type comes from the expression that carries it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(String),
    String(String),
    /// Member name of an enum
    Enum(String),
    Array(Vec<Value>),
    /// Field name and value pairs of a struct, in declaration order
    Struct(Vec<(String, Value)>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum VariableDef {
    Const {
        native_type: String,
        value: Value,
    },
    Property {
        property: PropertyDef,
        index: Option<Box<VariableDef>>,
    },
}

impl VariableDef {
    pub fn constant(native_type: impl Into<String>, value: Value) -> Self {
        Self::Const {
            native_type: native_type.into(),
            value,
        }
    }

    pub fn property(property: PropertyDef) -> Self {
        Self::Property {
            property,
            index: None,
        }
    }

    /// An element of an array property. `property` names the element type.
    pub fn element(mut property: PropertyDef, index: VariableDef) -> Self {
        property.is_array_element = true;
        Self::Property {
            property,
            index: Some(Box::new(index)),
        }
    }

    pub fn native_type(&self) -> &str {
        match self {
            Self::Const { native_type, .. } => native_type,
            Self::Property { property, .. } => &property.native_type,
        }
    }

    pub fn is_const(&self) -> bool {
        matches!(self, Self::Const { .. })
    }

    pub fn as_property(&self) -> Option<&PropertyDef> {
        match self {
            Self::Property { property, .. } => Some(property),
            Self::Const { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RightValueDef {
    Method(MethodDef),
    Var(VariableDef),
}

impl RightValueDef {
    pub fn native_type(&self) -> &str {
        match self {
            Self::Method(method) => &method.return_type,
            Self::Var(var) => var.native_type(),
        }
    }

    pub fn is_method(&self) -> bool {
        matches!(self, Self::Method(_))
    }

    pub fn is_const(&self) -> bool {
        matches!(self, Self::Var(var) if var.is_const())
    }
}

impl From<VariableDef> for RightValueDef {
    fn from(var: VariableDef) -> Self {
        Self::Var(var)
    }
}

impl From<MethodDef> for RightValueDef {
    fn from(method: MethodDef) -> Self {
        Self::Method(method)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum SuccessPolicy {
    SucceedOnOne,
    SucceedOnAll,
    #[default]
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum FailurePolicy {
    FailOnOne,
    FailOnAll,
    #[default]
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ExitPolicy {
    ExitNone,
    ExitAbortRunningSiblings,
    #[default]
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ChildFinishPolicy {
    ChildOnce,
    ChildLoop,
    #[default]
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parallel {
    pub success: SuccessPolicy,
    pub failure: FailurePolicy,
    pub exit: ExitPolicy,
    pub child_finish: ChildFinishPolicy,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferencedBehavior {
    pub reference: Option<RightValueDef>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecoratorCount {
    pub count: Option<VariableDef>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecoratorLoopUntil {
    pub count: Option<VariableDef>,
    pub until: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecoratorFrames {
    pub frames: Option<RightValueDef>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecoratorLog {
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecoratorWeight {
    pub weight: Option<VariableDef>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Action {
    pub method: Option<MethodDef>,
    pub result_option: Status,
    pub result_functor: Option<MethodDef>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignment {
    pub opl: Option<VariableDef>,
    pub opr: Option<RightValueDef>,
    pub casting: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ComputeOperator {
    Add,
    Sub,
    Mul,
    Div,
}

impl ComputeOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Compute {
    pub opl: Option<VariableDef>,
    pub opr1: Option<RightValueDef>,
    pub operator: ComputeOperator,
    pub opr2: Option<RightValueDef>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wait {
    pub time: Option<RightValueDef>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaitFrames {
    pub frames: Option<RightValueDef>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct End {
    pub status: Option<RightValueDef>,
    pub end_outside: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum CompareOperator {
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    And,
    Or,
    #[default]
    #[serde(other)]
    Invalid,
}

impl CompareOperator {
    /// The Go operator, or `None` when the comparison can never hold.
    pub fn symbol(self) -> Option<&'static str> {
        match self {
            Self::Equal => Some("=="),
            Self::NotEqual => Some("!="),
            Self::Greater => Some(">"),
            Self::GreaterEqual => Some(">="),
            Self::Less => Some("<"),
            Self::LessEqual => Some("<="),
            Self::And => Some("&&"),
            Self::Or => Some("||"),
            Self::Invalid => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
    pub opl: Option<RightValueDef>,
    pub operator: CompareOperator,
    pub opr: Option<RightValueDef>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Sequence,
    Selector,
    SelectorLoop,
    SelectorProbability,
    SelectorStochastic,
    SequenceStochastic,
    IfElse,
    WithPrecondition,
    Parallel(Parallel),
    ReferencedBehavior(ReferencedBehavior),
    DecoratorAlwaysSuccess,
    DecoratorAlwaysFailure,
    DecoratorAlwaysRunning,
    DecoratorNot,
    DecoratorLoop(DecoratorCount),
    DecoratorRepeat(DecoratorCount),
    DecoratorCountLimit(DecoratorCount),
    DecoratorFailureUntil(DecoratorCount),
    DecoratorSuccessUntil(DecoratorCount),
    DecoratorLoopUntil(DecoratorLoopUntil),
    DecoratorFrames(DecoratorFrames),
    DecoratorLog(DecoratorLog),
    DecoratorWeight(DecoratorWeight),
    Action(Action),
    Assignment(Assignment),
    Compute(Compute),
    Wait(Wait),
    WaitFrames(WaitFrames),
    End(End),
    Noop,
    WaitForSignal,
    Condition(Condition),
    And,
    Or,
    True,
    False,
    /// A kind this crate has no model for, carrying its runtime class
    /// (`"pkg.Class"` or a bare `"Class"` from the `bt` package).
    Unknown(String),
}

impl NodeKind {
    pub fn tag(&self) -> KindTag {
        use KindTag as T;
        match self {
            Self::Sequence => T::Sequence,
            Self::Selector => T::Selector,
            Self::SelectorLoop => T::SelectorLoop,
            Self::SelectorProbability => T::SelectorProbability,
            Self::SelectorStochastic => T::SelectorStochastic,
            Self::SequenceStochastic => T::SequenceStochastic,
            Self::IfElse => T::IfElse,
            Self::WithPrecondition => T::WithPrecondition,
            Self::Parallel(_) => T::Parallel,
            Self::ReferencedBehavior(_) => T::ReferencedBehavior,
            Self::DecoratorAlwaysSuccess => T::DecoratorAlwaysSuccess,
            Self::DecoratorAlwaysFailure => T::DecoratorAlwaysFailure,
            Self::DecoratorAlwaysRunning => T::DecoratorAlwaysRunning,
            Self::DecoratorNot => T::DecoratorNot,
            Self::DecoratorLoop(_) => T::DecoratorLoop,
            Self::DecoratorRepeat(_) => T::DecoratorRepeat,
            Self::DecoratorCountLimit(_) => T::DecoratorCountLimit,
            Self::DecoratorFailureUntil(_) => T::DecoratorFailureUntil,
            Self::DecoratorSuccessUntil(_) => T::DecoratorSuccessUntil,
            Self::DecoratorLoopUntil(_) => T::DecoratorLoopUntil,
            Self::DecoratorFrames(_) => T::DecoratorFrames,
            Self::DecoratorLog(_) => T::DecoratorLog,
            Self::DecoratorWeight(_) => T::DecoratorWeight,
            Self::Action(_) => T::Action,
            Self::Assignment(_) => T::Assignment,
            Self::Compute(_) => T::Compute,
            Self::Wait(_) => T::Wait,
            Self::WaitFrames(_) => T::WaitFrames,
            Self::End(_) => T::End,
            Self::Noop => T::Noop,
            Self::WaitForSignal => T::WaitForSignal,
            Self::Condition(_) => T::Condition,
            Self::And => T::And,
            Self::Or => T::Or,
            Self::True => T::True,
            Self::False => T::False,
            Self::Unknown(_) => T::Unknown,
        }
    }

    /// The count operand of any member of the counting decorator family.
    pub fn count(&self) -> Option<&VariableDef> {
        match self {
            Self::DecoratorLoop(d)
            | Self::DecoratorRepeat(d)
            | Self::DecoratorCountLimit(d)
            | Self::DecoratorFailureUntil(d)
            | Self::DecoratorSuccessUntil(d) => d.count.as_ref(),
            Self::DecoratorLoopUntil(d) => d.count.as_ref(),
            _ => None,
        }
    }
}

/// Discriminant of [`NodeKind`], plus the abstract bases exporters can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindTag {
    Node,
    Composite,
    Decorator,
    DecoratorCount,
    Leaf,
    ConditionBase,
    Sequence,
    Selector,
    SelectorLoop,
    SelectorProbability,
    SelectorStochastic,
    SequenceStochastic,
    IfElse,
    WithPrecondition,
    Parallel,
    ReferencedBehavior,
    DecoratorAlwaysSuccess,
    DecoratorAlwaysFailure,
    DecoratorAlwaysRunning,
    DecoratorNot,
    DecoratorLoop,
    DecoratorRepeat,
    DecoratorCountLimit,
    DecoratorFailureUntil,
    DecoratorSuccessUntil,
    DecoratorLoopUntil,
    DecoratorFrames,
    DecoratorLog,
    DecoratorWeight,
    Action,
    Assignment,
    Compute,
    Wait,
    WaitFrames,
    End,
    Noop,
    WaitForSignal,
    Condition,
    And,
    Or,
    True,
    False,
    Unknown,
}

impl KindTag {
    /// The kind itself followed by its bases, most specific first.
    pub fn ancestry(self) -> &'static [KindTag] {
        use KindTag::*;
        match self {
            Node => &[Node],
            Composite => &[Composite, Node],
            Decorator => &[Decorator, Node],
            DecoratorCount => &[DecoratorCount, Decorator, Node],
            Leaf => &[Leaf, Node],
            ConditionBase => &[ConditionBase, Node],
            Sequence => &[Sequence, Composite, Node],
            Selector => &[Selector, Composite, Node],
            SelectorLoop => &[SelectorLoop, Composite, Node],
            SelectorProbability => &[SelectorProbability, Composite, Node],
            SelectorStochastic => &[SelectorStochastic, Composite, Node],
            SequenceStochastic => &[SequenceStochastic, Composite, Node],
            IfElse => &[IfElse, Composite, Node],
            WithPrecondition => &[WithPrecondition, Composite, Node],
            Parallel => &[Parallel, Composite, Node],
            ReferencedBehavior => &[ReferencedBehavior, Node],
            DecoratorAlwaysSuccess => &[DecoratorAlwaysSuccess, Decorator, Node],
            DecoratorAlwaysFailure => &[DecoratorAlwaysFailure, Decorator, Node],
            DecoratorAlwaysRunning => &[DecoratorAlwaysRunning, Decorator, Node],
            DecoratorNot => &[DecoratorNot, Decorator, Node],
            DecoratorLoop => &[DecoratorLoop, DecoratorCount, Decorator, Node],
            DecoratorRepeat => &[DecoratorRepeat, DecoratorCount, Decorator, Node],
            DecoratorCountLimit => &[DecoratorCountLimit, DecoratorCount, Decorator, Node],
            DecoratorFailureUntil => &[DecoratorFailureUntil, DecoratorCount, Decorator, Node],
            DecoratorSuccessUntil => &[DecoratorSuccessUntil, DecoratorCount, Decorator, Node],
            DecoratorLoopUntil => &[DecoratorLoopUntil, DecoratorCount, Decorator, Node],
            DecoratorFrames => &[DecoratorFrames, Decorator, Node],
            DecoratorLog => &[DecoratorLog, Decorator, Node],
            DecoratorWeight => &[DecoratorWeight, Decorator, Node],
            Action => &[Action, Leaf, Node],
            Assignment => &[Assignment, Leaf, Node],
            Compute => &[Compute, Leaf, Node],
            Wait => &[Wait, Leaf, Node],
            WaitFrames => &[WaitFrames, Leaf, Node],
            End => &[End, Leaf, Node],
            Noop => &[Noop, Leaf, Node],
            WaitForSignal => &[WaitForSignal, Leaf, Node],
            Condition => &[Condition, ConditionBase, Node],
            And => &[And, ConditionBase, Node],
            Or => &[Or, ConditionBase, Node],
            True => &[True, ConditionBase, Node],
            False => &[False, ConditionBase, Node],
            Unknown => &[Unknown],
        }
    }

    /// Runtime package and type a node of this kind is built from.
    pub fn runtime_type(self) -> (&'static str, &'static str) {
        use KindTag::*;
        match self {
            Node | Leaf => ("bt", "Node"),
            Composite => ("bt", "Composite"),
            Decorator => ("decorators", "Decorator"),
            DecoratorCount => ("decorators", "Count"),
            ConditionBase => ("conditions", "ConditionBase"),
            Sequence => ("composites", "Sequence"),
            Selector => ("composites", "Selector"),
            SelectorLoop => ("composites", "SelectorLoop"),
            SelectorProbability => ("composites", "SelectorProbability"),
            SelectorStochastic => ("composites", "SelectorStochastic"),
            SequenceStochastic => ("composites", "SequenceStochastic"),
            IfElse => ("composites", "IfElse"),
            WithPrecondition => ("composites", "WithPrecondition"),
            Parallel => ("composites", "Parallel"),
            ReferencedBehavior => ("composites", "Subtree"),
            DecoratorAlwaysSuccess => ("decorators", "AlwaysSuccess"),
            DecoratorAlwaysFailure => ("decorators", "AlwaysFailure"),
            DecoratorAlwaysRunning => ("decorators", "AlwaysRunning"),
            DecoratorNot => ("decorators", "Not"),
            DecoratorLoop => ("decorators", "Loop"),
            DecoratorRepeat => ("decorators", "Repeat"),
            DecoratorCountLimit => ("decorators", "CountLimit"),
            DecoratorFailureUntil => ("decorators", "FailureUntil"),
            DecoratorSuccessUntil => ("decorators", "SuccessUntil"),
            DecoratorLoopUntil => ("decorators", "LoopUntil"),
            DecoratorFrames => ("decorators", "Frames"),
            DecoratorLog => ("decorators", "Log"),
            DecoratorWeight => ("composites", "ProbabilityWeight"),
            Action => ("performers", "Action"),
            Assignment => ("performers", "Assignment"),
            Compute => ("performers", "Compute"),
            Wait => ("performers", "Wait"),
            WaitFrames => ("actions", "WaitFrames"),
            End => ("actions", "End"),
            Noop => ("actions", "Noop"),
            WaitForSignal => ("actions", "WaitForSignal"),
            Condition => ("conditions", "Condition"),
            And => ("conditions", "And"),
            Or => ("conditions", "Or"),
            True => ("conditions", "True"),
            False => ("conditions", "False"),
            Unknown => ("bt", "Node"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: i32,
    pub kind: NodeKind,
    pub enabled: bool,
    /// `false` when the node is wired as its parent's custom condition instead of a child.
    pub as_child: bool,
    pub fsm: bool,
    pub initial_state_id: Option<i32>,
    pub children: Vec<Node>,
    pub attachments: Vec<Attachment>,
}

impl Node {
    pub fn new(id: i32, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            enabled: true,
            as_child: true,
            fsm: false,
            initial_state_id: None,
            children: vec![],
            attachments: vec![],
        }
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn name(&self) -> String {
        format!("node{}", self.id)
    }

    /// Class name used in generated type names, e.g. `DecoratorLoop`.
    pub fn export_class(&self) -> String {
        match &self.kind {
            NodeKind::Unknown(class) => runtime_class_split(class).1.to_owned(),
            kind => format!("{:?}", kind.tag()),
        }
    }

    /// Runtime package and type this node is instantiated from.
    pub fn runtime_type(&self) -> (&str, &str) {
        match &self.kind {
            NodeKind::Unknown(class) => runtime_class_split(class),
            kind => kind.tag().runtime_type(),
        }
    }
}

fn runtime_class_split(class: &str) -> (&str, &str) {
    class.rsplit_once('.').unwrap_or(("bt", class))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum PreconditionPhase {
    #[default]
    Enter,
    Update,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum EffectorPhase {
    #[default]
    Success,
    Failure,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum TriggerMode {
    #[default]
    Transfer,
    Return,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum AttachOperator {
    #[default]
    Invalid,
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
}

impl AttachOperator {
    /// The Go operator of an arithmetic or comparison operator.
    pub fn symbol(self) -> Option<&'static str> {
        use AttachOperator::*;
        match self {
            Add => Some("+"),
            Sub => Some("-"),
            Mul => Some("*"),
            Div => Some("/"),
            Equal => Some("=="),
            NotEqual => Some("!="),
            Greater => Some(">"),
            GreaterEqual => Some(">="),
            Less => Some("<"),
            LessEqual => Some("<="),
            Invalid | Assign => None,
        }
    }
}

/// What an [`AttachAction`] does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachActionClass {
    Call,
    Assign,
    Compare,
    Compute,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttachAction {
    pub opl: Option<RightValueDef>,
    pub operator: AttachOperator,
    pub opr1: Option<RightValueDef>,
    pub opr2: Option<RightValueDef>,
}

impl AttachAction {
    pub fn classify(&self) -> AttachActionClass {
        use AttachOperator::*;
        if self.opr2.is_none() {
            return AttachActionClass::Call;
        }
        match self.operator {
            Invalid => AttachActionClass::Call,
            Assign => AttachActionClass::Assign,
            Add | Sub | Mul | Div => AttachActionClass::Compute,
            Equal | NotEqual | Greater | GreaterEqual | Less | LessEqual => {
                AttachActionClass::Compare
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Precondition {
    pub phase: PreconditionPhase,
    /// Combined with the previous precondition by `&&` rather than `||`
    pub and: bool,
    pub action: AttachAction,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effector {
    pub phase: EffectorPhase,
    pub action: AttachAction,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub task: String,
    pub triggered_once: bool,
    pub mode: TriggerMode,
    pub tree: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttachmentKind {
    Precondition(Precondition),
    Effector(Effector),
    Event(Event),
    AttachAction(AttachAction),
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentTag {
    Attachment,
    AttachAction,
    Precondition,
    Effector,
    Event,
    Unknown,
}

impl AttachmentTag {
    pub fn ancestry(self) -> &'static [AttachmentTag] {
        use AttachmentTag::*;
        match self {
            Attachment => &[Attachment],
            AttachAction => &[AttachAction, Attachment],
            Precondition => &[Precondition, AttachAction, Attachment],
            Effector => &[Effector, AttachAction, Attachment],
            Event => &[Event, Attachment],
            Unknown => &[Unknown],
        }
    }

    pub fn runtime_type(self) -> (&'static str, &'static str) {
        match self {
            Self::Attachment | Self::Unknown => ("bt", "Attachment"),
            Self::AttachAction => ("attachments", "AttachAction"),
            Self::Precondition => ("bt", "Precondition"),
            Self::Effector => ("attachments", "Effector"),
            Self::Event => ("attachments", "Event"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub id: i32,
    pub enabled: bool,
    pub is_transition: bool,
    pub kind: AttachmentKind,
}

impl Attachment {
    pub fn new(id: i32, kind: AttachmentKind) -> Self {
        Self {
            id,
            enabled: true,
            is_transition: false,
            kind,
        }
    }

    pub fn tag(&self) -> AttachmentTag {
        match self.kind {
            AttachmentKind::Precondition(_) => AttachmentTag::Precondition,
            AttachmentKind::Effector(_) => AttachmentTag::Effector,
            AttachmentKind::Event(_) => AttachmentTag::Event,
            AttachmentKind::AttachAction(_) => AttachmentTag::AttachAction,
            AttachmentKind::Unknown(_) => AttachmentTag::Unknown,
        }
    }

    pub fn name(&self) -> String {
        format!("attach{}", self.id)
    }

    pub fn export_class(&self) -> String {
        match &self.kind {
            AttachmentKind::Unknown(class) => runtime_class_split(class).1.to_owned(),
            _ => format!("{:?}", self.tag()),
        }
    }

    pub fn runtime_type(&self) -> (&str, &str) {
        match &self.kind {
            AttachmentKind::Unknown(class) => runtime_class_split(class),
            _ => self.tag().runtime_type(),
        }
    }

    /// The operand-carrying action, for the kinds that have one.
    pub fn action(&self) -> Option<&AttachAction> {
        match &self.kind {
            AttachmentKind::Precondition(p) => Some(&p.action),
            AttachmentKind::Effector(e) => Some(&e.action),
            AttachmentKind::AttachAction(a) => Some(a),
            AttachmentKind::Event(_) | AttachmentKind::Unknown(_) => None,
        }
    }

    pub fn is_precondition(&self) -> bool {
        matches!(self.kind, AttachmentKind::Precondition(_))
    }

    pub fn is_effector(&self) -> bool {
        matches!(self.kind, AttachmentKind::Effector(_))
    }

    pub fn is_event(&self) -> bool {
        matches!(self.kind, AttachmentKind::Event(_))
    }
}

/// A top-level tree: one generated Go type with a `NewTree` constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct Behavior {
    /// Label used as the Go type name
    pub name: String,
    /// Path of the tree inside the workspace, e.g. `ai/patrol.xml`
    pub relative_path: String,
    pub agent_type: String,
    pub comment: String,
    pub locals: Vec<ParInfo>,
    pub fsm: bool,
    pub initial_state_id: Option<i32>,
    pub attachments: Vec<Attachment>,
    pub children: Vec<Node>,
}

impl Behavior {
    pub fn new(
        name: impl Into<String>,
        relative_path: impl Into<String>,
        agent_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            relative_path: relative_path.into(),
            agent_type: agent_type.into(),
            comment: String::new(),
            locals: vec![],
            fsm: false,
            initial_state_id: None,
            attachments: vec![],
            children: vec![],
        }
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// The relative path with `/` separators and without its extension.
    pub fn source_name(&self) -> String {
        let path = self.relative_path.replace('\\', "/");
        match path.rfind('.') {
            Some(dot) if !path[dot..].contains('/') => path[..dot].to_owned(),
            _ => path,
        }
    }

    /// Identifier derived from the relative path: extension dropped, separators
    /// normalized to `_`.
    pub fn class_name(&self) -> String {
        self.source_name()
            .chars()
            .map(|c| match c {
                '/' | '-' | '.' | ' ' => '_',
                c => c,
            })
            .collect()
    }
}
