//! Builds behaviors out of YAML values.
//!
//! Nodes are walked dynamically, the way their `type` field dictates. Operands name
//! properties, locals and methods of the catalog, and constants are typed from the operand
//! they are combined with unless they carry an explicit `type`.

use serde::de::DeserializeOwned;
use serde_yaml::Value;
use tracing::debug;

use crate::{
    catalog::{MethodDef, ParInfo, TypeCatalog, AGENT_BASE},
    error::LoadError,
    model::{
        Action, Assignment, AttachAction, Attachment, AttachmentKind, Behavior, Compute,
        Condition, DecoratorCount, DecoratorFrames, DecoratorLog, DecoratorLoopUntil,
        DecoratorWeight, Effector, End, Event, Node, NodeKind, Parallel, Precondition,
        ReferencedBehavior, RightValueDef, Status, VariableDef, Wait, WaitFrames,
    },
    types::vector_element,
};

const STATUS_TYPE: &str = "behaviac::EBTStatus";
const STRING_TYPE: &str = "behaviac::string";

type LoadResult<T> = Result<T, LoadError>;

/// What names in operands resolve against.
struct Scope<'s> {
    agent_type: &'s str,
    locals: &'s [ParInfo],
    /// Node or attachment being loaded, for error messages
    owner: String,
}

impl<'s> Scope<'s> {
    fn at(&self, owner: String) -> Self {
        Self {
            agent_type: self.agent_type,
            locals: self.locals,
            owner,
        }
    }

    fn missing(&self, field: &'static str) -> LoadError {
        LoadError::MissingField {
            node: self.owner.clone(),
            field,
        }
    }
}

pub struct Loader<'a> {
    catalog: &'a TypeCatalog,
}

impl<'a> Loader<'a> {
    pub fn new(catalog: &'a TypeCatalog) -> Self {
        Self { catalog }
    }

    pub fn behavior(&self, value: &Value) -> LoadResult<Behavior> {
        let name = str_field(value, "name").ok_or_else(|| LoadError::MissingField {
            node: "behavior".to_owned(),
            field: "name",
        })?;
        let path = str_field(value, "path")
            .map(str::to_owned)
            .unwrap_or_else(|| format!("{}.xml", name));
        let agent_type = str_field(value, "agent").unwrap_or(AGENT_BASE);
        if agent_type != AGENT_BASE && self.catalog.agent(agent_type).is_none() {
            return Err(LoadError::UnknownAgent(agent_type.to_owned()));
        }

        let locals = sequence(value, "locals")
            .iter()
            .map(|local| {
                let local_name = str_field(local, "name").ok_or_else(|| LoadError::MissingField {
                    node: name.to_owned(),
                    field: "locals",
                })?;
                Ok(ParInfo::new(
                    local_name,
                    str_field(local, "type").unwrap_or("int"),
                    local.get("default").map(scalar_text).unwrap_or_default(),
                ))
            })
            .collect::<LoadResult<Vec<_>>>()?;

        let scope = Scope {
            agent_type,
            locals: &locals,
            owner: name.to_owned(),
        };
        let attachments = self.attachments(value, &scope)?;
        let children = self.children(value, &scope)?;
        debug!(name, children = children.len(), "loaded behavior");

        let mut ret = Behavior::new(name, path, agent_type);
        ret.comment = str_field(value, "comment").unwrap_or_default().to_owned();
        ret.fsm = bool_field(value, "fsm");
        ret.initial_state_id = int_field(value, "initial_state");
        ret.locals = locals;
        ret.attachments = attachments;
        ret.children = children;
        Ok(ret)
    }

    fn children(&self, value: &Value, scope: &Scope) -> LoadResult<Vec<Node>> {
        sequence(value, "children")
            .iter()
            .map(|child| self.node(child, scope))
            .collect()
    }

    fn node(&self, value: &Value, parent: &Scope) -> LoadResult<Node> {
        let ty = node_type(value).ok_or_else(|| parent.missing("type"))?;
        let id = int_field(value, "id").ok_or_else(|| LoadError::MissingField {
            node: ty.to_owned(),
            field: "id",
        })?;
        let scope = parent.at(format!("node{}", id));

        let mut node = Node::new(id, self.node_kind(ty, value, &scope)?);
        node.enabled = value.get("enabled").and_then(Value::as_bool).unwrap_or(true);
        node.as_child = value.get("as_child").and_then(Value::as_bool).unwrap_or(true);
        node.fsm = bool_field(value, "fsm");
        node.initial_state_id = int_field(value, "initial_state");
        node.attachments = self.attachments(value, &scope)?;
        node.children = self.children(value, &scope)?;
        Ok(node)
    }

    fn node_kind(&self, ty: &str, v: &Value, scope: &Scope) -> LoadResult<NodeKind> {
        use NodeKind as K;
        let count = || -> LoadResult<DecoratorCount> {
            Ok(DecoratorCount {
                count: self.variable(v, "count", Some("int"), scope)?,
            })
        };

        Ok(match ty {
            "Sequence" => K::Sequence,
            "Selector" => K::Selector,
            "SelectorLoop" => K::SelectorLoop,
            "SelectorProbability" => K::SelectorProbability,
            "SelectorStochastic" => K::SelectorStochastic,
            "SequenceStochastic" => K::SequenceStochastic,
            "IfElse" => K::IfElse,
            "WithPrecondition" => K::WithPrecondition,
            "Parallel" => K::Parallel(Parallel {
                success: enum_field(v, "success"),
                failure: enum_field(v, "failure"),
                exit: enum_field(v, "exit"),
                child_finish: enum_field(v, "child_finish"),
            }),
            "ReferencedBehavior" => K::ReferencedBehavior(ReferencedBehavior {
                reference: self.operand_field(v, "tree", Some(STRING_TYPE), scope)?,
            }),
            "DecoratorAlwaysSuccess" => K::DecoratorAlwaysSuccess,
            "DecoratorAlwaysFailure" => K::DecoratorAlwaysFailure,
            "DecoratorAlwaysRunning" => K::DecoratorAlwaysRunning,
            "DecoratorNot" => K::DecoratorNot,
            "DecoratorLoop" => K::DecoratorLoop(count()?),
            "DecoratorRepeat" => K::DecoratorRepeat(count()?),
            "DecoratorCountLimit" => K::DecoratorCountLimit(count()?),
            "DecoratorFailureUntil" => K::DecoratorFailureUntil(count()?),
            "DecoratorSuccessUntil" => K::DecoratorSuccessUntil(count()?),
            "DecoratorLoopUntil" => K::DecoratorLoopUntil(DecoratorLoopUntil {
                count: count()?.count,
                until: bool_field(v, "until"),
            }),
            "DecoratorFrames" => K::DecoratorFrames(DecoratorFrames {
                frames: self.operand_field(v, "frames", Some("int"), scope)?,
            }),
            "DecoratorLog" => K::DecoratorLog(DecoratorLog {
                message: str_field(v, "message").unwrap_or_default().to_owned(),
            }),
            "DecoratorWeight" => K::DecoratorWeight(DecoratorWeight {
                weight: self.variable(v, "weight", Some("int"), scope)?,
            }),
            "Action" => K::Action(Action {
                method: self.method_field(v, "method", scope)?,
                result_option: str_field(v, "result_option")
                    .map(status)
                    .unwrap_or_default(),
                result_functor: self.method_field(v, "result_functor", scope)?,
            }),
            "Assignment" => {
                let opl = self.variable(v, "opl", None, scope)?;
                let expected = opl.as_ref().map(|opl| opl.native_type().to_owned());
                K::Assignment(Assignment {
                    opr: self.operand_field(v, "opr", expected.as_deref(), scope)?,
                    opl,
                    casting: bool_field(v, "casting"),
                })
            }
            "Compute" => {
                let opl = self.variable(v, "opl", None, scope)?;
                let expected = opl.as_ref().map(|opl| opl.native_type().to_owned());
                let operator = v
                    .get("operator")
                    .cloned()
                    .and_then(|op| serde_yaml::from_value(op).ok())
                    .ok_or_else(|| scope.missing("operator"))?;
                K::Compute(Compute {
                    opr1: self.operand_field(v, "opr1", expected.as_deref(), scope)?,
                    opr2: self.operand_field(v, "opr2", expected.as_deref(), scope)?,
                    opl,
                    operator,
                })
            }
            "Wait" => K::Wait(Wait {
                time: self.operand_field(v, "time", Some("double"), scope)?,
            }),
            "WaitFrames" => K::WaitFrames(WaitFrames {
                frames: self.operand_field(v, "frames", Some("int"), scope)?,
            }),
            "End" => K::End(End {
                status: self.operand_field(v, "status", Some(STATUS_TYPE), scope)?,
                end_outside: bool_field(v, "end_outside"),
            }),
            "Noop" => K::Noop,
            "WaitForSignal" => K::WaitForSignal,
            "Condition" => {
                let (opl, opr) = self.operand_pair(v, "opl", "opr", scope)?;
                K::Condition(Condition {
                    opl,
                    operator: enum_field(v, "operator"),
                    opr,
                })
            }
            "And" => K::And,
            "Or" => K::Or,
            "True" => K::True,
            "False" => K::False,
            other => {
                debug!(kind = other, "no model for node kind, loading it as unknown");
                K::Unknown(other.to_owned())
            }
        })
    }

    fn attachments(&self, value: &Value, scope: &Scope) -> LoadResult<Vec<Attachment>> {
        sequence(value, "attachments")
            .iter()
            .map(|attachment| self.attachment(attachment, scope))
            .collect()
    }

    fn attachment(&self, v: &Value, parent: &Scope) -> LoadResult<Attachment> {
        let ty = str_field(v, "type").ok_or_else(|| parent.missing("type"))?;
        let id = int_field(v, "id").ok_or_else(|| LoadError::MissingField {
            node: ty.to_owned(),
            field: "id",
        })?;
        let scope = parent.at(format!("attach{}", id));

        let kind = match ty {
            "Precondition" => AttachmentKind::Precondition(Precondition {
                phase: enum_field(v, "phase"),
                and: bool_field(v, "and"),
                action: self.attach_action(v, &scope)?,
            }),
            "Effector" => AttachmentKind::Effector(Effector {
                phase: enum_field(v, "phase"),
                action: self.attach_action(v, &scope)?,
            }),
            "Event" => AttachmentKind::Event(Event {
                task: str_field(v, "task").unwrap_or_default().to_owned(),
                triggered_once: bool_field(v, "once"),
                mode: enum_field(v, "mode"),
                tree: str_field(v, "tree").unwrap_or_default().to_owned(),
            }),
            "AttachAction" => AttachmentKind::AttachAction(self.attach_action(v, &scope)?),
            other => AttachmentKind::Unknown(other.to_owned()),
        };

        let mut ret = Attachment::new(id, kind);
        ret.enabled = v.get("enabled").and_then(Value::as_bool).unwrap_or(true);
        ret.is_transition = bool_field(v, "transition");
        Ok(ret)
    }

    fn attach_action(&self, v: &Value, scope: &Scope) -> LoadResult<AttachAction> {
        let (opl, opr2) = self.operand_pair(v, "opl", "opr2", scope)?;
        let expected = opl.as_ref().map(|opl| opl.native_type().to_owned());
        Ok(AttachAction {
            opr1: self.operand_field(v, "opr1", expected.as_deref(), scope)?,
            opl,
            operator: enum_field(v, "operator"),
            opr2,
        })
    }

    /// Two operands of one comparison. A constant takes the type of the other side.
    fn operand_pair(
        &self,
        v: &Value,
        left: &'static str,
        right: &'static str,
        scope: &Scope,
    ) -> LoadResult<(Option<RightValueDef>, Option<RightValueDef>)> {
        let mut opl = self.operand_field(v, left, None, scope)?;
        let expected = opl.as_ref().map(|opl| opl.native_type().to_owned());
        let opr = self.operand_field(v, right, expected.as_deref(), scope)?;
        let retyped = match (&opl, &opr) {
            (Some(l), Some(r)) if l.is_const() && !r.is_const() && !has_explicit_type(v.get(left)) => {
                Some(r.native_type().to_owned())
            }
            _ => None,
        };
        if let Some(native) = retyped {
            opl = self.operand_field(v, left, Some(&native), scope)?;
        }
        Ok((opl, opr))
    }

    fn operand_field(
        &self,
        v: &Value,
        key: &'static str,
        expected: Option<&str>,
        scope: &Scope,
    ) -> LoadResult<Option<RightValueDef>> {
        v.get(key)
            .map(|value| self.operand(value, expected, scope))
            .transpose()
    }

    fn variable(
        &self,
        v: &Value,
        key: &'static str,
        expected: Option<&str>,
        scope: &Scope,
    ) -> LoadResult<Option<VariableDef>> {
        match self.operand_field(v, key, expected, scope)? {
            Some(RightValueDef::Var(var)) => Ok(Some(var)),
            Some(RightValueDef::Method(_)) => Err(LoadError::NotAVariable {
                node: scope.owner.clone(),
                field: key,
            }),
            None => Ok(None),
        }
    }

    fn method_field(
        &self,
        v: &Value,
        key: &'static str,
        scope: &Scope,
    ) -> LoadResult<Option<MethodDef>> {
        match self.operand_field(v, key, None, scope)? {
            Some(RightValueDef::Method(method)) => Ok(Some(method)),
            Some(RightValueDef::Var(_)) => Err(LoadError::NotAMethod {
                node: scope.owner.clone(),
                field: key,
            }),
            None => Ok(None),
        }
    }

    fn operand(
        &self,
        value: &Value,
        expected: Option<&str>,
        scope: &Scope,
    ) -> LoadResult<RightValueDef> {
        match value {
            Value::Mapping(_) => self.mapped_operand(value, expected, scope),
            Value::String(s) => self.named_operand(s, expected, scope),
            Value::Bool(_) | Value::Number(_) => {
                let native = expected.unwrap_or_else(|| inferred_type(value));
                Ok(self.constant(&scalar_text(value), native)?.into())
            }
            _ => Err(scope.missing("operand")),
        }
    }

    /// `{const: 5, type: int}`, `{property: hp}`, `{local: count}` or
    /// `{method: attack, args: [...]}`. Properties and methods take an optional `class` and
    /// `owner` instance.
    fn mapped_operand(
        &self,
        value: &Value,
        expected: Option<&str>,
        scope: &Scope,
    ) -> LoadResult<RightValueDef> {
        let class = str_field(value, "class").unwrap_or(scope.agent_type);
        let owner = str_field(value, "owner");

        if let Some(text) = value.get("const") {
            let native = str_field(value, "type")
                .or(expected)
                .unwrap_or_else(|| inferred_type(text));
            return Ok(self.constant(&scalar_text(text), native)?.into());
        }

        if let Some(name) = str_field(value, "property") {
            let mut property = self
                .catalog
                .property(class, name)
                .cloned()
                .ok_or_else(|| LoadError::UnknownProperty {
                    agent: class.to_owned(),
                    name: name.to_owned(),
                })?;
            if let Some(owner) = owner {
                property = property.owned_by(owner);
            }
            let Some(index) = value.get("index") else {
                return Ok(VariableDef::property(property).into());
            };
            let index = match self.operand(index, Some("int"), scope)? {
                RightValueDef::Var(var) => var,
                RightValueDef::Method(_) => {
                    return Err(LoadError::NotAVariable {
                        node: scope.owner.clone(),
                        field: "index",
                    })
                }
            };
            let element = vector_element(&property.native_type)
                .unwrap_or(property.native_type.as_str())
                .to_owned();
            property.native_type = element;
            return Ok(VariableDef::element(property, index).into());
        }

        if let Some(name) = str_field(value, "local") {
            return Ok(self.local(name, scope)?.into());
        }

        if let Some(name) = str_field(value, "method") {
            let mut method = self.method(class, name, sequence(value, "args"), scope)?;
            if let Some(owner) = owner {
                method = method.owned_by(owner);
            }
            return Ok(method.into());
        }

        Err(scope.missing("operand"))
    }

    /// A bare name: `attack()` calls a method, otherwise a local or a property of the agent.
    /// Anything else is a constant of the expected type.
    fn named_operand(
        &self,
        name: &str,
        expected: Option<&str>,
        scope: &Scope,
    ) -> LoadResult<RightValueDef> {
        if let Some(method) = name.strip_suffix("()") {
            return Ok(self.method(scope.agent_type, method, &[], scope)?.into());
        }
        if scope.locals.iter().any(|local| local.name == name) {
            return Ok(self.local(name, scope)?.into());
        }
        if let Some(property) = self.catalog.property(scope.agent_type, name) {
            return Ok(VariableDef::property(property.clone()).into());
        }
        match expected {
            Some(native) => Ok(self.constant(name, native)?.into()),
            None => Err(LoadError::UnknownProperty {
                agent: scope.agent_type.to_owned(),
                name: name.to_owned(),
            }),
        }
    }

    fn method(
        &self,
        class: &str,
        name: &str,
        args: &[Value],
        scope: &Scope,
    ) -> LoadResult<MethodDef> {
        let mut method = self
            .catalog
            .method(class, name)
            .cloned()
            .ok_or_else(|| LoadError::UnknownMethod {
                agent: class.to_owned(),
                name: name.to_owned(),
            })?;
        for (param, arg) in method.params.iter_mut().zip(args) {
            let value = self.operand(arg, Some(&param.native_type), scope)?;
            param.value = Some(value);
        }
        Ok(method)
    }

    fn local(&self, name: &str, scope: &Scope) -> LoadResult<VariableDef> {
        scope
            .locals
            .iter()
            .find(|local| local.name == name)
            .map(|local| VariableDef::property(local.to_property()))
            .ok_or_else(|| LoadError::UnknownProperty {
                agent: scope.agent_type.to_owned(),
                name: name.to_owned(),
            })
    }

    fn constant(&self, text: &str, native: &str) -> LoadResult<VariableDef> {
        self.catalog
            .parse_value(text, native)
            .map(|value| VariableDef::constant(native, value))
            .ok_or_else(|| LoadError::MalformedLiteral {
                text: text.to_owned(),
                native_type: native.to_owned(),
            })
    }
}

fn str_field<'v>(value: &'v Value, key: &str) -> Option<&'v str> {
    value.get(key).and_then(Value::as_str)
}

/// An unquoted `True` or `False` kind reads as a YAML boolean.
fn node_type(value: &Value) -> Option<&str> {
    match value.get("type")? {
        Value::Bool(true) => Some("True"),
        Value::Bool(false) => Some("False"),
        ty => ty.as_str(),
    }
}

fn bool_field(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn int_field(value: &Value, key: &str) -> Option<i32> {
    value
        .get(key)
        .and_then(Value::as_i64)
        .and_then(|i| i32::try_from(i).ok())
}

/// A policy or phase enum. Missing or unrecognized values give the default.
fn enum_field<T: DeserializeOwned + Default>(value: &Value, key: &str) -> T {
    value
        .get(key)
        .cloned()
        .and_then(|v| serde_yaml::from_value(v).ok())
        .unwrap_or_default()
}

fn sequence<'v>(value: &'v Value, key: &str) -> &'v [Value] {
    match value.get(key) {
        Some(Value::Sequence(items)) => items.as_slice(),
        _ => &[],
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn inferred_type(value: &Value) -> &'static str {
    match value {
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_i64() || n.is_u64() => "int",
        Value::Number(_) => "float",
        _ => STRING_TYPE,
    }
}

fn has_explicit_type(value: Option<&Value>) -> bool {
    value.map_or(false, |v| v.get("type").is_some())
}

/// `Success` or a status member such as `BT_SUCCESS`.
fn status(text: &str) -> Status {
    serde_yaml::from_value(Value::String(text.to_owned()))
        .unwrap_or_else(|_| Status::from_member(text))
}

#[cfg(test)]
mod test;
