//! Turns value expressions into Go code.
//!
//! Every emission is an [`Emission`]: statements to run before the expression is evaluated,
//! the expression itself, and statements to run after it. The `post` part carries the
//! write-back of by-reference arguments, which Go can only express through a temporary.
//!
//! Constant arguments of method calls and aggregate constant operands are captured as
//! fields of the declared node class.
//! They are collected in [`Captures`] and initialised once in the class constructor.

use crate::{
    catalog::{MethodDef, Owner, Param, PropertyDef, ValueType, AGENT_BASE},
    context::ExportContext,
    model::{RightValueDef, Status, Value, VariableDef},
    types::{enum_member, quote},
};

/// Receiver name of generated methods and constructors.
pub const SELF: &str = "n";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Emission {
    pub pre: Vec<String>,
    pub expr: String,
    pub post: Vec<String>,
}

impl Emission {
    pub fn inline(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            ..Self::default()
        }
    }

    /// The expression as a standalone statement, surrounded by its pre and post statements.
    pub fn statement(self) -> Vec<String> {
        let mut ret = self.pre;
        ret.push(self.expr);
        ret.extend(self.post);
        ret
    }

    /// Statements that must precede any use of the value, and the expression that names it.
    /// A call with write-backs is bound to `slot` first, so the write-backs happen before
    /// the value is used.
    pub fn bind(self, slot: &str) -> (Vec<String>, String) {
        if self.post.is_empty() {
            return (self.pre, self.expr);
        }
        let mut lines = self.pre;
        lines.push(format!("{} := {}", slot, self.expr));
        lines.extend(self.post);
        (lines, slot.to_owned())
    }
}

/// Fields and constructor statements of a declared class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures {
    /// Field name and Go type
    pub fields: Vec<(String, String)>,
    /// Constructor statements, in terms of the receiver [`SELF`]
    pub init: Vec<String>,
}

impl Captures {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.init.is_empty()
    }

    pub fn extend(&mut self, other: Captures) {
        self.fields.extend(other.fields);
        self.init.extend(other.init);
    }
}

pub struct Emitter<'c, 'a> {
    ctx: &'c ExportContext<'a>,
    pub captures: Captures,
}

impl<'c, 'a> Emitter<'c, 'a> {
    pub fn new(ctx: &'c ExportContext<'a>) -> Self {
        Self {
            ctx,
            captures: Captures::default(),
        }
    }

    pub fn ctx(&self) -> &'c ExportContext<'a> {
        self.ctx
    }

    pub fn into_captures(self) -> Captures {
        self.captures
    }

    pub fn right_value(&mut self, value: &RightValueDef, slot: &str) -> Emission {
        match value {
            RightValueDef::Method(method) => self.method_call(method, slot),
            RightValueDef::Var(var) => self.variable(var, slot),
        }
    }

    /// Reads a variable.
    pub fn variable(&mut self, var: &VariableDef, slot: &str) -> Emission {
        match var {
            VariableDef::Const { native_type, value } => self.constant(native_type, value, slot),
            VariableDef::Property { property, index } => {
                self.read_property(property, index.as_deref(), slot)
            }
        }
    }

    /// Statements storing `value` into `var`. Constants cannot be written and yield nothing.
    pub fn assign(&mut self, var: &VariableDef, value: &str, slot: &str) -> Vec<String> {
        let VariableDef::Property { property, index } = var else {
            return vec![];
        };
        let (mut lines, owner) = self.owner(property, slot);
        let index = index.as_deref().map(|index| {
            let index_slot = format!("{}Index", slot);
            let (pre, expr) = self.variable(index, &index_slot).bind(&index_slot);
            lines.extend(pre);
            expr
        });

        if property.is_late_bound() {
            let (getter, setter) = store_accessors(property);
            lines.push(self.check_id(property));
            match index {
                Some(index) => lines.push(format!(
                    "{}.{}({}, {}).([]{})[{}] = {}",
                    owner,
                    getter,
                    quote(property.basic_name()),
                    property.variable_id(),
                    self.ctx.go_type(&property.native_type),
                    index,
                    value
                )),
                None => lines.push(format!(
                    "{}.{}({}, {}, {})",
                    owner,
                    setter,
                    quote(property.basic_name()),
                    property.variable_id(),
                    value
                )),
            }
        } else {
            lines.push(format!(
                "{}{} = {}",
                self.member_access(property, &owner),
                index.map(|i| format!("[{}]", i)).unwrap_or_default(),
                value
            ));
        }
        lines
    }

    /// A call expression. By-reference arguments go through temporaries named `{slot}P{i}`
    /// that `post` writes back.
    pub fn method_call(&mut self, method: &MethodDef, slot: &str) -> Emission {
        let mut ret = Emission::default();
        let receiver = match &method.owner {
            Owner::SelfAgent => self.ctx.agent_receiver(&method.class_name),
            Owner::Instance(instance) => {
                let (pre, owner) = self.instance(instance, &method.class_name, slot);
                ret.pre.extend(pre);
                owner
            }
        };

        let mut args = vec![];
        for (i, param) in method.params.iter().enumerate() {
            let name = format!("{}P{}", slot, i);
            args.push(self.argument(param, &name, &mut ret));
        }

        ret.expr = format!(
            "{}.{}({})",
            receiver,
            self.ctx.member_name(&method.name),
            args.join(", ")
        );
        ret
    }

    fn argument(&mut self, param: &Param, name: &str, call: &mut Emission) -> String {
        let Some(value) = &param.value else {
            return self
                .ctx
                .default_literal(&param.native_type, None)
                .unwrap_or_else(|| "nil".to_owned());
        };

        match value {
            RightValueDef::Var(VariableDef::Const { native_type, value }) => {
                let field = self.capture(native_type, value, name);
                if param.is_by_ref() {
                    call.pre.push(format!("{} := {}", name, field));
                    format!("&{}", name)
                } else {
                    field
                }
            }
            RightValueDef::Var(var) => {
                let e = self.variable(var, name);
                call.pre.extend(e.pre);
                if param.is_by_ref() {
                    call.pre.push(format!("{} := {}", name, e.expr));
                    let writable = var.as_property().map_or(false, |p| !p.is_readonly);
                    if writable {
                        let writeback = self.assign(var, name, &format!("{}Out", name));
                        call.post.extend(writeback);
                    }
                    format!("&{}", name)
                } else {
                    e.expr
                }
            }
            RightValueDef::Method(nested) => {
                let e = self.method_call(nested, name);
                if param.is_by_ref() || !e.post.is_empty() {
                    call.pre.extend(e.pre);
                    call.pre.push(format!("{} := {}", name, e.expr));
                    call.pre.extend(e.post);
                    if param.is_by_ref() {
                        format!("&{}", name)
                    } else {
                        name.to_owned()
                    }
                } else {
                    call.pre.extend(e.pre);
                    e.expr
                }
            }
        }
    }

    /// Captures a constant as a field of the declared class and returns the field access.
    pub fn capture(&mut self, native_type: &str, value: &Value, field: &str) -> String {
        let target = format!("{}.{}", SELF, field);
        let ty = self.ctx.classify(native_type);
        let go_type = self.ctx.go_type(native_type);
        let field_type = match ty {
            ValueType::Struct { is_ref: true, .. } => format!("*{}", go_type),
            _ => go_type,
        };
        self.captures.fields.push((field.to_owned(), field_type));

        let mut init = vec![];
        match value {
            Value::Array(items) if items.is_empty() => (),
            Value::Array(items) => init.push(format!(
                "{} = {}",
                target,
                self.slice_literal(native_type, items)
            )),
            Value::Struct(fields) => {
                if matches!(ty, ValueType::Struct { is_ref: true, .. }) {
                    init.push(format!("{} = new({})", target, self.ctx.go_type(native_type)));
                }
                self.field_assignments(&target, native_type, fields, &mut init);
            }
            value => {
                if let Some(literal) = self.scalar(native_type, value) {
                    init.push(format!("{} = {}", target, literal));
                }
            }
        }
        self.captures.init.extend(init);
        target
    }

    /// A constant operand. Slices and structs are captured into the field `slot`.
    pub fn constant(&mut self, native_type: &str, value: &Value, slot: &str) -> Emission {
        match value {
            Value::Array(items) if items.is_empty() => Emission::inline("nil"),
            Value::Array(_) | Value::Struct(_) => {
                Emission::inline(self.capture(native_type, value, slot))
            }
            value => Emission::inline(
                self.scalar(native_type, value)
                    .unwrap_or_else(|| "nil".to_owned()),
            ),
        }
    }

    /// Go literal of a scalar constant.
    pub fn scalar(&self, native_type: &str, value: &Value) -> Option<String> {
        Some(match value {
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Char(c) => format!("'{}'", c.chars().next().unwrap_or('A')),
            Value::String(s) => quote(s),
            Value::Enum(member) => match self.ctx.classify(native_type) {
                ValueType::Status => {
                    self.ctx.use_package("bt");
                    Status::from_member(member).go_constant().to_owned()
                }
                _ => enum_member(&self.ctx.go_type(native_type), member),
            },
            Value::Array(_) | Value::Struct(_) => return None,
        })
    }

    fn slice_literal(&self, native_type: &str, items: &[Value]) -> String {
        let slice_type = self.ctx.go_type(native_type);
        let element = element_native(native_type);
        let items = items
            .iter()
            .filter_map(|item| self.scalar(element, item))
            .collect::<Vec<_>>();
        format!("{}{{{}}}", slice_type, items.join(", "))
    }

    fn field_assignments(
        &self,
        target: &str,
        native_type: &str,
        fields: &[(String, Value)],
        out: &mut Vec<String>,
    ) {
        let st = self
            .ctx
            .catalog
            .struct_type(native_type.trim_end_matches(['*', '&']).trim());
        for (field, value) in fields {
            let field_native = st
                .and_then(|st| st.properties.iter().find(|p| p.basic_name() == field))
                .map(|p| p.native_type.as_str())
                .unwrap_or("");
            let path = format!("{}.{}", target, self.ctx.member_name(field));
            match value {
                Value::Struct(nested) => self.field_assignments(&path, field_native, nested, out),
                Value::Array(items) if items.is_empty() => (),
                Value::Array(items) => out.push(format!(
                    "{} = {}",
                    path,
                    self.slice_literal(field_native, items)
                )),
                value => {
                    if let Some(literal) = self.scalar(field_native, value) {
                        out.push(format!("{} = {}", path, literal));
                    }
                }
            }
        }
    }

    fn read_property(
        &mut self,
        property: &PropertyDef,
        index: Option<&VariableDef>,
        slot: &str,
    ) -> Emission {
        let (mut pre, owner) = self.owner(property, slot);
        let index = index.map(|index| {
            let index_slot = format!("{}Index", slot);
            let (lines, expr) = self.variable(index, &index_slot).bind(&index_slot);
            pre.extend(lines);
            expr
        });
        let suffix = index.map(|i| format!("[{}]", i)).unwrap_or_default();

        let expr = if property.is_late_bound() {
            let (getter, _) = store_accessors(property);
            pre.push(self.check_id(property));
            let go_type = self.ctx.go_type(&property.native_type);
            let asserted = if property.is_array_element {
                format!("[]{}", go_type)
            } else {
                go_type
            };
            format!(
                "{}.{}({}, {}).({}){}",
                owner,
                getter,
                quote(property.basic_name()),
                property.variable_id(),
                asserted,
                suffix
            )
        } else {
            format!("{}{}", self.member_access(property, &owner), suffix)
        };

        Emission {
            pre,
            expr,
            post: vec![],
        }
    }

    /// Statements resolving the agent a property lives on, and the expression naming it.
    fn owner(&self, property: &PropertyDef, slot: &str) -> (Vec<String>, String) {
        match &property.owner {
            Owner::SelfAgent if property.is_late_bound() => (vec![], "agent".to_owned()),
            Owner::SelfAgent => (vec![], self.ctx.agent_receiver(&property.class_name)),
            Owner::Instance(instance) => {
                let class = if property.is_late_bound() {
                    AGENT_BASE
                } else {
                    &property.class_name
                };
                self.instance(instance, class, slot)
            }
        }
    }

    /// Resolves another agent instance into `pAgent_{slot}`.
    fn instance(&self, instance: &str, class_name: &str, slot: &str) -> (Vec<String>, String) {
        let var = format!("pAgent_{}", slot);
        if self.ctx.catalog.is_instance(instance) {
            self.ctx.use_package("bt");
            let lines = vec![format!(
                "{} := bt.GetParentAgent(agent, {})",
                var,
                quote(instance)
            )];
            let owner = if class_name.is_empty() || class_name == AGENT_BASE {
                var
            } else {
                format!("{}.(*{})", var, self.ctx.class_path(class_name))
            };
            (lines, owner)
        } else {
            let lines = vec![format!(
                "{} := {}.{}",
                var,
                self.ctx.agent_receiver(&self.ctx.agent_type),
                self.ctx.member_name(instance)
            )];
            (lines, var)
        }
    }

    fn member_access(&self, property: &PropertyDef, owner: &str) -> String {
        let name = self.ctx.member_name(property.basic_name());
        if property.is_static {
            format!("{}{}", self.ctx.class_path(&property.class_name), name)
        } else {
            format!("{}.{}", owner, name)
        }
    }

    fn check_id(&self, property: &PropertyDef) -> String {
        self.ctx.use_package("bt");
        format!(
            "bt.CheckVariableId({}, {})",
            quote(property.basic_name()),
            property.variable_id()
        )
    }
}

fn store_accessors(property: &PropertyDef) -> (&'static str, &'static str) {
    if property.is_par {
        ("GetLocal", "SetLocal")
    } else {
        ("GetVariable", "SetVariable")
    }
}

/// `T` of a `vector<T>` spelling, or the spelling itself.
fn element_native(native: &str) -> &str {
    match (native.find('<'), native.rfind('>')) {
        (Some(open), Some(close)) if open < close => native[open + 1..close].trim(),
        _ => native,
    }
}
