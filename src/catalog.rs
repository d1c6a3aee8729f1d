//! The type catalog: agent schemas with their properties and methods, plus the enums and
//! structs they refer to.

use serde::Deserialize;

use crate::{
    hash::make_variable_id,
    model::{RightValueDef, Value},
    parser::{literal, native_type, RawLiteral, TypeSpelling},
};

/// The implicit base of every agent type.
pub const AGENT_BASE: &str = "behaviac::Agent";

/// Last segment of a `::` separated name.
pub fn basic_name(name: &str) -> &str {
    name.rsplit("::").next().unwrap_or(name)
}

/// Everything before the last `::`, or an empty string.
pub fn namespace(name: &str) -> &str {
    name.rsplit_once("::").map(|(ns, _)| ns).unwrap_or("")
}

/// Which agent a property or method is looked up on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Owner {
    /// The agent running the tree
    #[default]
    SelfAgent,
    /// Another agent, named by a global instance or a member of the running agent
    Instance(String),
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct PropertyDef {
    pub name: String,
    #[serde(rename = "type")]
    pub native_type: String,
    #[serde(skip)]
    pub class_name: String,
    #[serde(skip)]
    pub owner: Owner,
    #[serde(skip)]
    pub is_array_element: bool,
    #[serde(skip)]
    pub is_par: bool,
    #[serde(rename = "customized")]
    pub is_customized: bool,
    #[serde(rename = "readonly")]
    pub is_readonly: bool,
    #[serde(rename = "static")]
    pub is_static: bool,
    #[serde(rename = "inherited")]
    pub is_inherited: bool,
    #[serde(rename = "default")]
    pub default_value: Option<String>,
    pub description: String,
}

impl PropertyDef {
    /// A compiled member of an agent class.
    pub fn member(
        class_name: impl Into<String>,
        name: impl Into<String>,
        native_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            native_type: native_type.into(),
            class_name: class_name.into(),
            ..Self::default()
        }
    }

    /// A tree-local variable.
    pub fn local(name: impl Into<String>, native_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            native_type: native_type.into(),
            is_par: true,
            ..Self::default()
        }
    }

    pub fn customized(mut self) -> Self {
        self.is_customized = true;
        self
    }

    pub fn readonly(mut self) -> Self {
        self.is_readonly = true;
        self
    }

    pub fn owned_by(mut self, instance: impl Into<String>) -> Self {
        self.owner = Owner::Instance(instance.into());
        self
    }

    /// The name without the `[]` suffix array elements carry.
    pub fn basic_name(&self) -> &str {
        self.name.trim_end_matches("[]")
    }

    /// Id the runtime uses to look the variable up by name.
    pub fn variable_id(&self) -> u32 {
        make_variable_id(self.basic_name())
    }

    /// Whether the property lives in a name-keyed store rather than a compiled field.
    pub fn is_late_bound(&self) -> bool {
        self.is_par || self.is_customized
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub native_type: String,
    #[serde(rename = "ref")]
    pub is_ref: bool,
    #[serde(rename = "out")]
    pub is_out: bool,
    pub description: String,
    /// Argument bound at a call site
    #[serde(skip)]
    pub value: Option<RightValueDef>,
}

impl Param {
    pub fn new(name: impl Into<String>, native_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            native_type: native_type.into(),
            ..Self::default()
        }
    }

    pub fn by_ref(mut self) -> Self {
        self.is_ref = true;
        self
    }

    pub fn with_value(mut self, value: impl Into<RightValueDef>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn is_by_ref(&self) -> bool {
        self.is_ref || self.is_out
    }

    fn bound_property(&self) -> Option<&PropertyDef> {
        match &self.value {
            Some(RightValueDef::Var(var)) => var.as_property(),
            _ => None,
        }
    }

    /// Bound to an agent property.
    pub fn is_property(&self) -> bool {
        self.bound_property().map_or(false, |p| !p.is_par)
    }

    /// Bound to a tree-local variable.
    pub fn is_local_var(&self) -> bool {
        self.bound_property().map_or(false, |p| p.is_par)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MethodDef {
    pub name: String,
    #[serde(skip)]
    pub class_name: String,
    #[serde(skip)]
    pub owner: Owner,
    #[serde(rename = "return")]
    pub return_type: String,
    pub params: Vec<Param>,
    pub description: String,
    #[serde(rename = "inherited")]
    pub is_inherited: bool,
}

impl Default for MethodDef {
    fn default() -> Self {
        Self {
            name: String::new(),
            class_name: String::new(),
            owner: Owner::SelfAgent,
            return_type: "void".to_owned(),
            params: vec![],
            description: String::new(),
            is_inherited: false,
        }
    }
}

impl MethodDef {
    pub fn new(
        class_name: impl Into<String>,
        name: impl Into<String>,
        return_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            class_name: class_name.into(),
            return_type: return_type.into(),
            ..Self::default()
        }
    }

    pub fn with_param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn owned_by(mut self, instance: impl Into<String>) -> Self {
        self.owner = Owner::Instance(instance.into());
        self
    }
}

/// A tree-local variable declaration.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ParInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub native_type: String,
    #[serde(rename = "default")]
    pub default_value: String,
}

impl ParInfo {
    pub fn new(
        name: impl Into<String>,
        native_type: impl Into<String>,
        default_value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            native_type: native_type.into(),
            default_value: default_value.into(),
        }
    }

    pub fn to_property(&self) -> PropertyDef {
        PropertyDef::local(self.name.clone(), self.native_type.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AgentType {
    pub name: String,
    pub base: String,
    #[serde(rename = "implemented")]
    pub is_implemented: bool,
    /// Folder under the types directory the skeleton goes to, instead of its namespace.
    pub export_location: Option<String>,
    pub description: String,
    pub properties: Vec<PropertyDef>,
    pub methods: Vec<MethodDef>,
}

impl Default for AgentType {
    fn default() -> Self {
        Self {
            name: String::new(),
            base: AGENT_BASE.to_owned(),
            is_implemented: false,
            export_location: None,
            description: String::new(),
            properties: vec![],
            methods: vec![],
        }
    }
}

impl AgentType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_property(mut self, mut property: PropertyDef) -> Self {
        property.class_name = self.name.clone();
        self.properties.push(property);
        self
    }

    pub fn with_method(mut self, mut method: MethodDef) -> Self {
        method.class_name = self.name.clone();
        self.methods.push(method);
        self
    }

    pub fn basic_name(&self) -> &str {
        basic_name(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
    #[serde(rename = "display")]
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct EnumType {
    pub name: String,
    pub description: String,
    #[serde(rename = "implemented")]
    pub is_implemented: bool,
    pub export_location: Option<String>,
    pub members: Vec<EnumMember>,
}

impl EnumType {
    pub fn basic_name(&self) -> &str {
        basic_name(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct StructType {
    pub name: String,
    pub base: Option<String>,
    pub is_ref: bool,
    #[serde(rename = "implemented")]
    pub is_implemented: bool,
    pub export_location: Option<String>,
    pub description: String,
    pub properties: Vec<PropertyDef>,
}

impl StructType {
    pub fn basic_name(&self) -> &str {
        basic_name(&self.name)
    }
}

/// What a native type spelling denotes once resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    Void,
    Bool,
    Char,
    Integer,
    Float,
    Double,
    String,
    /// The runtime's execution status enum
    Status,
    Enum(String),
    Struct { name: String, is_ref: bool },
    Agent(String),
    Array(Box<ValueType>),
    Unknown(String),
}

const STRING_NAMES: &[&str] = &[
    "string",
    "wstring",
    "std::string",
    "std::wstring",
    "behaviac::string",
    "behaviac::wstring",
    "szstring",
    "cszstring",
];

const INTEGER_NAMES: &[&str] = &[
    "int", "short", "long", "long long", "long int", "short int", "byte", "sbyte", "ubyte",
    "int8", "int16", "int32", "int64", "uint8", "uint16", "uint32", "uint64", "uint", "ushort",
    "ulong", "llong", "ullong", "size_t", "int8_t", "int16_t", "int32_t", "int64_t", "uint8_t",
    "uint16_t", "uint32_t", "uint64_t",
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TypeCatalog {
    pub agents: Vec<AgentType>,
    pub enums: Vec<EnumType>,
    pub structs: Vec<StructType>,
    /// Globally registered agent instances
    pub instances: Vec<String>,
    /// Names of the trees that exist, for resolving subtree references
    pub behaviors: Vec<String>,
}

impl TypeCatalog {
    /// Fills in the owning class of every property and method. Needed after deserializing.
    pub fn link(&mut self) {
        for agent in &mut self.agents {
            for property in &mut agent.properties {
                property.class_name = agent.name.clone();
            }
            for method in &mut agent.methods {
                method.class_name = agent.name.clone();
            }
        }
        for st in &mut self.structs {
            for property in &mut st.properties {
                property.class_name = st.name.clone();
            }
        }
    }

    pub fn agent(&self, name: &str) -> Option<&AgentType> {
        self.agents
            .iter()
            .find(|a| a.name == name)
            .or_else(|| self.agents.iter().find(|a| a.basic_name() == basic_name(name)))
    }

    pub fn enum_type(&self, name: &str) -> Option<&EnumType> {
        self.enums
            .iter()
            .find(|e| e.name == name)
            .or_else(|| self.enums.iter().find(|e| e.basic_name() == basic_name(name)))
    }

    pub fn struct_type(&self, name: &str) -> Option<&StructType> {
        self.structs
            .iter()
            .find(|s| s.name == name)
            .or_else(|| self.structs.iter().find(|s| s.basic_name() == basic_name(name)))
    }

    /// Looks a property up on an agent type and then along its bases.
    pub fn property(&self, class_name: &str, name: &str) -> Option<&PropertyDef> {
        let mut class = self.agent(class_name);
        let mut depth = 0;
        while let Some(agent) = class {
            if let Some(p) = agent.properties.iter().find(|p| p.basic_name() == name) {
                return Some(p);
            }
            depth += 1;
            if depth > self.agents.len() {
                break;
            }
            class = self.agent(&agent.base);
        }
        None
    }

    pub fn method(&self, class_name: &str, name: &str) -> Option<&MethodDef> {
        let mut class = self.agent(class_name);
        let mut depth = 0;
        while let Some(agent) = class {
            if let Some(m) = agent.methods.iter().find(|m| m.name == name) {
                return Some(m);
            }
            depth += 1;
            if depth > self.agents.len() {
                break;
            }
            class = self.agent(&agent.base);
        }
        None
    }

    pub fn is_instance(&self, name: &str) -> bool {
        self.instances.iter().any(|i| i == name)
    }

    /// Whether a subtree reference can be resolved. With no known trees every name resolves.
    pub fn knows_behavior(&self, name: &str) -> bool {
        self.behaviors.is_empty() || self.behaviors.iter().any(|b| b == name)
    }

    /// Resolves a native type spelling. Spellings that do not parse are `Unknown`.
    pub fn classify(&self, native: &str) -> ValueType {
        match native_type(native) {
            Ok((rest, spelling)) if rest.trim().is_empty() => self.classify_spelling(&spelling),
            _ => ValueType::Unknown(native.trim().to_owned()),
        }
    }

    fn classify_spelling(&self, spelling: &TypeSpelling) -> ValueType {
        let name = spelling.name.as_str();
        if let Some(element) = spelling.args.first() {
            if basic_name(name) == "vector" {
                return ValueType::Array(Box::new(self.classify_spelling(element)));
            }
        }
        if name.is_empty() && spelling.sign.is_some() {
            return ValueType::Integer;
        }
        match name {
            "void" => return ValueType::Void,
            "bool" => return ValueType::Bool,
            "char" | "wchar_t" if spelling.pointer > 0 => return ValueType::String,
            "char" if spelling.sign.is_some() => return ValueType::Integer,
            "char" | "wchar_t" => return ValueType::Char,
            "float" => return ValueType::Float,
            "double" => return ValueType::Double,
            "EBTStatus" | "behaviac::EBTStatus" => return ValueType::Status,
            "Agent" | AGENT_BASE => return ValueType::Agent(name.to_owned()),
            _ => (),
        }
        if STRING_NAMES.contains(&name) {
            return ValueType::String;
        }
        if INTEGER_NAMES.contains(&name) {
            return ValueType::Integer;
        }
        if self.enum_type(name).is_some() {
            ValueType::Enum(name.to_owned())
        } else if let Some(st) = self.struct_type(name) {
            ValueType::Struct {
                name: name.to_owned(),
                is_ref: st.is_ref || spelling.pointer > 0,
            }
        } else if self.agent(name).is_some() {
            ValueType::Agent(name.to_owned())
        } else {
            ValueType::Unknown(name.to_owned())
        }
    }

    /// Interprets an encoded literal (`3:1|2|3`, `{x=1;y=2;}`, `12`) as a value of `native`.
    pub fn parse_value(&self, text: &str, native: &str) -> Option<Value> {
        let ty = self.classify(native);
        let raw = match ty {
            ValueType::Array(_) | ValueType::Struct { .. } | ValueType::Unknown(_) => {
                match literal(text) {
                    Ok((_, raw)) => raw,
                    Err(_) => RawLiteral::Scalar(text.trim().to_owned()),
                }
            }
            _ => RawLiteral::Scalar(text.trim().to_owned()),
        };
        self.value_of(&raw, &ty)
    }

    fn value_of(&self, raw: &RawLiteral, ty: &ValueType) -> Option<Value> {
        match (ty, raw) {
            (ValueType::Array(element), RawLiteral::Array(items)) => Some(Value::Array(
                items
                    .iter()
                    .filter_map(|item| self.value_of(item, element))
                    .collect(),
            )),
            (ValueType::Array(_), RawLiteral::Scalar(s)) if s.is_empty() => {
                Some(Value::Array(vec![]))
            }
            (ValueType::Struct { name, .. }, RawLiteral::Struct(fields)) => {
                let st = self.struct_type(name);
                Some(Value::Struct(
                    fields
                        .iter()
                        .filter_map(|(field, raw)| {
                            let field_ty = st
                                .and_then(|st| {
                                    st.properties.iter().find(|p| p.basic_name() == field)
                                })
                                .map(|p| self.classify(&p.native_type))
                                .unwrap_or_else(|| ValueType::Unknown(String::new()));
                            Some((field.clone(), self.value_of(raw, &field_ty)?))
                        })
                        .collect(),
                ))
            }
            (_, RawLiteral::Scalar(s)) => scalar_value(s, ty),
            _ => None,
        }
    }
}

fn scalar_value(text: &str, ty: &ValueType) -> Option<Value> {
    let text = text.trim();
    match ty {
        ValueType::Bool => match text.to_ascii_lowercase().as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        ValueType::Integer => text.parse().ok().map(Value::Int),
        ValueType::Float | ValueType::Double => text
            .trim_end_matches(|c| c == 'f' || c == 'F')
            .parse()
            .ok()
            .map(Value::Float),
        ValueType::Char => Some(Value::Char(text.trim_matches('\'').to_owned())),
        ValueType::String => Some(Value::String(text.trim_matches('"').to_owned())),
        ValueType::Status | ValueType::Enum(_) => Some(Value::Enum(basic_name(text).to_owned())),
        ValueType::Void | ValueType::Agent(_) | ValueType::Array(_) | ValueType::Struct { .. } => {
            None
        }
        ValueType::Unknown(_) => Some(if let Ok(i) = text.parse() {
            Value::Int(i)
        } else if let Ok(f) = text.parse() {
            Value::Float(f)
        } else if let Ok(b) = text.parse() {
            Value::Bool(b)
        } else {
            Value::String(text.trim_matches('"').to_owned())
        }),
    }
}
