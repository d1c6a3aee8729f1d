//! Mapping of native type spellings to Go type names and default values.
//!
//! Both passes are ordered literal substring replacements. Spellings nothing matches pass
//! through unchanged.

use crate::{
    catalog::ValueType,
    config::TypeRename,
    model::Status,
    parser::{literal, RawLiteral},
};

const EXPORT_REPLACEMENTS: &[(&str, &str)] = &[
    ("unsigned long long", "ullong"),
    ("signed long long", "llong"),
    ("long long", "llong"),
    ("unsigned ", "u"),
    ("signed ", ""),
    ("const ", ""),
    ("behaviac::wstring", "string"),
    ("behaviac::string", "string"),
    ("std::string", "string"),
    ("cszstring", "string"),
    ("szstring", "string"),
    ("char*", "string"),
    ("ubyte", "byte"),
];

const GENERATED_REPLACEMENTS: &[(&str, &str)] = &[
    ("::", "."),
    ("*", ""),
    ("&", ""),
    ("ullong", "ulong"),
    ("llong", "long"),
    ("long", "int64"),
    ("char", "byte"),
    ("sbyte", "byte"),
    ("ubyte", "byte"),
    ("float", "float32"),
    ("double", "float64"),
    ("short", "int16"),
    ("behaviac.EBTStatus", "bt.Status"),
    ("EBTStatus", "bt.Status"),
    ("behaviac.Agent", "bt.Agent"),
];

const VECTOR_PREFIXES: &[&str] = &["vector<", "std.vector<", "behaviac.vector<"];

/// Normalizes a C-family spelling: qualifiers stripped, string spellings collapsed to
/// `string` and long-long variants to `llong`/`ullong`.
pub fn export_native_type(name: &str) -> String {
    EXPORT_REPLACEMENTS
        .iter()
        .fold(name.to_owned(), |acc, (from, to)| acc.replace(from, to))
        .trim()
        .to_owned()
}

/// Converts `snake_case` or `camelCase` into an exported Go identifier.
pub fn pascal_case(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Double-quoted Go string literal.
pub fn quote(s: &str) -> String {
    let mut ret = String::with_capacity(s.len() + 2);
    ret.push('"');
    for c in s.chars() {
        match c {
            '"' => ret.push_str("\\\""),
            '\\' => ret.push_str("\\\\"),
            '\n' => ret.push_str("\\n"),
            '\r' => ret.push_str("\\r"),
            '\t' => ret.push_str("\\t"),
            c => ret.push(c),
        }
    }
    ret.push('"');
    ret
}

/// Go spelling of an enum member, selected from its type: `game.Color.Red`.
pub fn enum_member(type_name: &str, member: &str) -> String {
    format!("{}.{}", type_name, member)
}

/// `T` of a `vector<T>` spelling.
pub(crate) fn vector_element(native: &str) -> Option<&str> {
    let open = native.find('<')?;
    let close = native.rfind('>')?;
    (open < close).then(|| native[open + 1..close].trim())
}

#[derive(Debug, Clone, Default)]
pub struct TypeMapper {
    renames: Vec<TypeRename>,
}

impl TypeMapper {
    pub fn new(renames: Vec<TypeRename>) -> Self {
        Self { renames }
    }

    /// Go spelling of a native type.
    pub fn generated_native_type(&self, name: &str) -> String {
        let name = export_native_type(name);
        let mut name = GENERATED_REPLACEMENTS
            .iter()
            .fold(name, |acc, (from, to)| acc.replace(from, to))
            .trim()
            .to_owned();

        if let Some(prefix) = VECTOR_PREFIXES.iter().find(|p| name.starts_with(*p)) {
            name = format!("[]{}", &name[prefix.len()..]).replace('>', "");
        }

        // Only the first matching rename applies
        match self.renames.iter().find(|r| name.contains(&r.from)) {
            Some(rename) => name.replace(&rename.from, &rename.to),
            None => name,
        }
    }

    /// Go literal for the value of a type, or `None` for `void`.
    pub fn default_value_literal(
        &self,
        ty: &ValueType,
        native_type: &str,
        literal: Option<&str>,
    ) -> Option<String> {
        let type_name = self.generated_native_type(native_type);
        self.literal_for(ty, &type_name, literal)
    }

    /// Like [`Self::default_value_literal`] with the Go type name already resolved.
    pub fn literal_for(
        &self,
        ty: &ValueType,
        type_name: &str,
        literal: Option<&str>,
    ) -> Option<String> {
        let literal = literal.map(str::trim).filter(|s| !s.is_empty());
        let ret = match ty {
            ValueType::Void => return None,
            ValueType::Char => "0".to_owned(),
            ValueType::Bool => literal.unwrap_or("false").to_ascii_lowercase(),
            ValueType::Integer => literal.unwrap_or("0").to_owned(),
            ValueType::Float => {
                let value = literal.unwrap_or("0");
                value.strip_suffix('f').unwrap_or(value).to_owned()
            }
            ValueType::Double => literal.unwrap_or("0").to_owned(),
            ValueType::String => quote(literal.unwrap_or("").trim_matches('"')),
            ValueType::Status => Status::from_member(literal.unwrap_or(""))
                .go_constant()
                .to_owned(),
            ValueType::Enum(_) => match literal {
                Some(member) => enum_member(type_name, crate::catalog::basic_name(member)),
                None => format!("{}(0)", type_name),
            },
            ValueType::Array(_) => "nil".to_owned(),
            ValueType::Struct { is_ref: true, .. } | ValueType::Agent(_) => "nil".to_owned(),
            ValueType::Struct { .. } => format!("new({})", type_name),
            ValueType::Unknown(_) => literal.unwrap_or("nil").to_owned(),
        };
        Some(ret)
    }

    /// Like [`Self::default_value_literal`], but decodes array defaults (`3:1|2|3`) into a
    /// slice literal.
    pub fn property_default_literal(
        &self,
        ty: &ValueType,
        native_type: &str,
        default_value: Option<&str>,
    ) -> Option<String> {
        if let (ValueType::Array(element), Some(text)) = (ty, default_value) {
            if let Ok((_, RawLiteral::Array(items))) = literal(text) {
                let slice_type = self.generated_native_type(native_type);
                let element_native = vector_element(native_type).unwrap_or(native_type);
                let items = items
                    .iter()
                    .filter_map(|item| match item {
                        RawLiteral::Scalar(s) => {
                            self.default_value_literal(element, element_native, Some(s))
                        }
                        _ => None,
                    })
                    .collect::<Vec<_>>();
                return Some(format!("{}{{{}}}", slice_type, items.join(", ")));
            }
        }
        self.default_value_literal(ty, native_type, default_value)
    }
}
