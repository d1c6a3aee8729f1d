//! Type files: skeletons of the agent types the trees run on, and the customized enums and
//! structs of the catalog.
//!
//! Agent skeletons carry hand-written method bodies between [`BEGIN_MARKER`] and
//! [`END_MARKER`] lines, so they are flagged mergeable and reconciled with an existing copy
//! when published.

use std::collections::BTreeSet;

use tracing::info;

use crate::{
    catalog::{
        basic_name, namespace, AgentType, EnumType, PropertyDef, StructType, TypeCatalog,
        ValueType, AGENT_BASE,
    },
    config::ExportConfig,
    exporter::write_header,
    types::{pascal_case, TypeMapper},
    writer::{CodeWriter, OutputFile},
};

pub const CUSTOMIZED_TYPES_FILE: &str = "customized_types.go";
/// Followed by a space and the method name.
pub const BEGIN_MARKER: &str = "// <<< BEGIN WRITING YOUR CODE";
pub const END_MARKER: &str = "// <<< END WRITING YOUR CODE";

/// All type files of a catalog: agent skeletons, then customized types.
pub fn generate(catalog: &TypeCatalog, config: &ExportConfig) -> Vec<OutputFile> {
    let mut ret: Vec<_> = catalog
        .agents
        .iter()
        .filter(|agent| !agent.is_implemented && agent.name != AGENT_BASE)
        .map(|agent| agent_file(catalog, config, agent))
        .collect();
    ret.extend(customized_types_file(catalog, config));

    for enum_type in catalog.enums.iter().filter(|e| !e.is_implemented) {
        if let Some(location) = &enum_type.export_location {
            let mut tw = TypeWriter::new(catalog, config);
            tw.write_enum(enum_type);
            ret.push(tw.finish(
                &located_path(config, location, enum_type.basic_name()),
                &location_package(config, location),
            ));
        }
    }
    for struct_type in catalog.structs.iter().filter(|s| !s.is_implemented) {
        if let Some(location) = &struct_type.export_location {
            let mut tw = TypeWriter::new(catalog, config);
            tw.write_struct(struct_type);
            ret.push(tw.finish(
                &located_path(config, location, struct_type.basic_name()),
                &location_package(config, location),
            ));
        }
    }
    ret
}

/// The skeleton of one agent type.
pub fn agent_file(catalog: &TypeCatalog, config: &ExportConfig, agent: &AgentType) -> OutputFile {
    let ns = namespace(&agent.name);
    let (path, package) = if let Some(location) = &agent.export_location {
        (
            located_path(config, location, agent.basic_name()),
            location_package(config, location),
        )
    } else if ns.is_empty() {
        (
            format!("{}/{}.go", config.types_dir(), agent.basic_name()),
            config.types_package.clone(),
        )
    } else {
        (
            format!(
                "{}/{}/{}.go",
                config.types_dir(),
                ns.replace("::", "/"),
                agent.basic_name()
            ),
            basic_name(ns).to_owned(),
        )
    };
    let mut tw = TypeWriter::new(catalog, config);
    tw.write_agent(agent);
    tw.finish(&path, &package).mergeable()
}

/// Customized types without an export location, or `None` if there are none.
pub fn customized_types_file(catalog: &TypeCatalog, config: &ExportConfig) -> Option<OutputFile> {
    let enums: Vec<_> = catalog
        .enums
        .iter()
        .filter(|e| !e.is_implemented && e.export_location.is_none())
        .collect();
    let structs: Vec<_> = catalog
        .structs
        .iter()
        .filter(|s| !s.is_implemented && s.export_location.is_none())
        .collect();
    if enums.is_empty() && structs.is_empty() {
        return None;
    }

    let mut tw = TypeWriter::new(catalog, config);
    if !enums.is_empty() {
        tw.banner("Customized enums");
        for enum_type in enums {
            tw.write_enum(enum_type);
        }
    }
    if !structs.is_empty() {
        tw.banner("Customized structs");
        for struct_type in structs {
            tw.write_struct(struct_type);
        }
    }
    Some(tw.finish(
        &format!("{}/{}", config.types_dir(), CUSTOMIZED_TYPES_FILE),
        &config.types_package,
    ))
}

fn located_path(config: &ExportConfig, location: &str, name: &str) -> String {
    let location = location.trim_matches('/');
    format!("{}/{}/{}.go", config.types_dir(), location, name)
}

/// Go package of a location folder: its last path segment.
fn location_package(config: &ExportConfig, location: &str) -> String {
    location
        .trim_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .map(|s| s.replace(['-', '.', ' '], "_"))
        .unwrap_or_else(|| config.types_package.clone())
}

struct TypeWriter<'a> {
    catalog: &'a TypeCatalog,
    config: &'a ExportConfig,
    mapper: TypeMapper,
    imports: BTreeSet<String>,
    w: CodeWriter,
}

impl<'a> TypeWriter<'a> {
    fn new(catalog: &'a TypeCatalog, config: &'a ExportConfig) -> Self {
        Self {
            catalog,
            config,
            mapper: config.mapper(),
            imports: BTreeSet::new(),
            w: CodeWriter::new(),
        }
    }

    fn finish(self, path: &str, package: &str) -> OutputFile {
        let imports: Vec<_> = self.imports.into_iter().collect();
        let mut w = CodeWriter::new();
        write_header(&mut w, path, package, &imports);
        w.append(self.w);
        info!(path, "generated types file");
        OutputFile::new(path, w.into_string())
    }

    fn go_type(&mut self, native: &str) -> String {
        let ret = self.mapper.generated_native_type(native);
        if ret.contains("bt.") {
            self.imports
                .insert(format!("\"{}\"", self.config.runtime_import("bt")));
        }
        ret
    }

    /// Literal a field or return value of `native` starts out with. Value structs are
    /// composite literals here, since the fields hold them by value.
    fn initial_value(&mut self, native: &str, literal: Option<&str>) -> Option<String> {
        let ty = self.catalog.classify(native);
        let go_type = self.go_type(native);
        match ty {
            ValueType::Struct { is_ref: false, .. } => Some(format!("{}{{}}", go_type)),
            ty => self.mapper.property_default_literal(&ty, native, literal),
        }
    }

    fn banner(&mut self, title: &str) {
        self.w.blank();
        self.w.line("// -------------------");
        self.w.line(format!("// {}", title));
        self.w.line("// -------------------");
    }

    fn comment(&mut self, text: &str) {
        if !text.is_empty() {
            self.w.line(format!("// {}", text));
        }
    }

    fn fields(&mut self, properties: &[&PropertyDef]) -> Vec<String> {
        let rows: Vec<_> = properties
            .iter()
            .map(|p| {
                (
                    pascal_case(p.basic_name()),
                    self.go_type(&p.native_type),
                    p.description.clone(),
                )
            })
            .collect();
        aligned(rows)
    }

    fn write_agent(&mut self, agent: &AgentType) {
        let name = agent.basic_name();
        let own: Vec<_> = agent
            .properties
            .iter()
            .filter(|p| !p.is_inherited && !p.is_par && !p.is_array_element)
            .collect();
        let (statics, members): (Vec<_>, Vec<_>) = own.into_iter().partition(|p| p.is_static);

        self.w.blank();
        self.comment(&agent.description);
        let rows = self.fields(&members);
        self.w.block(format!("type {} struct {{", name), "}", |w| w.lines(rows));
        self.w.blank();

        if !statics.is_empty() {
            for property in statics {
                let go_type = self.go_type(&property.native_type);
                let var = format!("{}{}", name, pascal_case(property.basic_name()));
                match self.initial_value(&property.native_type, property.default_value.as_deref()) {
                    Some(value) if property.default_value.is_some() => self
                        .w
                        .line(format!("var {} {} = {}", var, go_type, value)),
                    _ => self.w.line(format!("var {} {}", var, go_type)),
                }
            }
            self.w.blank();
        }

        let mut init = vec![];
        for property in members.iter().filter(|p| p.default_value.is_some()) {
            if let Some(value) =
                self.initial_value(&property.native_type, property.default_value.as_deref())
            {
                init.push(format!("_o.{} = {}", pascal_case(property.basic_name()), value));
            }
        }
        self.w.block(format!("func New{}() *{} {{", name, name), "}", |w| {
            w.line(format!("_o := new({})", name));
            w.lines(init);
            w.line("return _o");
        });
        self.w.blank();

        for method in agent.methods.iter().filter(|m| !m.is_inherited) {
            let method_name = pascal_case(basic_name(&method.name));
            let params = method
                .params
                .iter()
                .map(|param| {
                    let go_type = self.go_type(&param.native_type);
                    if param.is_by_ref() {
                        format!("{} *{}", param.name, go_type)
                    } else {
                        format!("{} {}", param.name, go_type)
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            let ret_type = self.go_type(&method.return_type);
            let ret_value = self.initial_value(&method.return_type, None);

            self.comment(&method.description);
            let header = match ret_value {
                Some(_) => format!("func (_o *{}) {}({}) {} {{", name, method_name, params, ret_type),
                None => format!("func (_o *{}) {}({}) {{", name, method_name, params),
            };
            self.w.block(header, "}", |w| {
                w.line(format!("{} {}", BEGIN_MARKER, method_name));
                if let Some(value) = ret_value {
                    w.line(format!("return {}", value));
                }
                w.line(END_MARKER);
            });
            self.w.blank();
        }
    }

    fn write_enum(&mut self, enum_type: &EnumType) {
        let name = enum_type.basic_name();
        self.w.blank();
        self.comment(&enum_type.description);
        self.w.line(format!("type {} int", name));
        self.w.blank();
        let rows = enum_type
            .members
            .iter()
            .map(|m| {
                (
                    basic_name(&m.name).to_owned(),
                    format!("{} = {}", name, m.value),
                    m.display_name.clone(),
                )
            })
            .collect();
        let lines = aligned(rows);
        self.w.block("const (", ")", |w| w.lines(lines));
    }

    fn write_struct(&mut self, struct_type: &StructType) {
        let properties: Vec<_> = struct_type
            .properties
            .iter()
            .filter(|p| !p.is_inherited)
            .collect();
        let rows = self.fields(&properties);
        let base = struct_type
            .base
            .as_deref()
            .filter(|b| !b.is_empty())
            .map(|b| self.go_type(b));

        self.w.blank();
        self.comment(&struct_type.description);
        self.w.block(
            format!("type {} struct {{", struct_type.basic_name()),
            "}",
            |w| {
                if let Some(base) = base {
                    w.line(base);
                }
                w.lines(rows);
            },
        );
    }
}

/// Name, type and comment columns padded to their widest entry, the way gofmt aligns them.
fn aligned(rows: Vec<(String, String, String)>) -> Vec<String> {
    let name_width = rows.iter().map(|r| r.0.len()).max().unwrap_or(0);
    let type_width = rows.iter().map(|r| r.1.len()).max().unwrap_or(0);
    rows.into_iter()
        .map(|(name, ty, comment)| {
            if comment.is_empty() {
                format!("{:nw$} {}", name, ty, nw = name_width)
                    .trim_end()
                    .to_owned()
            } else {
                format!(
                    "{:nw$} {:tw$} // {}",
                    name,
                    ty,
                    comment,
                    nw = name_width,
                    tw = type_width
                )
            }
        })
        .collect()
}

#[cfg(test)]
mod test;
