use std::{cell::RefCell, collections::BTreeSet};

use crate::{
    catalog::{basic_name, TypeCatalog, ValueType, AGENT_BASE},
    config::ExportConfig,
    types::{pascal_case, TypeMapper},
};

/// Alias the generated types package is imported under in tree files.
pub const TYPES_ALIAS: &str = "types";

/// Read-only inputs of one file's generation, plus the imports that file accumulates.
///
/// Every traversal owns its context, so files can be generated on separate threads while
/// sharing the catalog and config.
pub struct ExportContext<'a> {
    pub catalog: &'a TypeCatalog,
    pub config: &'a ExportConfig,
    pub mapper: TypeMapper,
    /// Agent type of the behavior being generated
    pub agent_type: String,
    imports: RefCell<BTreeSet<String>>,
}

impl<'a> ExportContext<'a> {
    pub fn new(catalog: &'a TypeCatalog, config: &'a ExportConfig) -> Self {
        Self {
            catalog,
            config,
            mapper: config.mapper(),
            agent_type: AGENT_BASE.to_owned(),
            imports: RefCell::new(BTreeSet::new()),
        }
    }

    pub fn with_agent_type(mut self, agent_type: impl Into<String>) -> Self {
        self.set_agent_type(agent_type);
        self
    }

    /// Switches to the next behavior of the same file. Imports are kept.
    pub fn set_agent_type(&mut self, agent_type: impl Into<String>) {
        self.agent_type = agent_type.into();
    }

    /// Records that the file refers to a runtime package, e.g. `bt` or `composites`.
    pub fn use_package(&self, package: &str) {
        self.imports
            .borrow_mut()
            .insert(format!("\"{}\"", self.config.runtime_import(package)));
    }

    pub fn use_types(&self) {
        self.imports.borrow_mut().insert(format!(
            "{} \"{}\"",
            TYPES_ALIAS, self.config.types_import
        ));
    }

    /// Import specs collected so far, sorted by path.
    pub fn imports(&self) -> Vec<String> {
        let mut ret: Vec<_> = self.imports.borrow().iter().cloned().collect();
        ret.sort_by(|a, b| import_path(a).cmp(import_path(b)));
        ret
    }

    /// Go path of a catalog class as seen from a tree file: `game::Player` becomes
    /// `game.Player` and an unqualified `Player` lives in the types package.
    pub fn class_path(&self, class_name: &str) -> String {
        if class_name.contains("::") {
            class_name.replace("::", ".")
        } else {
            self.use_types();
            format!("{}.{}", TYPES_ALIAS, class_name)
        }
    }

    /// Receiver expression a method or property of `class_name` is reached through.
    pub fn agent_receiver(&self, class_name: &str) -> String {
        if class_name.is_empty() || class_name == AGENT_BASE {
            "agent".to_owned()
        } else {
            format!("agent.(*{})", self.class_path(class_name))
        }
    }

    /// Go type of a native spelling as seen from a tree file. Catalog types get the types
    /// package qualifier.
    pub fn go_type(&self, native: &str) -> String {
        let name = self.mapper.generated_native_type(native);
        self.note_packages(&name);
        let (prefix, element) = match name.strip_prefix("[]") {
            Some(element) => ("[]", element),
            None => ("", name.as_str()),
        };
        if !element.contains('.') && self.is_catalog_type(element) {
            self.use_types();
            format!("{}{}.{}", prefix, TYPES_ALIAS, element)
        } else {
            name
        }
    }

    /// Default literal of a native type as seen from a tree file.
    pub fn default_literal(&self, native: &str, literal: Option<&str>) -> Option<String> {
        let ty = self.catalog.classify(native);
        let ret = self.mapper.literal_for(&ty, &self.go_type(native), literal);
        if let Some(ret) = &ret {
            self.note_packages(ret);
        }
        ret
    }

    /// Go field or method name of a catalog member.
    pub fn member_name(&self, name: &str) -> String {
        pascal_case(basic_name(name))
    }

    pub fn classify(&self, native: &str) -> ValueType {
        self.catalog.classify(native)
    }

    fn is_catalog_type(&self, name: &str) -> bool {
        self.catalog.enum_type(name).is_some()
            || self.catalog.struct_type(name).is_some()
            || self.catalog.agent(name).is_some()
    }

    fn note_packages(&self, text: &str) {
        if text.contains("bt.") {
            self.use_package("bt");
        }
    }
}

fn import_path(import: &str) -> &str {
    import.rsplit(' ').next().unwrap_or(import)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::catalog::{AgentType, StructType};

    #[test]
    fn test_imports_sorted() {
        let catalog = TypeCatalog::default();
        let config = ExportConfig::default();
        let ctx = ExportContext::new(&catalog, &config);
        ctx.use_package("composites");
        ctx.use_package("bt");
        ctx.use_types();
        ctx.use_package("bt");
        assert_eq!(
            ctx.imports(),
            vec![
                "\"behaviac/bt\"",
                "\"behaviac/composites\"",
                "types \"behaviac_generated/types\"",
            ]
        );
    }

    #[test]
    fn test_go_type_qualified() {
        let catalog = TypeCatalog {
            agents: vec![AgentType::new("Player")],
            structs: vec![StructType {
                name: "Vec2".to_owned(),
                ..StructType::default()
            }],
            ..TypeCatalog::default()
        };
        let config = ExportConfig::default();
        let ctx = ExportContext::new(&catalog, &config);
        assert_eq!(ctx.go_type("Vec2"), "types.Vec2");
        assert_eq!(ctx.go_type("vector<Vec2>"), "[]types.Vec2");
        assert_eq!(ctx.go_type("int"), "int");
        assert_eq!(ctx.default_literal("Vec2", None).as_deref(), Some("new(types.Vec2)"));
        assert_eq!(ctx.agent_receiver("behaviac::Agent"), "agent");
        assert_eq!(ctx.agent_receiver("Player"), "agent.(*types.Player)");
        assert_eq!(ctx.agent_receiver("game::Player"), "agent.(*game.Player)");
    }
}
