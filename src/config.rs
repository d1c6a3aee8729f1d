use serde::Deserialize;
use std::path::Path;

use crate::{error::ExportError, types::TypeMapper};

/// How generated tree code is split into files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileMode {
    /// All trees in one file
    #[default]
    Single,
    /// One file per behavior, mirroring its relative path
    PerBehavior,
}

/// An entry of the type rename table, applied as the last step of type generation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TypeRename {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub trees_package: String,
    pub types_package: String,
    /// Import path prefix of the runtime packages
    pub runtime_module: String,
    /// Import path of the generated types package, aliased `types` in tree files
    pub types_import: String,
    pub generated_folder: String,
    pub behaviors_folder: String,
    pub types_folder: String,
    pub single_file_name: String,
    pub file_mode: FileMode,
    pub type_renames: Vec<TypeRename>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            trees_package: "behavior_trees".to_owned(),
            types_package: "behavior_types".to_owned(),
            runtime_module: "behaviac".to_owned(),
            types_import: "behaviac_generated/types".to_owned(),
            generated_folder: "behaviac_generated".to_owned(),
            behaviors_folder: "behaviors".to_owned(),
            types_folder: "types".to_owned(),
            single_file_name: "generated_behaviors.go".to_owned(),
            file_mode: FileMode::Single,
            type_renames: vec![],
        }
    }
}

impl ExportConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ExportError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    pub fn mapper(&self) -> TypeMapper {
        TypeMapper::new(self.type_renames.clone())
    }

    /// Path of the tree files folder relative to the output root.
    pub fn behaviors_dir(&self) -> String {
        format!("{}/{}", self.generated_folder, self.behaviors_folder)
    }

    pub fn types_dir(&self) -> String {
        format!("{}/{}", self.generated_folder, self.types_folder)
    }

    /// Import path of a runtime package such as `bt` or `composites`.
    pub fn runtime_import(&self, package: &str) -> String {
        format!("{}/{}", self.runtime_module, package)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExportConfig::from_yaml("{}").unwrap();
        assert_eq!(config, ExportConfig::default());
        assert_eq!(config.behaviors_dir(), "behaviac_generated/behaviors");
        assert_eq!(config.runtime_import("bt"), "behaviac/bt");
    }

    #[test]
    fn test_partial() {
        let config = ExportConfig::from_yaml(
            r#"
trees_package: trees
file_mode: per_behavior
type_renames:
  - from: Vec2
    to: types.Vec2
"#,
        )
        .unwrap();
        assert_eq!(config.trees_package, "trees");
        assert_eq!(config.types_package, "behavior_types");
        assert_eq!(config.file_mode, FileMode::PerBehavior);
        assert_eq!(
            config.mapper().generated_native_type("vector<Vec2>"),
            "[]types.Vec2"
        );
    }
}
