use serde_yaml::Value;
use std::path::Path;
use tracing::info;

use super::loader::Loader;
use crate::{
    catalog::TypeCatalog,
    config::ExportConfig,
    error::{ExportError, LoadError},
    model::Behavior,
};

/// Everything one export run needs: settings, the type catalog and the trees.
#[derive(Debug, Clone)]
pub struct Document {
    pub config: ExportConfig,
    pub catalog: TypeCatalog,
    pub behaviors: Vec<Behavior>,
}

/// Parses a document with optional `config` and `catalog` sections and a non-empty
/// `behaviors` sequence.
///
/// ```
/// # use behavior_tree_codegen::load_yaml;
/// let doc = load_yaml(
///     r#"
/// catalog:
///   agents:
///     - name: Player
///       properties:
///         - { name: hp, type: int }
/// behaviors:
///   - name: guard
///     agent: Player
///     children:
///       - { type: Condition, id: 1, opl: hp, operator: Greater, opr: 0 }
/// "#,
/// )
/// .unwrap();
/// assert_eq!(doc.behaviors[0].children.len(), 1);
/// assert_eq!(doc.catalog.behaviors, vec!["guard".to_owned()]);
/// ```
pub fn load_yaml(yaml: &str) -> Result<Document, ExportError> {
    let yaml: Value = serde_yaml::from_str(yaml)?;

    let config = match yaml.get("config") {
        Some(config) => serde_yaml::from_value(config.clone())?,
        None => ExportConfig::default(),
    };
    let mut catalog: TypeCatalog = match yaml.get("catalog") {
        Some(catalog) => serde_yaml::from_value(catalog.clone())?,
        None => TypeCatalog::default(),
    };
    catalog.link();

    let trees = match yaml.get("behaviors") {
        Some(Value::Sequence(trees)) if !trees.is_empty() => trees,
        _ => return Err(LoadError::MissingTree.into()),
    };
    let behaviors = {
        let loader = Loader::new(&catalog);
        trees
            .iter()
            .map(|tree| loader.behavior(tree))
            .collect::<Result<Vec<_>, _>>()?
    };
    if catalog.behaviors.is_empty() {
        catalog.behaviors = behaviors.iter().map(Behavior::source_name).collect();
    }
    info!(
        behaviors = behaviors.len(),
        agents = catalog.agents.len(),
        "loaded document"
    );

    Ok(Document {
        config,
        catalog,
        behaviors,
    })
}

pub fn load_yaml_file(path: impl AsRef<Path>) -> Result<Document, ExportError> {
    let text = std::fs::read_to_string(path)?;
    load_yaml(&text)
}
