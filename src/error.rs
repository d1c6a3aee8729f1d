use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Failed to publish {path}: {source}")]
    Publish {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Load(#[from] LoadError),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("The document has no behaviors")]
    MissingTree,
    #[error("Node {node} is missing its {field:?}")]
    MissingField { node: String, field: &'static str },
    #[error("Property {name:?} not found on agent type {agent:?}")]
    UnknownProperty { agent: String, name: String },
    #[error("Method {name:?} not found on agent type {agent:?}")]
    UnknownMethod { agent: String, name: String },
    #[error("Node {node} needs a variable for its {field:?}")]
    NotAVariable { node: String, field: &'static str },
    #[error("Node {node} needs a method call for its {field:?}")]
    NotAMethod { node: String, field: &'static str },
    #[error("Agent type not found {0:?}")]
    UnknownAgent(String),
    #[error("Malformed literal {text:?} for type {native_type:?}")]
    MalformedLiteral { text: String, native_type: String },
}
