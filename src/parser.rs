mod loader;
mod nom_parser;
mod yaml_parser;

pub use self::{
    loader::Loader,
    nom_parser::{literal, native_type, RawLiteral, Sign, TypeSpelling},
    yaml_parser::{load_yaml, load_yaml_file, Document},
};
