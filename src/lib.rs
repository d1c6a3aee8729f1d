//! # behavior-tree-codegen (Rust crate)
//!
//! Generates Go source code that rebuilds behavior trees at runtime, along with skeletons of
//! the agent types the trees run on.
//!
//!
//! ## Overview
//!
//! A behavior tree here is a frozen description: nodes with kinds, attachments
//! (preconditions, effectors and events) and operands that refer to properties and methods
//! of an agent type. The generator turns every tree into a Go type whose `NewTree()` method
//! builds the runtime tree, plus one Go type per node whose behavior needs code of its own,
//! such as an action calling an agent method or a condition comparing two properties.
//!
//! The agent types, enums and structs the trees refer to come from a [`TypeCatalog`].
//! Agent types that are not implemented by hand get a skeleton file with method stubs.
//! Whatever is written between the `BEGIN WRITING YOUR CODE` and `END WRITING YOUR CODE`
//! markers of a stub survives regeneration.
//!
//!
//! ## How it looks like
//!
//! The input is usually a YAML document with the catalog, the trees and optional settings.
//!
//! ```rust
//! # use behavior_tree_codegen::*;
//! let doc = load_yaml(
//!     r#"
//! catalog:
//!   agents:
//!     - name: Player
//!       properties:
//!         - { name: hp, type: int }
//!       methods:
//!         - { name: flee, return: behaviac::EBTStatus }
//! behaviors:
//!   - name: guard
//!     agent: Player
//!     children:
//!       - type: Sequence
//!         id: 1
//!         children:
//!           - { type: Condition, id: 2, opl: hp, operator: Less, opr: 10 }
//!           - { type: Action, id: 3, method: flee() }
//! "#,
//! )?;
//! # Ok::<(), ExportError>(())
//! ```
//!
//! Then the generator produces the output files in memory.
//!
//! ```rust
//! # use behavior_tree_codegen::*;
//! # let doc = load_yaml("behaviors: [{ name: Guard, children: [{ type: Noop, id: 1 }] }]")?;
//! let files = Generator::new(&doc.catalog, &doc.config).generate_all(&doc.behaviors);
//! assert_eq!(files[0].path, "behaviac_generated/behaviors/generated_behaviors.go");
//! assert!(files[0].contents.contains("func (_o *Guard) NewTree() *bt.Tree {"));
//! # Ok::<(), ExportError>(())
//! ```
//!
//! Finally they are written under an output root. Each file is replaced atomically, and
//! files carrying hand-written code are merged with the copy on disk first.
//!
//! ```rust,no_run
//! # use behavior_tree_codegen::*;
//! # let files = vec![];
//! let workspace = FsWorkspace::new("go/src");
//! for result in publish(&workspace, &MarkedBlockMerger, &files) {
//!     let path = result?;
//!     println!("wrote {}", path.display());
//! }
//! # Ok::<(), ExportError>(())
//! ```
//!
//!
//! ## Extending
//!
//! Each node and attachment kind is exported by a [`NodeExporter`] or
//! [`AttachmentExporter`] looked up in a [`Registry`]. A kind without an exporter of its
//! own falls back to the exporter of its nearest base, so registering a replacement for a
//! family base such as `KindTag::Decorator` changes every decorator that has no
//! specialization. Kinds the model does not know load as `NodeKind::Unknown` and are
//! instantiated from the runtime package their name implies.
//!
//! [`BehaviorHooks`] are called before and after each tree is exported, which is where an
//! editor can prepare or restore its own state.
//!
//!
//! ## Logging
//!
//! The crate logs through `tracing` and never installs a subscriber. Each generated and
//! published file is an `info` event, node dispatch is at `debug`, and degraded output such
//! as an unresolved subtree reference is a `warn`.

mod attachments;
pub mod catalog;
pub mod config;
mod context;
pub mod error;
mod exporter;
mod expr;
mod hash;
mod meta;
pub mod model;
mod nodes;
pub mod parser;
mod registry;
mod types;
mod workspace;
mod writer;

pub use crate::{
    attachments::AttachmentExporter,
    catalog::{AgentType, EnumType, MethodDef, ParInfo, PropertyDef, StructType, TypeCatalog},
    config::{ExportConfig, FileMode, TypeRename},
    context::ExportContext,
    error::{ExportError, LoadError},
    exporter::{BehaviorHooks, Generator},
    expr::{Emission, Emitter},
    hash::make_variable_id,
    model::{Attachment, Behavior, KindTag, Node, NodeKind},
    nodes::NodeExporter,
    parser::{load_yaml, load_yaml_file, Document},
    registry::{Registry, DEFAULT_REGISTRY},
    types::TypeMapper,
    workspace::{publish, publish_file, FileMerger, FsWorkspace, MarkedBlockMerger, Workspace},
    writer::{CodeWriter, OutputFile},
};
