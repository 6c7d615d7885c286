//! # Editing Introspection Schemas
//!
//! The `graphql_introspection_pruner::schema` module loads the result of an introspection query
//! into a [SchemaEditor], which may then be used to remove types, fields, arguments, input
//! fields, enum values and possible types from it. Every removal keeps the schema consistent:
//! elements referencing a removed type are removed along with it, and types that can no longer
//! be reached from the root operation types are dropped once the schema is cleaned up.
//!
//! ```
//! use graphql_introspection_pruner::{schema::*, Options, RemoveTypeOptions};
//!
//! fn prune() -> graphql_introspection_pruner::error::Result<serde_json::Value> {
//!     let introspection_json = include_str!("../../fixture/introspection_query.json");
//!     let mut editor = SchemaEditor::from_json(introspection_json, Options::default())?;
//!
//!     editor.remove_type(TypeKind::Scalar, "SecretScalar", RemoveTypeOptions::default())?;
//!     editor.remove_query("myTypes", None)?;
//!     editor.get_response()
//! }
//! # prune().unwrap();
//! ```
//!
//! [More information on the SchemaEditor struct.](SchemaEditor)

mod accessors;
mod cleanup;
mod editor;
pub mod introspection;
mod mutations;
pub mod path;
pub mod reference_index;
pub mod slots;
pub mod type_key;

#[cfg(test)]
mod fixtures;

pub use editor::SchemaEditor;
pub use introspection::*;
pub use path::{Path, PathSegment};
pub use reference_index::{ReferenceIndex, ReferenceKind};
pub use slots::Slots;
pub use type_key::*;
