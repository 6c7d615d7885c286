//! `graphql_introspection_pruner`
//! =========
//!
//! _Remove parts of a GraphQL schema from its introspection result._
//!
//! The **`graphql_introspection_pruner`** library takes the JSON result of an introspection query
//! and allows types, fields, arguments, input fields, enum values and possible types to be removed
//! from it, while keeping the result a valid description of a schema:
//!
//! - Removing a type also removes every field, argument, input field and possible type that
//!   referenced it
//! - Types that can no longer be reached from the query, mutation or subscription type are
//!   dropped, however many hops away they are
//! - The output has the same shape as the input, including the `data` envelope and any
//!   descriptions, deprecations and default values
//!
//! This is useful for intermediary GraphQL layers that need to hide parts of an upstream schema
//! from their clients, without having to rebuild the schema from its definitions.
//!
//! [A good place to start learning more about this crate is the `schema` module...](schema)

pub mod error;
pub mod options;
pub mod schema;

pub use options::{AllTypesOptions, Options, RemoveTypeOptions};
pub use schema::SchemaEditor;
