//! # Configuration
//!
//! [Options] holds the instance-wide configuration of a
//! [SchemaEditor](crate::schema::SchemaEditor). Every option defaults to `true`, and since
//! options deserialize with `#[serde(default)]`, a partial JSON object is layered over these
//! defaults:
//!
//! ```
//! use graphql_introspection_pruner::Options;
//!
//! let options = Options::from_json(r#"{ "removeUnusedTypes": false }"#).unwrap();
//! assert!(!options.remove_unused_types);
//! assert!(options.cleanup_schema_immediately);
//! ```
//!
//! Mutating calls accept overrides that fall back to the instance's options when left unset.

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Strip the `{ "data": ... }` envelope from responses that have one.
    pub normalize: bool,
    /// Build the reference index right after loading a response.
    pub analyze: bool,
    /// Some GraphQL implementations report root operation type names that don't match any
    /// type. Replace those with `Query`, `Mutation` or `Subscription` respectively.
    pub fix_query_and_mutation_and_subscription_types: bool,
    /// Remove types that aren't reachable from the root operation types.
    pub remove_unused_types: bool,
    /// Remove fields whose return type has gone missing.
    pub remove_fields_with_missing_types: bool,
    /// Remove arguments whose type has gone missing.
    pub remove_args_with_missing_types: bool,
    /// Remove input fields whose type has gone missing.
    pub remove_input_fields_with_missing_types: bool,
    /// Remove possible types and implemented interfaces that have gone missing.
    pub remove_possible_types_of_missing_types: bool,
    /// Clean up right after loading and after every mutating call.
    pub cleanup_schema_immediately: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            normalize: true,
            analyze: true,
            fix_query_and_mutation_and_subscription_types: true,
            remove_unused_types: true,
            remove_fields_with_missing_types: true,
            remove_args_with_missing_types: true,
            remove_input_fields_with_missing_types: true,
            remove_possible_types_of_missing_types: true,
            cleanup_schema_immediately: true,
        }
    }
}

impl Options {
    /// Reads options from a JSON object. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Options that leave a loaded response exactly as it was given.
    pub fn untouched() -> Self {
        Options {
            cleanup_schema_immediately: false,
            ..Options::default()
        }
    }

    #[inline]
    pub(crate) fn cleanup(&self, cleanup: Option<bool>) -> bool {
        cleanup.unwrap_or(self.cleanup_schema_immediately)
    }
}

/// Per-call overrides for [`SchemaEditor::remove_type`](crate::schema::SchemaEditor::remove_type).
///
/// Each cascade decides whether elements elsewhere in the schema that reference the removed type
/// are removed right away. Unset values fall back to the matching `remove_*_with_missing_types`
/// option, and `cleanup` falls back to `cleanup_schema_immediately`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveTypeOptions {
    pub cleanup: Option<bool>,
    pub remove_fields_of_type: Option<bool>,
    pub remove_args_of_type: Option<bool>,
    pub remove_input_fields_of_type: Option<bool>,
    pub remove_possible_types_of_type: Option<bool>,
}

impl RemoveTypeOptions {
    /// Disables every cascade, so only the type itself is removed.
    pub fn without_cascades() -> Self {
        RemoveTypeOptions {
            cleanup: None,
            remove_fields_of_type: Some(false),
            remove_args_of_type: Some(false),
            remove_input_fields_of_type: Some(false),
            remove_possible_types_of_type: Some(false),
        }
    }

    pub fn with_cleanup(mut self, cleanup: bool) -> Self {
        self.cleanup = Some(cleanup);
        self
    }

    pub(crate) fn resolve(&self, options: &Options) -> RemoveTypePlan {
        RemoveTypePlan {
            cleanup: options.cleanup(self.cleanup),
            remove_fields_of_type: self
                .remove_fields_of_type
                .unwrap_or(options.remove_fields_with_missing_types),
            remove_args_of_type: self
                .remove_args_of_type
                .unwrap_or(options.remove_args_with_missing_types),
            remove_input_fields_of_type: self
                .remove_input_fields_of_type
                .unwrap_or(options.remove_input_fields_with_missing_types),
            remove_possible_types_of_type: self
                .remove_possible_types_of_type
                .unwrap_or(options.remove_possible_types_of_missing_types),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RemoveTypePlan {
    pub cleanup: bool,
    pub remove_fields_of_type: bool,
    pub remove_args_of_type: bool,
    pub remove_input_fields_of_type: bool,
    pub remove_possible_types_of_type: bool,
}

/// Filters for [`SchemaEditor::all_types`](crate::schema::SchemaEditor::all_types). Everything
/// is excluded by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllTypesOptions {
    pub include_reserved: bool,
    pub include_query: bool,
    pub include_mutation: bool,
    pub include_subscription: bool,
}
