use serde_json::Value;
use tracing::{debug, warn};

use super::cleanup;
use super::introspection::{
    IntrospectionQuery, IntrospectionResponse, IntrospectionSchema, RootTypeRef, TypeKind,
};
use super::reference_index::ReferenceIndex;
use super::type_key::{OperationKind, TypeKey};
use crate::error::{Error, Result};
use crate::options::Options;

/// Schema Editor
///
/// Owns a private copy of an introspection result and exposes the operations that remove parts
/// of it while keeping it consistent. The [ReferenceIndex] it maintains records where each type
/// is referenced from, which is what allows removals to cascade to every referencing field,
/// argument, input field and possible type.
///
/// ```
/// use graphql_introspection_pruner::{schema::TypeKind, Options, SchemaEditor};
///
/// let response = serde_json::json!({
///     "__schema": {
///         "queryType": { "name": "Query" },
///         "types": [
///             {
///                 "kind": "OBJECT",
///                 "name": "Query",
///                 "fields": [{
///                     "name": "hello",
///                     "args": [],
///                     "type": { "kind": "SCALAR", "name": "String", "ofType": null }
///                 }],
///                 "interfaces": []
///             },
///             { "kind": "SCALAR", "name": "String" },
///             { "kind": "SCALAR", "name": "Unused" }
///         ]
///     }
/// });
///
/// let editor = SchemaEditor::new(response, Options::default()).unwrap();
/// assert!(editor.get_type(TypeKind::Scalar, "String").is_some());
/// assert!(editor.get_type(TypeKind::Scalar, "Unused").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct SchemaEditor {
    pub(crate) options: Options,
    pub(crate) schema: IntrospectionSchema,
    pub(crate) index: ReferenceIndex,
    pub(crate) wrapped_in_data: bool,
}

impl SchemaEditor {
    /// Loads an introspection result in either the `{ "data": { "__schema": ... } }` or the
    /// `{ "__schema": ... }` form.
    pub fn new(response: Value, options: Options) -> Result<Self> {
        let (query, wrapped_in_data) = Self::normalize_introspection_response(response, &options)?;

        let mut editor = SchemaEditor {
            options,
            schema: query.schema,
            index: ReferenceIndex::default(),
            wrapped_in_data,
        };

        if editor.options.fix_query_and_mutation_and_subscription_types {
            editor.fix_root_types();
        }
        editor.validate()?;

        if editor.options.analyze {
            editor.analyze();
        }
        if editor.options.cleanup_schema_immediately {
            cleanup::clean_schema(&mut editor.schema, &mut editor.index, &editor.options)?;
        }

        debug!(
            types = editor.schema.types.len(),
            wrapped_in_data, "loaded introspection schema"
        );
        Ok(editor)
    }

    /// Parses a JSON string and loads it like [`SchemaEditor::new`].
    pub fn from_json(json: &str, options: Options) -> Result<Self> {
        let response: Value = serde_json::from_str(json)?;
        Self::new(response, options)
    }

    /// Replaces the loaded schema with a new response, keeping the current options.
    ///
    /// The editor is left unchanged if the new response is rejected.
    pub fn set_response(&mut self, response: Value) -> Result<()> {
        *self = Self::new(response, self.options)?;
        Ok(())
    }

    /// Strips the `data` envelope off a response and deserializes its `__schema`.
    ///
    /// Returns whether an envelope was present. The envelope is only recognized when
    /// [`Options::normalize`] is set.
    pub fn normalize_introspection_response(
        response: Value,
        options: &Options,
    ) -> Result<(IntrospectionQuery, bool)> {
        let (response, wrapped_in_data) = match response {
            Value::Null => return Err(Error::new("No response provided!", None)),
            Value::Object(mut response) if options.normalize => match response.remove("data") {
                Some(data) => (data, true),
                None => (Value::Object(response), false),
            },
            response => (response, false),
        };

        match response.get("__schema") {
            Some(Value::Object(schema)) => match schema.get("types") {
                None | Some(Value::Null) => return Err(Error::new("No types detected!", None)),
                Some(_) => {}
            },
            _ => return Err(Error::new("No schema property detected!", None)),
        }

        let query: IntrospectionQuery = serde_json::from_value(response)?;
        Ok((query, wrapped_in_data))
    }

    /// Returns a copy of the current schema in the envelope it was loaded with.
    pub fn response(&self) -> IntrospectionResponse {
        let query = IntrospectionQuery {
            schema: self.schema.clone(),
        };
        if self.wrapped_in_data {
            IntrospectionResponse::Data { data: query }
        } else {
            IntrospectionResponse::Bare(query)
        }
    }

    /// Returns a copy of the current schema as JSON, in the envelope it was loaded with.
    pub fn get_response(&self) -> Result<Value> {
        self.response().to_value()
    }

    /// Returns a copy of the current `__schema`.
    pub fn schema(&self) -> IntrospectionSchema {
        self.schema.clone()
    }

    /// Whether the loaded response was wrapped in a `data` envelope.
    pub fn wrapped_in_data(&self) -> bool {
        self.wrapped_in_data
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Changes the options used by subsequent calls. The schema isn't touched.
    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    pub fn index(&self) -> &ReferenceIndex {
        &self.index
    }

    /// Rebuilds the [ReferenceIndex] from the current schema.
    pub fn analyze(&mut self) {
        self.index = ReferenceIndex::build(&self.schema);
    }

    /// Runs the cleanup loop until the schema stops changing.
    pub fn clean_schema(&mut self) -> Result<()> {
        self.transaction(|editor| {
            cleanup::clean_schema(&mut editor.schema, &mut editor.index, &editor.options)
        })
    }

    /// Runs `operation` and restores the schema and index if it fails.
    pub(crate) fn transaction<T>(
        &mut self,
        operation: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let schema = self.schema.clone();
        let index = self.index.clone();
        match operation(self) {
            Ok(value) => Ok(value),
            Err(error) => {
                warn!(error = %error.print(true), "rolling back failed schema mutation");
                self.schema = schema;
                self.index = index;
                Err(error)
            }
        }
    }

    /// Ends a mutation by either cleaning up or re-indexing the schema.
    pub(crate) fn finish(&mut self, cleanup: bool) -> Result<()> {
        if cleanup {
            cleanup::clean_schema(&mut self.schema, &mut self.index, &self.options)
        } else {
            self.analyze();
            Ok(())
        }
    }

    fn fix_root_types(&mut self) {
        for operation in OperationKind::ALL {
            let name = match self.root_type_ref(operation).and_then(|root| root.name.as_deref()) {
                Some(name) if !name.is_empty() => name,
                _ => continue,
            };
            let key = TypeKey::object(name);
            let exists = self
                .schema
                .types
                .iter()
                .any(|schema_type| {
                    schema_type.kind == TypeKind::Object && schema_type.name == key.name
                });
            if !exists {
                let default_name = operation.default_type_name();
                warn!(
                    %operation,
                    declared = %key.name,
                    replacement = default_name,
                    "root type does not exist, replacing it"
                );
                *self.root_type_ref_mut(operation) = Some(RootTypeRef::new(default_name));
            }
        }
    }

    fn validate(&self) -> Result<()> {
        match self
            .schema
            .query_type
            .as_ref()
            .and_then(|root| root.name.as_deref())
        {
            Some(name) if !name.is_empty() => Ok(()),
            _ => Err(Error::new("No queryType detected!", None)),
        }
    }

    pub(crate) fn root_type_ref(&self, operation: OperationKind) -> Option<&RootTypeRef> {
        match operation {
            OperationKind::Query => self.schema.query_type.as_ref(),
            OperationKind::Mutation => self.schema.mutation_type.as_ref(),
            OperationKind::Subscription => self.schema.subscription_type.as_ref(),
        }
    }

    fn root_type_ref_mut(&mut self, operation: OperationKind) -> &mut Option<RootTypeRef> {
        match operation {
            OperationKind::Query => &mut self.schema.query_type,
            OperationKind::Mutation => &mut self.schema.mutation_type,
            OperationKind::Subscription => &mut self.schema.subscription_type,
        }
    }
}
