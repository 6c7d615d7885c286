use super::editor::SchemaEditor;
use super::introspection::{
    FieldRef, IntrospectionField, IntrospectionInputValue, IntrospectionType, TypeKind,
};
use super::type_key::{is_reserved_type, types_are_same, OperationKind, TypeKey};
use crate::options::AllTypesOptions;

/// Lookups into the current schema.
///
/// These borrow from the editor rather than copying, so whatever they return reflects the schema
/// until the next mutating call. Missing elements are reported as `None`.
impl SchemaEditor {
    /// Returns the type with the given kind and name.
    pub fn get_type(&self, kind: TypeKind, name: &str) -> Option<&IntrospectionType> {
        let key = TypeKey::new(kind, name);
        let slot = self.index.type_index(&key)?;
        self.schema
            .types
            .get(slot)
            .filter(|schema_type| types_are_same(*schema_type, &key))
    }

    /// The declared name of a root operation type.
    pub fn root_type_name(&self, operation: OperationKind) -> Option<&str> {
        self.root_type_ref(operation)
            .and_then(|root| root.name.as_deref())
            .filter(|name| !name.is_empty())
    }

    pub fn get_root_type(&self, operation: OperationKind) -> Option<&IntrospectionType> {
        self.get_type(TypeKind::Object, self.root_type_name(operation)?)
    }

    #[inline]
    pub fn get_query_type(&self) -> Option<&IntrospectionType> {
        self.get_root_type(OperationKind::Query)
    }

    #[inline]
    pub fn get_mutation_type(&self) -> Option<&IntrospectionType> {
        self.get_root_type(OperationKind::Mutation)
    }

    #[inline]
    pub fn get_subscription_type(&self) -> Option<&IntrospectionType> {
        self.get_root_type(OperationKind::Subscription)
    }

    /// Returns a field of a root operation type.
    pub fn get_root_field(
        &self,
        operation: OperationKind,
        field_name: &str,
    ) -> Option<&IntrospectionField> {
        self.get_root_type(operation)?.field(field_name)
    }

    #[inline]
    pub fn get_query(&self, field_name: &str) -> Option<&IntrospectionField> {
        self.get_root_field(OperationKind::Query, field_name)
    }

    #[inline]
    pub fn get_mutation(&self, field_name: &str) -> Option<&IntrospectionField> {
        self.get_root_field(OperationKind::Mutation, field_name)
    }

    #[inline]
    pub fn get_subscription(&self, field_name: &str) -> Option<&IntrospectionField> {
        self.get_root_field(OperationKind::Subscription, field_name)
    }

    /// Returns a field of an object, interface or input object type.
    ///
    /// Input object fields come back as [`FieldRef::Input`], every other field as
    /// [`FieldRef::Output`]. Types of any other kind have no fields.
    pub fn get_field(
        &self,
        kind: TypeKind,
        type_name: &str,
        field_name: &str,
    ) -> Option<FieldRef<'_>> {
        let schema_type = self.get_type(kind, type_name)?;
        match kind {
            TypeKind::InputObject => schema_type.input_field(field_name).map(FieldRef::Input),
            kind if kind.has_fields() => schema_type.field(field_name).map(FieldRef::Output),
            _ => None,
        }
    }

    pub fn get_input_field(
        &self,
        type_name: &str,
        field_name: &str,
    ) -> Option<&IntrospectionInputValue> {
        self.get_field(TypeKind::InputObject, type_name, field_name)?
            .input()
    }

    pub fn get_arg(
        &self,
        kind: TypeKind,
        type_name: &str,
        field_name: &str,
        arg_name: &str,
    ) -> Option<&IntrospectionInputValue> {
        self.get_field(kind, type_name, field_name)?
            .output()?
            .arg(arg_name)
    }

    /// Lists the types of the schema in order. Reserved `__` types and the root operation types
    /// are left out unless `options` asks for them.
    pub fn all_types(&self, options: AllTypesOptions) -> Vec<&IntrospectionType> {
        let excluded = |operation: OperationKind, include: bool| {
            if include {
                None
            } else {
                self.root_type_name(operation)
            }
        };
        let excluded_roots = [
            excluded(OperationKind::Query, options.include_query),
            excluded(OperationKind::Mutation, options.include_mutation),
            excluded(OperationKind::Subscription, options.include_subscription),
        ];

        self.schema
            .types
            .iter()
            .filter(|schema_type| options.include_reserved || !is_reserved_type(&schema_type.name))
            .filter(|schema_type| {
                schema_type.kind != TypeKind::Object
                    || !excluded_roots.contains(&Some(schema_type.name.as_str()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::fixture_response;
    use super::*;
    use crate::options::Options;

    fn editor() -> SchemaEditor {
        SchemaEditor::new(fixture_response(), Options::default()).unwrap()
    }

    #[test]
    fn looks_up_types_by_kind_and_name() {
        let editor = editor();
        let scalar = editor.get_type(TypeKind::Scalar, "SecretScalar").unwrap();
        assert_eq!(scalar.name, "SecretScalar");
        assert!(editor.get_type(TypeKind::Object, "SecretScalar").is_none());
        assert!(editor.get_type(TypeKind::Object, "NotUsed").is_none());
    }

    #[test]
    fn looks_up_root_types() {
        let editor = editor();
        assert_eq!(editor.get_query_type().unwrap().name, "Query");
        assert_eq!(editor.get_mutation_type().unwrap().name, "Mutation");
        assert_eq!(editor.get_subscription_type().unwrap().name, "Subscription");
        assert_eq!(editor.root_type_name(OperationKind::Mutation), Some("Mutation"));

        assert!(editor.get_query("myTypes").is_some());
        assert!(editor.get_mutation("createYetAnotherType").is_some());
        assert!(editor
            .get_subscription("subscribeToMyTypeFieldStringChanges")
            .is_some());
        assert!(editor.get_query("createYetAnotherType").is_none());
    }

    #[test]
    fn looks_up_fields_and_args() {
        let editor = editor();
        let field = editor
            .get_field(TypeKind::Object, "MyType", "fieldSecretScalar")
            .unwrap();
        assert!(matches!(field, FieldRef::Output(_)));
        assert_eq!(field.of_type().underlying().name.as_deref(), Some("SecretScalar"));

        let input_field = editor
            .get_field(TypeKind::InputObject, "InputWithSecretScalar", "string")
            .unwrap();
        assert!(matches!(input_field, FieldRef::Input(_)));
        assert_eq!(input_field.name(), "string");
        assert_eq!(
            editor.get_input_field("InputWithSecretScalar", "string"),
            input_field.input()
        );
        assert!(editor.get_input_field("MyType", "fieldString").is_none());
        assert!(editor
            .get_field(TypeKind::Scalar, "SecretScalar", "string")
            .is_none());

        let arg = editor
            .get_arg(
                TypeKind::Object,
                "MyType",
                "fieldStringWithSecretScalarArg",
                "argSecretScalar",
            )
            .unwrap();
        assert_eq!(arg.name, "argSecretScalar");
        assert!(editor
            .get_arg(TypeKind::Object, "MyType", "fieldString", "argSecretScalar")
            .is_none());
        assert!(editor
            .get_arg(TypeKind::InputObject, "InputWithSecretScalar", "string", "string")
            .is_none());
    }

    #[test]
    fn lists_types() {
        let editor = editor();
        let names = |options| {
            editor
                .all_types(options)
                .into_iter()
                .map(|schema_type| schema_type.name.clone())
                .collect::<Vec<_>>()
        };

        let types = names(AllTypesOptions::default());
        assert!(types.contains(&String::from("MyType")));
        assert!(!types.contains(&String::from("Query")));
        assert!(!types.contains(&String::from("Mutation")));
        assert!(!types.iter().any(|name| name.starts_with("__")));

        let types = names(AllTypesOptions {
            include_reserved: true,
            include_query: true,
            ..AllTypesOptions::default()
        });
        assert!(types.contains(&String::from("Query")));
        assert!(types.contains(&String::from("__Schema")));
        assert!(!types.contains(&String::from("Subscription")));
        assert_eq!(
            names(AllTypesOptions {
                include_reserved: true,
                include_query: true,
                include_mutation: true,
                include_subscription: true,
            })
            .len(),
            editor.schema().types.len()
        );
    }
}
