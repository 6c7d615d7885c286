use hashbrown::HashMap;

use super::introspection::IntrospectionSchema;
use super::path::Path;
use super::type_key::{dig_underlying_type, OperationKind, TypeIdentity, TypeKey};

/// The kinds of elements that may reference a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// A field returning the type.
    Field,
    /// A field or directive argument accepting the type.
    Argument,
    /// An input object field accepting the type.
    InputField,
    /// A union or interface listing the type as a possible type.
    PossibleType,
    /// An object or interface implementing the type.
    Interface,
}

type ReferenceMap = HashMap<TypeKey, Vec<Path>>;

/// Reference Index
///
/// Maps every type to its position in `__schema.types` and to every place it is referenced from.
/// The index is derived data: it's rebuilt from scratch by [`ReferenceIndex::build`] whenever the
/// schema's sequences have been shifted, since the [Path]s it records are positional.
///
/// Tombstoned types and children are skipped while building.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceIndex {
    type_to_index: HashMap<TypeKey, usize>,
    fields_of_type: ReferenceMap,
    args_of_type: ReferenceMap,
    input_fields_of_type: ReferenceMap,
    possible_types_of_type: ReferenceMap,
    interfaces_of_type: ReferenceMap,
    query_type_name: Option<String>,
    mutation_type_name: Option<String>,
    subscription_type_name: Option<String>,
}

impl ReferenceIndex {
    /// Analyzes the schema in a single pass over all types and their children.
    pub fn build(schema: &IntrospectionSchema) -> Self {
        let mut index = ReferenceIndex {
            query_type_name: root_name(schema, OperationKind::Query),
            mutation_type_name: root_name(schema, OperationKind::Mutation),
            subscription_type_name: root_name(schema, OperationKind::Subscription),
            ..ReferenceIndex::default()
        };

        for (type_index, schema_type) in schema.types.enumerate() {
            index
                .type_to_index
                .insert(schema_type.type_key(), type_index);

            if let Some(fields) = &schema_type.fields {
                for (field_index, field) in fields.enumerate() {
                    record(
                        &mut index.fields_of_type,
                        dig_underlying_type(&field.of_type),
                        Path::field(type_index, field_index),
                    );
                    for (arg_index, arg) in field.args.enumerate() {
                        record(
                            &mut index.args_of_type,
                            dig_underlying_type(&arg.of_type),
                            Path::field_arg(type_index, field_index, arg_index),
                        );
                    }
                }
            }

            if let Some(input_fields) = &schema_type.input_fields {
                for (input_field_index, input_field) in input_fields.enumerate() {
                    record(
                        &mut index.input_fields_of_type,
                        dig_underlying_type(&input_field.of_type),
                        Path::input_field(type_index, input_field_index),
                    );
                }
            }

            // Possible types and interfaces are bare references without an envelope
            if let Some(possible_types) = &schema_type.possible_types {
                for (possible_type_index, possible_type) in possible_types.enumerate() {
                    record(
                        &mut index.possible_types_of_type,
                        dig_underlying_type(possible_type),
                        Path::possible_type(type_index, possible_type_index),
                    );
                }
            }

            if let Some(interfaces) = &schema_type.interfaces {
                for (interface_index, interface) in interfaces.enumerate() {
                    record(
                        &mut index.interfaces_of_type,
                        dig_underlying_type(interface),
                        Path::interface(type_index, interface_index),
                    );
                }
            }
        }

        if let Some(directives) = &schema.directives {
            for (directive_index, directive) in directives.enumerate() {
                for (arg_index, arg) in directive.args.enumerate() {
                    record(
                        &mut index.args_of_type,
                        dig_underlying_type(&arg.of_type),
                        Path::directive_arg(directive_index, arg_index),
                    );
                }
            }
        }

        index
    }

    /// Returns the slot of a type in `__schema.types`.
    #[inline]
    pub fn type_index(&self, key: &TypeKey) -> Option<usize> {
        self.type_to_index.get(key).copied()
    }

    #[inline]
    pub fn has_type(&self, key: &TypeKey) -> bool {
        self.type_to_index.contains_key(key)
    }

    pub fn type_count(&self) -> usize {
        self.type_to_index.len()
    }

    /// All places a type is referenced from by the given kind of element.
    pub fn references(&self, kind: ReferenceKind, key: &TypeKey) -> &[Path] {
        self.reference_map(kind)
            .get(key)
            .map_or(&[][..], Vec::as_slice)
    }

    #[inline]
    pub fn fields_of_type(&self, key: &TypeKey) -> &[Path] {
        self.references(ReferenceKind::Field, key)
    }

    #[inline]
    pub fn args_of_type(&self, key: &TypeKey) -> &[Path] {
        self.references(ReferenceKind::Argument, key)
    }

    #[inline]
    pub fn input_fields_of_type(&self, key: &TypeKey) -> &[Path] {
        self.references(ReferenceKind::InputField, key)
    }

    #[inline]
    pub fn possible_types_of_type(&self, key: &TypeKey) -> &[Path] {
        self.references(ReferenceKind::PossibleType, key)
    }

    #[inline]
    pub fn interfaces_of_type(&self, key: &TypeKey) -> &[Path] {
        self.references(ReferenceKind::Interface, key)
    }

    /// The name of the root type for the given operation, as declared by the schema.
    pub fn root_type_name(&self, operation: OperationKind) -> Option<&str> {
        match operation {
            OperationKind::Query => self.query_type_name.as_deref(),
            OperationKind::Mutation => self.mutation_type_name.as_deref(),
            OperationKind::Subscription => self.subscription_type_name.as_deref(),
        }
    }

    /// Keys of the declared root types. These are never removed for being unreferenced.
    pub fn root_keys(&self) -> impl Iterator<Item = TypeKey> + '_ {
        OperationKind::ALL
            .into_iter()
            .filter_map(|operation| self.root_type_name(operation))
            .map(TypeKey::object)
    }

    /// Removes a type from the index, e.g. after its slot was tombstoned.
    pub(crate) fn forget_type(&mut self, key: &TypeKey) -> Option<usize> {
        self.type_to_index.remove(key)
    }

    /// Removes and returns the references to a type of the given kind.
    pub(crate) fn take_references(&mut self, kind: ReferenceKind, key: &TypeKey) -> Vec<Path> {
        self.reference_map_mut(kind)
            .remove(key)
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub(crate) fn insert_reference(&mut self, kind: ReferenceKind, key: TypeKey, path: Path) {
        record(self.reference_map_mut(kind), key, path);
    }

    fn reference_map(&self, kind: ReferenceKind) -> &ReferenceMap {
        match kind {
            ReferenceKind::Field => &self.fields_of_type,
            ReferenceKind::Argument => &self.args_of_type,
            ReferenceKind::InputField => &self.input_fields_of_type,
            ReferenceKind::PossibleType => &self.possible_types_of_type,
            ReferenceKind::Interface => &self.interfaces_of_type,
        }
    }

    fn reference_map_mut(&mut self, kind: ReferenceKind) -> &mut ReferenceMap {
        match kind {
            ReferenceKind::Field => &mut self.fields_of_type,
            ReferenceKind::Argument => &mut self.args_of_type,
            ReferenceKind::InputField => &mut self.input_fields_of_type,
            ReferenceKind::PossibleType => &mut self.possible_types_of_type,
            ReferenceKind::Interface => &mut self.interfaces_of_type,
        }
    }
}

#[inline]
fn record(map: &mut ReferenceMap, key: TypeKey, path: Path) {
    map.entry(key).or_default().push(path);
}

fn root_name(schema: &IntrospectionSchema, operation: OperationKind) -> Option<String> {
    let root = match operation {
        OperationKind::Query => schema.query_type.as_ref(),
        OperationKind::Mutation => schema.mutation_type.as_ref(),
        OperationKind::Subscription => schema.subscription_type.as_ref(),
    };
    root.and_then(|root| root.name.clone())
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::fixture_schema;
    use super::super::introspection::TypeKind;
    use super::*;

    #[test]
    fn indexes_types() {
        let schema = fixture_schema();
        let index = ReferenceIndex::build(&schema);

        assert_eq!(index.type_count(), schema.types.len());
        let slot = index.type_index(&TypeKey::object("MyType")).unwrap();
        assert_eq!(schema.types.get(slot).unwrap().name, "MyType");
        assert!(!index.has_type(&TypeKey::new(TypeKind::Interface, "MyType")));

        assert_eq!(index.root_type_name(OperationKind::Query), Some("Query"));
        assert_eq!(
            index.root_keys().collect::<Vec<_>>(),
            vec![
                TypeKey::object("Query"),
                TypeKey::object("Mutation"),
                TypeKey::object("Subscription")
            ]
        );
    }

    #[test]
    fn indexes_references_through_wrappers() {
        let schema = fixture_schema();
        let index = ReferenceIndex::build(&schema);
        let my_type = index.type_index(&TypeKey::object("MyType")).unwrap();

        let secret_scalar = TypeKey::new(TypeKind::Scalar, "SecretScalar");
        // `SecretScalar`, `[SecretScalar]`, `[SecretScalar]!` and `[SecretScalar!]!`
        assert_eq!(index.fields_of_type(&secret_scalar).len(), 4);
        assert!(index
            .fields_of_type(&secret_scalar)
            .iter()
            .all(|path| path.segments[1] == super::super::path::PathSegment::Index(my_type)));
        assert_eq!(index.args_of_type(&secret_scalar).len(), 4);
        assert_eq!(index.input_fields_of_type(&secret_scalar).len(), 1);

        let union_members = index.possible_types_of_type(&TypeKey::object("MyOtherType"));
        assert_eq!(union_members.len(), 1);
        assert_eq!(
            union_members[0].segments[2],
            super::super::path::PathSegment::PossibleTypes
        );
    }

    #[test]
    fn indexes_directive_arguments() {
        let schema = fixture_schema();
        let index = ReferenceIndex::build(&schema);
        let boolean = TypeKey::new(TypeKind::Scalar, "Boolean");

        assert!(index
            .args_of_type(&boolean)
            .iter()
            .any(|path| path.to_string() == "directives.0.args.0"));
    }

    #[test]
    fn skips_tombstones() {
        let mut schema = fixture_schema();
        let before = ReferenceIndex::build(&schema);
        let slot = before.type_index(&TypeKey::object("MyType")).unwrap();
        schema.types.tombstone(slot);

        let after = ReferenceIndex::build(&schema);
        assert!(!after.has_type(&TypeKey::object("MyType")));
        assert!(after
            .fields_of_type(&TypeKey::new(TypeKind::Scalar, "SecretScalar"))
            .is_empty());
        // Slots of the remaining types are unchanged
        assert_eq!(
            after.type_index(&TypeKey::object("Query")),
            before.type_index(&TypeKey::object("Query"))
        );
    }

    #[test]
    fn take_references_empties_entry() {
        let mut index = ReferenceIndex::build(&fixture_schema());
        let secret_enum = TypeKey::new(TypeKind::Enum, "SecretEnum");
        assert_eq!(index.take_references(ReferenceKind::Field, &secret_enum).len(), 4);
        assert!(index.fields_of_type(&secret_enum).is_empty());
        assert_eq!(index.args_of_type(&secret_enum).len(), 4);
    }
}
