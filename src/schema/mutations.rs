use tracing::debug;

use super::editor::SchemaEditor;
use super::introspection::{IntrospectionType, TypeKind};
use super::reference_index::ReferenceKind;
use super::slots::Slots;
use super::type_key::{types_are_same, OperationKind, TypeKey};
use crate::error::{Error, ErrorType, Result};
use crate::options::RemoveTypeOptions;

impl SchemaEditor {
    /// Removes a type and, per `options`, every field, argument, input field, possible type and
    /// interface entry that references it.
    ///
    /// Returns `Ok(false)` if no type of this kind and name exists. If the removal fails part-way
    /// the schema is restored to its state before the call.
    ///
    /// Root operation types can't be removed. The query type is required, so trying to remove
    /// it is an error, while the mutation and subscription types are left in place with
    /// `Ok(false)`.
    pub fn remove_type(
        &mut self,
        kind: TypeKind,
        name: &str,
        options: RemoveTypeOptions,
    ) -> Result<bool> {
        let key = TypeKey::new(kind, name);
        if kind == TypeKind::Object {
            let root = OperationKind::ALL
                .into_iter()
                .find(|&operation| self.root_type_name(operation) == Some(name));
            match root {
                Some(OperationKind::Query) => {
                    return Err(Error::new_with_context(
                        "The query type can't be removed",
                        format!("{key} is the query type"),
                        Some(ErrorType::Invariant),
                    ))
                }
                Some(operation) => {
                    debug!(type_key = %key, ?operation, "kept root type");
                    return Ok(false);
                }
                None => {}
            }
        }

        let plan = options.resolve(&self.options);
        self.transaction(|editor| {
            let Some(slot) = editor.index.type_index(&key) else {
                return Ok(false);
            };
            match editor.schema.types.get(slot) {
                Some(schema_type) if types_are_same(schema_type, &key) => {}
                _ => {
                    return Err(Error::new_with_context(
                        "Reference index does not match the schema",
                        format!("{key} is not at types.{slot}"),
                        Some(ErrorType::Invariant),
                    ))
                }
            }
            editor.schema.types.tombstone(slot);
            editor.index.forget_type(&key);

            let mut removed = 0;
            if plan.remove_fields_of_type {
                removed += editor.unset_references(ReferenceKind::Field, &key)?;
            }
            if plan.remove_args_of_type {
                removed += editor.unset_references(ReferenceKind::Argument, &key)?;
            }
            if plan.remove_input_fields_of_type {
                removed += editor.unset_references(ReferenceKind::InputField, &key)?;
            }
            if plan.remove_possible_types_of_type {
                removed += editor.unset_references(ReferenceKind::PossibleType, &key)?;
                removed += editor.unset_references(ReferenceKind::Interface, &key)?;
            }
            debug!(type_key = %key, cascaded = removed, "removed type");

            editor.finish(plan.cleanup)?;
            Ok(true)
        })
    }

    /// Removes every field returning the given type.
    pub fn remove_fields_of_type(
        &mut self,
        kind: TypeKind,
        name: &str,
        cleanup: Option<bool>,
    ) -> Result<bool> {
        self.remove_references(ReferenceKind::Field, TypeKey::new(kind, name), cleanup)
    }

    /// Removes every field and directive argument accepting the given type.
    pub fn remove_args_of_type(
        &mut self,
        kind: TypeKind,
        name: &str,
        cleanup: Option<bool>,
    ) -> Result<bool> {
        self.remove_references(ReferenceKind::Argument, TypeKey::new(kind, name), cleanup)
    }

    /// Removes every input object field accepting the given type.
    pub fn remove_input_fields_of_type(
        &mut self,
        kind: TypeKind,
        name: &str,
        cleanup: Option<bool>,
    ) -> Result<bool> {
        self.remove_references(ReferenceKind::InputField, TypeKey::new(kind, name), cleanup)
    }

    /// Removes the given type from the possible types of every union and interface, and from
    /// the interfaces of every implementing type.
    pub fn remove_possible_types_of_type(
        &mut self,
        kind: TypeKind,
        name: &str,
        cleanup: Option<bool>,
    ) -> Result<bool> {
        let cleanup = self.options.cleanup(cleanup);
        let key = TypeKey::new(kind, name);
        self.transaction(|editor| {
            let removed = editor.unset_references(ReferenceKind::PossibleType, &key)?
                + editor.unset_references(ReferenceKind::Interface, &key)?;
            editor.finish(cleanup)?;
            Ok(removed > 0)
        })
    }

    /// Removes an output field from an object or interface type.
    ///
    /// Input object fields are removed with [`SchemaEditor::remove_input_field`] instead, so this
    /// returns `Ok(false)` for any other kind.
    pub fn remove_field(
        &mut self,
        kind: TypeKind,
        type_name: &str,
        field_name: &str,
        cleanup: Option<bool>,
    ) -> Result<bool> {
        if !kind.has_fields() {
            return Ok(false);
        }
        let cleanup = self.options.cleanup(cleanup);
        let key = TypeKey::new(kind, type_name);
        self.transaction(|editor| {
            let removed = editor
                .type_mut(&key)
                .and_then(|schema_type| schema_type.fields.as_mut())
                .map_or(false, |fields| tombstone_named(fields, field_name, |field| &field.name));
            if !removed {
                return Ok(false);
            }
            debug!(type_key = %key, field = field_name, "removed field");
            editor.finish(cleanup)?;
            Ok(true)
        })
    }

    /// Removes a field from an input object type.
    pub fn remove_input_field(
        &mut self,
        type_name: &str,
        field_name: &str,
        cleanup: Option<bool>,
    ) -> Result<bool> {
        let cleanup = self.options.cleanup(cleanup);
        let key = TypeKey::new(TypeKind::InputObject, type_name);
        self.transaction(|editor| {
            let removed = editor
                .type_mut(&key)
                .and_then(|schema_type| schema_type.input_fields.as_mut())
                .map_or(false, |input_fields| {
                    tombstone_named(input_fields, field_name, |input_field| &input_field.name)
                });
            if !removed {
                return Ok(false);
            }
            debug!(type_key = %key, input_field = field_name, "removed input field");
            editor.finish(cleanup)?;
            Ok(true)
        })
    }

    /// Removes an argument from a field of an object or interface type.
    pub fn remove_arg(
        &mut self,
        kind: TypeKind,
        type_name: &str,
        field_name: &str,
        arg_name: &str,
        cleanup: Option<bool>,
    ) -> Result<bool> {
        let cleanup = self.options.cleanup(cleanup);
        let key = TypeKey::new(kind, type_name);
        self.transaction(|editor| {
            let removed = editor
                .type_mut(&key)
                .and_then(|schema_type| schema_type.fields.as_mut())
                .and_then(|fields| fields.iter_mut().find(|field| field.name == field_name))
                .map_or(false, |field| tombstone_named(&mut field.args, arg_name, |arg| &arg.name));
            if !removed {
                return Ok(false);
            }
            debug!(type_key = %key, field = field_name, arg = arg_name, "removed argument");
            editor.finish(cleanup)?;
            Ok(true)
        })
    }

    /// Removes a single value from an enum type.
    ///
    /// Enum values aren't referenced by anything else, so this never triggers a cleanup.
    pub fn remove_enum_value(&mut self, name: &str, value: &str) -> bool {
        let key = TypeKey::new(TypeKind::Enum, name);
        let removed = self
            .type_mut(&key)
            .and_then(|schema_type| schema_type.enum_values.as_mut())
            .map_or(false, |values| tombstone_named(values, value, |enum_value| &enum_value.name));
        if removed {
            debug!(type_key = %key, value, "removed enum value");
        }
        removed
    }

    /// Removes a possible type from a union.
    ///
    /// An entry is only removed if both its kind and its name match.
    pub fn remove_possible_type(
        &mut self,
        type_name: &str,
        kind: TypeKind,
        name: &str,
        cleanup: Option<bool>,
    ) -> Result<bool> {
        let cleanup = self.options.cleanup(cleanup);
        let union_key = TypeKey::new(TypeKind::Union, type_name);
        let possible_type = TypeKey::new(kind, name);
        self.transaction(|editor| {
            let removed = editor
                .type_mut(&union_key)
                .and_then(|schema_type| schema_type.possible_types.as_mut())
                .map_or(0, |possible_types| {
                    possible_types
                        .tombstone_where(|type_ref| types_are_same(type_ref, &possible_type))
                });
            if removed == 0 {
                return Ok(false);
            }
            debug!(
                type_key = %union_key,
                possible_type = %possible_type,
                "removed possible type"
            );
            editor.finish(cleanup)?;
            Ok(true)
        })
    }

    /// Removes a field from the query type.
    pub fn remove_query(&mut self, field_name: &str, cleanup: Option<bool>) -> Result<bool> {
        self.remove_root_field(OperationKind::Query, field_name, cleanup)
    }

    /// Removes a field from the mutation type. Returns `Ok(false)` if the schema has none.
    pub fn remove_mutation(&mut self, field_name: &str, cleanup: Option<bool>) -> Result<bool> {
        self.remove_root_field(OperationKind::Mutation, field_name, cleanup)
    }

    /// Removes a field from the subscription type. Returns `Ok(false)` if the schema has none.
    pub fn remove_subscription(&mut self, field_name: &str, cleanup: Option<bool>) -> Result<bool> {
        self.remove_root_field(OperationKind::Subscription, field_name, cleanup)
    }

    fn remove_root_field(
        &mut self,
        operation: OperationKind,
        field_name: &str,
        cleanup: Option<bool>,
    ) -> Result<bool> {
        let Some(type_name) = self.root_type_name(operation).map(str::to_owned) else {
            return Ok(false);
        };
        self.remove_field(TypeKind::Object, &type_name, field_name, cleanup)
    }

    fn remove_references(
        &mut self,
        kind: ReferenceKind,
        key: TypeKey,
        cleanup: Option<bool>,
    ) -> Result<bool> {
        let cleanup = self.options.cleanup(cleanup);
        self.transaction(|editor| {
            let removed = editor.unset_references(kind, &key)?;
            editor.finish(cleanup)?;
            Ok(removed > 0)
        })
    }

    /// Tombstones every element of the given kind that references `key`.
    ///
    /// Tombstoning leaves the positions of siblings untouched, so the remaining paths of the
    /// index stay valid until the next analysis.
    fn unset_references(&mut self, kind: ReferenceKind, key: &TypeKey) -> Result<usize> {
        let paths = self.index.take_references(kind, key);
        let mut removed = 0;
        for path in &paths {
            if path.unset(&mut self.schema)? {
                removed += 1;
            }
        }
        if removed > 0 {
            debug!(?kind, type_key = %key, removed, "removed references to type");
        }
        Ok(removed)
    }

    fn type_mut(&mut self, key: &TypeKey) -> Option<&mut IntrospectionType> {
        let slot = self.index.type_index(key)?;
        self.schema
            .types
            .get_mut(slot)
            .filter(|schema_type| types_are_same(&**schema_type, key))
    }
}

/// Tombstones the first live entry with the given name.
fn tombstone_named<T>(slots: &mut Slots<T>, name: &str, name_of: impl Fn(&T) -> &String) -> bool {
    let slot = slots
        .enumerate()
        .find(|(_, entry)| name_of(entry) == name)
        .map(|(slot, _)| slot);
    match slot {
        Some(slot) => slots.tombstone(slot).is_some(),
        None => false,
    }
}
