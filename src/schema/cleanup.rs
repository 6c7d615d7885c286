use hashbrown::HashSet;
use tracing::{debug, trace};

use super::introspection::{IntrospectionSchema, IntrospectionType, TypeRef};
use super::reference_index::ReferenceIndex;
use super::slots::Slots;
use super::type_key::{dig_underlying_type, is_reserved_type, TypeIdentity, TypeKey};
use crate::error::{Error, ErrorType, Result};
use crate::options::Options;

/// Cleans the schema until it stops changing and leaves `index` analyzed for the result.
///
/// Every pass drops children whose referenced type is missing and, when `remove_unused_types`
/// is enabled, types that can't be reached from the root operation types. Since a removal may
/// strand further types, passes are repeated until one of them changes nothing. Each pass that
/// changes something removes at least one element, so the number of passes is bounded by the
/// size of the schema.
pub(crate) fn clean_schema(
    schema: &mut IntrospectionSchema,
    index: &mut ReferenceIndex,
    options: &Options,
) -> Result<()> {
    let max_passes = element_count(schema) + 2;
    clean_with_pass_limit(schema, index, options, max_passes)
}

/// Runs at most `max_passes` cleanup passes. Not settling within them is an invariant error.
fn clean_with_pass_limit(
    schema: &mut IntrospectionSchema,
    index: &mut ReferenceIndex,
    options: &Options,
    max_passes: usize,
) -> Result<()> {
    *index = ReferenceIndex::build(schema);

    for pass in 1..=max_passes {
        let types_before = schema.types.len();
        let changed = clean_pass(schema, index, options);
        debug!(
            pass,
            types_before,
            types_after = schema.types.len(),
            changed,
            "schema cleanup pass"
        );
        if !changed {
            return Ok(());
        }
    }

    Err(Error::new_with_context(
        "Schema cleanup did not reach a fixed point",
        format!("Gave up after {max_passes} passes"),
        Some(ErrorType::Invariant),
    ))
}

/// Runs a single cleanup pass and returns whether the schema changed.
fn clean_pass(
    schema: &mut IntrospectionSchema,
    index: &mut ReferenceIndex,
    options: &Options,
) -> bool {
    let snapshot = schema.clone();

    for schema_type in schema.types.iter_mut() {
        prune_dangling_children(schema_type, index, options);
    }
    if let Some(directives) = schema.directives.as_mut() {
        for directive in directives.iter_mut() {
            if options.remove_args_with_missing_types {
                prune(&mut directive.args, index, |arg| &arg.of_type, "directive argument");
            }
        }
    }

    if options.remove_unused_types {
        let reachable = reachable_types(schema, index);
        let removed = schema.types.retain(|schema_type| {
            is_reserved_type(&schema_type.name) || reachable.contains(&schema_type.type_key())
        });
        if removed > 0 {
            debug!(removed, "removed unreachable types");
        }
    } else {
        schema.types.compact();
    }

    *index = ReferenceIndex::build(schema);
    *schema != snapshot
}

/// Drops the children of a type that reference types which no longer exist.
fn prune_dangling_children(
    schema_type: &mut IntrospectionType,
    index: &ReferenceIndex,
    options: &Options,
) {
    if let Some(fields) = schema_type.fields.as_mut() {
        if options.remove_fields_with_missing_types {
            prune(fields, index, |field| &field.of_type, "field");
        } else {
            fields.compact();
        }
        if options.remove_args_with_missing_types {
            for field in fields.iter_mut() {
                prune(&mut field.args, index, |arg| &arg.of_type, "argument");
            }
        } else {
            fields.iter_mut().for_each(|field| field.args.compact());
        }
    }

    if let Some(input_fields) = schema_type.input_fields.as_mut() {
        if options.remove_input_fields_with_missing_types {
            prune(input_fields, index, |input_field| &input_field.of_type, "input field");
        } else {
            input_fields.compact();
        }
    }

    if options.remove_possible_types_of_missing_types {
        if let Some(possible_types) = schema_type.possible_types.as_mut() {
            prune(possible_types, index, |type_ref| type_ref, "possible type");
        }
        if let Some(interfaces) = schema_type.interfaces.as_mut() {
            prune(interfaces, index, |type_ref| type_ref, "interface");
        }
    } else {
        if let Some(possible_types) = schema_type.possible_types.as_mut() {
            possible_types.compact();
        }
        if let Some(interfaces) = schema_type.interfaces.as_mut() {
            interfaces.compact();
        }
    }

    if let Some(enum_values) = schema_type.enum_values.as_mut() {
        enum_values.compact();
    }
}

fn prune<T>(
    slots: &mut Slots<T>,
    index: &ReferenceIndex,
    type_of: impl Fn(&T) -> &TypeRef,
    element: &str,
) {
    slots.retain(|child| {
        let key = dig_underlying_type(type_of(child));
        let exists = index.has_type(&key);
        if !exists {
            trace!(element, missing_type = %key, "dropping element with missing type");
        }
        exists
    });
}

/// Collects every type reachable from the root operation types, the reserved introspection
/// types and the arguments of directives.
fn reachable_types(schema: &IntrospectionSchema, index: &ReferenceIndex) -> HashSet<TypeKey> {
    let mut reachable: HashSet<TypeKey> = HashSet::new();
    let mut queue: Vec<TypeKey> = Vec::new();

    let visit = |key: TypeKey, reachable: &mut HashSet<TypeKey>, queue: &mut Vec<TypeKey>| {
        if index.has_type(&key) && reachable.insert(key.clone()) {
            queue.push(key);
        }
    };

    for key in index.root_keys() {
        visit(key, &mut reachable, &mut queue);
    }
    for schema_type in schema.types.iter() {
        if is_reserved_type(&schema_type.name) {
            visit(schema_type.type_key(), &mut reachable, &mut queue);
        }
    }
    if let Some(directives) = &schema.directives {
        for arg in directives.iter().flat_map(|directive| directive.args.iter()) {
            visit(dig_underlying_type(&arg.of_type), &mut reachable, &mut queue);
        }
    }

    while let Some(key) = queue.pop() {
        let Some(schema_type) = index
            .type_index(&key)
            .and_then(|slot| schema.types.get(slot))
        else {
            continue;
        };
        for referenced in referenced_types(schema_type) {
            visit(referenced, &mut reachable, &mut queue);
        }
    }

    reachable
}

/// Every type a type refers to through its fields, arguments, input fields, possible types and
/// interfaces.
fn referenced_types(schema_type: &IntrospectionType) -> impl Iterator<Item = TypeKey> + '_ {
    let field_types = schema_type
        .fields
        .iter()
        .flat_map(Slots::iter)
        .map(|field| &field.of_type);
    let arg_types = schema_type
        .fields
        .iter()
        .flat_map(Slots::iter)
        .flat_map(|field| field.args.iter())
        .map(|arg| &arg.of_type);
    let input_field_types = schema_type
        .input_fields
        .iter()
        .flat_map(Slots::iter)
        .map(|input_field| &input_field.of_type);
    let possible_types = schema_type.possible_types.iter().flat_map(Slots::iter);
    let interfaces = schema_type.interfaces.iter().flat_map(Slots::iter);

    field_types
        .chain(arg_types)
        .chain(input_field_types)
        .chain(possible_types)
        .chain(interfaces)
        .map(dig_underlying_type)
}

fn element_count(schema: &IntrospectionSchema) -> usize {
    let directive_args: usize = schema
        .directives
        .iter()
        .flat_map(Slots::iter)
        .map(|directive| directive.args.len())
        .sum();
    schema.types.len()
        + directive_args
        + schema
            .types
            .iter()
            .map(IntrospectionType::element_count)
            .sum::<usize>()
}
