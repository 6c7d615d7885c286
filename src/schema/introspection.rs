use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::slots::Slots;

/// Attributes of an introspection node that this crate carries along without interpreting them,
/// e.g. `description`, `isDeprecated`, `deprecationReason`, `defaultValue` or `specifiedByURL`.
pub type Attributes = Map<String, Value>;

/// The `{ "__schema": ... }` object an introspection query returns.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IntrospectionQuery {
    #[serde(rename = "__schema")]
    pub schema: IntrospectionSchema,
}

/// An introspection result in either of the two envelopes servers respond with.
///
/// The envelope is preserved when a response is written back out, so whatever form was passed in
/// is also the form that's returned.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum IntrospectionResponse {
    /// `{ "data": { "__schema": ... } }`
    Data { data: IntrospectionQuery },
    /// `{ "__schema": ... }`
    Bare(IntrospectionQuery),
}

impl IntrospectionResponse {
    #[inline]
    pub fn query(&self) -> &IntrospectionQuery {
        match self {
            IntrospectionResponse::Data { data } => data,
            IntrospectionResponse::Bare(query) => query,
        }
    }

    /// Converts the response into a [`serde_json::Value`].
    pub fn to_value(&self) -> crate::error::Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// The `__schema` part of an introspection result.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionSchema {
    #[serde(default)]
    pub query_type: Option<RootTypeRef>,
    #[serde(default)]
    pub mutation_type: Option<RootTypeRef>,
    #[serde(default)]
    pub subscription_type: Option<RootTypeRef>,
    pub types: Slots<IntrospectionType>,
    #[serde(default)]
    pub directives: Option<Slots<IntrospectionDirective>>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

/// A pointer to a root operation type, i.e. the value of `queryType`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RootTypeRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl RootTypeRef {
    pub fn new<S: Into<String>>(name: S) -> Self {
        RootTypeRef {
            name: Some(name.into()),
            attributes: Attributes::new(),
        }
    }
}

/// The `kind` of a type or of a type reference.
///
/// `LIST` and `NON_NULL` only ever appear as wrappers inside a [TypeRef].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

impl TypeKind {
    /// Whether this kind wraps another type reference rather than naming a type.
    #[inline]
    pub fn is_wrapping(self) -> bool {
        matches!(self, TypeKind::List | TypeKind::NonNull)
    }

    /// Whether types of this kind expose output fields that may be selected and carry arguments.
    #[inline]
    pub fn has_fields(self) -> bool {
        matches!(self, TypeKind::Object | TypeKind::Interface)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeKind::Scalar => "SCALAR",
            TypeKind::Object => "OBJECT",
            TypeKind::Interface => "INTERFACE",
            TypeKind::Union => "UNION",
            TypeKind::Enum => "ENUM",
            TypeKind::InputObject => "INPUT_OBJECT",
            TypeKind::List => "LIST",
            TypeKind::NonNull => "NON_NULL",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference to a type, possibly wrapped in `LIST` and `NON_NULL` layers.
///
/// Wrappers carry their inner reference in `of_type` and no name; named references carry a name
/// and no `of_type`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    pub kind: TypeKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub of_type: Option<Box<TypeRef>>,
}

impl TypeRef {
    /// Creates a reference to a named type.
    pub fn named<S: Into<String>>(kind: TypeKind, name: S) -> Self {
        TypeRef {
            kind,
            name: Some(name.into()),
            of_type: None,
        }
    }

    pub fn list(of_type: TypeRef) -> Self {
        TypeRef {
            kind: TypeKind::List,
            name: None,
            of_type: Some(Box::new(of_type)),
        }
    }

    pub fn non_null(of_type: TypeRef) -> Self {
        TypeRef {
            kind: TypeKind::NonNull,
            name: None,
            of_type: Some(Box::new(of_type)),
        }
    }

    /// Strips all `LIST` and `NON_NULL` layers and returns the innermost reference.
    ///
    /// A malformed wrapper without an `ofType` is returned as is.
    pub fn underlying(&self) -> &TypeRef {
        let mut type_ref = self;
        while type_ref.kind.is_wrapping() {
            match type_ref.of_type {
                Some(ref of_type) => type_ref = &**of_type,
                None => break,
            }
        }
        type_ref
    }
}

/// A single entry of `__schema.types`.
///
/// Only the collections that apply to a type's kind are set: `fields` and `interfaces` for objects
/// and interfaces, `possibleTypes` for unions and interfaces, `enumValues` for enums and
/// `inputFields` for input objects. The others are `null`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionType {
    pub kind: TypeKind,
    pub name: String,
    #[serde(default)]
    pub fields: Option<Slots<IntrospectionField>>,
    #[serde(default)]
    pub input_fields: Option<Slots<IntrospectionInputValue>>,
    #[serde(default)]
    pub interfaces: Option<Slots<TypeRef>>,
    #[serde(default)]
    pub enum_values: Option<Slots<IntrospectionEnumValue>>,
    #[serde(default)]
    pub possible_types: Option<Slots<TypeRef>>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl IntrospectionType {
    /// Creates a type without any children.
    pub fn new<S: Into<String>>(kind: TypeKind, name: S) -> Self {
        IntrospectionType {
            kind,
            name: name.into(),
            fields: None,
            input_fields: None,
            interfaces: None,
            enum_values: None,
            possible_types: None,
            attributes: Attributes::new(),
        }
    }

    /// Returns an output field by name. Only objects and interfaces have output fields.
    pub fn field(&self, name: &str) -> Option<&IntrospectionField> {
        self.fields.as_ref()?.find(|field| field.name == name)
    }

    pub fn input_field(&self, name: &str) -> Option<&IntrospectionInputValue> {
        self.input_fields.as_ref()?.find(|field| field.name == name)
    }

    pub fn enum_value(&self, name: &str) -> Option<&IntrospectionEnumValue> {
        self.enum_values.as_ref()?.find(|value| value.name == name)
    }

    /// Total number of live children across all collections, nested arguments included.
    pub fn element_count(&self) -> usize {
        let fields = self.fields.as_ref().map_or(0, |fields| {
            fields.iter().map(|field| 1 + field.args.len()).sum()
        });
        fields
            + self.input_fields.as_ref().map_or(0, Slots::len)
            + self.interfaces.as_ref().map_or(0, Slots::len)
            + self.enum_values.as_ref().map_or(0, Slots::len)
            + self.possible_types.as_ref().map_or(0, Slots::len)
    }
}

/// An output field of an object or interface type.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IntrospectionField {
    pub name: String,
    #[serde(default)]
    pub args: Slots<IntrospectionInputValue>,
    #[serde(rename = "type")]
    pub of_type: TypeRef,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl IntrospectionField {
    pub fn new<S: Into<String>>(name: S, of_type: TypeRef) -> Self {
        IntrospectionField {
            name: name.into(),
            args: Slots::new(),
            of_type,
            attributes: Attributes::new(),
        }
    }

    pub fn arg(&self, name: &str) -> Option<&IntrospectionInputValue> {
        self.args.find(|arg| arg.name == name)
    }
}

/// An argument or an input object field.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IntrospectionInputValue {
    pub name: String,
    #[serde(rename = "type")]
    pub of_type: TypeRef,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl IntrospectionInputValue {
    pub fn new<S: Into<String>>(name: S, of_type: TypeRef) -> Self {
        IntrospectionInputValue {
            name: name.into(),
            of_type,
            attributes: Attributes::new(),
        }
    }
}

/// A field of either an output type or an input object, as returned by
/// [`SchemaEditor::get_field`](super::SchemaEditor::get_field).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRef<'a> {
    Output(&'a IntrospectionField),
    Input(&'a IntrospectionInputValue),
}

impl<'a> FieldRef<'a> {
    #[inline]
    pub fn name(&self) -> &'a str {
        match self {
            FieldRef::Output(field) => &field.name,
            FieldRef::Input(input_field) => &input_field.name,
        }
    }

    #[inline]
    pub fn of_type(&self) -> &'a TypeRef {
        match self {
            FieldRef::Output(field) => &field.of_type,
            FieldRef::Input(input_field) => &input_field.of_type,
        }
    }

    #[inline]
    pub fn output(self) -> Option<&'a IntrospectionField> {
        match self {
            FieldRef::Output(field) => Some(field),
            FieldRef::Input(_) => None,
        }
    }

    #[inline]
    pub fn input(self) -> Option<&'a IntrospectionInputValue> {
        match self {
            FieldRef::Input(input_field) => Some(input_field),
            FieldRef::Output(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IntrospectionEnumValue {
    pub name: String,
    #[serde(flatten)]
    pub attributes: Attributes,
}

/// A directive definition. Its arguments reference input types like field arguments do.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IntrospectionDirective {
    pub name: String,
    #[serde(default)]
    pub args: Slots<IntrospectionInputValue>,
    #[serde(flatten)]
    pub attributes: Attributes,
}
