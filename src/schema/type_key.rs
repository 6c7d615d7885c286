use std::fmt;

use super::introspection::{IntrospectionType, TypeKind, TypeRef};

/// The `(kind, name)` pair identifying a type of the schema.
///
/// Type names are unique in a valid schema, but since removals are requested by kind and name,
/// both are always compared together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey {
    pub kind: TypeKind,
    pub name: String,
}

impl TypeKey {
    pub fn new<S: Into<String>>(kind: TypeKind, name: S) -> Self {
        TypeKey {
            kind,
            name: name.into(),
        }
    }

    /// Shorthand for the key of an `OBJECT` type, the kind most lookups are made with.
    pub fn object<S: Into<String>>(name: S) -> Self {
        TypeKey::new(TypeKind::Object, name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.name)
    }
}

/// Anything that names a type by kind and name.
pub trait TypeIdentity {
    fn type_kind(&self) -> TypeKind;

    fn type_name(&self) -> &str;

    #[inline]
    fn type_key(&self) -> TypeKey {
        TypeKey::new(self.type_kind(), self.type_name())
    }
}

impl TypeIdentity for TypeKey {
    #[inline]
    fn type_kind(&self) -> TypeKind {
        self.kind
    }

    #[inline]
    fn type_name(&self) -> &str {
        &self.name
    }
}

impl TypeIdentity for IntrospectionType {
    #[inline]
    fn type_kind(&self) -> TypeKind {
        self.kind
    }

    #[inline]
    fn type_name(&self) -> &str {
        &self.name
    }
}

/// Identifies the type a reference names. For wrappers use [dig_underlying_type] first.
impl TypeIdentity for TypeRef {
    #[inline]
    fn type_kind(&self) -> TypeKind {
        self.kind
    }

    #[inline]
    fn type_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

/// Digs through any `NON_NULL` and `LIST` nesting and returns the key of the underlying type.
#[inline]
pub fn dig_underlying_type(type_ref: &TypeRef) -> TypeKey {
    type_ref.underlying().type_key()
}

/// Whether the given name belongs to one of GraphQL's reserved introspection types.
#[inline]
pub fn is_reserved_type(name: &str) -> bool {
    name.starts_with("__")
}

/// Compares two types by kind and name.
#[inline]
pub fn types_are_same<A: TypeIdentity + ?Sized, B: TypeIdentity + ?Sized>(a: &A, b: &B) -> bool {
    a.type_kind() == b.type_kind() && a.type_name() == b.type_name()
}

/// The three kinds of root operation a schema may declare a type for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    pub const ALL: [OperationKind; 3] = [
        OperationKind::Query,
        OperationKind::Mutation,
        OperationKind::Subscription,
    ];

    /// The conventional type name used when a server reports a root type that doesn't exist.
    pub fn default_type_name(self) -> &'static str {
        match self {
            OperationKind::Query => "Query",
            OperationKind::Mutation => "Mutation",
            OperationKind::Subscription => "Subscription",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Query => f.write_str("query"),
            OperationKind::Mutation => f.write_str("mutation"),
            OperationKind::Subscription => f.write_str("subscription"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_compare_kind_and_name() {
        let object = TypeKey::object("Foo");
        let interface = TypeKey::new(TypeKind::Interface, "Foo");
        assert_ne!(object, interface);
        assert!(!types_are_same(&object, &interface));
        assert!(types_are_same(
            &object,
            &IntrospectionType::new(TypeKind::Object, "Foo")
        ));
        assert_eq!(object.to_string(), "OBJECT:Foo");
    }

    #[test]
    fn digs_through_wrappers() {
        let type_ref = TypeRef::list(TypeRef::non_null(TypeRef::named(
            TypeKind::InputObject,
            "Filter",
        )));
        assert_eq!(
            dig_underlying_type(&type_ref),
            TypeKey::new(TypeKind::InputObject, "Filter")
        );
    }

    #[test]
    fn reserved_names() {
        assert!(is_reserved_type("__Schema"));
        assert!(is_reserved_type("__TypeKind"));
        assert!(!is_reserved_type("_Service"));
    }
}
