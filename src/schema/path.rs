use crate::error::{Error, ErrorType, Result};
use std::fmt;

use super::introspection::IntrospectionSchema;

/// The structural location of an element inside `__schema`, e.g. `types.4.fields.2.args.0`.
///
/// Paths are positional and only stay valid while the sequences they index into aren't shifted.
/// Removals made through [`Path::unset`] tombstone the element, which keeps sibling paths valid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path {
    pub segments: Vec<PathSegment>,
}

impl Path {
    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment)
    }

    /// `types.<type_index>.fields.<field_index>`
    pub fn field(type_index: usize, field_index: usize) -> Self {
        Path {
            segments: vec![
                PathSegment::Types,
                PathSegment::Index(type_index),
                PathSegment::Fields,
                PathSegment::Index(field_index),
            ],
        }
    }

    /// `types.<type_index>.fields.<field_index>.args.<arg_index>`
    pub fn field_arg(type_index: usize, field_index: usize, arg_index: usize) -> Self {
        let mut path = Path::field(type_index, field_index);
        path.push(PathSegment::Args);
        path.push(PathSegment::Index(arg_index));
        path
    }

    /// `types.<type_index>.inputFields.<input_field_index>`
    pub fn input_field(type_index: usize, input_field_index: usize) -> Self {
        Path::type_child(type_index, PathSegment::InputFields, input_field_index)
    }

    /// `types.<type_index>.possibleTypes.<possible_type_index>`
    pub fn possible_type(type_index: usize, possible_type_index: usize) -> Self {
        Path::type_child(type_index, PathSegment::PossibleTypes, possible_type_index)
    }

    /// `types.<type_index>.interfaces.<interface_index>`
    pub fn interface(type_index: usize, interface_index: usize) -> Self {
        Path::type_child(type_index, PathSegment::Interfaces, interface_index)
    }

    /// `directives.<directive_index>.args.<arg_index>`
    pub fn directive_arg(directive_index: usize, arg_index: usize) -> Self {
        Path {
            segments: vec![
                PathSegment::Directives,
                PathSegment::Index(directive_index),
                PathSegment::Args,
                PathSegment::Index(arg_index),
            ],
        }
    }

    fn type_child(type_index: usize, collection: PathSegment, index: usize) -> Self {
        Path {
            segments: vec![
                PathSegment::Types,
                PathSegment::Index(type_index),
                collection,
                PathSegment::Index(index),
            ],
        }
    }

    /// Tombstones the element this path points at.
    ///
    /// Returns `Ok(false)` when the element, or one of its parents, has already been removed.
    /// A path that indexes past the end of a sequence, into a collection the parent doesn't have,
    /// or that has a shape no element lives at, means the path is stale and is an error.
    pub fn unset(&self, schema: &mut IntrospectionSchema) -> Result<bool> {
        use PathSegment::*;
        let removed = match self.segments.as_slice() {
            [Types, Index(type_index), rest @ ..] => {
                let type_index = *type_index;
                if !schema.types.has_slot(type_index) {
                    return Err(self.stale());
                }
                let Some(parent) = schema.types.get_mut(type_index) else {
                    return Ok(false);
                };
                match rest {
                    [Fields, Index(field_index)] => {
                        let fields = parent.fields.as_mut().ok_or_else(|| self.stale())?;
                        tombstone(&mut *fields, *field_index).ok_or_else(|| self.stale())?
                    }
                    [Fields, Index(field_index), Args, Index(arg_index)] => {
                        let fields = parent.fields.as_mut().ok_or_else(|| self.stale())?;
                        if !fields.has_slot(*field_index) {
                            return Err(self.stale());
                        }
                        match fields.get_mut(*field_index) {
                            Some(field) => tombstone(&mut field.args, *arg_index)
                                .ok_or_else(|| self.stale())?,
                            None => false,
                        }
                    }
                    [InputFields, Index(index)] => {
                        let input_fields =
                            parent.input_fields.as_mut().ok_or_else(|| self.stale())?;
                        tombstone(input_fields, *index).ok_or_else(|| self.stale())?
                    }
                    [PossibleTypes, Index(index)] => {
                        let possible_types =
                            parent.possible_types.as_mut().ok_or_else(|| self.stale())?;
                        tombstone(possible_types, *index).ok_or_else(|| self.stale())?
                    }
                    [Interfaces, Index(index)] => {
                        let interfaces = parent.interfaces.as_mut().ok_or_else(|| self.stale())?;
                        tombstone(interfaces, *index).ok_or_else(|| self.stale())?
                    }
                    _ => return Err(self.stale()),
                }
            }
            [Directives, Index(directive_index), Args, Index(arg_index)] => {
                let directives = schema.directives.as_mut().ok_or_else(|| self.stale())?;
                if !directives.has_slot(*directive_index) {
                    return Err(self.stale());
                }
                match directives.get_mut(*directive_index) {
                    Some(directive) => {
                        tombstone(&mut directive.args, *arg_index).ok_or_else(|| self.stale())?
                    }
                    None => false,
                }
            }
            _ => return Err(self.stale()),
        };
        Ok(removed)
    }

    fn stale(&self) -> Error {
        Error::new_with_context(
            "Reference path does not resolve to an element of the schema",
            self.to_string(),
            Some(ErrorType::Invariant),
        )
    }
}

/// `None` if `index` is out of bounds, otherwise whether a live entry was tombstoned.
fn tombstone<T>(slots: &mut super::slots::Slots<T>, index: usize) -> Option<bool> {
    if slots.has_slot(index) {
        Some(slots.tombstone(index).is_some())
    } else {
        None
    }
}

impl TryFrom<&str> for Path {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        let segments = value
            .split('.')
            .map(PathSegment::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { segments })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.segments
                .iter()
                .map(|segment| segment.to_string())
                .collect::<Vec<_>>()
                .join(".")
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Index(usize),

    Args,
    Directives,
    Fields,
    InputFields,
    Interfaces,
    PossibleTypes,
    Types,
}

impl TryFrom<&str> for PathSegment {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        match value.parse::<usize>() {
            Ok(index) => Ok(Self::Index(index)),
            Err(_) => match value {
                "args" => Ok(PathSegment::Args),
                "directives" => Ok(PathSegment::Directives),
                "fields" => Ok(PathSegment::Fields),
                "inputFields" => Ok(PathSegment::InputFields),
                "interfaces" => Ok(PathSegment::Interfaces),
                "possibleTypes" => Ok(PathSegment::PossibleTypes),
                "types" => Ok(PathSegment::Types),
                _ => Err(Error::new(format!("Invalid path segment {value}"), None)),
            },
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PathSegment::Index(index) => index.to_string(),
                PathSegment::Args => String::from("args"),
                PathSegment::Directives => String::from("directives"),
                PathSegment::Fields => String::from("fields"),
                PathSegment::InputFields => String::from("inputFields"),
                PathSegment::Interfaces => String::from("interfaces"),
                PathSegment::PossibleTypes => String::from("possibleTypes"),
                PathSegment::Types => String::from("types"),
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::introspection::*;
    use super::*;

    fn schema() -> IntrospectionSchema {
        let mut query = IntrospectionType::new(TypeKind::Object, "Query");
        let mut field =
            IntrospectionField::new("search", TypeRef::named(TypeKind::Scalar, "String"));
        field.args.push(IntrospectionInputValue::new(
            "term",
            TypeRef::named(TypeKind::Scalar, "String"),
        ));
        field.args.push(IntrospectionInputValue::new(
            "limit",
            TypeRef::named(TypeKind::Scalar, "Int"),
        ));
        query.fields = Some(vec![field].into());
        IntrospectionSchema {
            query_type: Some(RootTypeRef::new("Query")),
            mutation_type: None,
            subscription_type: None,
            types: vec![query, IntrospectionType::new(TypeKind::Scalar, "String")].into(),
            directives: None,
            attributes: Attributes::new(),
        }
    }

    #[test]
    fn parses_and_prints() {
        let path = Path::try_from("types.3.fields.1.args.0").unwrap();
        assert_eq!(path, Path::field_arg(3, 1, 0));
        assert_eq!(path.to_string(), "types.3.fields.1.args.0");
        assert_eq!(
            Path::try_from("types.0.selectionSet").unwrap_err().message(),
            "Invalid path segment selectionSet"
        );
    }

    #[test]
    fn unset_tombstones_in_place() {
        let mut schema = schema();
        assert!(Path::field_arg(0, 0, 0).unset(&mut schema).unwrap());
        // Sibling paths stay valid after a removal
        assert!(Path::field_arg(0, 0, 1).unset(&mut schema).unwrap());
        assert!(!Path::field_arg(0, 0, 1).unset(&mut schema).unwrap());

        let field = schema.types.get(0).unwrap().field("search").unwrap();
        assert!(field.args.is_empty());
        assert_eq!(field.args.capacity_len(), 2);
    }

    #[test]
    fn unset_below_removed_parent_is_noop() {
        let mut schema = schema();
        schema.types.tombstone(0);
        assert!(!Path::field(0, 0).unset(&mut schema).unwrap());
    }

    #[test]
    fn unset_stale_path_errors() {
        let mut schema = schema();
        let err = Path::field(0, 7).unset(&mut schema).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Invariant);
        assert_eq!(err.context(), Some("types.0.fields.7"));

        // The scalar has no input fields to remove from
        assert!(Path::input_field(1, 0).unset(&mut schema).is_err());
        assert!(Path::directive_arg(0, 0).unset(&mut schema).is_err());
    }
}
