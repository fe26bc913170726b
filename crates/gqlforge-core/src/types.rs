//! Raw and resolved GraphQL type shapes.
//!
//! [`TypeReference`] is what the schema says (`[User!]!`); [`TypeDescriptor`]
//! is what the generator works with once wrappers have been unwrapped by the
//! [`TypeResolver`](crate::resolver::TypeResolver).

use std::fmt;

/// A GraphQL type reference (NamedType, List, NonNull wrapping).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeReference {
    Named(String),
    List(Box<TypeReference>),
    NonNull(Box<TypeReference>),
}

impl TypeReference {
    pub fn named(name: impl Into<String>) -> Self {
        TypeReference::Named(name.into())
    }

    pub fn list(inner: TypeReference) -> Self {
        TypeReference::List(Box::new(inner))
    }

    pub fn non_null(inner: TypeReference) -> Self {
        TypeReference::NonNull(Box::new(inner))
    }

    /// Get the base (innermost) named type.
    pub fn base_name(&self) -> &str {
        match self {
            TypeReference::Named(name) => name,
            TypeReference::List(inner) => inner.base_name(),
            TypeReference::NonNull(inner) => inner.base_name(),
        }
    }

    /// Whether the outermost wrapper is `NonNull`.
    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeReference::NonNull(_))
    }

    /// Whether the reference is a list once non-null markers are stripped.
    pub fn is_list(&self) -> bool {
        match self {
            TypeReference::Named(_) => false,
            TypeReference::List(_) => true,
            TypeReference::NonNull(inner) => inner.is_list(),
        }
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeReference::Named(name) => write!(f, "{}", name),
            TypeReference::List(inner) => write!(f, "[{}]", inner),
            TypeReference::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

/// Target primitive a scalar maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// 32-bit signed integer.
    Int,
    /// 64-bit float.
    Float,
    String,
    Boolean,
}

/// A single field declared on an object, interface or input type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: TypeReference,
    /// The field is a list whose element type is an object, input or interface.
    ///
    /// Computed once at schema load and carried for callers that branch on
    /// list shape without resolving the field. Resolution and selection do
    /// not read it; they work from `ty`.
    pub is_list_element_composite: bool,
}

/// A resolved, wrapper-free type shape.
///
/// Nullability is not encoded here; callers decide how to present it.
/// Composite fields are kept as unresolved [`FieldDescriptor`]s so that cyclic
/// schemas never force an eager closure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    Scalar(ScalarKind),
    Enum {
        name: String,
        values: Vec<String>,
    },
    ListOf(Box<TypeDescriptor>),
    Named {
        name: String,
        fields: Vec<FieldDescriptor>,
    },
}

impl TypeDescriptor {
    /// Scalars and enums carry no selection set of their own.
    pub fn is_leaf(&self) -> bool {
        match self {
            TypeDescriptor::Scalar(_) | TypeDescriptor::Enum { .. } => true,
            TypeDescriptor::ListOf(inner) => inner.is_leaf(),
            TypeDescriptor::Named { .. } => false,
        }
    }

    /// Strip every `ListOf` level.
    pub fn element(&self) -> &TypeDescriptor {
        match self {
            TypeDescriptor::ListOf(inner) => inner.element(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_unwraps_everything() {
        let ty = TypeReference::non_null(TypeReference::list(TypeReference::non_null(
            TypeReference::named("Int"),
        )));
        assert_eq!(ty.base_name(), "Int");
    }

    #[test]
    fn display_renders_sdl_notation() {
        let ty = TypeReference::non_null(TypeReference::list(TypeReference::non_null(
            TypeReference::named("User"),
        )));
        assert_eq!(ty.to_string(), "[User!]!");
        assert_eq!(TypeReference::named("ID").to_string(), "ID");
    }

    #[test]
    fn is_list_sees_through_non_null() {
        assert!(TypeReference::non_null(TypeReference::list(TypeReference::named("A"))).is_list());
        assert!(!TypeReference::non_null(TypeReference::named("A")).is_list());
    }

    #[test]
    fn leaf_and_element() {
        let list = TypeDescriptor::ListOf(Box::new(TypeDescriptor::ListOf(Box::new(
            TypeDescriptor::Scalar(ScalarKind::String),
        ))));
        assert!(list.is_leaf());
        assert_eq!(list.element(), &TypeDescriptor::Scalar(ScalarKind::String));

        let named = TypeDescriptor::Named {
            name: "User".to_string(),
            fields: Vec::new(),
        };
        assert!(!TypeDescriptor::ListOf(Box::new(named)).is_leaf());
    }
}
